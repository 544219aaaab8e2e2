use crate::dataset::Dataset;
use crate::errors::Result;
use crate::services::loader::Loader;
use crate::sources::base::SheetSource;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// 按数据源标识缓存转换后的数据，只能手动失效
///
/// 加载期间持有锁，同一数据源不会被并发加载。
pub struct DatasetCache {
    entries: Mutex<HashMap<String, Arc<Dataset>>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get_or_load<S>(&self, source: &S, loader: &Loader) -> Result<Arc<Dataset>>
    where
        S: SheetSource + Send + Sync + ?Sized,
    {
        let key = source.source_id();
        let mut entries = self.entries.lock().await;

        if let Some(dataset) = entries.get(&key) {
            debug!("Cache hit for {}", key);
            return Ok(Arc::clone(dataset));
        }

        info!("Cache miss for {}, loading", key);
        let dataset = Arc::new(loader.load_dataset(source).await?);
        entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    /// 使一个数据源的缓存失效，返回是否存在该条目
    pub async fn invalidate(&self, source_id: &str) -> bool {
        let removed = self.entries.lock().await.remove(source_id).is_some();
        info!("Invalidated cache for {} (present: {})", source_id, removed);
        removed
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
        info!("Cleared dataset cache");
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new()
    }
}
