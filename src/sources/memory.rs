use crate::errors::{DashboardError, Result};
use crate::models::table::RawTable;
use crate::sources::base::SheetSource;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// 内存中的表格集合
pub struct MemorySource {
    id: String,
    tables: HashMap<String, RawTable>,
    reads: AtomicUsize,
}

impl MemorySource {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            tables: HashMap::new(),
            reads: AtomicUsize::new(0),
        }
    }

    /// 以表名作为工作表名加入
    pub fn with_table(mut self, table: RawTable) -> Self {
        self.tables.insert(table.name.clone(), table);
        self
    }

    /// 累计读取次数
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SheetSource for MemorySource {
    fn source_id(&self) -> String {
        format!("memory:{}", self.id)
    }

    async fn read(&self, worksheet: &str) -> Result<RawTable> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.tables
            .get(worksheet)
            .cloned()
            .ok_or_else(|| DashboardError::TableNotFound {
                worksheet: worksheet.to_string(),
            })
    }
}
