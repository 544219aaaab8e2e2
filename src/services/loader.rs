use crate::config::Config;
use crate::dataset::Dataset;
use crate::errors::Result;
use crate::models::table::RawDataset;
use crate::models::ticker::SYMBOL_COLUMN;
use crate::sources::base::SheetSource;
use crate::transform::transform;
use crate::util::symbol_from_cell;
use log::info;
use std::collections::HashMap;

/// 加载器：先读代码表，再为其中每个代码读一张历史表
///
/// 本身不做缓存，每次调用都会重新读取数据源。
pub struct Loader {
    ticker_worksheet: String,
}

impl Loader {
    pub fn new(config: &Config) -> Self {
        Self {
            ticker_worksheet: config.ticker_worksheet.clone(),
        }
    }

    /// 读取原始表格；任一历史表缺失则整体失败
    pub async fn load<S>(&self, source: &S) -> Result<RawDataset>
    where
        S: SheetSource + Send + Sync + ?Sized,
    {
        info!("Loading {} from {}", self.ticker_worksheet, source.source_id());
        let tickers = source.read(&self.ticker_worksheet).await?;
        let symbol_idx = tickers.column_index(SYMBOL_COLUMN)?;

        let mut histories = HashMap::new();
        for row in 0..tickers.len() {
            let symbol = symbol_from_cell(tickers.cell(row, symbol_idx), row)?;
            // 重复出现的代码只读取一次
            if histories.contains_key(&symbol) {
                continue;
            }
            let history = source.read(&symbol).await?;
            info!("Loaded {} history rows for {}", history.len(), symbol);
            histories.insert(symbol, history);
        }

        info!(
            "Loaded {} tickers with {} history tables",
            tickers.len(),
            histories.len()
        );
        Ok(RawDataset { tickers, histories })
    }

    /// 读取并转换
    pub async fn load_dataset<S>(&self, source: &S) -> Result<Dataset>
    where
        S: SheetSource + Send + Sync + ?Sized,
    {
        let raw = self.load(source).await?;
        transform(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DashboardError;
    use crate::models::table::{Cell, RawTable};
    use crate::sources::memory::MemorySource;

    fn tickers(symbols: &[&str]) -> RawTable {
        RawTable::new(
            "ticker",
            vec!["ticker".to_string()],
            symbols.iter().map(|s| vec![Cell::Text(s.to_string())]).collect(),
        )
    }

    fn empty_history(name: &str) -> RawTable {
        RawTable::new(name, vec!["Date".to_string()], vec![])
    }

    #[tokio::test]
    async fn test_reads_one_table_per_symbol() {
        let source = MemorySource::new("test")
            .with_table(tickers(&["TCS", "INFY", "TCS"]))
            .with_table(empty_history("TCS"))
            .with_table(empty_history("INFY"));

        let raw = Loader::new(&Config::new()).load(&source).await.unwrap();
        assert_eq!(raw.tickers.len(), 3);
        assert_eq!(raw.histories.len(), 2);
        assert!(raw.histories.contains_key("INFY"));
        assert_eq!(source.reads(), 3);
    }

    #[tokio::test]
    async fn test_missing_history_aborts_load() {
        let source = MemorySource::new("test")
            .with_table(tickers(&["TCS", "INFY"]))
            .with_table(empty_history("TCS"));

        match Loader::new(&Config::new()).load(&source).await {
            Err(DashboardError::TableNotFound { worksheet }) => assert_eq!(worksheet, "INFY"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_custom_ticker_worksheet() {
        let mut table = tickers(&[]);
        table.name = "quotes".to_string();
        let source = MemorySource::new("test").with_table(table);

        let config = Config::new().with_ticker_worksheet("quotes");
        let raw = Loader::new(&config).load(&source).await.unwrap();
        assert!(raw.histories.is_empty());
    }
}
