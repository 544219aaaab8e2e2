use chrono::NaiveDate;
use log::debug;
use std::collections::HashMap;

use crate::errors::{DashboardError, Result};
use crate::models::history::{self, HistoryRecord};
use crate::models::table::{Cell, RawDataset, RawTable};
use crate::models::ticker::{self, TickerRecord};
use crate::window::{self, Period};

/// 一次刷新得到的完整类型化数据：代码表加各代码的历史序列
///
/// 每次刷新整体替换，不做增量修改。
#[derive(Debug, Clone)]
pub struct Dataset {
    tickers: Vec<TickerRecord>,
    histories: HashMap<String, Vec<HistoryRecord>>,
    /// 代码表的列顺序，与来源表一致（不含派生列）
    ticker_columns: Vec<String>,
    // 索引用于快速查找
    symbol_index: HashMap<String, usize>,
}

impl Dataset {
    /// 使用提供的数据创建实例，代码表中的每个代码都必须有历史序列
    pub fn new_with_data(
        tickers: Vec<TickerRecord>,
        histories: HashMap<String, Vec<HistoryRecord>>,
    ) -> Result<Self> {
        if let Some(missing) = tickers.iter().find(|t| !histories.contains_key(&t.symbol)) {
            return Err(DashboardError::SymbolNotFound {
                symbol: missing.symbol.clone(),
            });
        }

        let mut ticker_columns: Vec<String> = [
            ticker::SYMBOL_COLUMN,
            ticker::NAME_COLUMN,
            ticker::TRADE_TIME_COLUMN,
        ]
        .iter()
        .chain(ticker::NUMERIC_COLUMNS.iter())
        .map(|c| c.to_string())
        .collect();
        if let Some(first) = tickers.first() {
            ticker_columns.extend(first.extras.iter().map(|(name, _)| name.clone()));
        }

        let mut dataset = Self {
            tickers,
            histories,
            ticker_columns,
            symbol_index: HashMap::new(),
        };
        dataset.rebuild_indices();

        Ok(dataset)
    }

    /// 使用来源表的列顺序；派生的开盘价列被忽略
    pub fn with_ticker_columns(mut self, columns: Vec<String>) -> Self {
        self.ticker_columns = columns
            .into_iter()
            .filter(|c| c != ticker::OPEN_SERIES_COLUMN)
            .collect();
        self
    }

    /// 重建索引，重复的代码指向第一行
    fn rebuild_indices(&mut self) {
        self.symbol_index.clear();
        for (i, t) in self.tickers.iter().enumerate() {
            self.symbol_index.entry(t.symbol.clone()).or_insert(i);
        }
        debug!("Indexed {} tickers", self.symbol_index.len());
    }

    /// 代码表，保持原表顺序
    pub fn tickers(&self) -> &[TickerRecord] {
        &self.tickers
    }

    pub fn histories(&self) -> &HashMap<String, Vec<HistoryRecord>> {
        &self.histories
    }

    pub fn ticker_columns(&self) -> &[String] {
        &self.ticker_columns
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.tickers.iter().map(|t| t.symbol.as_str())
    }

    pub fn ticker(&self, symbol: &str) -> Result<&TickerRecord> {
        self.symbol_index
            .get(symbol)
            .map(|&idx| &self.tickers[idx])
            .ok_or_else(|| DashboardError::SymbolNotFound {
                symbol: symbol.to_string(),
            })
    }

    pub fn history(&self, symbol: &str) -> Result<&[HistoryRecord]> {
        self.histories
            .get(symbol)
            .map(Vec::as_slice)
            .ok_or_else(|| DashboardError::SymbolNotFound {
                symbol: symbol.to_string(),
            })
    }

    /// 查找代码并截取 `today` 为止的尾部窗口
    pub fn window(
        &self,
        symbol: &str,
        period: Period,
        today: NaiveDate,
    ) -> Result<&[HistoryRecord]> {
        let history = self.history(symbol)?;
        Ok(window::filter_history(history, period, today))
    }

    /// 代码表转回单元格形式，按来源列顺序
    pub fn ticker_table(&self, worksheet: &str) -> RawTable {
        let rows = self
            .tickers
            .iter()
            .map(|t| {
                self.ticker_columns
                    .iter()
                    .map(|c| t.cell(c).unwrap_or(Cell::Empty))
                    .collect()
            })
            .collect();
        RawTable::new(worksheet, self.ticker_columns.clone(), rows)
    }

    /// 转回单元格形式：数值、空值和日期时间；派生的开盘价序列不写出
    pub fn to_raw(&self, ticker_worksheet: &str) -> RawDataset {
        let mut history_columns = vec![history::DATE_COLUMN.to_string()];
        history_columns.extend(history::NUMERIC_COLUMNS.iter().map(|c| c.to_string()));

        let histories = self
            .histories
            .iter()
            .map(|(symbol, records)| {
                let rows = records
                    .iter()
                    .map(|r| {
                        let mut row = vec![Cell::DateTime(r.date)];
                        row.extend(r.numeric_values().into_iter().map(Cell::from));
                        row
                    })
                    .collect();
                (symbol.clone(), RawTable::new(symbol, history_columns.clone(), rows))
            })
            .collect();

        RawDataset {
            tickers: self.ticker_table(ticker_worksheet),
            histories,
        }
    }
}
