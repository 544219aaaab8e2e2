//! 把原始表格转换为类型化的记录
//!
//! 数值列宽松处理（无法转换的值变为空值），日期列严格处理（任一值无法解析则整体失败）。
//! 两种策略刻意保持不同。

use log::{debug, info};
use std::collections::HashMap;

use crate::dataset::Dataset;
use crate::errors::{DashboardError, Result};
use crate::models::history::{self, HistoryRecord};
use crate::models::table::{RawDataset, RawTable};
use crate::models::ticker::{self, TickerRecord};
use crate::util::{coerce_numeric, parse_day_first, symbol_from_cell};

/// 转换代码表和全部历史表，并为每个代码附加完整的开盘价序列
pub fn transform(raw: &RawDataset) -> Result<Dataset> {
    let mut tickers = transform_tickers(&raw.tickers)?;

    let mut histories = HashMap::with_capacity(raw.histories.len());
    for (symbol, table) in &raw.histories {
        let records = transform_history(table)?;
        debug!("Transformed {} history rows for {}", records.len(), symbol);
        histories.insert(symbol.clone(), records);
    }

    // 每次转换都为所有行重新计算
    for t in tickers.iter_mut() {
        let history = histories
            .get(&t.symbol)
            .ok_or_else(|| DashboardError::SymbolNotFound {
                symbol: t.symbol.clone(),
            })?;
        t.open_series = history.iter().map(|r| r.open).collect();
    }

    info!(
        "Transformed {} tickers and {} history tables",
        tickers.len(),
        histories.len()
    );
    let dataset = Dataset::new_with_data(tickers, histories)?;
    Ok(dataset.with_ticker_columns(raw.tickers.columns.clone()))
}

pub fn transform_tickers(table: &RawTable) -> Result<Vec<TickerRecord>> {
    let symbol_idx = table.column_index(ticker::SYMBOL_COLUMN)?;
    let name_idx = table.column_index(ticker::NAME_COLUMN)?;
    let time_idx = table.column_index(ticker::TRADE_TIME_COLUMN)?;
    let numeric_idx = ticker::NUMERIC_COLUMNS
        .iter()
        .map(|c| table.column_index(c))
        .collect::<Result<Vec<_>>>()?;

    // 派生列若已存在（对已转换的数据再次转换），重新计算而不是保留
    let known: Vec<usize> = [symbol_idx, name_idx, time_idx]
        .into_iter()
        .chain(numeric_idx.iter().copied())
        .chain(table.column_index(ticker::OPEN_SERIES_COLUMN).ok())
        .collect();

    let mut records = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let symbol = symbol_from_cell(table.cell(row, symbol_idx), row)?;
        let name = table.cell(row, name_idx).to_string();
        let last_trade_time = parse_strict(table, row, time_idx)?;

        let mut numeric = [None; 12];
        for (slot, &idx) in numeric.iter_mut().zip(&numeric_idx) {
            *slot = coerce_numeric(table.cell(row, idx));
        }

        let mut record = TickerRecord::new(symbol, name, last_trade_time, numeric);
        record.extras = table
            .columns
            .iter()
            .enumerate()
            .filter(|(idx, _)| !known.contains(idx))
            .map(|(idx, column)| (column.clone(), table.cell(row, idx).clone()))
            .collect();
        records.push(record);
    }

    Ok(records)
}

/// 历史表保持原有行顺序，不按日期排序
pub fn transform_history(table: &RawTable) -> Result<Vec<HistoryRecord>> {
    let date_idx = table.column_index(history::DATE_COLUMN)?;
    let numeric_idx = history::NUMERIC_COLUMNS
        .iter()
        .map(|c| table.column_index(c))
        .collect::<Result<Vec<_>>>()?;

    let mut records = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let date = parse_strict(table, row, date_idx)?;

        let mut numeric = [None; 5];
        for (slot, &idx) in numeric.iter_mut().zip(&numeric_idx) {
            *slot = coerce_numeric(table.cell(row, idx));
        }
        records.push(HistoryRecord::new(date, numeric));
    }

    Ok(records)
}

fn parse_strict(table: &RawTable, row: usize, idx: usize) -> Result<chrono::NaiveDateTime> {
    let cell = table.cell(row, idx);
    parse_day_first(cell).ok_or_else(|| DashboardError::DateParse {
        table: table.name.clone(),
        column: table.columns[idx].clone(),
        row: row + 1,
        value: cell.to_string(),
    })
}
