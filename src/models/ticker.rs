use chrono::NaiveDateTime;

use super::table::Cell;

pub const SYMBOL_COLUMN: &str = "ticker";
pub const NAME_COLUMN: &str = "symbol_name";
pub const TRADE_TIME_COLUMN: &str = "last_trade_time";
/// 派生列：该代码完整的历史开盘价序列
pub const OPEN_SERIES_COLUMN: &str = "Open";

/// 需要数值化的十二个代码表列，顺序与 [`TickerRecord::numeric_values`] 一致
pub const NUMERIC_COLUMNS: [&str; 12] = [
    "last_price",
    "previous_day_price",
    "change",
    "change_pct",
    "volume",
    "volume_avg",
    "shares",
    "day_high",
    "day_low",
    "market_cap",
    "p/e_ratio",
    "eps",
];

/// 代码表的一行
#[derive(Debug, Clone, PartialEq)]
pub struct TickerRecord {
    pub symbol: String,
    pub name: String,
    pub last_trade_time: NaiveDateTime,
    pub last_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub change: Option<f64>,
    pub change_pct: Option<f64>,
    pub volume: Option<f64>,
    pub volume_avg: Option<f64>,
    pub shares: Option<f64>,
    pub day_high: Option<f64>,
    pub day_low: Option<f64>,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub eps: Option<f64>,
    /// 历史表顺序的开盘价，不一定按日期排序
    pub open_series: Vec<Option<f64>>,
    /// 其余未识别的列，按原表顺序保留
    pub extras: Vec<(String, Cell)>,
}

impl TickerRecord {
    pub fn new(
        symbol: String,
        name: String,
        last_trade_time: NaiveDateTime,
        numeric: [Option<f64>; 12],
    ) -> Self {
        let [
            last_price,
            previous_close,
            change,
            change_pct,
            volume,
            volume_avg,
            shares,
            day_high,
            day_low,
            market_cap,
            pe_ratio,
            eps,
        ] = numeric;

        Self {
            symbol,
            name,
            last_trade_time,
            last_price,
            previous_close,
            change,
            change_pct,
            volume,
            volume_avg,
            shares,
            day_high,
            day_low,
            market_cap,
            pe_ratio,
            eps,
            open_series: Vec::new(),
            extras: Vec::new(),
        }
    }

    pub fn numeric_values(&self) -> [Option<f64>; 12] {
        [
            self.last_price,
            self.previous_close,
            self.change,
            self.change_pct,
            self.volume,
            self.volume_avg,
            self.shares,
            self.day_high,
            self.day_low,
            self.market_cap,
            self.pe_ratio,
            self.eps,
        ]
    }

    /// 按列名取回单元格；派生的开盘价序列和未知列返回 `None`
    pub fn cell(&self, column: &str) -> Option<Cell> {
        match column {
            SYMBOL_COLUMN => Some(Cell::Text(self.symbol.clone())),
            NAME_COLUMN => Some(Cell::from_text(&self.name)),
            TRADE_TIME_COLUMN => Some(Cell::DateTime(self.last_trade_time)),
            _ => match NUMERIC_COLUMNS.iter().position(|c| *c == column) {
                Some(idx) => Some(Cell::from(self.numeric_values()[idx])),
                None => self
                    .extras
                    .iter()
                    .find(|(name, _)| name == column)
                    .map(|(_, cell)| cell.clone()),
            },
        }
    }

    /// 涨跌幅为负时为 true；缺失值按非负处理
    pub fn is_falling(&self) -> bool {
        self.change_pct.map(|pct| pct < 0.0).unwrap_or(false)
    }
}
