use chrono::NaiveDateTime;

pub const DATE_COLUMN: &str = "Date";
pub const NUMERIC_COLUMNS: [&str; 5] = ["Open", "High", "Low", "Close", "Volume"];

/// 日线数据，单个代码的一个交易日
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub date: NaiveDateTime,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl HistoryRecord {
    pub fn new(date: NaiveDateTime, numeric: [Option<f64>; 5]) -> Self {
        let [open, high, low, close, volume] = numeric;
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    pub fn numeric_values(&self) -> [Option<f64>; 5] {
        [self.open, self.high, self.low, self.close, self.volume]
    }
}
