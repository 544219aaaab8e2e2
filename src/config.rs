use chrono::{Local, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::window::Period;

/// 采集元数据列，展示前从总览表中剔除
pub const INGESTION_METADATA_COLUMNS: [&str; 3] = [
    "_airbyte_raw_id",
    "_airbyte_extracted_at",
    "_airbyte_meta",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub ticker_worksheet: String,
    pub cards_per_row: usize,
    pub default_period: Period,
    pub timezone: Option<Tz>,
    pub currency_symbol: String,
    pub hidden_columns: Vec<String>,
    pub bind_addr: String,
}

impl Config {
    pub fn new() -> Self {
        Self {
            ticker_worksheet: "ticker".to_string(),
            cards_per_row: 4,
            default_period: Period::Month,
            timezone: None,
            currency_symbol: "₹".to_string(),
            hidden_columns: INGESTION_METADATA_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect(),
            bind_addr: "127.0.0.1:8501".to_string(),
        }
    }

    pub fn with_ticker_worksheet(mut self, name: &str) -> Self {
        self.ticker_worksheet = name.to_string();
        self
    }

    pub fn with_cards_per_row(mut self, n: usize) -> Self {
        self.cards_per_row = n;
        self
    }

    pub fn with_default_period(mut self, period: Period) -> Self {
        self.default_period = period;
        self
    }

    pub fn with_timezone(mut self, tz: Option<Tz>) -> Self {
        self.timezone = tz;
        self
    }

    pub fn with_currency_symbol(mut self, symbol: &str) -> Self {
        self.currency_symbol = symbol.to_string();
        self
    }

    pub fn with_hidden_columns(mut self, columns: Vec<String>) -> Self {
        self.hidden_columns = columns;
        self
    }

    pub fn with_bind_addr(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// 窗口过滤使用的"今天"：配置了时区则按该时区，否则按本地时钟
    pub fn today(&self) -> NaiveDate {
        match self.timezone {
            Some(tz) => Utc::now().with_timezone(&tz).date_naive(),
            None => Local::now().date_naive(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
