use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Excel parsing error: {0}")]
    ExcelError(#[from] calamine::Error),

    /// 日期列严格解析失败，整个转换中止
    #[error("Date parsing error in {table}.{column} (row {row}): '{value}'")]
    DateParse {
        table: String,
        column: String,
        row: usize,
        value: String,
    },

    #[error("Worksheet not found: {worksheet}")]
    TableNotFound { worksheet: String },

    #[error("Column '{column}' missing from table {table}")]
    MissingColumn { table: String, column: String },

    #[error("No history for symbol: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("Unknown period: {0} (expected Week, Month, Trimester or Year)")]
    UnknownPeriod(String),

    #[error("No data in window for symbol: {symbol}")]
    EmptyWindow { symbol: String },

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl DashboardError {
    /// 查找类错误：缺失的工作表、代码、列或周期
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            DashboardError::TableNotFound { .. }
                | DashboardError::MissingColumn { .. }
                | DashboardError::SymbolNotFound { .. }
                | DashboardError::UnknownPeriod(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

// 用于从字符串创建错误
impl From<String> for DashboardError {
    fn from(s: String) -> Self {
        DashboardError::Unknown(s)
    }
}

// 用于从&str创建错误
impl From<&str> for DashboardError {
    fn from(s: &str) -> Self {
        DashboardError::Unknown(s.to_string())
    }
}
