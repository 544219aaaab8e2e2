use crate::errors::{DashboardError, Result};
use crate::models::table::{Cell, RawTable};
use crate::sources::base::SheetSource;
use async_trait::async_trait;
use calamine::{open_workbook_auto, DataType, Reader};
use log::{debug, info};
use std::path::PathBuf;

/// 本地工作簿（xlsx/xls/ods），每个工作表是一张表
pub struct XlsxSource {
    path: PathBuf,
}

impl XlsxSource {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(DashboardError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("workbook not found: {}", path.display()),
            )));
        }
        Ok(Self { path })
    }
}

/// 原生日期单元格转为日期时间，数值保持数值
fn to_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::Empty => Cell::Empty,
        DataType::Int(i) => Cell::Number(*i as f64),
        DataType::Float(f) => Cell::Number(*f),
        DataType::Bool(b) => Cell::Bool(*b),
        DataType::String(s) => Cell::from_text(s),
        DataType::DateTime(_) => cell.as_datetime().map(Cell::DateTime).unwrap_or(Cell::Empty),
        other => Cell::from_text(&other.to_string()),
    }
}

#[async_trait]
impl SheetSource for XlsxSource {
    fn source_id(&self) -> String {
        format!("xlsx:{}", self.path.display())
    }

    async fn read(&self, worksheet: &str) -> Result<RawTable> {
        info!("Reading worksheet {} from {}", worksheet, self.path.display());

        // 使用 calamine 打开工作簿
        let mut workbook = open_workbook_auto(&self.path)?;

        // 缺少的工作表属于查找失败，不是解析错误
        if !workbook.sheet_names().iter().any(|name| name == worksheet) {
            return Err(DashboardError::TableNotFound {
                worksheet: worksheet.to_string(),
            });
        }
        let range = workbook.worksheet_range(worksheet)?;

        let grid: Vec<Vec<Cell>> = range
            .rows()
            .map(|row| row.iter().map(to_cell).collect())
            .collect();

        let table = RawTable::from_grid(worksheet, grid);
        debug!("Worksheet {} has {} rows", worksheet, table.len());
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_mapping() {
        assert_eq!(to_cell(&DataType::Int(500325)), Cell::Number(500325.0));
        assert_eq!(to_cell(&DataType::Float(1.25)), Cell::Number(1.25));
        assert_eq!(to_cell(&DataType::String("TCS".to_string())), Cell::Text("TCS".to_string()));
        assert_eq!(to_cell(&DataType::String("  ".to_string())), Cell::Empty);
        assert_eq!(to_cell(&DataType::Empty), Cell::Empty);
        assert_eq!(to_cell(&DataType::Bool(true)), Cell::Bool(true));
    }

    fn fixture() -> XlsxSource {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/watchlist.xlsx");
        XlsxSource::new(path).unwrap()
    }

    #[tokio::test]
    async fn test_read_worksheet() {
        let table = fixture().read("ticker").await.unwrap();
        assert_eq!(
            table.columns,
            vec!["ticker", "symbol_name", "last_trade_time", "last_price"]
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.cell(0, 0), &Cell::Text("TCS".to_string()));
        assert_eq!(table.cell(0, 3), &Cell::Number(3500.5));

        // 原生日期单元格
        let expected = chrono::NaiveDate::from_ymd_opt(2024, 10, 16)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(table.cell(0, 2), &Cell::DateTime(expected));

        let history = fixture().read("TCS").await.unwrap();
        assert_eq!(history.cell(0, 0), &Cell::Text("16/10/2024".to_string()));
        assert_eq!(history.cell(0, 1), &Cell::Number(3490.0));
    }

    #[tokio::test]
    async fn test_missing_worksheet_is_lookup_failure() {
        let err = fixture().read("INFY").await.unwrap_err();
        assert!(matches!(
            &err,
            DashboardError::TableNotFound { worksheet } if worksheet == "INFY"
        ));
        assert!(err.is_lookup());
    }

    #[test]
    fn test_missing_workbook() {
        assert!(XlsxSource::new("/nonexistent/book.xlsx").is_err());
    }
}
