use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::fmt;

use crate::errors::{DashboardError, Result};

/// 表格单元格，数据源读出的原始值
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

static EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    /// 空白字符串视为空单元格
    pub fn from_text(s: &str) -> Self {
        if s.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map(Cell::Number).unwrap_or(Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => write!(f, "{}", s),
            // 整数值不带小数点，股票代码常以数字形式出现在表格中
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// 一个具名工作表：表头加数据行
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// 创建表格，整行为空的行会被丢弃
    pub fn new(name: &str, columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let rows = rows
            .into_iter()
            .filter(|row| !row.iter().all(Cell::is_empty))
            .collect();

        Self {
            name: name.to_string(),
            columns,
            rows,
        }
    }

    /// 以第一行为表头构建表格
    pub fn from_grid(name: &str, mut grid: Vec<Vec<Cell>>) -> Self {
        if grid.is_empty() {
            return Self::new(name, Vec::new(), Vec::new());
        }
        let header = grid.remove(0);
        let columns = header.iter().map(|c| c.to_string()).collect();
        Self::new(name, columns, grid)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| DashboardError::MissingColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// 越界读取（不规则行）按空单元格处理
    pub fn cell(&self, row: usize, index: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(index))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn column(&self, column: &str) -> Result<Vec<&Cell>> {
        let idx = self.column_index(column)?;
        Ok((0..self.rows.len()).map(|row| self.cell(row, idx)).collect())
    }
}

/// 加载器的输出：代码表加每个代码对应的历史表
#[derive(Debug, Clone)]
pub struct RawDataset {
    pub tickers: RawTable,
    pub histories: HashMap<String, RawTable>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn test_drops_blank_rows() {
        let table = RawTable::new(
            "t",
            vec!["a".to_string(), "b".to_string()],
            vec![
                vec![text("1"), text("2")],
                vec![Cell::Empty, Cell::Empty],
                vec![],
                vec![Cell::Empty, text("x")],
            ],
        );
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_ragged_rows_read_empty() {
        let table = RawTable::new(
            "t",
            vec!["a".to_string(), "b".to_string()],
            vec![vec![text("1")]],
        );
        assert_eq!(table.cell(0, 1), &Cell::Empty);
        assert_eq!(table.column("b").unwrap(), vec![&Cell::Empty]);
    }

    #[test]
    fn test_missing_column() {
        let table = RawTable::new("ticker", vec!["a".to_string()], vec![]);
        match table.column_index("eps") {
            Err(DashboardError::MissingColumn { table, column }) => {
                assert_eq!(table, "ticker");
                assert_eq!(column, "eps");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_from_grid_uses_first_row_as_header() {
        let table = RawTable::from_grid(
            "INFY",
            vec![
                vec![text("Date"), text("Open")],
                vec![text("01/02/2024"), Cell::Number(10.5)],
            ],
        );
        assert_eq!(table.columns, vec!["Date", "Open"]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_display_integral_numbers() {
        assert_eq!(Cell::Number(500325.0).to_string(), "500325");
        assert_eq!(Cell::Number(1.5).to_string(), "1.5");
        assert_eq!(Cell::Empty.to_string(), "");
        assert_eq!(Cell::from_text("   "), Cell::Empty);
    }
}
