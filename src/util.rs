use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::errors::{DashboardError, Result};
use crate::models::table::Cell;

// 日期在前的格式；两位年份放在四位年份之前，否则 "16/10/26" 会被读成公元 26 年
const DAY_FIRST_DATE_FORMATS: [&str; 7] = [
    "%d/%m/%y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%Y-%m-%d",
];

const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];

/// 按日期在前的约定解析日期时间，只有日期时取零点
///
/// 已是日期时间的单元格原样返回；空单元格、数字和无法识别的文本返回 `None`，
/// 由调用方决定报错。
pub fn parse_day_first(cell: &Cell) -> Option<NaiveDateTime> {
    match cell {
        Cell::DateTime(dt) => Some(*dt),
        Cell::Text(s) => parse_day_first_str(s.trim()),
        _ => None,
    }
}

fn parse_day_first_str(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }

    for date_fmt in DAY_FIRST_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, date_fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
        for time_fmt in TIME_FORMATS {
            let fmt = format!("{} {}", date_fmt, time_fmt);
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, &fmt) {
                return Some(dt);
            }
        }
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }

    // 带时区偏移的时间保留墙上时间
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_local())
}

/// 宽松的数值转换：无法转换时返回 `None`，从不报错
pub fn coerce_numeric(cell: &Cell) -> Option<f64> {
    let value = match cell {
        Cell::Number(n) => *n,
        Cell::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Cell::Text(s) => s.trim().parse::<f64>().ok()?,
        Cell::Empty | Cell::DateTime(_) => return None,
    };

    if value.is_nan() {
        None
    } else {
        Some(value)
    }
}

/// 代码列的单元格转为代码字符串，空单元格视为数据错误
pub fn symbol_from_cell(cell: &Cell, row: usize) -> Result<String> {
    let symbol = cell.to_string();
    if symbol.trim().is_empty() {
        return Err(DashboardError::DataError(format!(
            "Empty ticker symbol at row {}",
            row + 1
        )));
    }
    Ok(symbol)
}
