use chrono::{Duration, NaiveDate};
use std::fmt;
use std::str::FromStr;

use crate::errors::DashboardError;
use crate::models::history::HistoryRecord;

/// K线视图的时间窗口
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Week,
    Month,
    Trimester,
    Year,
}

impl Period {
    pub const ALL: [Period; 4] = [Period::Week, Period::Month, Period::Trimester, Period::Year];

    pub fn days(self) -> i64 {
        match self {
            Period::Week => 7,
            Period::Month => 31,
            Period::Trimester => 90,
            Period::Year => 365,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Period::Week => "Week",
            Period::Month => "Month",
            Period::Trimester => "Trimester",
            Period::Year => "Year",
        }
    }

    /// 窗口起始日（含）
    pub fn start(self, today: NaiveDate) -> NaiveDate {
        today - Duration::days(self.days())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Period {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or_else(|| DashboardError::UnknownPeriod(s.to_string()))
    }
}

/// 截取日期落在 `[today - days, today]` 内的连续行
///
/// 输入须已按日期升序排列；这里只做二分查找，不重新排序。
pub fn filter_history(
    history: &[HistoryRecord],
    period: Period,
    today: NaiveDate,
) -> &[HistoryRecord] {
    let start = period.start(today);
    let lo = history.partition_point(|r| r.date.date() < start);
    let hi = history.partition_point(|r| r.date.date() <= today);

    if lo >= hi {
        return &history[0..0];
    }
    &history[lo..hi]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn daily_rows(today: NaiveDate, days_back: i64) -> Vec<HistoryRecord> {
        (0..=days_back)
            .rev()
            .map(|back| {
                let date = (today - Duration::days(back)).and_hms_opt(0, 0, 0).unwrap();
                HistoryRecord::new(date, [Some(back as f64), None, None, None, None])
            })
            .collect()
    }

    #[test]
    fn test_week_over_ten_days() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let rows = daily_rows(today, 9);
        assert_eq!(rows.len(), 10);

        let window = filter_history(&rows, Period::Week, today);
        assert_eq!(window.len(), 8);
        assert_eq!(window.first().unwrap().date.date(), today - Duration::days(7));
        assert_eq!(window.last().unwrap().date.date(), today);
    }

    #[test]
    fn test_excludes_future_rows() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let mut rows = daily_rows(today, 3);
        let tomorrow = (today + Duration::days(1)).and_hms_opt(0, 0, 0).unwrap();
        rows.push(HistoryRecord::new(tomorrow, [None; 5]));

        let window = filter_history(&rows, Period::Week, today);
        assert_eq!(window.len(), 4);
    }

    #[test]
    fn test_intraday_time_counts_as_same_day() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let rows = vec![HistoryRecord::new(today.and_hms_opt(15, 30, 0).unwrap(), [None; 5])];
        assert_eq!(filter_history(&rows, Period::Week, today).len(), 1);
    }

    #[test]
    fn test_empty_history() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert!(filter_history(&[], Period::Year, today).is_empty());
    }

    #[test]
    fn test_period_days() {
        assert_eq!(Period::Week.days(), 7);
        assert_eq!(Period::Month.days(), 31);
        assert_eq!(Period::Trimester.days(), 90);
        assert_eq!(Period::Year.days(), 365);
    }

    #[test]
    fn test_parse_period_names() {
        assert_eq!("Trimester".parse::<Period>().unwrap(), Period::Trimester);
        for p in Period::ALL {
            assert_eq!(p.to_string().parse::<Period>().unwrap(), p);
        }
    }

    #[test]
    fn test_unknown_period_fails() {
        match "Quarter".parse::<Period>() {
            Err(DashboardError::UnknownPeriod(name)) => assert_eq!(name, "Quarter"),
            other => panic!("unexpected: {:?}", other),
        }
        assert!("week".parse::<Period>().is_err());
    }
}
