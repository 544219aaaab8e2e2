use crate::errors::{DashboardError, Result};
use crate::models::history::HistoryRecord;
use crate::models::ticker::TickerRecord;

/// 详情视图的六项指标
#[derive(Debug, Clone, PartialEq)]
pub struct WindowMetrics {
    pub lowest_volume: f64,
    pub highest_volume: f64,
    pub lowest_close: f64,
    pub highest_close: f64,
    /// 平均成交量，截断取整
    pub average_volume: i64,
    pub market_cap: Option<f64>,
}

impl WindowMetrics {
    /// 对窗口做归约，空值跳过；没有任何有效成交量或收盘价时报 `EmptyWindow`
    pub fn compute(ticker: &TickerRecord, window: &[HistoryRecord]) -> Result<Self> {
        let empty = || DashboardError::EmptyWindow {
            symbol: ticker.symbol.clone(),
        };

        let volumes: Vec<f64> = window.iter().filter_map(|r| r.volume).collect();
        let closes: Vec<f64> = window.iter().filter_map(|r| r.close).collect();

        let (lowest_volume, highest_volume) = min_max(&volumes).ok_or_else(empty)?;
        let (lowest_close, highest_close) = min_max(&closes).ok_or_else(empty)?;
        let average_volume = (volumes.iter().sum::<f64>() / volumes.len() as f64) as i64;

        Ok(Self {
            lowest_volume,
            highest_volume,
            lowest_close,
            highest_close,
            average_volume,
            market_cap: ticker.market_cap,
        })
    }
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}
