//! Monthly trend bars.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::group::MonthKey;
use crate::period::Period;
use crate::stats::{Aggregate, Bucket};

/// Months shown by default.
pub const DEFAULT_TREND_MONTHS: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendBar {
    pub month: MonthKey,
    pub total: f64,
    pub count: usize,
    /// 0-100, relative to the largest month in the whole trend set
    pub width_percent: f64,
}

/// Bars for the most recent `limit` months, newest first.
///
/// Widths are scaled against the maximum over every month in `monthly`, not
/// just the ones returned.
pub fn trend_bars(monthly: &BTreeMap<MonthKey, Bucket>, limit: usize) -> Vec<TrendBar> {
    let max = monthly.values().map(|b| b.total).fold(0.0_f64, f64::max);

    monthly
        .iter()
        .rev()
        .take(limit)
        .map(|(month, bucket)| TrendBar {
            month: *month,
            total: bucket.total,
            count: bucket.count,
            width_percent: if max > 0.0 { bucket.total / max * 100.0 } else { 0.0 },
        })
        .collect()
}

/// The trend is only meaningful for long periods with more than one month.
pub fn shows_trend(period: Period, agg: &Aggregate) -> bool {
    matches!(period, Period::Year | Period::All) && agg.monthly.len() > 1
}
