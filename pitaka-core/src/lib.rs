//! pitaka-core: expense statistics and swipe gestures for the Pitaka tracker

pub mod book;
pub mod expense;
pub mod filter;
pub mod group;
pub mod period;
pub mod stats;
pub mod swipe;
pub mod trend;

pub use book::{Dispatched, ExpenseBook, ExpenseStore, StoreError, UserContext};
pub use expense::{
    normalize_date, normalize_records, Category, Expense, ExpensePatch, ExpenseRecord, NewExpense,
    Payment,
};
pub use filter::{matches_search, CategoryFilter, StatsQuery};
pub use group::{
    group_by_day, group_by_month, sort_recent_first, split_today, DayGroup, Group, MonthGroup,
    MonthKey, RecordsView,
};
pub use period::{today_in, Period, PeriodPolicy};
pub use stats::{recompute, Aggregate, Bucket};
pub use swipe::{
    resolve_gesture, PendingCommand, PointerEvent, SwipeCommand, SwipeConfig, SwipeList,
    SwipeOutcome, SwipeRow, SwipeState, SwipeTracker,
};
pub use trend::{shows_trend, trend_bars, TrendBar, DEFAULT_TREND_MONTHS};

/// Everything a statistics screen shows, computed in one call.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct StatsReport {
    pub query: StatsQuery,
    pub label: &'static str,
    pub aggregate: Aggregate,
    /// Empty unless the period shows a trend
    pub trend: Vec<TrendBar>,
}

impl StatsReport {
    pub fn build(expenses: &[Expense], query: &StatsQuery, trend_months: usize) -> Self {
        let aggregate = recompute(expenses, query);
        let trend = if shows_trend(query.period, &aggregate) {
            trend_bars(&aggregate.monthly, trend_months)
        } else {
            Vec::new()
        };

        Self {
            query: query.clone(),
            label: query.period.label(),
            aggregate,
            trend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_report_includes_trend_for_year() {
        let items = vec![
            Expense::new(1, 100.0, "food", "cash", ymd(2025, 1, 5)),
            Expense::new(2, 50.0, "food", "cash", ymd(2025, 2, 5)),
        ];
        let q = StatsQuery::new(Period::Year, PeriodPolicy::Calendar, ymd(2025, 6, 1));
        let report = StatsReport::build(&items, &q, DEFAULT_TREND_MONTHS);
        assert_eq!(report.label, "This Year");
        assert_eq!(report.trend.len(), 2);
        assert_eq!(report.trend[0].width_percent, 50.0);

        let q = StatsQuery::new(Period::Month, PeriodPolicy::Calendar, ymd(2025, 2, 1));
        assert!(StatsReport::build(&items, &q, DEFAULT_TREND_MONTHS).trend.is_empty());
    }
}
