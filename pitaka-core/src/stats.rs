//! Statistics reduction over a filtered expense set.
//!
//! Everything here is recomputed from scratch on every input change; nothing
//! is cached or persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::expense::{Category, Expense, Payment};
use crate::filter::StatsQuery;
use crate::group::MonthKey;

/// Running total and count for one group key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub total: f64,
    pub count: usize,
}

impl Bucket {
    fn add(&mut self, amount: f64) {
        self.total += amount;
        self.count += 1;
    }

    /// Percentage of `grand_total` held by this bucket; 0 when the total is 0.
    pub fn share_of(&self, grand_total: f64) -> f64 {
        if grand_total > 0.0 {
            self.total / grand_total * 100.0
        } else {
            0.0
        }
    }
}

/// The full set of computed figures for one filtered expense set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub total: f64,
    pub count: usize,
    /// Mean per transaction
    pub average: f64,
    pub by_category: BTreeMap<Category, Bucket>,
    pub by_payment: BTreeMap<Payment, Bucket>,
    /// Distinct dates with at least one expense
    pub active_days: BTreeSet<NaiveDate>,
    /// Mean per active day
    pub daily_average: f64,
    pub highest: Option<Expense>,
    pub lowest: Option<Expense>,
    /// Totals keyed by `YYYY-MM`
    pub monthly: BTreeMap<MonthKey, Bucket>,
}

impl Aggregate {
    /// Reduce a filtered set of expenses.
    ///
    /// On equal amounts the first record wins `highest` and the last one wins
    /// `lowest`.
    pub fn from_expenses<'a, I>(expenses: I) -> Self
    where
        I: IntoIterator<Item = &'a Expense>,
    {
        let mut agg = Aggregate::default();

        for e in expenses {
            agg.total += e.amount;
            agg.count += 1;
            agg.by_category.entry(e.category.clone()).or_default().add(e.amount);
            agg.by_payment.entry(e.payment.clone()).or_default().add(e.amount);
            agg.monthly.entry(MonthKey::of(e.date)).or_default().add(e.amount);
            agg.active_days.insert(e.date);

            if agg.highest.as_ref().is_none_or(|h| e.amount > h.amount) {
                agg.highest = Some(e.clone());
            }
            if agg.lowest.as_ref().is_none_or(|l| e.amount <= l.amount) {
                agg.lowest = Some(e.clone());
            }
        }

        agg.average = mean(agg.total, agg.count);
        agg.daily_average = mean(agg.total, agg.active_days.len());
        agg
    }

    pub fn days_with_expenses(&self) -> usize {
        self.active_days.len()
    }

    /// Category breakdown, largest total first.
    pub fn ranked_categories(&self) -> Vec<(&Category, &Bucket)> {
        ranked(&self.by_category)
    }

    /// Payment breakdown, largest total first.
    pub fn ranked_payments(&self) -> Vec<(&Payment, &Bucket)> {
        ranked(&self.by_payment)
    }
}

/// Recompute entry point: filter `expenses` with `query` and reduce.
pub fn recompute(expenses: &[Expense], query: &StatsQuery) -> Aggregate {
    let agg = Aggregate::from_expenses(expenses.iter().filter(|e| query.matches(e)));
    tracing::debug!(
        period = %query.period,
        policy = %query.policy,
        anchor = %query.anchor,
        count = agg.count,
        total = agg.total,
        "recomputed aggregate"
    );
    agg
}

fn mean(total: f64, n: usize) -> f64 {
    if n == 0 { 0.0 } else { total / n as f64 }
}

fn ranked<K: Ord>(map: &BTreeMap<K, Bucket>) -> Vec<(&K, &Bucket)> {
    let mut rows: Vec<_> = map.iter().collect();
    // Stable sort keeps key order for equal totals.
    rows.sort_by(|a, b| b.1.total.total_cmp(&a.1.total));
    rows
}
