//! Day and month grouping for the records views.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::expense::Expense;

/// A `YYYY-MM` month key. Ordering matches the zero-padded string ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Short display label, e.g. "Mar 2025".
    pub fn label(&self) -> String {
        match self.first_day() {
            Some(d) => d.format("%b %Y").to_string(),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (y, m) = s
            .trim()
            .split_once('-')
            .with_context(|| format!("invalid month key '{s}' (expected YYYY-MM)"))?;
        let year: i32 = y.parse().with_context(|| format!("invalid year in '{s}'"))?;
        let month: u32 = m.parse().with_context(|| format!("invalid month in '{s}'"))?;
        if !(1..=12).contains(&month) {
            anyhow::bail!("month out of range in '{s}'");
        }
        Ok(Self { year, month })
    }
}

impl TryFrom<String> for MonthKey {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<MonthKey> for String {
    fn from(k: MonthKey) -> Self {
        k.to_string()
    }
}

/// Expenses sharing one key, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group<K> {
    pub key: K,
    pub total: f64,
    pub items: Vec<Expense>,
}

pub type DayGroup = Group<NaiveDate>;
pub type MonthGroup = Group<MonthKey>;

/// Group by exact date, most recent day first.
pub fn group_by_day<'a, I>(expenses: I) -> Vec<DayGroup>
where
    I: IntoIterator<Item = &'a Expense>,
{
    group_by(expenses, |e| e.date)
}

/// Group by `YYYY-MM`, most recent month first.
pub fn group_by_month<'a, I>(expenses: I) -> Vec<MonthGroup>
where
    I: IntoIterator<Item = &'a Expense>,
{
    group_by(expenses, |e| MonthKey::of(e.date))
}

fn group_by<'a, I, K, F>(expenses: I, key: F) -> Vec<Group<K>>
where
    I: IntoIterator<Item = &'a Expense>,
    K: Ord + Copy,
    F: Fn(&Expense) -> K,
{
    let mut groups: BTreeMap<K, Vec<Expense>> = BTreeMap::new();
    for e in expenses {
        groups.entry(key(e)).or_default().push(e.clone());
    }

    groups
        .into_iter()
        .rev()
        .map(|(key, items)| Group {
            key,
            total: items.iter().map(|e| e.amount).sum(),
            items,
        })
        .collect()
}

/// Records page layout: today's items up top, earlier days grouped below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordsView {
    pub today: Vec<Expense>,
    pub today_total: f64,
    pub previous: Vec<DayGroup>,
}

pub fn split_today(expenses: &[Expense], today: NaiveDate) -> RecordsView {
    let (todays, earlier): (Vec<&Expense>, Vec<&Expense>) =
        expenses.iter().partition(|e| e.date == today);

    RecordsView {
        today_total: todays.iter().map(|e| e.amount).sum(),
        today: todays.into_iter().cloned().collect(),
        previous: group_by_day(earlier),
    }
}

/// Newest first by id, which tracks insertion order on the server.
pub fn sort_recent_first(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| b.id.cmp(&a.id));
}
