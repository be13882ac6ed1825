//! Record filters: category, free-text search, and period.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::expense::{Category, Expense};
use crate::period::{Period, PeriodPolicy};

/// Category filter; `All` is the "show everything" sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, expense: &Expense) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => &expense.category == c,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Only(Category::from(s)))
        }
    }
}

/// Case-insensitive substring search over note, amount text, and category label.
///
/// Only the empty string matches everything; whitespace is part of the needle.
pub fn matches_search(expense: &Expense, search: &str) -> bool {
    let needle = search.to_lowercase();
    if needle.is_empty() {
        return true;
    }

    expense.note.to_lowercase().contains(&needle)
        || expense.amount_text().contains(&needle)
        || expense
            .category
            .label()
            .is_some_and(|label| label.to_lowercase().contains(&needle))
}

/// Everything that decides which records feed an aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsQuery {
    pub period: Period,
    pub policy: PeriodPolicy,
    /// Reference date for the period; normally today.
    pub anchor: NaiveDate,
    #[serde(default)]
    pub category: CategoryFilter,
    #[serde(default)]
    pub search: String,
}

impl StatsQuery {
    pub fn new(period: Period, policy: PeriodPolicy, anchor: NaiveDate) -> Self {
        Self {
            period,
            policy,
            anchor,
            category: CategoryFilter::All,
            search: String::new(),
        }
    }

    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Step to the previous (negative) or next (positive) period.
    pub fn shifted(mut self, steps: i32) -> Self {
        self.anchor = self.period.shift(self.anchor, steps);
        self
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        self.period.contains(self.policy, self.anchor, expense.date)
            && self.category.matches(expense)
            && matches_search(expense, &self.search)
    }

    /// Filter in input order.
    pub fn apply<'a>(&self, expenses: &'a [Expense]) -> Vec<&'a Expense> {
        expenses.iter().filter(|e| self.matches(e)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<Expense> {
        vec![
            Expense::new(1, 150.0, "food", "cash", ymd(2025, 3, 3)).with_note("Jollibee lunch"),
            Expense::new(2, 49.5, "transport", "gcash", ymd(2025, 3, 4)).with_note("jeep"),
            Expense::new(3, 1200.0, "bills", "card", ymd(2025, 2, 28)).with_note("Meralco"),
            Expense::new(4, 300.0, "entertainment", "cash", ymd(2025, 3, 5)),
            Expense::new(5, 80.0, "pets", "cash", ymd(2025, 3, 6)).with_note("cat food"),
        ]
    }

    #[test]
    fn test_search_is_case_insensitive_on_note() {
        let e = &sample()[0];
        assert!(matches_search(e, "JOLLIBEE"));
        assert!(matches_search(e, ""));
        assert!(matches_search(e, " "));
        assert!(!matches_search(e, "   "));
        assert!(!matches_search(e, "mcdo"));
    }

    #[test]
    fn test_whitespace_search_is_not_empty() {
        let d = ymd(2025, 3, 3);
        let solid = Expense::new(9, 15.0, "other", "cash", d).with_note("nospace");
        assert!(!matches_search(&solid, " "));
        assert!(matches_search(&solid, ""));

        let items = vec![solid, Expense::new(10, 20.0, "other", "cash", d).with_note("two words")];
        let q = StatsQuery::new(Period::All, PeriodPolicy::Calendar, d).with_search(" ");
        let ids: Vec<i64> = q.apply(&items).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![10]);
    }

    #[test]
    fn test_search_matches_amount_text() {
        let items = sample();
        assert!(matches_search(&items[1], "49.5"));
        assert!(matches_search(&items[2], "120"));
        assert!(!matches_search(&items[1], "49.50"));
    }

    #[test]
    fn test_search_matches_category_label_not_tag() {
        let items = sample();
        // "entertainment" is displayed as "Fun"
        assert!(matches_search(&items[3], "fun"));
        assert!(!matches_search(&items[3], "entertain"));
        // unknown categories have no label to match
        assert!(!matches_search(&items[4], "pets"));
        assert!(matches_search(&items[4], "cat"));
    }

    #[test]
    fn test_category_filter_sentinel() {
        assert_eq!("all".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "Food".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Only(Category::Food)
        );
        let items = sample();
        let only_pets = CategoryFilter::Only(Category::from("pets"));
        assert_eq!(items.iter().filter(|e| only_pets.matches(e)).count(), 1);

        let raw = Expense::new(6, 10.0, "Pets", "cash", ymd(2025, 3, 7));
        assert!("Pets".parse::<CategoryFilter>().unwrap().matches(&raw));
        assert!(only_pets.matches(&raw));
    }

    #[test]
    fn test_query_combines_all_filters() {
        let items = sample();
        let q = StatsQuery::new(Period::Month, PeriodPolicy::Calendar, ymd(2025, 3, 15));
        let ids: Vec<i64> = q.apply(&items).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 5]);

        let q = q.with_category(CategoryFilter::Only(Category::Food));
        assert_eq!(q.apply(&items).len(), 1);

        let q = StatsQuery::new(Period::All, PeriodPolicy::Calendar, ymd(2025, 3, 15)).with_search("food");
        let ids: Vec<i64> = q.apply(&items).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 5]);
    }

    #[test]
    fn test_shifted_query_moves_anchor() {
        let items = sample();
        let q = StatsQuery::new(Period::Month, PeriodPolicy::Calendar, ymd(2025, 3, 15)).shifted(-1);
        assert_eq!(q.anchor, ymd(2025, 2, 15));
        let ids: Vec<i64> = q.apply(&items).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3]);
    }
}
