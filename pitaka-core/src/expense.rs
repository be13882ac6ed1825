//! Expense record types: categories, payment methods, and the normalized record.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Spending categories. Unknown tags from the store are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Food,
    Transport,
    Bills,
    Shopping,
    Health,
    Entertainment,
    Debt,
    Other,
    Unknown(String),
}

impl Category {
    /// The eight fixed tags, in picker order.
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Transport,
        Category::Bills,
        Category::Shopping,
        Category::Health,
        Category::Entertainment,
        Category::Debt,
        Category::Other,
    ];

    pub fn tag(&self) -> &str {
        match self {
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Bills => "bills",
            Category::Shopping => "shopping",
            Category::Health => "health",
            Category::Entertainment => "entertainment",
            Category::Debt => "debt",
            Category::Other => "other",
            Category::Unknown(raw) => raw,
        }
    }

    /// Display label; `None` for unknown tags.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Category::Food => Some("Food"),
            Category::Transport => Some("Transport"),
            Category::Bills => Some("Bills"),
            Category::Shopping => Some("Shopping"),
            Category::Health => Some("Health"),
            Category::Entertainment => Some("Fun"),
            Category::Debt => Some("Debt"),
            Category::Other => Some("Other"),
            Category::Unknown(_) => None,
        }
    }

    pub fn icon(&self) -> Option<&'static str> {
        match self {
            Category::Food => Some("🍔"),
            Category::Transport => Some("🚗"),
            Category::Bills => Some("📄"),
            Category::Shopping => Some("🛒"),
            Category::Health => Some("💊"),
            Category::Entertainment => Some("🎮"),
            Category::Debt => Some("💳"),
            Category::Other => Some("📦"),
            Category::Unknown(_) => None,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Unknown(_))
    }
}

impl From<String> for Category {
    // Case-insensitive. Unknown tags are stored lowercased.
    fn from(raw: String) -> Self {
        let raw = raw.trim().to_lowercase();
        match raw.as_str() {
            "food" => Category::Food,
            "transport" => Category::Transport,
            "bills" => Category::Bills,
            "shopping" => Category::Shopping,
            "health" => Category::Health,
            "entertainment" => Category::Entertainment,
            "debt" => Category::Debt,
            "other" => Category::Other,
            _ => Category::Unknown(raw),
        }
    }
}

impl From<&str> for Category {
    fn from(raw: &str) -> Self {
        Category::from(raw.to_string())
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.tag().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// How an expense was paid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Payment {
    #[default]
    Cash,
    Gcash,
    Card,
    Unknown(String),
}

impl Payment {
    pub const ALL: [Payment; 3] = [Payment::Cash, Payment::Gcash, Payment::Card];

    pub fn tag(&self) -> &str {
        match self {
            Payment::Cash => "cash",
            Payment::Gcash => "gcash",
            Payment::Card => "card",
            Payment::Unknown(raw) => raw,
        }
    }

    pub fn label(&self) -> Option<&'static str> {
        match self {
            Payment::Cash => Some("Cash"),
            Payment::Gcash => Some("GCash"),
            Payment::Card => Some("Card"),
            Payment::Unknown(_) => None,
        }
    }

    pub fn icon(&self) -> Option<&'static str> {
        match self {
            Payment::Cash => Some("💵"),
            Payment::Gcash => Some("📱"),
            Payment::Card => Some("💳"),
            Payment::Unknown(_) => None,
        }
    }
}

impl From<String> for Payment {
    // Case-insensitive: both "GCash" and "gcash" occur.
    fn from(raw: String) -> Self {
        match raw.to_lowercase().as_str() {
            "cash" => Payment::Cash,
            "gcash" => Payment::Gcash,
            "card" => Payment::Card,
            _ => Payment::Unknown(raw),
        }
    }
}

impl From<&str> for Payment {
    fn from(raw: &str) -> Self {
        Payment::from(raw.to_string())
    }
}

impl From<Payment> for String {
    fn from(p: Payment) -> Self {
        p.tag().to_string()
    }
}

impl fmt::Display for Payment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A single expense, with its date already normalized to a calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Server-assigned identifier
    pub id: i64,
    /// Always > 0
    pub amount: f64,
    pub category: Category,
    pub payment: Payment,
    #[serde(default)]
    pub note: String,
    /// Calendar date (YYYY-MM-DD), no time component
    pub date: NaiveDate,
}

impl Expense {
    pub fn new(
        id: i64,
        amount: f64,
        category: impl Into<Category>,
        payment: impl Into<Payment>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id,
            amount,
            category: category.into(),
            payment: payment.into(),
            note: String::new(),
            date,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Convert a record received from the store into an `Expense`.
    ///
    /// Returns `None` when the date cannot be normalized or the amount is not
    /// a finite positive number.
    pub fn from_record(record: &ExpenseRecord) -> Option<Self> {
        let Some(date) = normalize_date(&record.date) else {
            tracing::warn!(id = record.id, date = %record.date, "dropping record with unreadable date");
            return None;
        };
        if !record.amount.is_finite() || record.amount <= 0.0 {
            tracing::warn!(id = record.id, amount = record.amount, "dropping record with invalid amount");
            return None;
        }

        Some(Self {
            id: record.id,
            amount: record.amount,
            category: Category::from(record.category.clone()),
            payment: Payment::from(record.payment.clone()),
            note: record.note.clone().unwrap_or_default(),
            date,
        })
    }

    /// The amount exactly as the search box sees it (`150`, `12.5`).
    pub fn amount_text(&self) -> String {
        format!("{}", self.amount)
    }
}

/// Normalize all records from a store listing, dropping the malformed ones.
pub fn normalize_records(records: &[ExpenseRecord]) -> Vec<Expense> {
    records.iter().filter_map(Expense::from_record).collect()
}

/// Wire shape of a record as the persistence layer returns it.
///
/// `date` may be a bare `YYYY-MM-DD` or a full timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: i64,
    pub amount: f64,
    pub category: String,
    pub payment: String,
    #[serde(default)]
    pub note: Option<String>,
    pub date: String,
}

impl From<&Expense> for ExpenseRecord {
    fn from(e: &Expense) -> Self {
        Self {
            id: e.id,
            amount: e.amount,
            category: e.category.tag().to_string(),
            payment: e.payment.tag().to_string(),
            note: Some(e.note.clone()),
            date: e.date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Fields for a new expense; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub amount: f64,
    pub category: Category,
    #[serde(default)]
    pub payment: Payment,
    #[serde(default)]
    pub note: String,
    pub date: NaiveDate,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpensePatch {
    pub amount: Option<f64>,
    pub category: Option<Category>,
    pub payment: Option<Payment>,
    pub note: Option<String>,
    pub date: Option<NaiveDate>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.category.is_none()
            && self.payment.is_none()
            && self.note.is_none()
            && self.date.is_none()
    }

    /// Apply this patch to a local copy of the record.
    pub fn apply_to(&self, expense: &mut Expense) {
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(category) = &self.category {
            expense.category = category.clone();
        }
        if let Some(payment) = &self.payment {
            expense.payment = payment.clone();
        }
        if let Some(note) = &self.note {
            expense.note = note.clone();
        }
        if let Some(date) = self.date {
            expense.date = date;
        }
    }
}

/// Reduce a date or timestamp string to its calendar day.
///
/// The offset of a timestamp is dropped, not applied: `2025-03-31T23:30:00-08:00`
/// is March 31st.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local().date());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ndt.date());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_category_tags_round_trip() {
        for c in Category::ALL {
            assert_eq!(Category::from(c.tag()), c);
            assert!(c.label().is_some());
            assert!(c.icon().is_some());
        }
        assert_eq!(Category::Entertainment.label(), Some("Fun"));
    }

    #[test]
    fn test_unknown_category_keeps_raw_tag() {
        let c = Category::from("pets");
        assert_eq!(c, Category::Unknown("pets".to_string()));
        assert_eq!(c.tag(), "pets");
        assert_eq!(c.label(), None);
        assert_eq!(c.icon(), None);
    }

    #[test]
    fn test_category_is_case_insensitive() {
        assert_eq!(Category::from("Food"), Category::Food);
        assert_eq!(Category::from("ENTERTAINMENT"), Category::Entertainment);
        assert_eq!(Category::from("Pets"), Category::from("pets"));
        assert_eq!(Category::from("Pets").tag(), "pets");

        let row = ExpenseRecord {
            id: 1,
            amount: 10.0,
            category: "Food".into(),
            payment: "cash".into(),
            note: None,
            date: "2025-03-01".into(),
        };
        assert_eq!(Expense::from_record(&row).unwrap().category, Category::Food);
    }

    #[test]
    fn test_payment_is_case_insensitive() {
        assert_eq!(Payment::from("GCash"), Payment::Gcash);
        assert_eq!(Payment::from("CARD"), Payment::Card);
        assert_eq!(Payment::from("crypto").tag(), "crypto");
    }

    #[test]
    fn test_normalize_plain_date() {
        assert_eq!(normalize_date("2025-03-01"), Some(ymd(2025, 3, 1)));
        assert_eq!(normalize_date(" 2025-03-01 "), Some(ymd(2025, 3, 1)));
    }

    #[test]
    fn test_normalize_drops_offset_and_time() {
        assert_eq!(normalize_date("2025-03-31T23:30:00-08:00"), Some(ymd(2025, 3, 31)));
        assert_eq!(normalize_date("2025-04-01T00:00:00.000Z"), Some(ymd(2025, 4, 1)));
        assert_eq!(normalize_date("2025-04-01T07:15:00+08:00"), Some(ymd(2025, 4, 1)));
        assert_eq!(normalize_date("2025-04-01T07:15:00"), Some(ymd(2025, 4, 1)));
        assert_eq!(normalize_date("2025-04-01 07:15:00"), Some(ymd(2025, 4, 1)));
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert_eq!(normalize_date(""), None);
        assert_eq!(normalize_date("yesterday"), None);
        assert_eq!(normalize_date("2025-13-01"), None);
    }

    #[test]
    fn test_from_record_drops_malformed() {
        let ok = ExpenseRecord {
            id: 1,
            amount: 120.0,
            category: "food".into(),
            payment: "cash".into(),
            note: None,
            date: "2025-03-01T00:00:00.000Z".into(),
        };
        let e = Expense::from_record(&ok).unwrap();
        assert_eq!(e.date, ymd(2025, 3, 1));
        assert_eq!(e.note, "");

        let bad_date = ExpenseRecord { date: "n/a".into(), ..ok.clone() };
        assert!(Expense::from_record(&bad_date).is_none());

        let bad_amount = ExpenseRecord { amount: 0.0, ..ok.clone() };
        assert!(Expense::from_record(&bad_amount).is_none());

        let nan = ExpenseRecord { amount: f64::NAN, ..ok };
        assert!(Expense::from_record(&nan).is_none());
    }

    #[test]
    fn test_amount_text_matches_display() {
        let d = ymd(2025, 1, 1);
        assert_eq!(Expense::new(1, 150.0, "food", "cash", d).amount_text(), "150");
        assert_eq!(Expense::new(2, 12.5, "food", "cash", d).amount_text(), "12.5");
    }

    #[test]
    fn test_patch_applies_only_set_fields() {
        let mut e = Expense::new(7, 50.0, "food", "cash", ymd(2025, 1, 1)).with_note("lunch");
        let patch = ExpensePatch {
            amount: Some(75.0),
            note: Some(String::new()),
            ..Default::default()
        };
        patch.apply_to(&mut e);
        assert_eq!(e.amount, 75.0);
        assert_eq!(e.note, "");
        assert_eq!(e.category, Category::Food);
        assert!(ExpensePatch::default().is_empty());
    }

    #[test]
    fn test_serde_uses_tags() {
        let e = Expense::new(3, 10.0, "pets", "gcash", ymd(2025, 2, 3));
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["category"], "pets");
        assert_eq!(json["payment"], "gcash");
        assert_eq!(json["date"], "2025-02-03");
    }
}
