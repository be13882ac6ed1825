use chrono::NaiveDate;
use pitaka_core::{Category, NewExpense, Payment};
use serde::{Deserialize, Serialize};

/// Normalized output of import parsers (source-agnostic)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedExpense {
    pub date: NaiveDate,
    /// Always positive; sign and currency symbol are stripped by the parser.
    pub amount: f64,
    pub category: Category,
    pub payment: Payment,
    pub note: String,
}

impl From<ImportedExpense> for NewExpense {
    fn from(i: ImportedExpense) -> Self {
        NewExpense {
            amount: i.amount,
            category: i.category,
            payment: i.payment,
            note: i.note,
            date: i.date,
        }
    }
}
