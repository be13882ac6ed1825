//! CSV import of expenses.
//!
//! Expected header (column order is free, header row required):
//!   date,amount,category,payment,note
//!
//! Amounts may carry a currency symbol and thousands separators ("₱1,234.50").

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use pitaka_core::{normalize_date, Category, Payment};
use regex::Regex;
use std::io::Read;
use std::path::Path;

use crate::types::ImportedExpense;

fn parse_date(s: &str) -> Option<NaiveDate> {
    normalize_date(s).or_else(|| NaiveDate::parse_from_str(s.trim(), "%m/%d/%Y").ok())
}

fn parse_amount(re: &Regex, s: &str) -> Option<f64> {
    let m = re.find(s)?;
    let amount: f64 = m.as_str().replace(',', "").parse().ok()?;
    (amount.is_finite() && amount > 0.0).then_some(amount)
}

/// Parse a CSV export file.
pub fn parse_expense_csv(path: impl AsRef<Path>) -> Result<Vec<ImportedExpense>> {
    let file = std::fs::File::open(path.as_ref())
        .with_context(|| format!("opening {}", path.as_ref().display()))?;
    parse_expense_csv_reader(file)
}

/// Parse CSV from any reader. Rows with unusable dates or amounts are skipped.
pub fn parse_expense_csv_reader<R: Read>(reader: R) -> Result<Vec<ImportedExpense>> {
    let amount_re = Regex::new(r"\d[\d,]*(?:\.\d+)?")?;

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().context("reading CSV header")?.clone();
    let col = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };
    let (Some(date_col), Some(amount_col)) = (col("date"), col("amount")) else {
        bail!("CSV header must contain 'date' and 'amount' columns");
    };
    let category_col = col("category");
    let payment_col = col("payment");
    let note_col = col("note");

    let mut out = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("reading CSV row {}", i + 2))?;
        let field = |c: Option<usize>| c.and_then(|c| record.get(c)).unwrap_or("").trim();

        let Some(date) = parse_date(field(Some(date_col))) else {
            tracing::debug!(row = i + 2, "skipping row with unreadable date");
            continue;
        };
        let Some(amount) = parse_amount(&amount_re, field(Some(amount_col))) else {
            tracing::debug!(row = i + 2, "skipping row with unreadable amount");
            continue;
        };

        let category = match field(category_col) {
            "" => Category::Other,
            raw => Category::from(raw),
        };
        let payment = match field(payment_col) {
            "" => Payment::Cash,
            raw => Payment::from(raw),
        };

        out.push(ImportedExpense {
            date,
            amount,
            category,
            payment,
            note: field(note_col).to_string(),
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_export() {
        let text = "\
date,amount,category,payment,note
2025-03-01,150,food,cash,Jollibee
2025-03-02,\"₱1,234.50\",bills,GCash,Meralco
03/04/2025,49.5,Transport,card,
";
        let rows = parse_expense_csv_reader(text.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].amount, 150.0);
        assert_eq!(rows[0].note, "Jollibee");
        assert_eq!(rows[1].amount, 1234.5);
        assert_eq!(rows[1].payment, Payment::Gcash);
        assert_eq!(rows[2].date, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        assert_eq!(rows[2].category, Category::Transport);
        assert_eq!(rows[2].note, "");
    }

    #[test]
    fn test_column_order_and_defaults() {
        let text = "note,amount,date\nbus,20,2025-01-02T08:00:00+08:00\n";
        let rows = parse_expense_csv_reader(text.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, Category::Other);
        assert_eq!(rows[0].payment, Payment::Cash);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
    }

    #[test]
    fn test_skips_bad_rows() {
        let text = "date,amount\nsoon,10\n2025-01-01,free\n2025-01-01,0\n2025-01-02,5\n";
        let rows = parse_expense_csv_reader(text.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, 5.0);
    }

    #[test]
    fn test_missing_required_columns() {
        let text = "when,how much\n2025-01-01,5\n";
        assert!(parse_expense_csv_reader(text.as_bytes()).is_err());
    }

    #[test]
    fn test_unknown_category_is_preserved() {
        let text = "date,amount,category\n2025-01-01,5,Pets\n";
        let rows = parse_expense_csv_reader(text.as_bytes()).unwrap();
        assert_eq!(rows[0].category, Category::from("pets"));
        assert_eq!(rows[0].category.tag(), "pets");
    }
}
