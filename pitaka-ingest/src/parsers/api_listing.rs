//! Parse the JSON body of the expenses API listing.
//!
//! The API returns database rows, so extra columns (`userId`, `createdAt`,
//! ...) are present and ignored, and `date` is a full timestamp.

use anyhow::{Context, Result};
use pitaka_core::{normalize_records, Expense, ExpenseRecord};

pub fn parse_api_listing(body: &str) -> Result<Vec<ExpenseRecord>> {
    serde_json::from_str(body).context("parsing expenses listing")
}

/// Parse and normalize in one step; malformed rows are dropped.
pub fn load_api_listing(body: &str) -> Result<Vec<Expense>> {
    Ok(normalize_records(&parse_api_listing(body)?))
}
