//! JSON-file implementation of `ExpenseStore`.
//!
//! Rows carry their owner and are stored the way the API serves them:
//! `date` as a midnight UTC timestamp, plus `userId` and `createdAt`.

use chrono::Utc;
use pitaka_core::{ExpensePatch, ExpenseRecord, ExpenseStore, NewExpense, StoreError, UserContext};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRow {
    id: i64,
    user_id: i64,
    amount: f64,
    category: String,
    payment: String,
    #[serde(default)]
    note: Option<String>,
    date: String,
    #[serde(default)]
    created_at: Option<String>,
}

impl StoredRow {
    fn to_record(&self) -> ExpenseRecord {
        ExpenseRecord {
            id: self.id,
            amount: self.amount,
            category: self.category.clone(),
            payment: self.payment.clone(),
            note: self.note.clone(),
            date: self.date.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreFile {
    next_id: i64,
    rows: Vec<StoredRow>,
}

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    data: StoreFile,
}

fn wire_date(date: chrono::NaiveDate) -> String {
    format!("{}T00:00:00.000Z", date.format("%Y-%m-%d"))
}

fn check_amount(amount: f64) -> Result<(), StoreError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(StoreError::Invalid(format!("amount must be a positive number, got {amount}")))
    }
}

impl FileStore {
    /// Open the store at `path`; a missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let s = fs::read_to_string(&path)?;
            serde_json::from_str(&s)
                .map_err(|e| StoreError::Corrupt(format!("{}: {e}", path.display())))?
        } else {
            StoreFile::default()
        };
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Position of row `id`, checked against the caller's identity.
    fn owned_row(&self, user: &UserContext, id: i64) -> Result<usize, StoreError> {
        let idx = self
            .data
            .rows
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;
        if self.data.rows[idx].user_id != user.user_id {
            return Err(StoreError::Forbidden(id));
        }
        Ok(idx)
    }
}

impl ExpenseStore for FileStore {
    fn list(&self, user: &UserContext) -> Result<Vec<ExpenseRecord>, StoreError> {
        Ok(self
            .data
            .rows
            .iter()
            .filter(|r| r.user_id == user.user_id)
            .map(StoredRow::to_record)
            .collect())
    }

    fn create(&mut self, user: &UserContext, new: &NewExpense) -> Result<ExpenseRecord, StoreError> {
        check_amount(new.amount)?;

        let id = self.data.next_id.max(1);
        self.data.next_id = id + 1;
        let row = StoredRow {
            id,
            user_id: user.user_id,
            amount: new.amount,
            category: new.category.tag().to_string(),
            payment: new.payment.tag().to_string(),
            note: Some(new.note.clone()),
            date: wire_date(new.date),
            created_at: Some(Utc::now().to_rfc3339()),
        };
        let record = row.to_record();
        self.data.rows.push(row);
        self.save()?;
        tracing::debug!(id, user = user.user_id, "expense created");
        Ok(record)
    }

    fn update(
        &mut self,
        user: &UserContext,
        id: i64,
        patch: &ExpensePatch,
    ) -> Result<ExpenseRecord, StoreError> {
        let idx = self.owned_row(user, id)?;
        if let Some(amount) = patch.amount {
            check_amount(amount)?;
        }

        let row = &mut self.data.rows[idx];
        if let Some(amount) = patch.amount {
            row.amount = amount;
        }
        if let Some(category) = &patch.category {
            row.category = category.tag().to_string();
        }
        if let Some(payment) = &patch.payment {
            row.payment = payment.tag().to_string();
        }
        if let Some(note) = &patch.note {
            row.note = Some(note.clone());
        }
        if let Some(date) = patch.date {
            row.date = wire_date(date);
        }
        let record = row.to_record();
        self.save()?;
        Ok(record)
    }

    fn delete(&mut self, user: &UserContext, id: i64) -> Result<(), StoreError> {
        let idx = self.owned_row(user, id)?;
        self.data.rows.remove(idx);
        self.save()?;
        tracing::debug!(id, user = user.user_id, "expense deleted");
        Ok(())
    }
}
