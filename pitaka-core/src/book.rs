//! ExpenseBook: the list a user is looking at, its aggregates, and the
//! commands that mutate it.
//!
//! Persistence is behind `ExpenseStore`; real adapters (HTTP API, local
//! file) live outside this crate. The user identity is always passed in
//! explicitly as a `UserContext`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::expense::{normalize_records, Expense, ExpensePatch, ExpenseRecord, NewExpense};
use crate::filter::StatsQuery;
use crate::group::sort_recent_first;
use crate::stats::{recompute, Aggregate};
use crate::swipe::SwipeCommand;

/// Authenticated user on whose behalf the store is called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub user_id: i64,
    #[serde(default)]
    pub display_name: String,
}

impl UserContext {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            display_name: String::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("expense {0} not found")]
    NotFound(i64),
    #[error("expense {0} belongs to another user")]
    Forbidden(i64),
    #[error("invalid expense: {0}")]
    Invalid(String),
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store data is corrupt: {0}")]
    Corrupt(String),
}

/// The four record operations the book needs from persistence.
pub trait ExpenseStore {
    /// All records owned by `user`, in no particular order.
    fn list(&self, user: &UserContext) -> Result<Vec<ExpenseRecord>, StoreError>;

    fn create(&mut self, user: &UserContext, new: &NewExpense) -> Result<ExpenseRecord, StoreError>;

    fn update(
        &mut self,
        user: &UserContext,
        id: i64,
        patch: &ExpensePatch,
    ) -> Result<ExpenseRecord, StoreError>;

    fn delete(&mut self, user: &UserContext, id: i64) -> Result<(), StoreError>;
}

/// Result of dispatching a swipe command.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched {
    Nothing,
    /// The shell should open its edit form for this record.
    EditRequested(Expense),
    Deleted(i64),
}

/// One user's expense list plus the aggregate for the current query.
///
/// After every acknowledged write the aggregate is recomputed before the
/// call returns.
#[derive(Debug)]
pub struct ExpenseBook<S: ExpenseStore> {
    store: S,
    user: UserContext,
    query: StatsQuery,
    expenses: Vec<Expense>,
    aggregate: Aggregate,
}

impl<S: ExpenseStore> ExpenseBook<S> {
    pub fn new(store: S, user: UserContext, query: StatsQuery) -> Self {
        Self {
            store,
            user,
            query,
            expenses: Vec::new(),
            aggregate: Aggregate::default(),
        }
    }

    /// Create and load in one go.
    pub fn open(store: S, user: UserContext, query: StatsQuery) -> Result<Self, StoreError> {
        let mut book = Self::new(store, user, query);
        book.refresh()?;
        Ok(book)
    }

    pub fn user(&self) -> &UserContext {
        &self.user
    }

    pub fn query(&self) -> &StatsQuery {
        &self.query
    }

    /// Records, newest id first.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn aggregate(&self) -> &Aggregate {
        &self.aggregate
    }

    pub fn find(&self, id: i64) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Reload everything from the store.
    pub fn refresh(&mut self) -> Result<(), StoreError> {
        let records = self.store.list(&self.user)?;
        let mut expenses = normalize_records(&records);
        if expenses.len() < records.len() {
            tracing::warn!(
                dropped = records.len() - expenses.len(),
                "some records could not be normalized"
            );
        }
        sort_recent_first(&mut expenses);
        self.expenses = expenses;
        self.recompute();
        Ok(())
    }

    pub fn set_query(&mut self, query: StatsQuery) {
        self.query = query;
        self.recompute();
    }

    pub fn add(&mut self, new: &NewExpense) -> Result<Expense, StoreError> {
        let record = self.store.create(&self.user, new)?;
        let expense = Expense::from_record(&record)
            .ok_or_else(|| StoreError::Corrupt(format!("store returned unreadable record {}", record.id)))?;
        self.expenses.push(expense.clone());
        sort_recent_first(&mut self.expenses);
        self.recompute();
        Ok(expense)
    }

    pub fn update(&mut self, id: i64, patch: &ExpensePatch) -> Result<Expense, StoreError> {
        let record = self.store.update(&self.user, id, patch)?;
        let expense = Expense::from_record(&record)
            .ok_or_else(|| StoreError::Corrupt(format!("store returned unreadable record {}", record.id)))?;
        match self.expenses.iter_mut().find(|e| e.id == id) {
            Some(slot) => *slot = expense.clone(),
            None => {
                self.expenses.push(expense.clone());
                sort_recent_first(&mut self.expenses);
            }
        }
        self.recompute();
        Ok(expense)
    }

    pub fn delete(&mut self, id: i64) -> Result<(), StoreError> {
        self.store.delete(&self.user, id)?;
        self.expenses.retain(|e| e.id != id);
        self.recompute();
        Ok(())
    }

    /// Carry out what a swipe asked for.
    pub fn dispatch(&mut self, command: SwipeCommand) -> Result<Dispatched, StoreError> {
        match command {
            SwipeCommand::None => Ok(Dispatched::Nothing),
            SwipeCommand::Edit(expense) => Ok(Dispatched::EditRequested(expense)),
            SwipeCommand::Delete(id) => {
                self.delete(id)?;
                Ok(Dispatched::Deleted(id))
            }
        }
    }

    fn recompute(&mut self) {
        self.aggregate = recompute(&self.expenses, &self.query);
    }
}
