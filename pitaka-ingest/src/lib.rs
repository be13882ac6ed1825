//! pitaka-ingest: expense imports (CSV files, API listings) and pointer adapters.

pub mod parsers;
pub mod pointer;
pub mod types;

pub use pointer::{MouseAdapter, MouseEvent, PointerSource, TouchAdapter, TouchEvent, TouchPoint};
pub use types::ImportedExpense;
