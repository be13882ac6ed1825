pub mod api_listing;
pub mod csv_import;

pub use api_listing::{load_api_listing, parse_api_listing};
pub use csv_import::{parse_expense_csv, parse_expense_csv_reader};
