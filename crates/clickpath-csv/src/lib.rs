//! CSV ingestion for clickstream exports.

pub mod error;
pub mod loader;

pub use error::LoadError;
pub use loader::{CsvLoader, LoadOutcome, EXPECTED_COLUMNS};
