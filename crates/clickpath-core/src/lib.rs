//! Path analytics over visitor clickstream sessions.

pub mod adjacency;
pub mod config;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod ranking;
pub mod report;
pub mod session;
pub mod store;
pub mod tally;

pub use error::CoreError;
pub use filter::SessionFilter;
pub use session::{RawRow, Session, VisitPath};
pub use store::SessionStore;
