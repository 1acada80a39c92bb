use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use clickpath_core::config::{AnalysisConfig, Config};
use clickpath_core::SessionStore;

/// Where the served sessions came from.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetInfo {
    pub path: String,
    pub skipped_rows: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Shared application state injected into every Axum handler via
/// [`axum::extract::State`].
///
/// The store is loaded once before the listener starts and never mutated,
/// so handlers read it concurrently without locking.
pub struct AppState {
    pub store: Arc<SessionStore>,

    /// Parsed configuration, loaded once at startup from environment variables.
    pub config: Arc<Config>,

    pub dataset: DatasetInfo,
}

impl AppState {
    pub fn new(store: SessionStore, config: Config, dataset: DatasetInfo) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
            dataset,
        }
    }

    pub fn analysis(&self) -> &AnalysisConfig {
        &self.config.analysis
    }
}
