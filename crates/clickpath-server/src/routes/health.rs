use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::state::AppState;

/// `GET /health`: liveness check.
///
/// The store is loaded before the listener binds, so a running server is
/// always able to answer.
///
/// Response shape:
/// ```json
/// { "status": "ok", "version": "0.1.0", "sessions": 1234 }
/// ```
#[tracing::instrument(skip(state))]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
            "sessions": state.store.len(),
        })),
    )
}
