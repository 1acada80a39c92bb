use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use clickpath_core::metrics::percentage;
use clickpath_core::ranking::top_paths;

use crate::{error::AppError, routes::params::session_filter, state::AppState};

const MAX_TOP_K: usize = 100;

#[derive(Debug, Deserialize)]
pub struct TopPathsQuery {
    pub k: Option<usize>,
    pub sources: Option<String>,
    pub devices: Option<String>,
}

/// `GET /api/paths/top`: most common complete visit paths.
///
/// `k` defaults to the configured top-K and is clamped to 1..=100.
pub async fn get_top_paths(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TopPathsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let k = query.k.unwrap_or(state.analysis().top_k).clamp(1, MAX_TOP_K);
    let filter = session_filter(query.sources.as_deref(), query.devices.as_deref())?;
    let sessions = state.store.select(&filter);

    let rows: Vec<_> = top_paths(&sessions, k)
        .into_iter()
        .map(|count| {
            json!({
                "path": count.path,
                "length": count.path.len(),
                "sessions": count.sessions,
                "share": percentage(count.sessions, sessions.len()),
            })
        })
        .collect();

    Ok(Json(json!({
        "data": {
            "k": k,
            "total_sessions": sessions.len(),
            "rows": rows,
        },
        "filter": filter,
    })))
}
