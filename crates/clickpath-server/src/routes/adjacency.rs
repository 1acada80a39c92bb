use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use clickpath_core::adjacency::{adjacent, Direction};

use crate::{error::AppError, routes::params::session_filter, state::AppState};

#[derive(Debug, Deserialize)]
pub struct AdjacencyQuery {
    pub event: Option<String>,
    pub direction: Option<String>,
    pub sources: Option<String>,
    pub devices: Option<String>,
}

fn parse_direction(raw: Option<&str>) -> Result<Direction, AppError> {
    match raw.map(str::trim) {
        Some("before") => Ok(Direction::Before),
        Some("after") => Ok(Direction::After),
        Some(_) => Err(AppError::BadRequest(
            "direction must be either 'before' or 'after'".to_string(),
        )),
        None => Err(AppError::BadRequest("direction is required".to_string())),
    }
}

/// `GET /api/adjacency`: pages seen immediately before or after the first
/// occurrence of `event` (defaults to the configured target event).
///
/// A missing predecessor is reported as `"start"`, a missing successor as
/// `null`.
pub async fn get_adjacency(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AdjacencyQuery>,
) -> Result<impl IntoResponse, AppError> {
    let direction = parse_direction(query.direction.as_deref())?;
    let event = match query.event.as_deref().map(str::trim) {
        Some("") => return Err(AppError::BadRequest("event must not be empty".to_string())),
        Some(event) => event.to_string(),
        None => state.analysis().target_event.clone(),
    };
    if event.len() > 500 {
        return Err(AppError::BadRequest(
            "event must be at most 500 characters".to_string(),
        ));
    }

    let filter = session_filter(query.sources.as_deref(), query.devices.as_deref())?;
    let sessions = state.store.select(&filter);
    let rows = adjacent(&sessions, &event, direction);
    let matched: usize = rows.iter().map(|r| r.sessions).sum();

    Ok(Json(json!({
        "data": {
            "event": event,
            "direction": direction,
            "matched_sessions": matched,
            "rows": rows,
        },
        "filter": filter,
    })))
}
