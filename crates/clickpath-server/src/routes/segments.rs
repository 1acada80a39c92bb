use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use clickpath_core::report::{segment_report, SegmentReport};
use clickpath_core::SessionFilter;

use crate::{error::AppError, routes::params::session_filter, state::AppState};

/// Segments fix their own sources, so only a device restriction is accepted.
#[derive(Debug, Deserialize)]
pub struct SegmentQuery {
    pub devices: Option<String>,
}

/// `GET /api/segments`: per-channel metrics for every configured segment.
pub async fn list_segments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SegmentQuery>,
) -> Result<impl IntoResponse, AppError> {
    let devices = device_filter(query.devices.as_deref())?;
    let reports: Vec<SegmentReport> = state
        .config
        .segments
        .iter()
        .map(|segment| {
            segment_report(&state.store, segment, devices.as_ref(), state.analysis())
        })
        .collect();

    Ok(Json(json!({ "data": reports })))
}

/// `GET /api/segments/{name}`: one configured segment.
pub async fn get_segment(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(query): Query<SegmentQuery>,
) -> Result<impl IntoResponse, AppError> {
    let segment = state
        .config
        .segment(&name)
        .ok_or_else(|| AppError::NotFound(format!("Segment '{name}' not found")))?;
    let devices = device_filter(query.devices.as_deref())?;
    let report = segment_report(&state.store, segment, devices.as_ref(), state.analysis());

    Ok(Json(json!({ "data": report })))
}

fn device_filter(devices: Option<&str>) -> Result<Option<SessionFilter>, AppError> {
    match devices {
        None => Ok(None),
        Some(raw) => session_filter(None, Some(raw)).map(Some),
    }
}
