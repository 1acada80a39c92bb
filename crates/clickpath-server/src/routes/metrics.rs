use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use clickpath_core::metrics::{
    average_links_to_success, average_links_visited, average_steps_to_success, bounce_rate,
    bounce_rate_by, conversion_rate, conversion_rate_by, conversion_rate_by_last_page,
};
use clickpath_core::report::keyed_values;

use crate::{
    error::AppError,
    routes::params::{group_by_name, parse_group_by, session_filter, split_list},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct GroupedMetricQuery {
    pub group_by: Option<String>,
    pub sources: Option<String>,
    pub devices: Option<String>,
}

/// `GET /api/metrics/bounce`: share of sessions with at most one page.
///
/// Without `group_by` the response carries a single `bounce_rate`; with it,
/// one row per group.
pub async fn get_bounce(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GroupedMetricQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = session_filter(query.sources.as_deref(), query.devices.as_deref())?;
    let sessions = state.store.select(&filter);

    let data = match parse_group_by(query.group_by.as_deref())? {
        None => json!({
            "sessions": sessions.len(),
            "bounce_rate": bounce_rate(&sessions),
        }),
        Some(group_by) => json!({
            "group_by": group_by_name(group_by),
            "rows": keyed_values(bounce_rate_by(&sessions, group_by)),
        }),
    };

    Ok(Json(json!({ "data": data, "filter": filter })))
}

/// `GET /api/metrics/conversion`: purchase success rate, optionally per group.
pub async fn get_conversion(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GroupedMetricQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = session_filter(query.sources.as_deref(), query.devices.as_deref())?;
    let sessions = state.store.select(&filter);
    let success = state.analysis().success_event.as_str();

    let data = match parse_group_by(query.group_by.as_deref())? {
        None => json!({
            "sessions": sessions.len(),
            "success_event": success,
            "conversion_rate": conversion_rate(&sessions, success),
        }),
        Some(group_by) => json!({
            "group_by": group_by_name(group_by),
            "success_event": success,
            "rows": keyed_values(conversion_rate_by(&sessions, group_by, success)),
        }),
    };

    Ok(Json(json!({ "data": data, "filter": filter })))
}

#[derive(Debug, Deserialize)]
pub struct PathLengthQuery {
    pub sources: Option<String>,
    pub devices: Option<String>,
}

/// `GET /api/metrics/path-length`: average links visited overall and
/// among converted sessions.
pub async fn get_path_length(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PathLengthQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = session_filter(query.sources.as_deref(), query.devices.as_deref())?;
    let sessions = state.store.select(&filter);
    let success = state.analysis().success_event.as_str();

    Ok(Json(json!({
        "data": {
            "sessions": sessions.len(),
            "average_links_visited": average_links_visited(&sessions),
            "average_links_to_purchase": average_links_to_success(&sessions, success),
            "average_steps_to_purchase": average_steps_to_success(&sessions, success),
        },
        "filter": filter,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ConversionByPageQuery {
    pub pages: Option<String>,
    pub sources: Option<String>,
    pub devices: Option<String>,
}

/// `GET /api/metrics/conversion-by-page`: conversion among sessions whose
/// final page is one of `pages`.
pub async fn get_conversion_by_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConversionByPageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let pages = query.pages.as_deref().map(split_list).unwrap_or_default();
    if pages.is_empty() {
        return Err(AppError::BadRequest("pages is required".to_string()));
    }
    let filter = session_filter(query.sources.as_deref(), query.devices.as_deref())?;
    let sessions = state.store.select(&filter);
    let page_refs: Vec<&str> = pages.iter().map(String::as_str).collect();
    let rate = conversion_rate_by_last_page(
        &sessions,
        &page_refs,
        &state.analysis().success_event,
    );

    Ok(Json(json!({
        "data": {
            "pages": pages,
            "conversion_rate": rate,
        },
        "filter": filter,
    })))
}
