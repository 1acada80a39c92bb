use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use clickpath_core::report::overview;

use crate::{error::AppError, routes::params::FilterParams, state::AppState};

/// `GET /api/overview`: headline metrics for the selected sessions.
pub async fn get_overview(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
) -> Result<impl IntoResponse, AppError> {
    let filter = params.to_filter()?;
    let data = overview(&state.store, &filter, state.analysis());

    Ok(Json(json!({ "data": data, "filter": filter })))
}
