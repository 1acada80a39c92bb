use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use clickpath_core::report::dataset_summary;

use crate::{error::AppError, routes::params::FilterParams, state::AppState};

/// `GET /api/dataset`: row counts, path-length summary and the source and
/// device distributions of the (optionally filtered) sessions.
pub async fn get_dataset(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
) -> Result<impl IntoResponse, AppError> {
    let filter = params.to_filter()?;
    let summary = dataset_summary(&state.store, &filter);

    Ok(Json(json!({
        "data": {
            "source": state.dataset,
            "total_sessions": state.store.len(),
            "summary": summary,
        },
        "filter": filter,
    })))
}
