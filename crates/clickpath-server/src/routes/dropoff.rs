use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use clickpath_core::metrics::{drop_off_pages, DropOff, GroupBy, GroupKey};

use crate::{
    error::AppError,
    routes::params::{group_by_name, parse_group_by, session_filter},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct DropOffQuery {
    pub group_by: Option<String>,
    pub sources: Option<String>,
    pub devices: Option<String>,
}

#[derive(Debug, Serialize)]
struct DropOffRow {
    #[serde(flatten)]
    key: GroupKey,
    #[serde(flatten)]
    drop_off: DropOff,
}

/// `GET /api/dropoff`: most common exit page(s) of sessions whose last page
/// is not the success event. Groups by source and device unless `group_by`
/// says otherwise.
pub async fn get_dropoff(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DropOffQuery>,
) -> Result<impl IntoResponse, AppError> {
    let group_by = parse_group_by(query.group_by.as_deref())?.unwrap_or(GroupBy::SourceDevice);
    let filter = session_filter(query.sources.as_deref(), query.devices.as_deref())?;
    let sessions = state.store.select(&filter);

    let rows: Vec<DropOffRow> =
        drop_off_pages(&sessions, group_by, &state.analysis().success_event)
            .into_iter()
            .map(|(key, drop_off)| DropOffRow { key, drop_off })
            .collect();

    Ok(Json(json!({
        "data": {
            "group_by": group_by_name(group_by),
            "rows": rows,
        },
        "filter": filter,
    })))
}
