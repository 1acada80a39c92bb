use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, StatusCode},
    response::Response,
};

use clickpath_core::metrics::{
    average_links_to_success, average_links_visited, bounce_rate, conversion_rate,
    group_sessions, GroupBy,
};

use crate::{error::AppError, routes::params::FilterParams, state::AppState};

/// One row of the exported metrics table.
struct ExportRow {
    source: String,
    device: String,
    sessions: usize,
    bounce_rate: f64,
    purchase_success_rate: f64,
    average_links_visited: f64,
    average_links_to_purchase: f64,
}

/// `GET /api/export`: download per source×device metrics as CSV.
///
/// Rates and averages are written with two decimals.
/// Response: `Content-Type: text/csv` with `Content-Disposition: attachment`.
#[tracing::instrument(skip(state))]
pub async fn export_metrics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
) -> Result<Response, AppError> {
    let filter = params.to_filter()?;
    let sessions = state.store.select(&filter);
    let success = state.analysis().success_event.as_str();

    let rows: Vec<ExportRow> = group_sessions(&sessions, GroupBy::SourceDevice)
        .into_iter()
        .map(|(key, group)| ExportRow {
            source: key.source.unwrap_or_default(),
            device: key.device.unwrap_or_default(),
            sessions: group.len(),
            bounce_rate: bounce_rate(&group),
            purchase_success_rate: conversion_rate(&group, success),
            average_links_visited: average_links_visited(&group),
            average_links_to_purchase: average_links_to_success(&group, success),
        })
        .collect();

    let csv_bytes = Bytes::from(build_csv(&rows)?);
    tracing::info!(rows = rows.len(), "Metrics export built");
    build_csv_response("clickpath-metrics.csv", csv_bytes)
}

/// Sanitize a CSV field value against formula injection.
///
/// Spreadsheet apps interpret values that begin with `=`, `+`, `-`, `@`,
/// TAB, or CR as formula expressions. Prepending a single quote (`'`) causes
/// them to treat the value as a literal string. Source and device names come
/// straight from the input file, so they are untrusted.
fn sanitize_csv_field(val: &str) -> std::borrow::Cow<'_, str> {
    if val.starts_with(['=', '+', '-', '@', '\t', '\r']) {
        std::borrow::Cow::Owned(format!("'{val}"))
    } else {
        std::borrow::Cow::Borrowed(val)
    }
}

fn build_csv(rows: &[ExportRow]) -> anyhow::Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::with_capacity(rows.len().saturating_mul(96)));

    wtr.write_record([
        "source",
        "device",
        "sessions",
        "bounce_rate",
        "purchase_success_rate",
        "average_links_visited",
        "average_links_to_purchase",
    ])
    .map_err(|e| anyhow::anyhow!("csv write_record failed: {e}"))?;

    for row in rows {
        let source = sanitize_csv_field(&row.source);
        let device = sanitize_csv_field(&row.device);
        let sessions = row.sessions.to_string();
        let bounce_rate = format!("{:.2}", row.bounce_rate);
        let success_rate = format!("{:.2}", row.purchase_success_rate);
        let links_visited = format!("{:.2}", row.average_links_visited);
        let links_to_purchase = format!("{:.2}", row.average_links_to_purchase);

        wtr.write_record([
            source.as_ref(),
            device.as_ref(),
            sessions.as_str(),
            bounce_rate.as_str(),
            success_rate.as_str(),
            links_visited.as_str(),
            links_to_purchase.as_str(),
        ])
        .map_err(|e| anyhow::anyhow!("csv write_record failed: {e}"))?;
    }

    wtr.into_inner()
        .map_err(|e| anyhow::anyhow!("csv flush failed: {e}"))
}

fn build_csv_response(filename: &str, csv_bytes: Bytes) -> Result<Response, AppError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .body(axum::body::Body::from(csv_bytes))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("response build failed: {e}")))
}
