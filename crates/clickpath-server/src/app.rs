use std::sync::Arc;

use axum::{http::HeaderValue, routing::get, Router};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{routes, state::AppState};

/// Construct the Axum [`Router`] with all routes and middleware attached.
///
/// Middleware is applied in outer-to-inner order (outermost runs first on
/// request, last on response):
///
/// 1. `TraceLayer`: structured request/response logging via `tracing`.
/// 2. `CorsLayer`: any origin when `CLICKPATH_CORS_ORIGINS` is unset,
///    otherwise only the listed dashboard origins.
pub fn build_app(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/dataset", get(routes::dataset::get_dataset))
        .route("/api/overview", get(routes::overview::get_overview))
        .route("/api/segments", get(routes::segments::list_segments))
        .route("/api/segments/{name}", get(routes::segments::get_segment))
        .route("/api/metrics/bounce", get(routes::metrics::get_bounce))
        .route("/api/metrics/conversion", get(routes::metrics::get_conversion))
        .route(
            "/api/metrics/conversion-by-page",
            get(routes::metrics::get_conversion_by_page),
        )
        .route("/api/metrics/path-length", get(routes::metrics::get_path_length))
        .route("/api/dropoff", get(routes::dropoff::get_dropoff))
        .route("/api/adjacency", get(routes::adjacency::get_adjacency))
        .route("/api/paths/top", get(routes::paths::get_top_paths))
        .route("/api/export", get(routes::export::export_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}
