use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use clickpath_csv::CsvLoader;
use clickpath_server::state::{AppState, DatasetInfo};

/// `clickpath health`: liveness probe for Docker HEALTHCHECK.
///
/// Calls `GET http://localhost:$CLICKPATH_PORT/health`.
/// Exits 0 if the server responds with HTTP 200, exits 1 otherwise.
fn run_health_check() -> ! {
    let port = std::env::var("CLICKPATH_PORT").unwrap_or_else(|_| "3000".to_string());
    let url = format!("http://localhost:{}/health", port);
    match ureq::get(&url).call() {
        Ok(resp) if resp.status() == 200 => std::process::exit(0),
        _ => std::process::exit(1),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(|s| s.as_str()) == Some("health") {
        run_health_check();
    }
    // Structured JSON logging. Level controlled via RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clickpath=info".parse()?),
        )
        .json()
        .init();

    let cfg = clickpath_core::config::Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // The whole file is read before binding; a malformed row aborts startup.
    let outcome = CsvLoader::new()
        .has_headers(cfg.csv_has_headers)
        .load_path(&cfg.data_path)?;
    if outcome.store.is_empty() {
        tracing::warn!(data_path = %cfg.data_path, "Data file contains no sessions");
    }

    let dataset = DatasetInfo {
        path: cfg.data_path.clone(),
        skipped_rows: outcome.skipped_rows,
        loaded_at: chrono::Utc::now(),
    };
    let state = Arc::new(AppState::new(outcome.store, cfg.clone(), dataset));

    let addr = format!("0.0.0.0:{}", cfg.port);
    let app = clickpath_server::app::build_app(Arc::clone(&state));

    info!(
        port = cfg.port,
        sessions = state.store.len(),
        segments = cfg.segments.len(),
        "Clickpath listening on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
