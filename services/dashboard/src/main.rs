mod config;
mod fixtures;
mod routes_datasets;
mod routes_view;
mod state;
mod types;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::info;

use datasel::SampleKind;

use crate::config::AppConfig;
use crate::fixtures::FileFetcher;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env()?;

    // --- Startup health checks (fail fast) ---
    startup_checks(&cfg).await?;

    let app_state = Arc::new(AppState::new(cfg.clone()));

    let app = Router::new()
        .route("/datasets", get(routes_datasets::get_datasets))
        .route("/datasets/select", post(routes_datasets::post_select))
        .route("/datasets/upload", post(routes_datasets::post_upload))
        .route("/datasets/reset", post(routes_datasets::post_reset))
        .route("/notifications/dismiss", post(routes_datasets::post_dismiss))
        .route("/view/chart", get(routes_view::get_chart))
        .route("/view/table", get(routes_view::get_table))
        .layer(DefaultBodyLimit::max(cfg.max_upload_bytes))
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr = &cfg.bind_addr;
    println!("dashboard listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Both sample fixtures must exist and pass the document gates before we
/// serve anything.
async fn startup_checks(cfg: &AppConfig) -> Result<()> {
    let fetcher = FileFetcher::new(&cfg.fixture_dir);
    for kind in [SampleKind::Short, SampleKind::Long] {
        let path = fetcher.fixture_path(kind);
        let dataset = fixtures::load_fixture(&path)
            .await
            .with_context(|| format!("Bad fixture {}", path.display()))?;
        info!(fixture = kind.fixture_name(), records = dataset.len(), "fixture: ok");
    }
    Ok(())
}
