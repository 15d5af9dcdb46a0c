use anyhow::Result;
use axum::{
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use shared::Config;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

mod error;
mod handlers;
mod services;
mod state;

use handlers::{datasets, labeling, signals};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("Starting CandleMark API server...");

    let config = Config::from_env()?;
    let state = AppState::new(&config)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("API server listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/datasets",
            post(datasets::handle_upload).get(datasets::handle_list),
        )
        .route("/api/datasets/:id", delete(datasets::handle_delete))
        .route("/api/datasets/:id/activate", post(datasets::handle_activate))
        .route("/api/datasets/:id/candles", get(datasets::handle_candles))
        .route(
            "/api/datasets/:id/annotations",
            get(datasets::handle_annotations),
        )
        .route("/api/datasets/:id/chart", get(datasets::handle_chart))
        .route("/api/datasets/:id/hover", get(datasets::handle_hover))
        .route("/api/datasets/:id/export", get(datasets::handle_export))
        .route("/api/datasets/:id/status", patch(datasets::handle_status))
        .route("/api/datasets/:id/train", post(datasets::handle_train))
        .route(
            "/api/datasets/:id/auto-label",
            post(datasets::handle_auto_label),
        )
        .route("/api/theme", put(labeling::handle_theme))
        .route("/api/labeler/mode", post(labeling::handle_select_mode))
        .route("/api/labeler/click", post(labeling::handle_chart_click))
        .route("/api/signals", post(signals::handle_generate))
        .route("/api/models", get(signals::handle_models))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
