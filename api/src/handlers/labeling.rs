//! Labeling state machine handlers: arming modes, chart clicks, and theme.

use axum::extract::State;
use axum::Json;
use candlemark_rs::annotate::{ClickEffect, LabelMode};
use candlemark_rs::chart::ThemeKind;
use serde::Deserialize;
use serde_json::json;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ModeBody {
    pub mode: LabelMode,
}

/// `POST /api/labeler/mode` — arm (or toggle off) an annotation mode.
pub async fn handle_select_mode(
    State(state): State<AppState>,
    Json(body): Json<ModeBody>,
) -> Json<serde_json::Value> {
    let mut bench = state.workbench.lock().await;
    bench.select_mode(body.mode);
    Json(json!({ "armed": bench.armed_mode() }))
}

#[derive(Debug, Deserialize)]
pub struct ClickBody {
    pub time: i64,
    pub price: f64,
}

/// `POST /api/labeler/click` — a chart click at a candle time and price.
/// Returns the applied effect so the client knows what to redraw.
pub async fn handle_chart_click(
    State(state): State<AppState>,
    Json(body): Json<ClickBody>,
) -> Json<ClickEffect> {
    Json(state.workbench.lock().await.chart_click(body.time, body.price))
}

#[derive(Debug, Deserialize)]
pub struct ThemeBody {
    pub theme: ThemeKind,
}

/// `PUT /api/theme`
pub async fn handle_theme(
    State(state): State<AppState>,
    Json(body): Json<ThemeBody>,
) -> Json<serde_json::Value> {
    state.workbench.lock().await.set_theme(body.theme);
    Json(json!({ "theme": body.theme }))
}
