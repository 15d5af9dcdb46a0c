//! Signal generation and the model catalog.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use shared::{model_catalog, ModelInfo, SignalBatch};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalsBody {
    pub dataset_id: String,
    pub model_name: String,
}

/// `POST /api/signals` — feed a dataset's labeled CSV to the collaborator
/// and return the generated signal batch. Either the full batch comes back
/// or the error is surfaced verbatim; there is no partial success and no
/// automatic retry.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(body): Json<SignalsBody>,
) -> Result<Json<SignalBatch>, ApiError> {
    state
        .store
        .get(&body.dataset_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("dataset {}", body.dataset_id)))?;
    let gemini = state
        .gemini
        .clone()
        .ok_or_else(|| ApiError::Collaborator("GEMINI_API_KEY is not configured".to_string()))?;

    let labeled = state
        .workbench
        .lock()
        .await
        .labeled_csv(&body.dataset_id)
        .ok_or_else(|| ApiError::NotFound(format!("dataset {}", body.dataset_id)))?;

    let batch = gemini
        .trade_signals(&labeled, &body.model_name)
        .await
        .map_err(|e| ApiError::Collaborator(e.to_string()))?;
    Ok(Json(batch))
}

/// `GET /api/models` — the static catalog of pre-trained models.
pub async fn handle_models() -> Json<Vec<ModelInfo>> {
    Json(model_catalog())
}
