//! Dataset lifecycle handlers: upload, listing, activation, chart data,
//! training hand-off, and the auto-label flow.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use candlemark_rs::chart::HoverPoint;
use candlemark_rs::data::Candle;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Deserialize;
use serde_json::json;
use shared::{Dataset, DatasetStatus};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// `POST /api/datasets` — multipart CSV upload, field `data-file`.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Dataset>), ApiError> {
    let mut upload: Option<(String, String)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("invalid multipart body: {}", e)))?
    {
        if field.name() != Some("data-file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("dataset.csv").to_string();
        let content_type = field.content_type().map(|s| s.to_string());
        let is_csv = file_name.to_lowercase().ends_with(".csv")
            || content_type.as_deref() == Some("text/csv");
        if !is_csv {
            return Err(ApiError::Validation(format!(
                "expected a .csv upload, got '{}'",
                file_name
            )));
        }
        let content = field
            .text()
            .await
            .map_err(|e| ApiError::Validation(format!("could not read upload: {}", e)))?;
        upload = Some((file_name, content));
        break;
    }
    let (file_name, content) =
        upload.ok_or_else(|| ApiError::Validation("missing file field 'data-file'".to_string()))?;

    let id = Uuid::new_v4().to_string();
    let count = {
        let mut bench = state.workbench.lock().await;
        match bench.load_csv(&id, &content)? {
            0 => {
                bench.remove(&id);
                return Err(ApiError::NoValidRows);
            }
            n => n,
        }
    };

    let name = file_name.trim_end_matches(".csv").to_string();
    let dataset = Dataset::new(id, name, count);
    state.store.save(&dataset).await?;
    info!(id = %dataset.id, candles = count, "dataset uploaded");
    Ok((StatusCode::CREATED, Json(dataset)))
}

/// `GET /api/datasets`
pub async fn handle_list(State(state): State<AppState>) -> Result<Json<Vec<Dataset>>, ApiError> {
    Ok(Json(state.store.list().await?))
}

/// `DELETE /api/datasets/:id` — cascades to the candle cache and all
/// annotations.
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.store.delete(&id).await?;
    state.workbench.lock().await.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/datasets/:id/activate` — select the dataset for labeling.
/// Refused while a training job is processing it.
pub async fn handle_activate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let dataset = state
        .store
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("dataset {}", id)))?;
    if dataset.status == DatasetStatus::Processing {
        return Err(ApiError::Validation(
            "dataset is being processed and cannot be labeled".to_string(),
        ));
    }

    state.workbench.lock().await.activate(&id);
    Ok(Json(json!({ "active": id })))
}

/// `GET /api/datasets/:id/candles`
pub async fn handle_candles(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Candle>>, ApiError> {
    let bench = state.workbench.lock().await;
    let candles = bench
        .candles(&id)
        .ok_or_else(|| ApiError::NotFound(format!("dataset {}", id)))?;
    Ok(Json(candles.to_vec()))
}

/// `GET /api/datasets/:id/annotations` — empty collections for an unknown
/// id, never an error.
pub async fn handle_annotations(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<candlemark_rs::annotate::AnnotationSet> {
    Json(state.workbench.lock().await.annotations(&id))
}

/// `GET /api/datasets/:id/chart` — the full declarative chart frame.
pub async fn handle_chart(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<candlemark_rs::chart::ChartFrame>, ApiError> {
    let bench = state.workbench.lock().await;
    let frame = bench
        .chart_frame(&id)
        .ok_or_else(|| ApiError::NotFound(format!("dataset {}", id)))?;
    Ok(Json(frame))
}

#[derive(Debug, Deserialize)]
pub struct HoverQuery {
    pub time: i64,
}

/// `GET /api/datasets/:id/hover?time=T` — index and raw-row feedback for
/// the candle under the pointer. `null` when no candle sits at that time.
pub async fn handle_hover(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<HoverQuery>,
) -> Json<Option<HoverPoint>> {
    Json(state.workbench.lock().await.hover(&id, query.time))
}

/// `GET /api/datasets/:id/export` — the training hand-off CSV as an
/// attachment.
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let csv = state.workbench.lock().await.training_csv(&id);
    let disposition = format!("attachment; filename=\"{}-annotations.csv\"", id);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: DatasetStatus,
}

/// `PATCH /api/datasets/:id/status` — external lifecycle transition, e.g.
/// the training job's completion callback setting `Labeled`.
pub async fn handle_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> Result<Json<Dataset>, ApiError> {
    let mut dataset = state
        .store
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("dataset {}", id)))?;
    dataset.status = body.status;
    state.store.save(&dataset).await?;
    Ok(Json(dataset))
}

/// `POST /api/datasets/:id/train` — export annotations, hand them to the
/// training collaborator, and flip the dataset to `Processing`.
pub async fn handle_train(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut dataset = state
        .store
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("dataset {}", id)))?;
    let gemini = state
        .gemini
        .clone()
        .ok_or_else(|| ApiError::Collaborator("GEMINI_API_KEY is not configured".to_string()))?;

    let csv = state.workbench.lock().await.training_csv(&id);
    let description = format!("Structure-labeling model for dataset '{}'", dataset.name);
    let ack = gemini
        .start_training(&csv, &description)
        .await
        .map_err(|e| ApiError::Collaborator(e.to_string()))?;

    dataset.status = DatasetStatus::Processing;
    state.store.save(&dataset).await?;
    info!(id = %id, job = %ack.label, "training hand-off accepted");
    Ok(Json(json!({ "jobId": ack.label, "confidence": ack.confidence })))
}

/// `POST /api/datasets/:id/auto-label` — ask the collaborator for candidate
/// points and merge them into the active dataset. The dataset id is
/// captured before the await; if the active dataset changed by the time the
/// reply arrives, the batch is discarded.
pub async fn handle_auto_label(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<candlemark_rs::workbench::AutoLabelOutcome>, ApiError> {
    let gemini = state
        .gemini
        .clone()
        .ok_or_else(|| ApiError::Collaborator("GEMINI_API_KEY is not configured".to_string()))?;

    let csv = {
        let bench = state.workbench.lock().await;
        if bench.active() != Some(id.as_str()) {
            return Err(ApiError::Validation(
                "dataset must be active to auto-label".to_string(),
            ));
        }
        bench
            .raw_csv(&id)
            .map(str::to_string)
            .ok_or_else(|| ApiError::NotFound(format!("dataset {}", id)))?
    };

    let mut points = gemini
        .auto_label(&csv)
        .await
        .map_err(|e| ApiError::Collaborator(e.to_string()))?;
    // the collaborator does not guarantee unique ids
    for point in &mut points {
        point.id = format!("{}-{}", point.id, random_suffix());
    }

    let outcome = state.workbench.lock().await.apply_auto_labels(&id, points);
    Ok(Json(outcome))
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_suffix_is_alphanumeric() {
        let a = random_suffix();
        let b = random_suffix();
        assert_eq!(a.len(), 6);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        // two draws colliding would be a 1-in-62^6 fluke
        assert_ne!(a, b);
    }
}
