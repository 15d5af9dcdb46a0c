//! API error taxonomy and HTTP mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use candlemark_rs::data::ParseError;
use serde_json::json;
use shared::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad form input: missing file, wrong MIME type, bad parameters (400)
    #[error("{0}")]
    Validation(String),

    /// CSV structurally unparseable (422). Individual bad rows are dropped
    /// during parsing and never reach here.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The parse succeeded but every row was dropped (422). Distinct from
    /// `Parse` so the client can tell the user which file to fix and how.
    #[error("no valid rows found in the uploaded file")]
    NoValidRows,

    /// Unknown dataset id or resource (404)
    #[error("{0} not found")]
    NotFound(String),

    /// The LLM flow failed or returned no output (502). Surfaced verbatim,
    /// never retried.
    #[error("generation failed: {0}")]
    Collaborator(String),

    /// Everything else (500)
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Parse(_) | ApiError::NoValidRows => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Collaborator(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            ApiError::Internal(err) => {
                tracing::error!("internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_names_found_headers() {
        let err = candlemark_rs::data::parse_csv("open,high\n1,2").unwrap_err();
        let api_err = ApiError::from(err);
        let msg = api_err.to_string();

        assert!(msg.contains("missing required columns"));
        assert!(msg.contains("open, high"));
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::NoValidRows, StatusCode::UNPROCESSABLE_ENTITY),
            (ApiError::NotFound("dataset".into()), StatusCode::NOT_FOUND),
            (ApiError::Collaborator("x".into()), StatusCode::BAD_GATEWAY),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
