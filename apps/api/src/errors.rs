use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::error::AnalysisError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Analysis exceeded the {0}s processing limit")]
    Timeout(u64),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

fn analysis_status(err: &AnalysisError) -> StatusCode {
    match err {
        AnalysisError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        AnalysisError::OversizedDocument { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        AnalysisError::CorruptDocument(_) | AnalysisError::EmptyDocument => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AnalysisError::TaxonomyUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Analysis(e) => {
                if let AnalysisError::TaxonomyUnavailable(detail) = e {
                    tracing::error!("Taxonomy unavailable: {detail}");
                }
                (analysis_status(e), e.code(), e.user_message())
            }
            AppError::Multipart(e) => {
                let status = e.status();
                let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
                    "OVERSIZED_DOCUMENT"
                } else {
                    "MALFORMED_REQUEST"
                };
                (status, code, e.body_text())
            }
            AppError::Timeout(secs) => (
                StatusCode::GATEWAY_TIMEOUT,
                "PROCESSING_TIMEOUT",
                format!("Analysis did not finish within {secs} seconds"),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
