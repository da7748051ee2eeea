use axum::{
    extract::rejection::{FormRejection, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use std::path::PathBuf;

use crate::models::Field;

/// Which trained artifact an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Classifier,
    Scaler,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Classifier => f.write_str("classifier"),
            ArtifactKind::Scaler => f.write_str("scaler"),
        }
    }
}

/// Failures of the application-to-decision pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// An artifact could not be loaded at startup (absent, corrupt, or
    /// schema-incompatible). Permanent for the life of the process.
    MissingArtifact {
        kind: ArtifactKind,
        path: PathBuf,
        reason: String,
    },
    /// A supplied field is not a valid integer.
    MalformedField { field: Field, value: String },
    /// Inference was requested while an artifact is absent.
    InferenceUnavailable,
    /// The scaler rejected the shaped row.
    ScalingError(String),
    /// The classifier rejected the scaled row.
    PredictionError(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::MissingArtifact { kind, path, reason } => {
                write!(f, "{} not loaded from {}: {}", kind, path.display(), reason)
            }
            PipelineError::MalformedField { field, value } => {
                write!(f, "invalid integer value '{}' for field {}", value, field)
            }
            PipelineError::InferenceUnavailable => {
                write!(f, "inference unavailable: model or scaler not loaded")
            }
            PipelineError::ScalingError(msg) => write!(f, "scaling failed: {}", msg),
            PipelineError::PredictionError(msg) => write!(f, "prediction failed: {}", msg),
        }
    }
}

impl std::error::Error for PipelineError {}

/// HTTP-level errors, raised before a submission reaches the pipeline.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Bad request error (ill-typed field values).
    BadRequest(String),
    /// The body extractor refused the request; keeps the extractor's status.
    Rejected { status: StatusCode, message: String },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Rejected { status, message } => {
                write!(f, "Request rejected ({}): {}", status, message)
            }
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Maps each variant to a status code and a JSON `{"error": ...}` body.
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::BadRequest(msg) => {
                tracing::debug!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::Rejected { status, message } => {
                tracing::debug!("Rejected request body ({}): {}", status, message);
                (*status, message.clone())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}
