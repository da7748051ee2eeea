use crate::artifacts::ArtifactStore;
use crate::dashboard::render_dashboard;
use crate::errors::AppError;
use crate::models::{PredictionOutcome, PredictionResponse};
use crate::orchestrator::process_application;
use axum::{
    extract::{rejection::FormRejection, rejection::JsonRejection, State},
    http::StatusCode,
    response::Html,
    Form, Json,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Shared application state injected into handlers.
pub struct AppState {
    /// Trained artifacts, loaded once at startup.
    pub artifacts: ArtifactStore,
}

/// Health check endpoint.
///
/// Reports `"degraded"` when either artifact failed to load; the service keeps
/// serving in that state, so the status code stays 200.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let artifacts = &state.artifacts;
    let status = if artifacts.is_ready() {
        "healthy"
    } else {
        "degraded"
    };

    (
        StatusCode::OK,
        Json(json!({
            "status": status,
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "artifacts": {
                "model": {
                    "loaded": artifacts.model().is_some(),
                    "sha256": artifacts.model_fingerprint(),
                },
                "scaler": {
                    "loaded": artifacts.scaler().is_some(),
                    "sha256": artifacts.scaler_fingerprint(),
                },
            },
        })),
    )
}

/// GET /
///
/// Renders the empty application form.
pub async fn home() -> Html<String> {
    Html(render_dashboard(None, None))
}

/// POST /predict
///
/// Handles the dashboard form submission and re-renders the page with the
/// decision (or error message) and the submitted values.
pub async fn predict_form(
    State(state): State<Arc<AppState>>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<Html<String>, AppError> {
    let Form(fields) = form?;
    let outcome = run_pipeline(&state, &fields);

    Ok(Html(render_dashboard(
        Some(&outcome.message()),
        outcome.input_data.as_ref(),
    )))
}

/// POST /api/v1/predict
///
/// JSON variant of the form endpoint. Field values may be strings, numbers,
/// or null (treated as blank). Pipeline errors are reported in `result` with a
/// 200 status, like the form page does.
pub async fn predict_json(
    State(state): State<Arc<AppState>>,
    body: Result<Json<HashMap<String, Value>>, JsonRejection>,
) -> Result<Json<PredictionResponse>, AppError> {
    let Json(body) = body?;
    let fields = fields_from_json(body)?;
    let outcome = run_pipeline(&state, &fields);

    Ok(Json(PredictionResponse::from(outcome)))
}

fn run_pipeline(state: &AppState, fields: &HashMap<String, String>) -> PredictionOutcome {
    let span = tracing::info_span!("predict", request_id = %Uuid::new_v4());
    span.in_scope(|| process_application(&state.artifacts, fields))
}

/// Flattens scalar JSON values into the string field map the pipeline reads.
fn fields_from_json(body: HashMap<String, Value>) -> Result<HashMap<String, String>, AppError> {
    body.into_iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => String::new(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(AppError::BadRequest(format!(
                        "field '{}' must be a string or number",
                        key
                    )))
                }
            };
            Ok((key, text))
        })
        .collect()
}
