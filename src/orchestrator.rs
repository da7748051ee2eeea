//! Top-level handling of one loan application submission.

use std::collections::HashMap;

use crate::artifacts::ArtifactStore;
use crate::decoder::decode;
use crate::inference::predict_label;
use crate::models::{Outcome, PredictionOutcome, RawApplication};
use crate::normalizer::normalize;

/// Runs one submission through collection, normalization, inference and
/// decoding.
///
/// Never fails: per-request errors become an [`Outcome::Failed`] carrying the
/// echoed input, and missing artifacts short-circuit to
/// [`Outcome::Unavailable`] before the input is even read.
pub fn process_application(
    artifacts: &ArtifactStore,
    fields: &HashMap<String, String>,
) -> PredictionOutcome {
    if !artifacts.is_ready() {
        tracing::warn!("Prediction requested but model or scaler is not loaded");
        return PredictionOutcome {
            outcome: Outcome::Unavailable,
            input_data: None,
        };
    }

    let application = RawApplication::collect(fields);

    let outcome = match normalize(&application)
        .and_then(|features| predict_label(artifacts, &features))
        .map(decode)
    {
        Ok(decision) => {
            tracing::info!(%decision, "Prediction complete");
            Outcome::Decided(decision)
        }
        Err(e) => {
            tracing::warn!("Prediction Error: {}", e);
            Outcome::Failed(e)
        }
    };

    PredictionOutcome {
        outcome,
        input_data: Some(application),
    }
}
