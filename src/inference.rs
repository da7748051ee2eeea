use crate::artifacts::ArtifactStore;
use crate::errors::PipelineError;
use crate::models::FeatureVector;

/// Scales `features` and classifies the resulting row.
///
/// The row's columns are the vector's fields in their given order; any
/// mismatch with the artifacts' fitted schema surfaces as a scaling or
/// prediction error from the artifacts themselves.
pub fn predict_label(
    artifacts: &ArtifactStore,
    features: &FeatureVector,
) -> Result<i64, PipelineError> {
    let (Some(model), Some(scaler)) = (artifacts.model(), artifacts.scaler()) else {
        return Err(PipelineError::InferenceUnavailable);
    };

    let row = features.to_row();
    let scaled = scaler.transform(&row)?;
    let label = model.predict(&scaled)?;

    tracing::debug!(columns = row.columns.len(), label, "Model prediction");

    Ok(label)
}
