use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::Arc;

use crate::classifiers::ClassifierArtifact;
use crate::errors::{ArtifactKind, PipelineError};
use crate::models::FeatureRow;
use crate::scalers::ScalerArtifact;

/// Normalizes a labelled feature row before classification.
pub trait Scaler: Send + Sync {
    /// Returns the scaled values, one per input column.
    ///
    /// Fails with [`PipelineError::ScalingError`] when the row's columns do
    /// not match the columns the scaler was fit on.
    fn transform(&self, row: &FeatureRow) -> Result<Vec<f64>, PipelineError>;
}

/// Produces a class label from a scaled feature row.
pub trait Classifier: Send + Sync {
    /// Fails with [`PipelineError::PredictionError`] when the row does not
    /// have the width the model was trained on.
    fn predict(&self, row: &[f64]) -> Result<i64, PipelineError>;
}

/// A loaded artifact and the SHA-256 fingerprint of the bytes it came from.
pub struct Loaded<T: ?Sized> {
    pub artifact: Arc<T>,
    pub fingerprint: String,
}

impl<T: ?Sized> Clone for Loaded<T> {
    fn clone(&self) -> Self {
        Self {
            artifact: Arc::clone(&self.artifact),
            fingerprint: self.fingerprint.clone(),
        }
    }
}

/// The trained classifier and scaler, loaded once at startup and shared
/// read-only by every request.
///
/// Either slot may be empty; that is a permanent degraded mode for the
/// process, not a per-request error.
#[derive(Clone, Default)]
pub struct ArtifactStore {
    model: Option<Loaded<dyn Classifier>>,
    scaler: Option<Loaded<dyn Scaler>>,
}

impl ArtifactStore {
    /// Loads both artifacts, logging and leaving a slot empty on failure.
    pub fn load(model_path: &Path, scaler_path: &Path) -> Self {
        let model = match load_classifier(model_path) {
            Ok(loaded) => {
                tracing::info!(
                    "✓ Classifier loaded from {} (sha256 {})",
                    model_path.display(),
                    loaded.fingerprint
                );
                Some(loaded)
            }
            Err(e) => {
                tracing::error!("Error: {}. Please check MODEL_PATH.", e);
                None
            }
        };

        let scaler = match load_scaler(scaler_path) {
            Ok(loaded) => {
                tracing::info!(
                    "✓ Scaler loaded from {} (sha256 {})",
                    scaler_path.display(),
                    loaded.fingerprint
                );
                Some(loaded)
            }
            Err(e) => {
                tracing::error!("Error: {}. Please check SCALER_PATH.", e);
                None
            }
        };

        Self { model, scaler }
    }

    /// Builds a store from already constructed artifacts.
    pub fn from_parts(
        model: Option<Arc<dyn Classifier>>,
        scaler: Option<Arc<dyn Scaler>>,
    ) -> Self {
        Self {
            model: model.map(|artifact| Loaded {
                artifact,
                fingerprint: String::from("in-memory"),
            }),
            scaler: scaler.map(|artifact| Loaded {
                artifact,
                fingerprint: String::from("in-memory"),
            }),
        }
    }

    pub fn model(&self) -> Option<&dyn Classifier> {
        self.model.as_ref().map(|l| l.artifact.as_ref())
    }

    pub fn scaler(&self) -> Option<&dyn Scaler> {
        self.scaler.as_ref().map(|l| l.artifact.as_ref())
    }

    pub fn model_fingerprint(&self) -> Option<&str> {
        self.model.as_ref().map(|l| l.fingerprint.as_str())
    }

    pub fn scaler_fingerprint(&self) -> Option<&str> {
        self.scaler.as_ref().map(|l| l.fingerprint.as_str())
    }

    /// True when both artifacts are present.
    pub fn is_ready(&self) -> bool {
        self.model.is_some() && self.scaler.is_some()
    }
}

/// Loads a classifier artifact from `path`.
pub fn load_classifier(path: &Path) -> Result<Loaded<dyn Classifier>, PipelineError> {
    let (artifact, fingerprint) =
        read_artifact::<ClassifierArtifact>(ArtifactKind::Classifier, path)?;
    artifact
        .validate()
        .map_err(|reason| missing(ArtifactKind::Classifier, path, reason))?;

    let artifact: Arc<dyn Classifier> = Arc::new(artifact);
    Ok(Loaded {
        artifact,
        fingerprint,
    })
}

/// Loads a scaler artifact from `path`.
pub fn load_scaler(path: &Path) -> Result<Loaded<dyn Scaler>, PipelineError> {
    let (artifact, fingerprint) = read_artifact::<ScalerArtifact>(ArtifactKind::Scaler, path)?;
    artifact
        .validate()
        .map_err(|reason| missing(ArtifactKind::Scaler, path, reason))?;

    let artifact: Arc<dyn Scaler> = Arc::new(artifact);
    Ok(Loaded {
        artifact,
        fingerprint,
    })
}

fn read_artifact<T: DeserializeOwned>(
    kind: ArtifactKind,
    path: &Path,
) -> Result<(T, String), PipelineError> {
    let bytes = std::fs::read(path).map_err(|e| missing(kind, path, e.to_string()))?;
    let artifact = serde_json::from_slice(&bytes)
        .map_err(|e| missing(kind, path, format!("corrupt artifact: {}", e)))?;
    Ok((artifact, fingerprint(&bytes)))
}

fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn missing(kind: ArtifactKind, path: &Path, reason: String) -> PipelineError {
    PipelineError::MissingArtifact {
        kind,
        path: path.to_path_buf(),
        reason,
    }
}
