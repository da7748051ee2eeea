//! Feature scalers deserialized from JSON artifacts.
//!
//! Each scaler remembers the column names it was fit on and refuses rows whose
//! columns differ in count, name, or order.

use serde::Deserialize;

use crate::artifacts::Scaler;
use crate::errors::PipelineError;
use crate::models::FeatureRow;

/// Serialized scaler, tagged by `"kind"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtifact {
    Standard(StandardScaler),
    MinMax(MinMaxScaler),
}

impl ScalerArtifact {
    /// Structural checks run once at load time.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            ScalerArtifact::Standard(s) => s.validate(),
            ScalerArtifact::MinMax(s) => s.validate(),
        }
    }
}

impl Scaler for ScalerArtifact {
    fn transform(&self, row: &FeatureRow) -> Result<Vec<f64>, PipelineError> {
        match self {
            ScalerArtifact::Standard(s) => s.transform(row),
            ScalerArtifact::MinMax(s) => s.transform(row),
        }
    }
}

/// Standardization: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StandardScaler {
    pub feature_names_in: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    fn validate(&self) -> Result<(), String> {
        let n = self.feature_names_in.len();
        if n == 0 {
            return Err("scaler has no features".to_string());
        }
        if self.mean.len() != n || self.scale.len() != n {
            return Err(format!(
                "expected {} means and scales, found {} and {}",
                n,
                self.mean.len(),
                self.scale.len()
            ));
        }
        Ok(())
    }
}

impl Scaler for StandardScaler {
    fn transform(&self, row: &FeatureRow) -> Result<Vec<f64>, PipelineError> {
        check_columns("StandardScaler", &self.feature_names_in, row)?;

        Ok(row
            .values
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| (x - mean) / non_zero(*scale))
            .collect())
    }
}

/// Min-max rescaling into `feature_range`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MinMaxScaler {
    pub feature_names_in: Vec<String>,
    pub data_min: Vec<f64>,
    pub data_max: Vec<f64>,
    #[serde(default = "default_feature_range")]
    pub feature_range: (f64, f64),
}

fn default_feature_range() -> (f64, f64) {
    (0.0, 1.0)
}

impl MinMaxScaler {
    fn validate(&self) -> Result<(), String> {
        let n = self.feature_names_in.len();
        if n == 0 {
            return Err("scaler has no features".to_string());
        }
        if self.data_min.len() != n || self.data_max.len() != n {
            return Err(format!(
                "expected {} minimums and maximums, found {} and {}",
                n,
                self.data_min.len(),
                self.data_max.len()
            ));
        }
        let (lo, hi) = self.feature_range;
        if lo >= hi {
            return Err(format!("invalid feature_range ({}, {})", lo, hi));
        }
        Ok(())
    }
}

impl Scaler for MinMaxScaler {
    fn transform(&self, row: &FeatureRow) -> Result<Vec<f64>, PipelineError> {
        check_columns("MinMaxScaler", &self.feature_names_in, row)?;

        let (lo, hi) = self.feature_range;
        Ok(row
            .values
            .iter()
            .zip(self.data_min.iter().zip(&self.data_max))
            .map(|(x, (min, max))| (x - min) / non_zero(max - min) * (hi - lo) + lo)
            .collect())
    }
}

/// Constant features were fit with a zero range; they pass through unscaled.
fn non_zero(divisor: f64) -> f64 {
    if divisor == 0.0 {
        1.0
    } else {
        divisor
    }
}

fn check_columns(
    scaler: &str,
    expected: &[String],
    row: &FeatureRow,
) -> Result<(), PipelineError> {
    if row.columns.len() != row.values.len() {
        return Err(PipelineError::ScalingError(format!(
            "row has {} column labels but {} values",
            row.columns.len(),
            row.values.len()
        )));
    }
    if row.values.len() != expected.len() {
        return Err(PipelineError::ScalingError(format!(
            "X has {} features, but {} is expecting {} features as input",
            row.values.len(),
            scaler,
            expected.len()
        )));
    }
    if let Some((got, want)) = row
        .columns
        .iter()
        .zip(expected)
        .find(|(got, want)| got != want)
    {
        return Err(PipelineError::ScalingError(format!(
            "feature names must match those seen at fit time: got '{}' where '{}' was expected",
            got, want
        )));
    }
    Ok(())
}
