use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

use crate::errors::PipelineError;

// ============ Application Fields ============

/// Number of fields on a loan application.
pub const FIELD_COUNT: usize = 11;

/// A loan application field.
///
/// Variants are declared in the column order the scaler and classifier were
/// fit on; [`Field::ALL`] is the canonical iteration order of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    NoOfDependents,
    Education,
    SelfEmployed,
    IncomeAnnum,
    LoanAmount,
    LoanTerm,
    CibilScore,
    ResidentialAssetsValue,
    CommercialAssetsValue,
    LuxuryAssetsValue,
    BankAssetValue,
}

impl Field {
    /// All fields in canonical column order.
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::NoOfDependents,
        Field::Education,
        Field::SelfEmployed,
        Field::IncomeAnnum,
        Field::LoanAmount,
        Field::LoanTerm,
        Field::CibilScore,
        Field::ResidentialAssetsValue,
        Field::CommercialAssetsValue,
        Field::LuxuryAssetsValue,
        Field::BankAssetValue,
    ];

    /// Form key / column label of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::NoOfDependents => "no_of_dependents",
            Field::Education => "education",
            Field::SelfEmployed => "self_employed",
            Field::IncomeAnnum => "income_annum",
            Field::LoanAmount => "loan_amount",
            Field::LoanTerm => "loan_term",
            Field::CibilScore => "cibil_score",
            Field::ResidentialAssetsValue => "residential_assets_value",
            Field::CommercialAssetsValue => "commercial_assets_value",
            Field::LuxuryAssetsValue => "luxury_assets_value",
            Field::BankAssetValue => "bank_asset_value",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============ Raw Application ============

/// The string values of one submitted application, exactly as collected.
///
/// Every field is present; fields the submitter left out or blank hold an
/// empty string. The value is echoed back to the caller unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawApplication {
    values: [String; FIELD_COUNT],
}

impl RawApplication {
    /// Collects the eleven application fields from an incoming field map.
    ///
    /// Missing keys become empty strings and unknown keys are ignored, so this
    /// never fails.
    pub fn collect(fields: &HashMap<String, String>) -> Self {
        let mut application = Self::default();
        for field in Field::ALL {
            if let Some(value) = fields.get(field.as_str()) {
                application.values[field.index()] = value.clone();
            }
        }
        application
    }

    /// Returns a copy with `field` set to `value`.
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.values[field.index()] = value.into();
        self
    }

    /// Raw value of `field` (empty when not supplied).
    pub fn get(&self, field: Field) -> &str {
        &self.values[field.index()]
    }

    /// Iterates `(field, raw value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::ALL.into_iter().map(move |f| (f, self.get(f)))
    }
}

impl Serialize for RawApplication {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FIELD_COUNT))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.as_str(), value)?;
        }
        map.end()
    }
}

// ============ Feature Vector ============

/// The numeric subset of an application that was actually supplied.
///
/// Entries are kept in canonical field order; that order becomes the column
/// order handed to the scaler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureVector {
    entries: Vec<(Field, i64)>,
}

impl FeatureVector {
    /// Appends a feature. Callers push in canonical order.
    pub(crate) fn push(&mut self, field: Field, value: i64) {
        self.entries.push((field, value));
    }

    /// Value of `field`, if it was supplied.
    pub fn get(&self, field: Field) -> Option<i64> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| *v)
    }

    /// Supplied fields in column order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.entries.iter().map(|(f, _)| *f)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds the single labelled row fed to the scaler.
    pub fn to_row(&self) -> FeatureRow {
        FeatureRow {
            columns: self.entries.iter().map(|(f, _)| f.as_str().to_string()).collect(),
            values: self.entries.iter().map(|(_, v)| *v as f64).collect(),
        }
    }
}

/// One row of named numeric columns, the scaler's input.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub columns: Vec<String>,
    pub values: Vec<f64>,
}

// ============ Decision ============

/// Decoded outcome of a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Approved,
    Rejected,
    /// The classifier produced a label outside `{0, 1}`.
    Unknown,
}

impl Decision {
    /// Display label shown to the applicant.
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Approved => "Approved",
            Decision::Rejected => "Rejected",
            Decision::Unknown => "Unknown Status",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Decision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// ============ Prediction Outcome ============

/// Message returned for every request while an artifact is missing.
pub const MODEL_UNAVAILABLE_MESSAGE: &str = "Error: ML Model or Scaler not loaded.";

/// What happened to one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The pipeline ran to completion.
    Decided(Decision),
    /// The model or scaler was never loaded; nothing was processed.
    Unavailable,
    /// Normalization or inference failed for this request.
    Failed(PipelineError),
}

/// Result handed to the presentation layer: a message plus the echoed input.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionOutcome {
    pub outcome: Outcome,
    /// `None` only when the request short-circuited on missing artifacts.
    pub input_data: Option<RawApplication>,
}

impl PredictionOutcome {
    /// The decision label or a user-facing error message.
    pub fn message(&self) -> String {
        match &self.outcome {
            Outcome::Decided(decision) => decision.label().to_string(),
            Outcome::Unavailable => MODEL_UNAVAILABLE_MESSAGE.to_string(),
            Outcome::Failed(err) => format!("Error processing input: {}", err),
        }
    }

    /// The decision, when the pipeline produced one.
    pub fn decision(&self) -> Option<Decision> {
        match self.outcome {
            Outcome::Decided(decision) => Some(decision),
            _ => None,
        }
    }
}

// ============ API Models ============

/// JSON body of `POST /api/v1/predict`.
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<Decision>,
    /// Echoed fields; an empty object when nothing was collected.
    pub input_data: serde_json::Value,
    pub timestamp: String,
}

impl From<PredictionOutcome> for PredictionResponse {
    fn from(outcome: PredictionOutcome) -> Self {
        let input_data = outcome
            .input_data
            .as_ref()
            .and_then(|raw| serde_json::to_value(raw).ok())
            .unwrap_or_else(|| serde_json::json!({}));

        Self {
            result: outcome.message(),
            decision: outcome.decision(),
            input_data,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
