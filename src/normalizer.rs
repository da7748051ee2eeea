//! Conversion of raw form strings into the numeric feature vector.
//!
//! Blank fields are dropped rather than defaulted; whether the artifacts can
//! cope with the missing column is left to the inference stage.

use crate::errors::PipelineError;
use crate::models::{FeatureVector, Field, RawApplication};

/// Dataset labels accepted for the categorical fields, with their codes.
const CATEGORY_CODES: &[(Field, &str, i64)] = &[
    (Field::Education, "Graduate", 1),
    (Field::Education, "Not Graduate", 0),
    (Field::SelfEmployed, "Yes", 1),
    (Field::SelfEmployed, "No", 0),
];

/// Builds the feature vector for `application`.
///
/// Fails fast on the first non-empty value that is neither a base-10 integer
/// nor a known category label. Surrounding whitespace is ignored and digits
/// may be grouped with single underscores (`1_000`). An all-blank application
/// yields an empty vector.
pub fn normalize(application: &RawApplication) -> Result<FeatureVector, PipelineError> {
    let mut features = FeatureVector::default();

    for (field, raw) in application.iter() {
        if raw.is_empty() {
            continue;
        }
        features.push(field, parse_field(field, raw)?);
    }

    tracing::debug!(
        supplied = features.len(),
        "Normalized application into feature vector"
    );

    Ok(features)
}

fn parse_field(field: Field, raw: &str) -> Result<i64, PipelineError> {
    let text = raw.trim();
    parse_integer(text)
        .or_else(|| category_code(field, text))
        .ok_or_else(|| PipelineError::MalformedField {
            field,
            value: raw.to_string(),
        })
}

fn parse_integer(text: &str) -> Option<i64> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if !digits.contains('_') {
        return text.parse().ok();
    }
    // Underscores only between digits, never doubled.
    if digits.starts_with('_') || digits.ends_with('_') || digits.contains("__") {
        return None;
    }
    text.replace('_', "").parse().ok()
}

fn category_code(field: Field, raw: &str) -> Option<i64> {
    CATEGORY_CODES
        .iter()
        .find(|(f, label, _)| *f == field && label.eq_ignore_ascii_case(raw))
        .map(|(_, _, code)| *code)
}
