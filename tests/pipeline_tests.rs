/// End-to-end tests of the submission pipeline against the bundled sample
/// artifacts in `artifacts/`.
use loan_approval::artifacts::{load_scaler, ArtifactStore, Classifier, Scaler};
use loan_approval::classifiers::LogisticRegression;
use loan_approval::errors::PipelineError;
use loan_approval::models::{
    Decision, FeatureRow, Field, Outcome, RawApplication, MODEL_UNAVAILABLE_MESSAGE,
};
use loan_approval::orchestrator::process_application;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

fn sample_store() -> ArtifactStore {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("artifacts");
    let store = ArtifactStore::load(&dir.join("model.json"), &dir.join("scaler.json"));
    assert!(store.is_ready(), "sample artifacts should load");
    store
}

/// The reference application from the dashboard's happy path.
fn scenario_a() -> HashMap<String, String> {
    [
        ("no_of_dependents", "2"),
        ("education", "Graduate"),
        ("self_employed", "No"),
        ("income_annum", "500000"),
        ("loan_amount", "2000000"),
        ("loan_term", "10"),
        ("cibil_score", "750"),
        ("residential_assets_value", "100000"),
        ("commercial_assets_value", "0"),
        ("luxury_assets_value", "50000"),
        ("bank_asset_value", "20000"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn echoed_matches(echo: &RawApplication, fields: &HashMap<String, String>) {
    for (field, value) in echo.iter() {
        let expected = fields.get(field.as_str()).map(String::as_str).unwrap_or("");
        assert_eq!(value, expected, "echo of {}", field);
    }
}

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn scenario_a_strong_application_is_approved() {
        let store = sample_store();
        let fields = scenario_a();

        let outcome = process_application(&store, &fields);

        assert_eq!(outcome.decision(), Some(Decision::Approved));
        assert_eq!(outcome.message(), "Approved");
        echoed_matches(outcome.input_data.as_ref().unwrap(), &fields);
    }

    #[test]
    fn low_credit_score_is_rejected() {
        let store = sample_store();
        let mut fields = scenario_a();
        fields.insert("cibil_score".to_string(), "300".to_string());

        let outcome = process_application(&store, &fields);

        assert_eq!(outcome.decision(), Some(Decision::Rejected));
    }

    #[test]
    fn scenario_b_blank_field_fails_at_scaling() {
        let store = sample_store();
        let mut fields = scenario_a();
        fields.insert("cibil_score".to_string(), String::new());

        let outcome = process_application(&store, &fields);

        assert!(
            matches!(outcome.outcome, Outcome::Failed(PipelineError::ScalingError(_))),
            "got {:?}",
            outcome.outcome
        );
        assert!(outcome.message().starts_with("Error processing input: "));
        let echo = outcome.input_data.unwrap();
        assert_eq!(echo.get(Field::CibilScore), "");
        assert_eq!(echo.get(Field::LoanTerm), "10");
    }

    #[test]
    fn scenario_c_malformed_loan_term() {
        let store = sample_store();
        let mut fields = scenario_a();
        fields.insert("loan_term".to_string(), "ten".to_string());

        let outcome = process_application(&store, &fields);

        match &outcome.outcome {
            Outcome::Failed(PipelineError::MalformedField { field, value }) => {
                assert_eq!(*field, Field::LoanTerm);
                assert_eq!(value, "ten");
            }
            other => panic!("expected MalformedField, got {:?}", other),
        }
        assert!(outcome.message().contains("loan_term"));
        assert_eq!(outcome.input_data.unwrap().get(Field::LoanTerm), "ten");
    }

    #[test]
    fn missing_keys_are_echoed_blank() {
        let store = sample_store();
        let mut fields = scenario_a();
        fields.remove("bank_asset_value");

        let outcome = process_application(&store, &fields);

        let echo = outcome.input_data.as_ref().unwrap();
        assert_eq!(echo.get(Field::BankAssetValue), "");
        echoed_matches(echo, &fields);
        assert!(matches!(
            outcome.outcome,
            Outcome::Failed(PipelineError::ScalingError(_))
        ));
    }

    #[test]
    fn all_blank_application_fails_at_scaling() {
        let store = sample_store();
        let outcome = process_application(&store, &HashMap::new());

        assert!(matches!(
            outcome.outcome,
            Outcome::Failed(PipelineError::ScalingError(_))
        ));
        assert_eq!(outcome.input_data, Some(RawApplication::default()));
    }

    #[test]
    fn model_width_mismatch_is_prediction_error() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("artifacts");
        let scaler = load_scaler(&dir.join("scaler.json")).unwrap().artifact;
        let narrow: Arc<dyn Classifier> = Arc::new(LogisticRegression {
            coef: vec![0.1, 0.2, 0.3],
            intercept: 0.0,
            classes: vec![0, 1],
        });
        let store = ArtifactStore::from_parts(Some(narrow), Some(scaler));
        let fields = scenario_a();

        let outcome = process_application(&store, &fields);

        match &outcome.outcome {
            Outcome::Failed(PipelineError::PredictionError(msg)) => {
                assert!(msg.contains("expecting 3 features"), "{}", msg)
            }
            other => panic!("expected PredictionError, got {:?}", other),
        }
        assert!(outcome
            .message()
            .starts_with("Error processing input: prediction failed: "));
        echoed_matches(outcome.input_data.as_ref().unwrap(), &fields);
    }
}

#[cfg(test)]
mod degraded_mode_tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Fails the test if the pipeline ever reaches inference.
    struct Tripwire(Arc<AtomicBool>);

    impl Scaler for Tripwire {
        fn transform(&self, row: &FeatureRow) -> Result<Vec<f64>, PipelineError> {
            self.0.store(true, Ordering::SeqCst);
            Ok(row.values.clone())
        }
    }

    impl Classifier for Tripwire {
        fn predict(&self, _row: &[f64]) -> Result<i64, PipelineError> {
            self.0.store(true, Ordering::SeqCst);
            Ok(1)
        }
    }

    #[test]
    fn missing_model_short_circuits_every_request() {
        let touched = Arc::new(AtomicBool::new(false));
        let store = ArtifactStore::from_parts(None, Some(Arc::new(Tripwire(touched.clone()))));

        let mut malformed = scenario_a();
        malformed.insert("loan_term".to_string(), "ten".to_string());

        for fields in [scenario_a(), malformed, HashMap::new()] {
            let outcome = process_application(&store, &fields);
            assert_eq!(outcome.outcome, Outcome::Unavailable);
            assert_eq!(outcome.message(), MODEL_UNAVAILABLE_MESSAGE);
            assert!(outcome.input_data.is_none());
        }
        assert!(!touched.load(Ordering::SeqCst));
    }

    #[test]
    fn missing_files_put_store_in_degraded_mode() {
        let store = ArtifactStore::load(
            Path::new("does/not/exist/model.json"),
            Path::new("does/not/exist/scaler.json"),
        );
        let outcome = process_application(&store, &scenario_a());
        assert_eq!(outcome.message(), MODEL_UNAVAILABLE_MESSAGE);
    }
}
