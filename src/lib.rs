//! Loan Approval Service Library
//!
//! Turns a submitted loan application into an approval decision using a
//! pre-trained scaler and classifier, and serves the dashboard form and
//! prediction endpoints over HTTP.
//!
//! # Modules
//!
//! - `app`: Router assembly and middleware.
//! - `artifacts`: Scaler/classifier traits and the startup artifact loader.
//! - `classifiers`: Classifier artifacts (logistic regression, trees, forests).
//! - `config`: Configuration management.
//! - `dashboard`: HTML rendering of the loan form.
//! - `decoder`: Classifier label to decision mapping.
//! - `errors`: Pipeline and HTTP error types.
//! - `handlers`: HTTP request handlers.
//! - `inference`: Scaling and prediction over a feature vector.
//! - `models`: Application, feature vector, and outcome types.
//! - `normalizer`: Raw field strings to numeric features.
//! - `orchestrator`: One submission, start to finish.
//! - `scalers`: Scaler artifacts (standard, min-max).

pub mod app;
pub mod artifacts;
pub mod classifiers;
pub mod config;
pub mod dashboard;
pub mod decoder;
pub mod errors;
pub mod handlers;
pub mod inference;
pub mod models;
pub mod normalizer;
pub mod orchestrator;
pub mod scalers;
