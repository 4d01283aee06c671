//! Datatier Core - column sensitivity labels and the heuristic classifier
//!
//! This crate provides:
//! - The four-tier `Label` taxonomy
//! - Classification request/result records and sample extraction
//! - The `Classifier` trait and the deterministic `HeuristicClassifier`

pub mod classifier;
pub mod heuristic;
pub mod label;
pub mod schema;

pub use classifier::Classifier;
pub use heuristic::HeuristicClassifier;
pub use label::{Label, UnknownLabel};
pub use schema::{
    extract_samples, ClassificationRequest, ClassificationResult, Provenance, ValidationError,
    MAX_SAMPLES, UPLOADED_FILE,
};
