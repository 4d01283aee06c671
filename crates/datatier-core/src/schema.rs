//! Classification request and result records

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::label::Label;

/// Maximum number of sample values considered per column.
pub const MAX_SAMPLES: usize = 5;

/// Source type recorded for columns of an uploaded dataset.
pub const UPLOADED_FILE: &str = "uploaded file";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("column name cannot be empty")]
    EmptyColumnName,
}

/// Where the sampled values came from. Carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub source_name: String,
    pub source_type: String,
}

impl Provenance {
    pub fn new(source_name: impl Into<String>, source_type: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            source_type: source_type.into(),
        }
    }

    /// Provenance of a column read from an uploaded file.
    pub fn uploaded(column_name: &str) -> Self {
        Self::new(column_name, UPLOADED_FILE)
    }
}

/// A column name plus up to `MAX_SAMPLES` of its values, in row order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRequest {
    column_name: String,
    samples: Vec<String>,
    provenance: Provenance,
}

impl ClassificationRequest {
    /// Build a request for an uploaded column. Blank samples are skipped and
    /// only the first `MAX_SAMPLES` of the rest are kept.
    pub fn new(
        column_name: impl Into<String>,
        samples: Vec<String>,
    ) -> Result<Self, ValidationError> {
        let column_name = column_name.into();
        if column_name.trim().is_empty() {
            return Err(ValidationError::EmptyColumnName);
        }
        let samples = extract_samples(samples.into_iter().map(Some));
        let provenance = Provenance::uploaded(&column_name);
        Ok(Self {
            column_name,
            samples,
            provenance,
        })
    }

    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }
}

/// Keep the first `MAX_SAMPLES` non-missing values of a column, in order.
///
/// `None` cells and cells that are empty after trimming count as missing.
pub fn extract_samples<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = Option<S>>,
    S: ToString,
{
    values
        .into_iter()
        .flatten()
        .map(|v| v.to_string())
        .filter(|v| !v.trim().is_empty())
        .take(MAX_SAMPLES)
        .collect()
}

/// The label assigned to one column, with its justification and provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub column_name: String,
    pub label: Label,
    pub justification: String,
    pub source_name: String,
    pub source_type: String,
}

impl ClassificationResult {
    pub fn for_request(
        request: &ClassificationRequest,
        label: Label,
        justification: impl Into<String>,
    ) -> Self {
        Self {
            column_name: request.column_name.clone(),
            label,
            justification: justification.into(),
            source_name: request.provenance.source_name.clone(),
            source_type: request.provenance.source_type.clone(),
        }
    }
}
