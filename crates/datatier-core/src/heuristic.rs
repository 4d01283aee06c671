//! Deterministic pattern-based column classifier

use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::classifier::Classifier;
use crate::label::Label;
use crate::schema::{ClassificationRequest, ClassificationResult};

pub const NO_MATCH_JUSTIFICATION: &str = "No sensitive patterns detected";

/// Rules in descending sensitivity; the first match wins.
const RULES: [(Label, &str); 3] = [
    (Label::TopSecret, r"(passport|national id|nid|ssn|iqama)"),
    (
        Label::Confidential,
        r"(email|e-mail|phone|mobile|address|credit|bank|health)",
    ),
    (Label::Restricted, r"(name|department|title)"),
];

/// Matches sample text against fixed keyword rules.
///
/// Only the sample values are inspected, joined with single spaces and
/// matched case-insensitively. Never fails.
#[derive(Debug, Clone)]
pub struct HeuristicClassifier {
    rules: Vec<(Label, Regex)>,
}

impl HeuristicClassifier {
    pub fn new() -> Self {
        let rules = RULES
            .iter()
            .map(|(label, pattern)| {
                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .expect("heuristic rule patterns are valid");
                (*label, regex)
            })
            .collect();
        Self { rules }
    }

    pub fn classify_sync(&self, request: &ClassificationRequest) -> ClassificationResult {
        let text = request.samples().join(" ");

        for (label, regex) in &self.rules {
            if regex.is_match(&text) {
                debug!(
                    "Column '{}' matched {} rule {}",
                    request.column_name(),
                    label,
                    regex.as_str()
                );
                return ClassificationResult::for_request(
                    request,
                    *label,
                    format!("Matched pattern '{}'", regex.as_str()),
                );
            }
        }

        ClassificationResult::for_request(request, Label::Public, NO_MATCH_JUSTIFICATION)
    }
}

impl Default for HeuristicClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Classifier for HeuristicClassifier {
    async fn classify(&self, request: &ClassificationRequest) -> ClassificationResult {
        self.classify_sync(request)
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}
