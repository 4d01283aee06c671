//! Classification engine: strategy selection and per-column fan-out

use datatier_core::{ClassificationRequest, ClassificationResult, Classifier, HeuristicClassifier};
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::RemoteConfig;
use crate::remote::RemoteClassifier;

/// Strategy chosen once, when the engine is built.
enum Strategy {
    Heuristic(HeuristicClassifier),
    Remote(RemoteClassifier),
}

/// Turns (column, samples) requests into classification results.
///
/// Holds no state between calls. Columns are classified concurrently, up to
/// `max_concurrency` at a time, and results come back in request order.
pub struct ClassificationEngine {
    strategy: Strategy,
    max_concurrency: usize,
}

impl ClassificationEngine {
    pub fn new(config: RemoteConfig) -> Self {
        let strategy = if config.remote_active() {
            Strategy::Remote(RemoteClassifier::new(&config))
        } else {
            Strategy::Heuristic(HeuristicClassifier::new())
        };
        let engine = Self {
            strategy,
            max_concurrency: config.max_concurrency.max(1),
        };

        info!(
            "ClassificationEngine initialized with {} strategy (max concurrency {})",
            engine.strategy_name(),
            engine.max_concurrency
        );
        engine
    }

    /// Engine that never calls a remote service.
    pub fn heuristic_only() -> Self {
        Self::new(RemoteConfig::disabled())
    }

    pub fn strategy_name(&self) -> &str {
        self.classifier().name()
    }

    fn classifier(&self) -> &dyn Classifier {
        match &self.strategy {
            Strategy::Heuristic(c) => c as &dyn Classifier,
            Strategy::Remote(c) => c,
        }
    }

    pub async fn classify(&self, request: &ClassificationRequest) -> ClassificationResult {
        self.classifier().classify(request).await
    }

    pub async fn classify_with_cancel(
        &self,
        request: &ClassificationRequest,
        cancel: &CancellationToken,
    ) -> ClassificationResult {
        match &self.strategy {
            Strategy::Heuristic(c) => c.classify_sync(request),
            Strategy::Remote(c) => c.classify_with_cancel(request, cancel).await,
        }
    }

    /// Classify every column; output order matches input order.
    pub async fn classify_all(
        &self,
        requests: &[ClassificationRequest],
    ) -> Vec<ClassificationResult> {
        let pending: Vec<_> = requests.iter().map(|req| self.classify(req)).collect();
        stream::iter(pending)
            .buffered(self.max_concurrency)
            .collect()
            .await
    }

    /// Classify every column, abandoning outstanding remote calls once
    /// `cancel` fires. Every column still gets a result.
    pub async fn classify_all_with_cancel(
        &self,
        requests: &[ClassificationRequest],
        cancel: &CancellationToken,
    ) -> Vec<ClassificationResult> {
        let pending: Vec<_> = requests
            .iter()
            .map(|req| self.classify_with_cancel(req, cancel))
            .collect();
        stream::iter(pending)
            .buffered(self.max_concurrency)
            .collect()
            .await
    }
}
