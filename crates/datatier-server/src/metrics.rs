//! Prometheus metrics for classification traffic.

use datatier_core::ClassificationResult;
use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;
use std::sync::Arc;

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct TierLabel(pub String);

impl prometheus_client::encoding::EncodeLabelSet for TierLabel {
    fn encode(
        &self,
        mut encoder: prometheus_client::encoding::LabelSetEncoder,
    ) -> Result<(), std::fmt::Error> {
        use prometheus_client::encoding::EncodeLabel;
        ("label", self.0.as_str()).encode(encoder.encode_label())?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct ServerMetrics {
    pub columns_classified: Family<TierLabel, Counter>,
    pub batches: Counter,
    pub rejected_requests: Counter,
    pub registry: Arc<Registry>,
}

impl ServerMetrics {
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let columns_classified = Family::<TierLabel, Counter>::default();
        registry.register(
            "datatier_columns_classified",
            "Columns classified, by assigned label",
            columns_classified.clone(),
        );

        let batches = Counter::default();
        registry.register(
            "datatier_batches",
            "Classification batches served",
            batches.clone(),
        );

        let rejected_requests = Counter::default();
        registry.register(
            "datatier_rejected_requests",
            "Classification requests rejected as invalid",
            rejected_requests.clone(),
        );

        Self {
            columns_classified,
            batches,
            rejected_requests,
            registry: Arc::new(registry),
        }
    }

    pub fn record_batch(&self, results: &[ClassificationResult]) {
        self.batches.inc();
        for result in results {
            self.columns_classified
                .get_or_create(&TierLabel(result.label.to_string()))
                .inc();
        }
    }

    /// Encode all metrics as Prometheus text format.
    pub fn encode(&self) -> String {
        let mut buf = String::new();
        if let Err(e) = encode(&mut buf, &self.registry) {
            tracing::warn!("Failed to encode metrics: {}", e);
        }
        buf
    }
}
