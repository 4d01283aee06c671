//! Classifier trait shared by every classification strategy

use async_trait::async_trait;

use crate::schema::{ClassificationRequest, ClassificationResult};

/// A column classification strategy.
///
/// Implementations resolve every failure internally; callers always get a
/// fully populated result.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, request: &ClassificationRequest) -> ClassificationResult;

    /// Short strategy name used in logs.
    fn name(&self) -> &str;
}
