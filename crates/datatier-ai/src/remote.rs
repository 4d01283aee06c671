//! LLM-backed classifier with heuristic fallback

use async_trait::async_trait;
use datatier_core::{
    ClassificationRequest, ClassificationResult, Classifier, HeuristicClassifier, Label,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::client::LlmClient;
use crate::config::{InvalidLabelPolicy, RemoteConfig, ResponseFormat};
use crate::error::RemoteError;
use crate::prompt::{
    build_user_prompt, parse_delimited_response, parse_json_response, system_prompt,
};

enum Backend {
    /// No credential or remote classification switched off.
    Disabled,
    Ready(LlmClient),
    /// Configured, but the client could not be built.
    Unavailable(String),
}

/// Classifies columns through a chat-completion service.
///
/// Missing credentials, transport errors and malformed replies all resolve to
/// the heuristic result for the same column. A reply with a label outside the
/// taxonomy is handled per `InvalidLabelPolicy`. Local failures preparing the
/// request produce `Public` with an `AI error: ...` justification.
pub struct RemoteClassifier {
    backend: Backend,
    heuristic: HeuristicClassifier,
    response_format: ResponseFormat,
    invalid_label_policy: InvalidLabelPolicy,
    system_prompt: String,
}

impl RemoteClassifier {
    pub fn new(config: &RemoteConfig) -> Self {
        let backend = if !config.remote_active() {
            Backend::Disabled
        } else {
            match LlmClient::new(config) {
                Ok(client) => Backend::Ready(client),
                Err(e) => {
                    warn!("Remote classifier unavailable: {}", e);
                    Backend::Unavailable(e.to_string())
                }
            }
        };

        Self {
            backend,
            heuristic: HeuristicClassifier::new(),
            response_format: config.response_format,
            invalid_label_policy: config.invalid_label_policy,
            system_prompt: system_prompt(config.response_format),
        }
    }

    /// Like `classify`, but gives up on the remote call once `cancel` fires
    /// and returns the heuristic result instead.
    pub async fn classify_with_cancel(
        &self,
        request: &ClassificationRequest,
        cancel: &CancellationToken,
    ) -> ClassificationResult {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Classification of '{}' cancelled", request.column_name());
                self.heuristic.classify_sync(request)
            }
            result = self.classify_remote(request) => result,
        }
    }

    async fn classify_remote(&self, request: &ClassificationRequest) -> ClassificationResult {
        let client = match &self.backend {
            Backend::Disabled => return self.heuristic.classify_sync(request),
            Backend::Unavailable(detail) => {
                return ClassificationResult::for_request(
                    request,
                    Label::Public,
                    format!("AI error: {}", detail),
                )
            }
            Backend::Ready(client) => client,
        };

        match self.request_label(client, request).await {
            Ok(result) => result,
            Err(e) if e.falls_back_to_heuristic() => {
                warn!(
                    "Remote classification of '{}' failed, using heuristic: {}",
                    request.column_name(),
                    e
                );
                self.heuristic.classify_sync(request)
            }
            Err(e) => {
                warn!(
                    "Remote classification of '{}' failed: {}",
                    request.column_name(),
                    e
                );
                ClassificationResult::for_request(request, Label::Public, format!("AI error: {}", e))
            }
        }
    }

    async fn request_label(
        &self,
        client: &LlmClient,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResult, RemoteError> {
        let content = client
            .complete(&self.system_prompt, &build_user_prompt(request))
            .await?;

        let reply = match self.response_format {
            ResponseFormat::Json => parse_json_response(&content)?,
            ResponseFormat::Delimited => parse_delimited_response(&content),
        };

        if let Some(label) = Label::parse_canonical(&reply.label_text) {
            return Ok(ClassificationResult::for_request(
                request,
                label,
                reply.justification,
            ));
        }

        warn!(
            "Model returned unrecognized label '{}' for column '{}'",
            reply.label_text,
            request.column_name()
        );
        Ok(match self.invalid_label_policy {
            InvalidLabelPolicy::CoercePublic => {
                ClassificationResult::for_request(request, Label::Public, content.trim())
            }
            InvalidLabelPolicy::Heuristic => self.heuristic.classify_sync(request),
        })
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn classify(&self, request: &ClassificationRequest) -> ClassificationResult {
        self.classify_remote(request).await
    }

    fn name(&self) -> &str {
        "remote"
    }
}
