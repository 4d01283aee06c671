//! Remote classification configuration from environment variables.

use anyhow::{Context, Result};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Shape the model is instructed to answer in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// `{"column": .., "classification": .., "justification": ..}`
    Json,
    /// `Label: reason` on a single line.
    Delimited,
}

impl FromStr for ResponseFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ResponseFormat::Json),
            "delimited" => Ok(ResponseFormat::Delimited),
            other => anyhow::bail!("unknown response format '{}'", other),
        }
    }
}

/// What to do when the model answers with a label outside the taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidLabelPolicy {
    /// Report `Public` and keep the model's text as the justification.
    CoercePublic,
    /// Use the heuristic classifier, like every other remote failure.
    Heuristic,
}

impl FromStr for InvalidLabelPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coerce-public" => Ok(InvalidLabelPolicy::CoercePublic),
            "heuristic" => Ok(InvalidLabelPolicy::Heuristic),
            other => anyhow::bail!("unknown invalid-label policy '{}'", other),
        }
    }
}

#[derive(Clone)]
pub struct RemoteConfig {
    /// Capability switch; the remote strategy also needs an API key.
    pub enabled: bool,
    pub api_key: Option<String>,
    /// Base of the OpenAI-compatible API, e.g. `https://openrouter.ai/api/v1`.
    pub base_url: Url,
    pub model: String,
    pub temperature: f32,
    /// Upper bound for one classification call, connect to last byte.
    pub timeout: Duration,
    pub response_format: ResponseFormat,
    pub invalid_label_policy: InvalidLabelPolicy,
    /// Columns classified concurrently within one batch.
    pub max_concurrency: usize,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.2,
            timeout: Duration::from_secs(30),
            response_format: ResponseFormat::Json,
            invalid_label_policy: InvalidLabelPolicy::CoercePublic,
            max_concurrency: 8,
        }
    }
}

// Debug output never includes the API key.
impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("enabled", &self.enabled)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url.as_str())
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .field("response_format", &self.response_format)
            .field("invalid_label_policy", &self.invalid_label_policy)
            .field("max_concurrency", &self.max_concurrency)
            .finish()
    }
}

impl RemoteConfig {
    /// Heuristic-only configuration.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            enabled: std::env::var("DATATIER_REMOTE_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .context("Invalid DATATIER_REMOTE_ENABLED")?,
            api_key: std::env::var("OPENROUTER_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            base_url: Url::parse(
                &std::env::var("DATATIER_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            )
            .context("Invalid DATATIER_BASE_URL")?,
            model: std::env::var("DATATIER_MODEL").unwrap_or(defaults.model),
            temperature: std::env::var("DATATIER_TEMPERATURE")
                .unwrap_or_else(|_| "0.2".to_string())
                .parse()
                .context("Invalid DATATIER_TEMPERATURE")?,
            timeout: Duration::from_secs(
                std::env::var("DATATIER_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .context("Invalid DATATIER_TIMEOUT_SECS")?,
            ),
            response_format: std::env::var("DATATIER_RESPONSE_FORMAT")
                .unwrap_or_else(|_| "json".to_string())
                .parse()
                .context("Invalid DATATIER_RESPONSE_FORMAT")?,
            invalid_label_policy: std::env::var("DATATIER_INVALID_LABEL_POLICY")
                .unwrap_or_else(|_| "coerce-public".to_string())
                .parse()
                .context("Invalid DATATIER_INVALID_LABEL_POLICY")?,
            max_concurrency: std::env::var("DATATIER_MAX_CONCURRENCY")
                .unwrap_or_else(|_| "8".to_string())
                .parse()
                .context("Invalid DATATIER_MAX_CONCURRENCY")?,
        })
    }

    /// Whether the remote strategy should be used at all.
    pub fn remote_active(&self) -> bool {
        self.enabled && self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Full URL of the chat-completions endpoint.
    pub fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.base_url.as_str().trim_end_matches('/')
        )
    }
}
