//! Chat-completion API client (OpenAI-compatible, e.g. OpenRouter)

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::config::RemoteConfig;
use crate::error::RemoteError;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageContent,
}

#[derive(Deserialize)]
struct ChatMessageContent {
    #[serde(default)]
    content: Option<String>,
}

/// LLM client for column classification
pub struct LlmClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

// Debug output never includes the API key.
impl fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmClient")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl LlmClient {
    /// Build a client from configuration. Fails if no API key is configured
    /// or the HTTP client cannot be constructed.
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| RemoteError::Internal("No API key configured".to_string()))?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RemoteError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.completions_url(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    /// Send a system + user message pair and return the model's text.
    pub async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, RemoteError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: self.temperature,
        };

        debug!("Calling chat-completion API at {} with model: {}", self.url, self.model);

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status { status, body });
        }

        let body = response.text().await?;
        let response: ChatResponse = serde_json::from_str(&body)?;
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| RemoteError::MalformedResponse("No content in response".to_string()))?;

        info!("Received classification response from {}", self.model);
        Ok(content)
    }
}
