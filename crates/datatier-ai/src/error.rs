//! Typed errors for remote classification.

use thiserror::Error;

/// Errors raised while talking to the chat-completion service.
///
/// None of these reach the engine's callers; the remote classifier maps each
/// variant to a fallback result.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Connection failure, timeout, or an unreadable response body.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },

    /// The envelope or the model content did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The request could not be prepared locally.
    #[error("{0}")]
    Internal(String),
}

impl RemoteError {
    /// Whether this failure is recovered with the heuristic classifier.
    pub fn falls_back_to_heuristic(&self) -> bool {
        !matches!(self, RemoteError::Internal(_))
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            RemoteError::Internal(e.to_string())
        } else if e.is_decode() {
            RemoteError::MalformedResponse(e.to_string())
        } else {
            RemoteError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(e: serde_json::Error) -> Self {
        RemoteError::MalformedResponse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_classes() {
        assert!(RemoteError::Transport("timed out".into()).falls_back_to_heuristic());
        assert!(RemoteError::Status {
            status: 500,
            body: "boom".into()
        }
        .falls_back_to_heuristic());
        assert!(RemoteError::MalformedResponse("eof".into()).falls_back_to_heuristic());
        assert!(!RemoteError::Internal("bad header".into()).falls_back_to_heuristic());
    }

    #[test]
    fn test_status_display() {
        let err = RemoteError::Status {
            status: 429,
            body: "rate limited".into(),
        };
        assert_eq!(err.to_string(), "API error (429): rate limited");
    }

    #[test]
    fn test_from_serde_error_is_malformed() {
        let err: RemoteError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, RemoteError::MalformedResponse(_)));
    }
}
