//! Error types for modai operations.

/// The main error type for AI module operations.
///
/// Every variant is terminal: nothing in modai retries or swallows an error,
/// the caller gets it exactly once with a message fit for the host output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AiError {
    /// The model name does not belong to any supported family
    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    /// Invalid request errors (empty text, etc.)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Non-2xx answer from the upstream API
    #[error("{provider} API returned HTTP error: {status} - {reason}")]
    UpstreamHttp {
        provider: String,
        status: u16,
        reason: String,
    },

    /// DNS, TLS, connection or timeout failures
    #[error("{provider} API URL error: {cause}")]
    Transport { provider: String, cause: String },

    /// The upstream answered 2xx but the payload is not what we expect
    #[error("{provider} API {detail}")]
    MalformedResponse { provider: String, detail: String },

    /// Anything not otherwise classified
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl AiError {
    /// Create an unsupported model error
    pub fn unsupported_model(model: impl Into<String>) -> Self {
        Self::UnsupportedModel(model.into())
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an upstream HTTP error
    pub fn upstream_http(
        provider: impl Into<String>,
        status: u16,
        reason: impl Into<String>,
    ) -> Self {
        Self::UpstreamHttp {
            provider: provider.into(),
            status,
            reason: reason.into(),
        }
    }

    /// Create a transport error
    pub fn transport(provider: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::Transport {
            provider: provider.into(),
            cause: cause.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed_response(provider: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::MalformedResponse {
            provider: provider.into(),
            detail: detail.into(),
        }
    }

    /// The response carried an empty or missing `candidates` array
    pub fn no_candidates(provider: impl Into<String>) -> Self {
        Self::malformed_response(provider, "response does not contain candidates.")
    }

    /// Create a catch-all error
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::Unexpected(msg.into())
    }

    /// Short machine-readable name of the error kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            AiError::UnsupportedModel(_) => "unsupported_model",
            AiError::InvalidRequest(_) => "invalid_request",
            AiError::Configuration(_) => "configuration",
            AiError::UpstreamHttp { .. } => "upstream_http",
            AiError::Transport { .. } => "transport",
            AiError::MalformedResponse { .. } => "malformed_response",
            AiError::Unexpected(_) => "unexpected",
        }
    }

    /// Whether the error was raised before any network call could happen
    pub fn is_pre_network(&self) -> bool {
        matches!(
            self,
            AiError::UnsupportedModel(_) | AiError::InvalidRequest(_) | AiError::Configuration(_)
        )
    }
}

impl From<serde_json::Error> for AiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Unexpected(e.to_string())
    }
}

impl From<String> for AiError {
    fn from(s: String) -> Self {
        Self::Unexpected(s)
    }
}

impl From<&str> for AiError {
    fn from(s: &str) -> Self {
        Self::Unexpected(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            AiError::unsupported_model("gpt-4").to_string(),
            "Unsupported model: gpt-4"
        );
        assert_eq!(
            AiError::upstream_http("Gemini", 403, "Forbidden").to_string(),
            "Gemini API returned HTTP error: 403 - Forbidden"
        );
        assert_eq!(
            AiError::transport("Gemini", "connection refused").to_string(),
            "Gemini API URL error: connection refused"
        );
        assert_eq!(
            AiError::no_candidates("Gemini").to_string(),
            "Gemini API response does not contain candidates."
        );
        assert_eq!(
            AiError::unexpected("boom").to_string(),
            "An unexpected error occurred: boom"
        );
    }

    #[test]
    fn test_pre_network() {
        assert!(AiError::unsupported_model("gpt-4").is_pre_network());
        assert!(AiError::invalid_request("empty").is_pre_network());
        assert!(!AiError::upstream_http("Gemini", 500, "Internal Server Error")
            .is_pre_network());
        assert_eq!(AiError::no_candidates("Gemini").kind(), "malformed_response");
    }
}
