//! Core types for AI operations.

use crate::error::AiError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Model used when the caller does not name one
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Replacement printed wherever a secret would appear
pub const SECRET_MASK: &str = "********";

/// API key for an upstream provider.
///
/// The raw value is only reachable through [`ApiKey::expose`]; `Debug` and
/// `Display` print a mask so a key can never leak through `tracing` fields
/// or formatted error messages.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a raw key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Raw key, for building the outbound request header only
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the key is the empty string
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Replace every occurrence of the key inside `message` with the mask
    pub fn redact(&self, message: &str) -> String {
        if self.0.is_empty() {
            return message.to_string();
        }
        message.replace(&self.0, SECRET_MASK)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&SECRET_MASK).finish()
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(SECRET_MASK)
    }
}

impl From<String> for ApiKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Family of models a provider can serve, keyed on the model-name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFamily {
    Gemini,
}

impl ModelFamily {
    /// Every supported family
    pub const ALL: &'static [ModelFamily] = &[ModelFamily::Gemini];

    /// Model-name prefix that selects this family
    pub fn prefix(self) -> &'static str {
        match self {
            ModelFamily::Gemini => "gemini-",
        }
    }

    /// Human-readable provider name
    pub fn name(self) -> &'static str {
        match self {
            ModelFamily::Gemini => "Gemini",
        }
    }

    /// Resolve the family of a model name
    pub fn detect(model: &str) -> Result<Self, AiError> {
        Self::ALL
            .iter()
            .copied()
            .find(|family| model.starts_with(family.prefix()))
            .ok_or_else(|| AiError::unsupported_model(model))
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Text generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRequest {
    pub model: String,
    pub text: String,
}

impl TextRequest {
    /// Create a new text request
    pub fn new(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            text: text.into(),
        }
    }

    /// Check the request can be sent
    pub fn validate(&self) -> Result<(), AiError> {
        if self.text.trim().is_empty() {
            return Err(AiError::invalid_request("text must not be empty"));
        }
        if self.model.is_empty() {
            return Err(AiError::invalid_request("model must not be empty"));
        }
        Ok(())
    }
}

/// Text generation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextResult {
    /// Text of the first candidate
    pub text: String,
    pub model: String,
}

/// Provider information
#[derive(Debug, Clone)]
pub struct ProviderInfo {
    pub id: String,
    pub name: String,
    pub family: ModelFamily,
}

/// Per-call context carried in tracing spans
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub provider_id: String,
    pub model: String,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(provider_id: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            provider_id: provider_id.into(),
            model: model.into(),
        }
    }
}
