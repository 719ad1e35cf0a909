//! # modai providers
//!
//! Provider implementations for upstream AI services.

pub mod gemini;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-exports
pub use gemini::{GeminiBuilder, GeminiProvider, GEMINI_API_BASE};

use modai_core::error::AiError;
use modai_core::provider::Provider;
use modai_core::types::{ApiKey, ModelFamily};
use std::time::Duration;

/// Transport options shared by every provider
#[derive(Debug, Clone, Default)]
pub struct ProviderOptions {
    /// Override of the provider's public base URL
    pub api_base: Option<String>,
    /// Whole-request timeout; `None` keeps the HTTP client default
    pub timeout: Option<Duration>,
}

impl ProviderOptions {
    /// Set API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Create the provider serving `family`
///
/// # Example
///
/// ```ignore
/// use modai_provider::{provider_for, ProviderOptions};
///
/// let family = ModelFamily::detect("gemini-2.5-flash")?;
/// let provider = provider_for(family, ApiKey::new("your-api-key"), &ProviderOptions::default())?;
/// ```
pub fn provider_for(
    family: ModelFamily,
    api_key: ApiKey,
    options: &ProviderOptions,
) -> Result<Box<dyn Provider>, AiError> {
    match family {
        ModelFamily::Gemini => {
            let provider = GeminiProvider::builder()
                .api_key(api_key)
                .options(options)
                .build()?;
            Ok(Box::new(provider))
        }
    }
}
