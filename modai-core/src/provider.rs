//! Provider trait and core abstractions.

use crate::error::AiError;
use crate::types::*;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

/// Core provider trait for AI services.
///
/// A provider turns one [`TextRequest`] into exactly one upstream call and
/// hands back the first generated text. Model-family checks and request
/// validation live in the runtime, not here.
#[async_trait]
pub trait Provider: Send + Sync + Debug + 'static {
    /// Get provider information
    fn info(&self) -> Arc<ProviderInfo>;

    /// Generate text for a single prompt
    async fn generate_text(&self, req: TextRequest) -> Result<TextResult, AiError>;
}

#[async_trait]
impl<P: Provider + ?Sized> Provider for Box<P> {
    fn info(&self) -> Arc<ProviderInfo> {
        (**self).info()
    }

    async fn generate_text(&self, req: TextRequest) -> Result<TextResult, AiError> {
        (**self).generate_text(req).await
    }
}
