//! Layer trait and abstractions.
//!
//! Layers wrap a provider with cross-cutting concerns such as logging.
//! Each layer takes the inner provider by value and returns a new provider,
//! so a stack of layers is resolved statically while building.

use crate::error::AiError;
use crate::provider::Provider;
use crate::types::*;
use async_trait::async_trait;
use std::sync::Arc;

/// Layer trait for wrapping providers.
pub trait Layer<P: Provider> {
    /// The type of the layered provider
    type LayeredProvider: Provider;

    /// Wrap the inner provider with this layer
    fn layer(&self, inner: P) -> Self::LayeredProvider;
}

/// Helper trait for layered providers.
///
/// Provides forwarding defaults for every provider method; implementers
/// override only the calls they intercept.
#[async_trait]
pub trait LayeredProvider: Sized + Provider {
    /// The inner provider type
    type Inner: Provider;

    /// Get a reference to the inner provider
    fn inner(&self) -> &Self::Inner;

    /// Default implementation for info - forwards to inner
    fn layered_info(&self) -> Arc<ProviderInfo> {
        self.inner().info()
    }

    /// Default implementation for generate_text - forwards to inner
    async fn layered_generate_text(&self, req: TextRequest) -> Result<TextResult, AiError> {
        self.inner().generate_text(req).await
    }
}

/// Macro to implement Provider trait by forwarding to LayeredProvider methods.
#[macro_export]
macro_rules! impl_layered_provider {
    ($type:ty) => {
        #[async_trait::async_trait]
        impl $crate::provider::Provider for $type {
            fn info(&self) -> std::sync::Arc<$crate::types::ProviderInfo> {
                $crate::layer::LayeredProvider::layered_info(self)
            }

            async fn generate_text(
                &self,
                req: $crate::types::TextRequest,
            ) -> Result<$crate::types::TextResult, $crate::error::AiError> {
                $crate::layer::LayeredProvider::layered_generate_text(self, req).await
            }
        }
    };
}
