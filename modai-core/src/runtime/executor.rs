//! RuntimeExecutor implementation.
//!
//! The executor owns the layered provider and is the single entry point for
//! a text-processing call: it checks the model family and the request before
//! anything reaches the provider, then makes exactly one provider call.

use crate::error::AiError;
use crate::layer::Layer;
use crate::provider::Provider;
use crate::types::*;
use std::sync::Arc;
use tracing::Instrument;

/// Type-erased provider that can be shared across threads
type BoxedProvider = Arc<dyn Provider>;

/// Builder for composing a provider with layers.
///
/// # Example
///
/// ```ignore
/// let executor = RuntimeExecutor::builder(gemini_provider)
///     .layer(LoggingLayer::new())
///     .finish();
/// ```
pub struct RuntimeExecutorBuilder<P> {
    provider: P,
}

impl<P: Provider> RuntimeExecutorBuilder<P> {
    /// Create a new builder with a provider
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Add a layer to wrap the provider
    ///
    /// Each call creates a new concrete type by wrapping the previous provider.
    pub fn layer<L>(self, layer: L) -> RuntimeExecutorBuilder<L::LayeredProvider>
    where
        L: Layer<P>,
    {
        RuntimeExecutorBuilder {
            provider: layer.layer(self.provider),
        }
    }

    /// Finish building and create a RuntimeExecutor
    pub fn finish(self) -> RuntimeExecutor {
        RuntimeExecutor {
            provider: Arc::new(self.provider),
        }
    }
}

/// Runtime executor.
pub struct RuntimeExecutor {
    provider: BoxedProvider,
}

impl RuntimeExecutor {
    /// Create a new builder
    pub fn builder<P: Provider>(provider: P) -> RuntimeExecutorBuilder<P> {
        RuntimeExecutorBuilder::new(provider)
    }

    /// Get provider information
    pub fn info(&self) -> Arc<ProviderInfo> {
        self.provider.info()
    }

    /// Process `text` with `model` and return the generated text.
    ///
    /// Fails with [`AiError::UnsupportedModel`] or [`AiError::InvalidRequest`]
    /// without touching the provider; otherwise makes one provider call.
    pub async fn process(
        &self,
        model: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<TextResult, AiError> {
        let model = model.into();
        let provider_info = self.provider.info();

        let family = ModelFamily::detect(&model)?;
        if family != provider_info.family {
            return Err(AiError::unsupported_model(model));
        }

        let req = TextRequest::new(model, text);
        req.validate()?;

        let ctx = RequestContext::new(provider_info.id.clone(), req.model.clone());
        let span = tracing::debug_span!(
            "process",
            request_id = %ctx.request_id,
            provider = %ctx.provider_id,
            model = %ctx.model
        );

        self.provider.generate_text(req).instrument(span).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::LayeredProvider;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct CountingProvider {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Provider for CountingProvider {
        fn info(&self) -> Arc<ProviderInfo> {
            Arc::new(ProviderInfo {
                id: "counting".to_string(),
                name: "Counting".to_string(),
                family: ModelFamily::Gemini,
            })
        }

        async fn generate_text(&self, req: TextRequest) -> Result<TextResult, AiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(TextResult {
                text: format!("echo: {}", req.text),
                model: req.model,
            })
        }
    }

    #[derive(Debug)]
    struct Uppercase {
        inner: CountingProvider,
    }

    #[async_trait]
    impl LayeredProvider for Uppercase {
        type Inner = CountingProvider;

        fn inner(&self) -> &Self::Inner {
            &self.inner
        }

        async fn layered_generate_text(&self, req: TextRequest) -> Result<TextResult, AiError> {
            let mut result = self.inner.generate_text(req).await?;
            result.text = result.text.to_uppercase();
            Ok(result)
        }
    }

    crate::impl_layered_provider!(Uppercase);

    struct UppercaseLayer;

    impl Layer<CountingProvider> for UppercaseLayer {
        type LayeredProvider = Uppercase;

        fn layer(&self, inner: CountingProvider) -> Self::LayeredProvider {
            Uppercase { inner }
        }
    }

    #[tokio::test]
    async fn test_process() {
        let calls = Arc::new(AtomicUsize::new(0));
        let executor = RuntimeExecutor::builder(CountingProvider {
            calls: calls.clone(),
        })
        .finish();

        let result = executor.process("gemini-2.5-flash", "hello").await.unwrap();
        assert_eq!(result.text, "echo: hello");
        assert_eq!(result.model, "gemini-2.5-flash");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unsupported_model_makes_no_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let executor = RuntimeExecutor::builder(CountingProvider {
            calls: calls.clone(),
        })
        .finish();

        let err = executor.process("gpt-4", "hello").await.unwrap_err();
        assert_eq!(err, AiError::unsupported_model("gpt-4"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_text_makes_no_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let executor = RuntimeExecutor::builder(CountingProvider {
            calls: calls.clone(),
        })
        .finish();

        let err = executor.process(DEFAULT_MODEL, "").await.unwrap_err();
        assert!(matches!(err, AiError::InvalidRequest(_)));

        let err = executor.process(DEFAULT_MODEL, "   ").await.unwrap_err();
        assert!(matches!(err, AiError::InvalidRequest(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_layer_wraps_provider() {
        let executor = RuntimeExecutor::builder(CountingProvider::default())
            .layer(UppercaseLayer)
            .finish();

        assert_eq!(executor.info().id, "counting");
        let result = executor.process(DEFAULT_MODEL, "hi").await.unwrap();
        assert_eq!(result.text, "ECHO: HI");
    }
}
