//! Logging layer for provider operations.
//!
//! Logs the model, the prompt length and the elapsed time of every call.
//! The prompt itself and the API key are never written.

use async_trait::async_trait;
use modai_core::error::AiError;
use modai_core::layer::{Layer, LayeredProvider};
use modai_core::provider::Provider;
use modai_core::types::*;
use std::fmt::Debug;
use std::sync::Arc;

/// Logging layer that logs provider operations.
#[derive(Debug, Clone)]
pub struct LoggingLayer {
    prefix: String,
}

impl LoggingLayer {
    /// Create a new logging layer
    pub fn new() -> Self {
        Self {
            prefix: "[modai]".to_string(),
        }
    }

    /// Create a logging layer with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LoggingLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Provider> Layer<P> for LoggingLayer {
    type LayeredProvider = LoggingProvider<P>;

    fn layer(&self, inner: P) -> Self::LayeredProvider {
        LoggingProvider {
            inner,
            prefix: self.prefix.clone(),
        }
    }
}

/// Provider wrapped with logging
#[derive(Debug)]
pub struct LoggingProvider<P> {
    inner: P,
    prefix: String,
}

#[async_trait]
impl<P: Provider> LayeredProvider for LoggingProvider<P> {
    type Inner = P;

    fn inner(&self) -> &Self::Inner {
        &self.inner
    }

    async fn layered_generate_text(&self, req: TextRequest) -> Result<TextResult, AiError> {
        let provider = self.inner.info();
        tracing::debug!(
            "{} generate_text request: provider={}, model={}, text_len={}",
            self.prefix,
            provider.id,
            req.model,
            req.text.len()
        );

        let start = std::time::Instant::now();
        let result = self.inner.generate_text(req).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::debug!(
                    "{} generate_text success: model={}, generated_len={}, elapsed={:?}",
                    self.prefix,
                    response.model,
                    response.text.len(),
                    elapsed
                );
            }
            Err(e) => {
                tracing::error!(
                    "{} generate_text error ({}): {}, elapsed={:?}",
                    self.prefix,
                    e.kind(),
                    e,
                    elapsed
                );
            }
        }

        result
    }
}

#[async_trait]
impl<P: Provider> Provider for LoggingProvider<P> {
    fn info(&self) -> Arc<ProviderInfo> {
        LayeredProvider::layered_info(self)
    }

    async fn generate_text(&self, req: TextRequest) -> Result<TextResult, AiError> {
        LayeredProvider::layered_generate_text(self, req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modai_core::RuntimeExecutor;
    use std::io::Write;
    use std::sync::Mutex;
    use tracing_subscriber::fmt::MakeWriter;

    const KEY: &str = "AIza-never-log-me";

    /// Collects formatted log lines in memory
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Capture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Provider that fails the way a careless upstream client would,
    /// holding the key in its state
    #[derive(Debug)]
    struct KeyedProvider {
        api_key: ApiKey,
        fail: bool,
    }

    #[async_trait]
    impl Provider for KeyedProvider {
        fn info(&self) -> Arc<ProviderInfo> {
            Arc::new(ProviderInfo {
                id: "keyed".to_string(),
                name: "Keyed".to_string(),
                family: ModelFamily::Gemini,
            })
        }

        async fn generate_text(&self, req: TextRequest) -> Result<TextResult, AiError> {
            tracing::debug!(api_key = ?self.api_key, "calling upstream");
            if self.fail {
                return Err(AiError::transport(
                    "Keyed",
                    self.api_key.redact(&format!("bad header {}", self.api_key.expose())),
                ));
            }
            Ok(TextResult {
                text: "done".to_string(),
                model: req.model,
            })
        }
    }

    fn capture_subscriber(capture: &Capture) -> impl tracing::Subscriber {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(capture.clone())
            .finish()
    }

    #[tokio::test]
    async fn test_logs_success_without_secrets() {
        let capture = Capture::default();
        let _guard = tracing::subscriber::set_default(capture_subscriber(&capture));

        let executor = RuntimeExecutor::builder(KeyedProvider {
            api_key: ApiKey::new(KEY),
            fail: false,
        })
        .layer(LoggingLayer::with_prefix("[test]"))
        .finish();

        let result = executor
            .process("gemini-2.5-flash", "private prompt")
            .await
            .unwrap();
        assert_eq!(result.text, "done");

        let logs = capture.contents();
        assert!(logs.contains("[test] generate_text request"));
        assert!(logs.contains("text_len=14"));
        assert!(logs.contains("[test] generate_text success"));
        assert!(!logs.contains(KEY));
        assert!(!logs.contains("private prompt"));
    }

    #[tokio::test]
    async fn test_logs_error_without_secrets() {
        let capture = Capture::default();
        let _guard = tracing::subscriber::set_default(capture_subscriber(&capture));

        let executor = RuntimeExecutor::builder(KeyedProvider {
            api_key: ApiKey::new(KEY),
            fail: true,
        })
        .layer(LoggingLayer::new())
        .finish();

        let err = executor
            .process("gemini-2.5-flash", "hi")
            .await
            .unwrap_err();
        assert!(!err.to_string().contains(KEY));

        let logs = capture.contents();
        assert!(logs.contains("[modai] generate_text error (transport)"));
        assert!(!logs.contains(KEY));
    }
}
