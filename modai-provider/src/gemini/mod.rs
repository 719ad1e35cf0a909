//! Gemini provider implementation.
//!
//! Talks to the `generateContent` endpoint of the Generative Language API
//! with a plain reqwest client: one POST per call, key in the
//! `x-goog-api-key` header, first candidate's first text part returned.

pub mod types;

use crate::ProviderOptions;
use modai_core::error::AiError;
use modai_core::provider::Provider;
use modai_core::types::*;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use types::{GenerateContentRequest, GenerateContentResponse};

/// Public Generative Language API base URL
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini provider
#[derive(Clone)]
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: ApiKey,
    api_base: String,
    info: Arc<ProviderInfo>,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("info", &self.info)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GeminiProvider {
    /// Create a new Gemini provider against the public endpoint
    pub fn new(api_key: impl Into<ApiKey>) -> Result<Self, AiError> {
        Self::builder().api_key(api_key).build()
    }

    /// Create a builder for more configuration options
    pub fn builder() -> GeminiBuilder {
        GeminiBuilder::default()
    }

    /// `{api_base}/models/{model}:generateContent`
    pub fn endpoint(&self, model: &str) -> String {
        endpoint(&self.api_base, model)
    }

    fn name(&self) -> &str {
        &self.info.name
    }

    /// Classify a reqwest failure, never leaking the URL or the key
    fn convert_error(&self, err: reqwest::Error) -> AiError {
        let transport = err.is_timeout()
            || err.is_connect()
            || err.is_request()
            || err.is_body()
            || err.is_redirect();
        let cause = self.api_key.redact(&error_chain(&err.without_url()));

        if transport {
            AiError::transport(self.name(), cause)
        } else {
            AiError::unexpected(cause)
        }
    }

    /// Pull `candidates[0].content.parts[0].text` out of a 2xx body
    fn extract_text(&self, body: &str) -> Result<String, AiError> {
        let response: GenerateContentResponse = serde_json::from_str(body).map_err(|e| {
            AiError::malformed_response(
                self.name(),
                format!(
                    "response is not valid JSON: {}",
                    self.api_key.redact(&e.to_string())
                ),
            )
        })?;

        let candidate = response
            .first_candidate()
            .ok_or_else(|| AiError::no_candidates(self.name()))?;

        candidate.first_text().map(str::to_string).ok_or_else(|| {
            AiError::malformed_response(
                self.name(),
                format!(
                    "response candidate has no text part (finish reason: {}).",
                    candidate.finish_reason.as_deref().unwrap_or("unknown")
                ),
            )
        })
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn info(&self) -> Arc<ProviderInfo> {
        self.info.clone()
    }

    async fn generate_text(&self, req: TextRequest) -> Result<TextResult, AiError> {
        let url = self.endpoint(&req.model);
        let body = GenerateContentRequest::from_text(req.text.as_str());

        tracing::debug!(
            model = %req.model,
            text_len = req.text.len(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.api_key.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.convert_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let reason = reason_phrase(&response);
            tracing::debug!(status = status.as_u16(), %reason, "generateContent rejected");
            return Err(AiError::upstream_http(self.name(), status.as_u16(), reason));
        }

        let raw = response.text().await.map_err(|e| self.convert_error(e))?;
        let text = self.extract_text(&raw)?;

        tracing::debug!(
            model = %req.model,
            generated_len = text.len(),
            "generateContent succeeded"
        );

        Ok(TextResult {
            text,
            model: req.model,
        })
    }
}

/// Builder for Gemini provider with custom configuration
#[derive(Default)]
pub struct GeminiBuilder {
    api_key: Option<ApiKey>,
    api_base: Option<String>,
    timeout: Option<Duration>,
}

impl GeminiBuilder {
    /// Set API key
    pub fn api_key(mut self, api_key: impl Into<ApiKey>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set API base URL (proxies, local test servers)
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Set the whole-request timeout; unset means the client default
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Copy every option that is set
    pub fn options(mut self, options: &ProviderOptions) -> Self {
        if let Some(api_base) = &options.api_base {
            self.api_base = Some(api_base.clone());
        }
        if let Some(timeout) = options.timeout {
            self.timeout = Some(timeout);
        }
        self
    }

    /// Build the provider
    pub fn build(self) -> Result<GeminiProvider, AiError> {
        let api_key = self
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AiError::configuration("API key is required"))?;

        let mut client = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }
        let client = client
            .build()
            .map_err(|e| AiError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        let api_base = self
            .api_base
            .unwrap_or_else(|| GEMINI_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(GeminiProvider {
            client,
            api_key,
            api_base,
            info: Arc::new(ProviderInfo {
                id: "gemini".to_string(),
                name: ModelFamily::Gemini.name().to_string(),
                family: ModelFamily::Gemini,
            }),
        })
    }
}

/// Reason phrase of the status line as sent, else the standard one for the code
fn reason_phrase(response: &reqwest::Response) -> String {
    match response.extensions().get::<hyper::ext::ReasonPhrase>() {
        Some(phrase) => String::from_utf8_lossy(phrase.as_bytes()).into_owned(),
        None => response
            .status()
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_string(),
    }
}

/// Endpoint URL for `model` under `api_base`
pub fn endpoint(api_base: &str, model: &str) -> String {
    format!("{}/models/{}:generateContent", api_base, model)
}

/// Display of an error followed by its sources, `outer: inner: root`
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{refused_api_base, MockUpstream};

    const KEY: &str = "AIza-test-key-0123456789";

    fn provider(api_base: &str) -> GeminiProvider {
        GeminiProvider::builder()
            .api_key(KEY)
            .api_base(api_base)
            .build()
            .unwrap()
    }

    #[test]
    fn test_endpoint_substitutes_model_once() {
        let provider = GeminiProvider::new(KEY).unwrap();
        for model in ["gemini-2.5-flash", "gemini-2.5-pro", "gemini-1.5-flash-8b"] {
            let url = provider.endpoint(model);
            assert_eq!(
                url,
                format!(
                    "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
                    model
                )
            );
            assert_eq!(url.matches(model).count(), 1);
        }
    }

    #[test]
    fn test_builder_requires_key() {
        assert!(matches!(
            GeminiProvider::builder().build(),
            Err(AiError::Configuration(_))
        ));
        assert!(matches!(
            GeminiProvider::new(""),
            Err(AiError::Configuration(_))
        ));
    }

    #[test]
    fn test_debug_hides_key() {
        let provider = GeminiProvider::new(KEY).unwrap();
        assert!(!format!("{:?}", provider).contains(KEY));
    }

    #[test]
    fn test_trailing_slash_in_api_base() {
        let provider = provider("http://localhost:1/v1beta/");
        assert_eq!(
            provider.endpoint("gemini-x"),
            "http://localhost:1/v1beta/models/gemini-x:generateContent"
        );
    }

    #[tokio::test]
    async fn test_success_returns_first_text() {
        let upstream = MockUpstream::respond(
            200,
            "OK",
            r#"{"candidates":[{"content":{"parts":[{"text":"Hello"}]}}]}"#,
        )
        .await;

        let result = provider(&upstream.api_base())
            .generate_text(TextRequest::new("gemini-2.5-flash", "Say hello"))
            .await
            .unwrap();

        assert_eq!(result.text, "Hello");
        assert_eq!(result.model, "gemini-2.5-flash");
        assert_eq!(upstream.connections(), 1);
    }

    #[tokio::test]
    async fn test_request_on_the_wire() {
        let upstream = MockUpstream::respond(
            200,
            "OK",
            r#"{"candidates":[{"content":{"parts":[{"text":"ok"}]}}]}"#,
        )
        .await;
        let text = "メモリーの使用率についてレポートを作成してください";

        provider(&upstream.api_base())
            .generate_text(TextRequest::new("gemini-2.5-flash", text))
            .await
            .unwrap();

        let requests = upstream.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, "POST");
        assert_eq!(
            request.path,
            "/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(request.header("x-goog-api-key"), Some(KEY));
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(
            request.json(),
            serde_json::json!({"contents": [{"parts": [{"text": text}]}]})
        );
    }

    #[tokio::test]
    async fn test_empty_candidates_is_malformed() {
        let upstream = MockUpstream::respond(200, "OK", r#"{"candidates":[]}"#).await;

        let err = provider(&upstream.api_base())
            .generate_text(TextRequest::new("gemini-2.5-flash", "hi"))
            .await
            .unwrap_err();

        assert_eq!(err, AiError::no_candidates("Gemini"));
        assert_eq!(
            err.to_string(),
            "Gemini API response does not contain candidates."
        );
    }

    #[tokio::test]
    async fn test_missing_candidates_is_malformed() {
        let upstream =
            MockUpstream::respond(200, "OK", r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)
                .await;

        let err = provider(&upstream.api_base())
            .generate_text(TextRequest::new("gemini-2.5-flash", "hi"))
            .await
            .unwrap_err();

        assert_eq!(err, AiError::no_candidates("Gemini"));
    }

    #[tokio::test]
    async fn test_candidate_without_text_is_malformed() {
        let upstream =
            MockUpstream::respond(200, "OK", r#"{"candidates":[{"finishReason":"SAFETY"}]}"#)
                .await;

        let err = provider(&upstream.api_base())
            .generate_text(TextRequest::new("gemini-2.5-flash", "hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, AiError::MalformedResponse { .. }));
        assert!(err.to_string().contains("SAFETY"));
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let upstream = MockUpstream::respond(200, "OK", "<html>proxy login</html>").await;

        let err = provider(&upstream.api_base())
            .generate_text(TextRequest::new("gemini-2.5-flash", "hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, AiError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_http_error_carries_status_and_reason() {
        let upstream = MockUpstream::respond(
            403,
            "Forbidden",
            r#"{"error":{"code":403,"message":"API key not valid","status":"PERMISSION_DENIED"}}"#,
        )
        .await;

        let err = provider(&upstream.api_base())
            .generate_text(TextRequest::new("gemini-2.5-flash", "hi"))
            .await
            .unwrap_err();

        assert_eq!(err, AiError::upstream_http("Gemini", 403, "Forbidden"));
        assert_eq!(
            err.to_string(),
            "Gemini API returned HTTP error: 403 - Forbidden"
        );
        assert!(!err.to_string().contains(KEY));
    }

    #[tokio::test]
    async fn test_http_error_keeps_server_reason() {
        let upstream = MockUpstream::respond(403, "Quota Exhausted", "{}").await;

        let err = provider(&upstream.api_base())
            .generate_text(TextRequest::new("gemini-2.5-flash", "hi"))
            .await
            .unwrap_err();

        assert_eq!(err, AiError::upstream_http("Gemini", 403, "Quota Exhausted"));
        assert_eq!(
            err.to_string(),
            "Gemini API returned HTTP error: 403 - Quota Exhausted"
        );
    }

    #[tokio::test]
    async fn test_http_error_with_nonstandard_status() {
        let upstream = MockUpstream::respond(599, "Custom Gateway", "{}").await;

        let err = provider(&upstream.api_base())
            .generate_text(TextRequest::new("gemini-2.5-flash", "hi"))
            .await
            .unwrap_err();

        assert_eq!(err, AiError::upstream_http("Gemini", 599, "Custom Gateway"));
    }

    #[tokio::test]
    async fn test_server_error() {
        let upstream = MockUpstream::respond(503, "Service Unavailable", "{}").await;

        let err = provider(&upstream.api_base())
            .generate_text(TextRequest::new("gemini-2.5-flash", "hi"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            AiError::upstream_http("Gemini", 503, "Service Unavailable")
        );
        // no retry
        assert_eq!(upstream.connections(), 1);
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport() {
        let api_base = refused_api_base().await;

        let err = provider(&api_base)
            .generate_text(TextRequest::new("gemini-2.5-flash", "hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, AiError::Transport { .. }), "{:?}", err);
        assert!(err.to_string().starts_with("Gemini API URL error: "));
        assert!(!err.to_string().contains(KEY));
    }

    #[tokio::test]
    async fn test_timeout_is_transport() {
        let upstream = MockUpstream::stall().await;
        let provider = GeminiProvider::builder()
            .api_key(KEY)
            .api_base(upstream.api_base())
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();

        let err = provider
            .generate_text(TextRequest::new("gemini-2.5-flash", "hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, AiError::Transport { .. }), "{:?}", err);
    }
}
