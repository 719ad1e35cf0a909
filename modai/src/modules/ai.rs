//! `ai` module: process a text with a generative model.
//!
//! Arguments:
//!
//! | name      | type | default            | env fallback |
//! |-----------|------|--------------------|--------------|
//! | `text`    | str  | required           |              |
//! | `api_key` | str  | (no_log)           | `AI_API_KEY` |
//! | `model`   | str  | `gemini-2.5-flash` | `AI_MODEL`   |
//! | `timeout` | int  | client default     | `AI_TIMEOUT` |
//!
//! On success the result document carries the generated text in `message`
//! and `changed: false`.

use crate::host::{ArgSource, ArgSpec, ArgValue, ArgumentSpec, HostModule, Outcome, Params};
use modai_core::{AiError, ApiKey, ModelFamily, RuntimeExecutor, DEFAULT_MODEL};
use modai_layer::LoggingLayer;
use modai_provider::{provider_for, ProviderOptions};
use std::time::Duration;

/// Module name as the host knows it
pub const NAME: &str = "ai";

/// Argument spec of the `ai` module
pub fn argument_spec() -> ArgumentSpec {
    ArgumentSpec::new()
        .arg(ArgSpec::str("text").required())
        .arg(ArgSpec::str("api_key").no_log().env_fallback(&["AI_API_KEY"]))
        .arg(
            ArgSpec::str("model")
                .default_value(ArgValue::Str(DEFAULT_MODEL.to_string()))
                .env_fallback(&["AI_MODEL"]),
        )
        .arg(ArgSpec::int("timeout").env_fallback(&["AI_TIMEOUT"]))
}

/// The `ai` module, reading fallbacks from the process environment
pub fn module() -> HostModule {
    HostModule::new(NAME, argument_spec())
}

/// Typed arguments of one `ai` run
#[derive(Debug, Clone)]
pub struct AiArgs {
    pub text: String,
    pub api_key: Option<ApiKey>,
    pub model: String,
    pub timeout: Option<Duration>,
}

impl AiArgs {
    /// Read the typed arguments out of validated params
    pub fn from_params(params: &Params) -> Result<Self, AiError> {
        let timeout = match params.get_int("timeout") {
            Some(secs) if secs > 0 => Some(Duration::from_secs(secs as u64)),
            Some(secs) => {
                return Err(AiError::configuration(format!(
                    "timeout must be a positive number of seconds, got {}",
                    secs
                )))
            }
            None => None,
        };

        Ok(Self {
            text: params.get_str("text").unwrap_or_default().to_string(),
            api_key: params
                .get_str("api_key")
                .filter(|key| !key.is_empty())
                .map(ApiKey::new),
            model: params.get_str("model").unwrap_or(DEFAULT_MODEL).to_string(),
            timeout,
        })
    }
}

/// Generate text for `args`.
///
/// The model family and the key are checked before any provider exists,
/// so an unsupported model or a missing key never reaches the network.
pub async fn process(args: AiArgs, options: &ProviderOptions) -> Result<String, AiError> {
    let family = ModelFamily::detect(&args.model)?;
    let api_key = args.api_key.ok_or_else(|| {
        AiError::configuration("api_key is required: set the api_key argument or AI_API_KEY")
    })?;

    let mut options = options.clone();
    if let Some(timeout) = args.timeout {
        options.timeout = Some(timeout);
    }

    let provider = provider_for(family, api_key, &options)?;
    let executor = RuntimeExecutor::builder(provider)
        .layer(LoggingLayer::with_prefix("[modai::ai]"))
        .finish();

    let result = executor.process(args.model, args.text).await?;
    Ok(result.text)
}

/// Run the module end to end and produce the host result document
pub async fn run(module: &HostModule, source: ArgSource, options: &ProviderOptions) -> Outcome {
    let invocation = match module.parse(source) {
        Ok(invocation) => invocation,
        Err(outcome) => return outcome,
    };

    let args = match AiArgs::from_params(invocation.params()) {
        Ok(args) => args,
        Err(e) => return invocation.fail(&e.to_string()),
    };

    match process(args, options).await {
        Ok(text) => invocation.exit(false, &text),
        Err(e) => {
            tracing::debug!(kind = e.kind(), "ai module failed");
            invocation.fail(&e.to_string())
        }
    }
}
