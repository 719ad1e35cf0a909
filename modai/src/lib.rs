//! # modai
//!
//! AI text modules for configuration-management hosts.
//!
//! modai ships two host modules:
//!
//! - `ai`: sends a text to a Gemini model and returns the generated text
//! - `echo`: returns its input with a `Received value: ` prefix
//!
//! Both speak the host module protocol: arguments come in as JSON (file
//! path in `argv[1]`, or stdin), one JSON result document goes out on
//! stdout.
//!
//! ## Library use
//!
//! ```ignore
//! use modai::{RuntimeExecutor, ModelFamily, ApiKey};
//! use modai::provider::{provider_for, ProviderOptions};
//! use modai::layer::LoggingLayer;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let family = ModelFamily::detect("gemini-2.5-flash")?;
//! let provider = provider_for(family, ApiKey::new("your-api-key"), &ProviderOptions::default())?;
//!
//! let executor = RuntimeExecutor::builder(provider)
//!     .layer(LoggingLayer::new())
//!     .finish();
//!
//! let result = executor.process("gemini-2.5-flash", "What is Rust?").await?;
//! println!("{}", result.text);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Includes `gemini` and `layers`
//! - `gemini`: Gemini provider support
//! - `providers`: All available providers
//! - `layers`: Built-in layers (logging)
//! - `full`: All features enabled

// Re-export core types and traits
pub use modai_core::*;

// Re-export providers under `provider` module
#[cfg(feature = "modai-provider")]
pub mod provider {
    //! AI provider implementations.
    pub use modai_provider::*;
}

// Re-export layers under `layer` module
#[cfg(feature = "modai-layer")]
pub mod layer {
    //! Built-in middleware layers.
    pub use modai_layer::*;
}

pub mod host;
pub mod modules;

/// Prelude module for convenient imports
pub mod prelude {
    //! Prelude module containing the most commonly used types and traits.
    //!
    //! ```
    //! use modai::prelude::*;
    //! ```

    pub use crate::{
        AiError, ApiKey, Layer, ModelFamily, Provider, Result, RuntimeExecutor, TextRequest,
        TextResult,
    };

    #[cfg(feature = "modai-provider")]
    pub use crate::provider::*;

    #[cfg(feature = "modai-layer")]
    pub use crate::layer::*;
}
