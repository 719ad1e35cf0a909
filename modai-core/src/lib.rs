//! # modai core
//!
//! Core abstractions and runtime for AI text modules.
//!
//! This crate provides the provider trait, the secret-safe request types,
//! layer composition and the executor the host modules call into.

pub mod error;
pub mod layer;
pub mod provider;
pub mod runtime;
pub mod types;

// Re-exports
pub use error::AiError;
pub use layer::{Layer, LayeredProvider};
pub use provider::Provider;
pub use runtime::RuntimeExecutor;
pub use types::*;

/// Result type alias for AI operations
pub type Result<T> = std::result::Result<T, AiError>;
