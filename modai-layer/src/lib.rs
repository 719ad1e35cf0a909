//! # modai layers
//!
//! Built-in layers for modai providers.
//!
//! Currently implemented layers:
//! - `LoggingLayer`: Logs all provider operations with timing information
//!
//! ## Usage
//!
//! ```ignore
//! use modai_core::RuntimeExecutor;
//! use modai_layer::LoggingLayer;
//!
//! let executor = RuntimeExecutor::builder(provider)
//!     .layer(LoggingLayer::new())
//!     .finish();
//! ```

pub mod logging;

// Re-exports
pub use logging::LoggingLayer;
