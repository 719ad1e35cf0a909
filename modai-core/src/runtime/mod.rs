//! Runtime layer for modai.
//!
//! Sits between the host module and the provider interface. It is
//! responsible for:
//! - Rejecting unsupported models and empty requests before any network call
//! - Holding the layered provider built at startup
//! - Running the single provider call inside a request span

pub mod executor;

pub use executor::RuntimeExecutor;
