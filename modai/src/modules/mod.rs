//! Modules shipped to the host.

#[cfg(all(feature = "modai-provider", feature = "modai-layer"))]
pub mod ai;
pub mod echo;
