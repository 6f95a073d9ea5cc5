//! Error types for envoy

use crate::config::ConfigError;
use envoy_types::ResolveError;
use thiserror::Error;

/// Top-level envoy error
///
/// Absent keys are never an error; they are reported as `None`. Errors only
/// arise from resolving payloads or loading configuration.
#[derive(Debug, Error)]
pub enum EnvoyError {
    /// A payload failed to resolve
    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type using EnvoyError
pub type Result<T> = std::result::Result<T, EnvoyError>;
