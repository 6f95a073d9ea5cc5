//! Error types for payload resolution

use thiserror::Error;

/// Boxed error returned by fallible producers
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while resolving a payload
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A deferred producer failed; the original error is kept as the source
    #[error("Producer failed: {0}")]
    Producer(#[source] BoxError),

    /// Resolution nested deeper than the resolver allows
    #[error("Resolution exceeded maximum depth of {limit}")]
    DepthExceeded {
        /// The configured depth limit
        limit: usize,
    },
}

/// Result type using ResolveError
pub type Result<T> = std::result::Result<T, ResolveError>;
