//! Binary fetch error types.

use thiserror::Error;

/// Errors raised by the binary fetch collaborator.
///
/// The resource cache treats every variant identically (a cached negative
/// result); the taxonomy exists for logging and for adapters that want to
/// report transport problems distinctly.
#[derive(Debug, Clone, Error)]
#[allow(missing_docs)]
pub enum FetchError {
    #[error("resource not found: {path}")]
    NotFound { path: String },

    #[error("network error fetching resource: {message}")]
    Network { message: String },

    #[error("empty payload for resource: {path}")]
    EmptyPayload { path: String },

    #[error("unexpected fetch error: {message}")]
    Unexpected { message: String },
}

impl FetchError {
    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates an empty-payload error.
    #[must_use]
    pub fn empty_payload(path: impl Into<String>) -> Self {
        Self::EmptyPayload { path: path.into() }
    }

    /// Creates an unexpected error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Returns whether the error is transport related.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}
