//! Kili connector error types.

use kili_graphql::OperationError;
use thiserror::Error;

use crate::capability::ApiVersion;

/// Result type for Kili operations.
pub type KiliResult<T> = Result<T, KiliError>;

/// Kili-specific errors.
#[derive(Debug, Clone, Error)]
pub enum KiliError {
    /// Building, sending or unwrapping an operation failed.
    #[error(transparent)]
    Operation(#[from] OperationError),

    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation not offered by the configured API version
    #[error("{operation} is not available on API {version}")]
    Unsupported {
        /// GraphQL operation name
        operation: &'static str,
        /// Configured API version
        version: ApiVersion,
    },
}

impl KiliError {
    /// The underlying operation error, if any.
    #[must_use]
    pub const fn operation_error(&self) -> Option<&OperationError> {
        match self {
            Self::Operation(err) => Some(err),
            _ => None,
        }
    }

    /// Server messages, verbatim and in order; empty unless the server
    /// reported errors.
    #[must_use]
    pub fn server_messages(&self) -> Vec<&str> {
        self.operation_error()
            .map(OperationError::messages)
            .unwrap_or_default()
    }

    /// Returns `true` if nothing was sent to the server.
    #[must_use]
    pub const fn is_pre_flight(&self) -> bool {
        match self {
            Self::Operation(err) => err.is_pre_flight(),
            Self::Config(_) | Self::Unsupported { .. } => true,
        }
    }
}
