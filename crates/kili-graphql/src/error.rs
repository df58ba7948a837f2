//! Error taxonomy for building, sending and unwrapping operations.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP error information captured from reqwest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpErrorInfo {
    /// Error message.
    pub message: String,
    /// HTTP status code (if available).
    pub status_code: Option<u16>,
    /// Whether the error was a timeout.
    pub is_timeout: bool,
    /// Whether the error was a connection failure.
    pub is_connect: bool,
}

impl From<reqwest::Error> for HttpErrorInfo {
    fn from(err: reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
            status_code: err.status().map(|status| status.as_u16()),
            is_timeout: err.is_timeout(),
            is_connect: err.is_connect(),
        }
    }
}

/// GraphQL error location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlErrorLocation {
    /// Line number in the query (1-based).
    pub line: u32,
    /// Column number in the query (1-based).
    pub column: u32,
}

/// GraphQL path segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphqlPathSegment {
    /// Field name.
    Key(String),
    /// Array index.
    Index(i64),
}

/// Error object reported by the server in the `errors` member of a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
    /// Human-readable error message, surfaced verbatim.
    pub message: String,
    /// Location(s) within the document.
    #[serde(default)]
    pub locations: Vec<GraphqlErrorLocation>,
    /// Path within the response where the error occurred.
    #[serde(default)]
    pub path: Vec<GraphqlPathSegment>,
    /// Extensions metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

impl GraphqlError {
    /// Create an error carrying only a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: Vec::new(),
            extensions: None,
        }
    }
}

/// Failure of a single build → execute → unwrap cycle.
///
/// `ArgumentMismatch` and `Encoding` are raised while building the document,
/// before anything reaches the transport. `Protocol` and `Server` come from
/// the response envelope. `InvalidConfig` is raised when a transport is
/// built, also before any request. The remaining variants are transport
/// failures.
#[derive(Debug, Clone, Error)]
pub enum OperationError {
    /// Parallel list arguments of unequal length, or a duplicated argument.
    #[error("argument mismatch in {operation}: {message}")]
    ArgumentMismatch {
        /// Operation being built.
        operation: String,
        /// Details.
        message: String,
        /// Every list in the offending group with its length.
        lengths: Vec<(String, usize)>,
    },

    /// A value cannot be encoded into the document or the variable map.
    #[error("cannot encode `{argument}` for {operation}: {message}")]
    Encoding {
        /// Operation being built.
        operation: String,
        /// Argument, variable or field name.
        argument: String,
        /// Details.
        message: String,
    },

    /// The envelope has no errors and no payload for the operation.
    #[error("GraphQL protocol error in {operation}: {message}")]
    Protocol {
        /// Operation being unwrapped.
        operation: String,
        /// Details.
        message: String,
    },

    /// The server reported one or more errors.
    #[error("{operation} failed: {}", join_messages(.errors))]
    Server {
        /// Operation being unwrapped.
        operation: String,
        /// Server errors, in the order they were reported.
        errors: Vec<GraphqlError>,
    },

    /// HTTP/network error.
    #[error("HTTP error: {0:?}")]
    Http(HttpErrorInfo),

    /// HTTP response status error.
    #[error("HTTP status {status} with body: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: StatusCode,
        /// Response body (truncated if needed).
        body: String,
    },

    /// Response body is not a GraphQL envelope.
    #[error("JSON error: {0}")]
    Json(String),

    /// The transport cannot be configured as requested.
    #[error("invalid transport configuration: {0}")]
    InvalidConfig(String),
}

fn join_messages(errors: &[GraphqlError]) -> String {
    errors
        .iter()
        .map(|err| err.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<reqwest::Error> for OperationError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(HttpErrorInfo::from(err))
    }
}

impl From<serde_json::Error> for OperationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl OperationError {
    pub(crate) fn encoding(
        operation: impl Into<String>,
        argument: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Encoding {
            operation: operation.into(),
            argument: argument.into(),
            message: message.into(),
        }
    }

    pub(crate) fn protocol(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Protocol {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Server messages in reported order; empty for every other variant.
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        match self {
            Self::Server { errors, .. } => errors.iter().map(|err| err.message.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    /// Returns `true` when the failure happened before any transport call.
    #[must_use]
    pub const fn is_pre_flight(&self) -> bool {
        matches!(
            self,
            Self::ArgumentMismatch { .. } | Self::Encoding { .. } | Self::InvalidConfig(_)
        )
    }

    /// Returns `true` for transport failures a caller may choose to retry.
    ///
    /// Nothing in this crate retries; the classification is for callers.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(info) => info.is_timeout || info.is_connect,
            Self::HttpStatus { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_display_keeps_every_message() {
        let err = OperationError::Server {
            operation: "appendToDataset".into(),
            errors: vec![GraphqlError::new("first"), GraphqlError::new("second")],
        };
        assert_eq!(err.to_string(), "appendToDataset failed: first; second");
        assert_eq!(err.messages(), vec!["first", "second"]);
    }

    #[test]
    fn graphql_error_deserializes_with_path_and_locations() {
        let err: GraphqlError = serde_json::from_value(serde_json::json!({
            "message": "Invalid asset",
            "locations": [{"line": 2, "column": 7}],
            "path": ["appendToDataset", 0]
        }))
        .expect("error object");
        assert_eq!(err.message, "Invalid asset");
        assert_eq!(err.locations[0].column, 7);
        assert_eq!(
            err.path,
            vec![
                GraphqlPathSegment::Key("appendToDataset".into()),
                GraphqlPathSegment::Index(0)
            ]
        );
    }

    #[test]
    fn retry_classification_only_covers_transport() {
        let status = OperationError::HttpStatus {
            status: StatusCode::BAD_GATEWAY,
            body: String::new(),
        };
        assert!(status.is_retryable());
        let throttled = OperationError::HttpStatus {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: String::new(),
        };
        assert!(throttled.is_retryable());
        let server = OperationError::Server {
            operation: "users".into(),
            errors: vec![GraphqlError::new("nope")],
        };
        assert!(!server.is_retryable());
        assert!(!server.is_pre_flight());
        assert!(OperationError::encoding("users", "first", "bad").is_pre_flight());
    }
}
