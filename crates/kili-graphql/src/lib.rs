//! Kili GraphQL - operation building and response unwrapping for the Kili
//! labeling API.
//!
//! This crate provides:
//! - Typed argument values with a single escaping path into documents.
//! - Inline-literal and variable-bound operation builders.
//! - Response envelope unwrapping with a uniform error taxonomy.
//! - The transport seam and a reqwest-based HTTP transport.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]

mod error;
mod operation;
mod response;
mod transport;
mod value;

pub use error::{
    GraphqlError, GraphqlErrorLocation, GraphqlPathSegment, HttpErrorInfo, OperationError,
};
pub use operation::{OperationBuilder, OperationDocument, OperationKind, VariablesBuilder};
pub use response::{ResponseEnvelope, extract_payload};
pub use transport::{
    HttpTransport, HttpTransportBuilder, HttpTransportConfig, Transport, TransportMetrics,
    TransportMetricsSnapshot, execute_operation,
};
pub use value::{Argument, is_valid_enum_token, is_valid_name, is_valid_type_ref, quote_string};
