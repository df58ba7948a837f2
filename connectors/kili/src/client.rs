//! Kili API client.

use std::sync::Arc;

use kili_graphql::{
    HttpTransportBuilder, OperationDocument, OperationError, Transport, execute_operation,
};
use serde_json::Value;

use crate::capability::{ApiVersion, ensure_supported};
use crate::config::KiliConfig;
use crate::error::KiliResult;

/// Client for the Kili GraphQL API.
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct KiliClient {
    transport: Arc<dyn Transport>,
    api_version: ApiVersion,
}

impl std::fmt::Debug for KiliClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KiliClient")
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl KiliClient {
    /// Create a client over an existing transport.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, api_version: ApiVersion) -> Self {
        Self {
            transport,
            api_version,
        }
    }

    /// Create a client posting to the configured endpoint over HTTP.
    pub fn from_config(config: &KiliConfig) -> KiliResult<Self> {
        config.validate()?;
        let transport = HttpTransportBuilder::new(&config.api_endpoint)
            .with_api_key(&config.api_key)
            .with_timeout(config.timeout)
            .build()?;
        Ok(Self::new(Arc::new(transport), config.api_version))
    }

    /// API version operations are checked against.
    #[must_use]
    pub const fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// Check that `operation` exists on the configured version.
    pub(crate) fn ensure(&self, operation: &'static str) -> KiliResult<()> {
        ensure_supported(operation, self.api_version)
    }

    /// Build with `build`, send, and unwrap the payload.
    ///
    /// Nothing is sent when the version check or the build fails.
    pub(crate) async fn run<F>(&self, operation: &'static str, build: F) -> KiliResult<Value>
    where
        F: FnOnce() -> Result<OperationDocument, OperationError>,
    {
        self.ensure(operation)?;
        let document = build()?;
        Ok(execute_operation(self.transport.as_ref(), &document).await?)
    }
}
