//! Transport capability and its HTTP implementation.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use crate::error::OperationError;
use crate::operation::OperationDocument;
use crate::response::ResponseEnvelope;

/// Opaque `execute(document, variables) → envelope` capability.
///
/// Implementations own connections, credentials and timeouts. Dropping the
/// returned future cancels the call.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one document and return the decoded envelope.
    async fn execute(
        &self,
        query: &str,
        variables: Option<&Map<String, Value>>,
    ) -> Result<ResponseEnvelope, OperationError>;
}

/// Send `document` and unwrap its payload.
///
/// One attempt, no retry and no timeout beyond what the transport applies.
#[instrument(
    skip_all,
    fields(operation = %document.operation_name(), kind = document.kind().keyword())
)]
pub async fn execute_operation(
    transport: &dyn Transport,
    document: &OperationDocument,
) -> Result<Value, OperationError> {
    let envelope = transport
        .execute(document.query(), document.variables())
        .await?;
    if !envelope.is_ok() {
        warn!(errors = envelope.errors.len(), "server reported errors");
    }
    envelope.into_payload(document.operation_name())
}

/// HTTP transport counters.
#[derive(Debug, Default)]
#[allow(clippy::struct_field_names)]
pub struct TransportMetrics {
    requests_total: AtomicU64,
    requests_success: AtomicU64,
    requests_error: AtomicU64,
}

impl TransportMetrics {
    /// Snapshot current counters.
    #[must_use]
    pub fn snapshot(&self) -> TransportMetricsSnapshot {
        TransportMetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            requests_success: self.requests_success.load(Ordering::Relaxed),
            requests_error: self.requests_error.load(Ordering::Relaxed),
        }
    }
}

/// Counter snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_field_names)]
pub struct TransportMetricsSnapshot {
    /// Requests sent.
    pub requests_total: u64,
    /// Requests answered with an error-free envelope.
    pub requests_success: u64,
    /// Requests that failed or carried GraphQL errors.
    pub requests_error: u64,
}

/// HTTP transport configuration.
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Default headers applied to every request.
    pub headers: HeaderMap,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            headers,
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP transport builder.
#[derive(Debug, Clone)]
pub struct HttpTransportBuilder {
    endpoint: String,
    config: HttpTransportConfig,
    deferred: Option<OperationError>,
}

impl HttpTransportBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            config: HttpTransportConfig::default(),
            deferred: None,
        }
    }

    /// Add a header.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.config.headers.insert(name, value);
        self
    }

    /// Authenticate with an API key (`Authorization: X-API-Key: <key>`).
    ///
    /// A key that is not a valid header value makes [`HttpTransportBuilder::build`]
    /// fail with [`OperationError::InvalidConfig`].
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl AsRef<str>) -> Self {
        let value = format!("X-API-Key: {}", api_key.as_ref());
        match HeaderValue::from_str(&value) {
            Ok(mut header) => {
                header.set_sensitive(true);
                self.config.headers.insert(AUTHORIZATION, header);
            }
            Err(_) => {
                if self.deferred.is_none() {
                    self.deferred = Some(OperationError::InvalidConfig(
                        "API key contains characters not allowed in a header".into(),
                    ));
                }
            }
        }
        self
    }

    /// Set timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Build the transport.
    pub fn build(self) -> Result<HttpTransport, OperationError> {
        if let Some(err) = self.deferred {
            return Err(err);
        }
        HttpTransport::with_config(self.endpoint, self.config)
    }
}

/// GraphQL-over-HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: String,
    http: reqwest::Client,
    metrics: Arc<TransportMetrics>,
}

impl HttpTransport {
    /// Create a transport with custom configuration.
    pub fn with_config(
        endpoint: impl Into<String>,
        config: HttpTransportConfig,
    ) -> Result<Self, OperationError> {
        let http = reqwest::Client::builder()
            .default_headers(config.headers)
            .timeout(config.timeout)
            .user_agent(format!("kili-graphql/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            http,
            metrics: Arc::new(TransportMetrics::default()),
        })
    }

    /// Endpoint the transport posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Return transport metrics snapshot.
    #[must_use]
    pub fn metrics(&self) -> TransportMetricsSnapshot {
        self.metrics.snapshot()
    }

    async fn send_once(&self, body: &Value) -> Result<Vec<u8>, OperationError> {
        let response = self.http.post(&self.endpoint).json(body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(OperationError::HttpStatus {
                status,
                body: truncate_body(&bytes),
            });
        }
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip_all, fields(endpoint = %self.endpoint))]
    async fn execute(
        &self,
        query: &str,
        variables: Option<&Map<String, Value>>,
    ) -> Result<ResponseEnvelope, OperationError> {
        let mut body = Map::new();
        body.insert("query".to_string(), Value::String(query.to_string()));
        body.insert(
            "variables".to_string(),
            Value::Object(variables.cloned().unwrap_or_default()),
        );
        let body = Value::Object(body);

        self.metrics.requests_total.fetch_add(1, Ordering::Relaxed);
        let result = self
            .send_once(&body)
            .await
            .and_then(|bytes| {
                serde_json::from_slice::<ResponseEnvelope>(&bytes).map_err(OperationError::from)
            });

        match &result {
            Ok(envelope) if envelope.is_ok() => {
                self.metrics
                    .requests_success
                    .fetch_add(1, Ordering::Relaxed);
                debug!("GraphQL request completed");
            }
            Ok(_) => {
                self.metrics.requests_error.fetch_add(1, Ordering::Relaxed);
                debug!("GraphQL request completed with errors");
            }
            Err(err) => {
                self.metrics.requests_error.fetch_add(1, Ordering::Relaxed);
                debug!(error = %err, "GraphQL request failed");
            }
        }
        result
    }
}

fn truncate_body(bytes: &[u8]) -> String {
    const MAX_LEN: usize = 4096;
    let mut body = String::from_utf8_lossy(bytes).to_string();
    if body.len() > MAX_LEN {
        let mut cut = MAX_LEN;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push('…');
    }
    body
}
