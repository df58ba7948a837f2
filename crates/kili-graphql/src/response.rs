//! Response envelope and payload extraction.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{GraphqlError, OperationError};

/// Top-level response body: optional `data`, optional `errors`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Operation results keyed by root field name.
    #[serde(default)]
    pub data: Option<Value>,
    /// Server-reported errors, in order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<GraphqlError>,
    /// Extensions payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<GraphqlError>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<GraphqlError>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ResponseEnvelope {
    /// Envelope carrying `data` only.
    #[must_use]
    pub const fn from_data(data: Value) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
            extensions: None,
        }
    }

    /// Envelope carrying `errors` only.
    #[must_use]
    pub const fn from_errors(errors: Vec<GraphqlError>) -> Self {
        Self {
            data: None,
            errors,
            extensions: None,
        }
    }

    /// Returns `true` if no GraphQL errors were returned.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Borrow the payload of `operation`.
    ///
    /// Errors win over data: a non-empty `errors` list is always a
    /// [`OperationError::Server`] even when `data` is also present.
    pub fn payload(&self, operation: &str) -> Result<&Value, OperationError> {
        if !self.errors.is_empty() {
            return Err(OperationError::Server {
                operation: operation.to_string(),
                errors: self.errors.clone(),
            });
        }
        let data = match &self.data {
            Some(Value::Object(data)) => data,
            Some(Value::Null) | None => {
                return Err(OperationError::protocol(
                    operation,
                    "response has neither data nor errors",
                ));
            }
            Some(_) => {
                return Err(OperationError::protocol(
                    operation,
                    "response data is not an object",
                ));
            }
        };
        match data.get(operation) {
            None => Err(OperationError::protocol(
                operation,
                format!("response data has no `{operation}` entry"),
            )),
            Some(Value::Null) => Err(OperationError::protocol(
                operation,
                format!("`{operation}` is null and no errors were reported"),
            )),
            Some(payload) => Ok(payload),
        }
    }

    /// Consume the envelope and take the payload of `operation`.
    pub fn into_payload(mut self, operation: &str) -> Result<Value, OperationError> {
        if !self.errors.is_empty() {
            return Err(OperationError::Server {
                operation: operation.to_string(),
                errors: self.errors,
            });
        }
        self.payload(operation)?;
        match self.data.as_mut() {
            Some(Value::Object(data)) => data
                .remove(operation)
                .ok_or_else(|| OperationError::protocol(operation, "payload vanished")),
            _ => Err(OperationError::protocol(operation, "payload vanished")),
        }
    }
}

/// Extract the payload of `operation` from `envelope`.
///
/// Pure and idempotent: the envelope is only read.
pub fn extract_payload(
    envelope: &ResponseEnvelope,
    operation: &str,
) -> Result<Value, OperationError> {
    envelope.payload(operation).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(body: Value) -> ResponseEnvelope {
        serde_json::from_value(body).expect("envelope")
    }

    #[test]
    fn returns_payload_for_operation() {
        let env = envelope(json!({"data": {"getProject": {"id": "p1"}}}));
        let payload = extract_payload(&env, "getProject").expect("payload");
        assert_eq!(payload, json!({"id": "p1"}));
    }

    #[test]
    fn server_errors_are_surfaced_verbatim() {
        let env = envelope(json!({"errors": [{"message": "Invalid asset"}]}));
        let err = extract_payload(&env, "appendToDataset").expect_err("server error");
        assert!(matches!(err, OperationError::Server { .. }));
        assert_eq!(err.messages(), vec!["Invalid asset"]);
    }

    #[test]
    fn every_server_message_is_kept_in_order() {
        let env = envelope(json!({
            "data": {"updateAsset": null},
            "errors": [{"message": "first"}, {"message": "second"}, {"message": "third"}]
        }));
        let err = extract_payload(&env, "updateAsset").expect_err("server error");
        assert_eq!(err.messages(), vec!["first", "second", "third"]);
    }

    #[test]
    fn errors_win_over_partial_data() {
        let env = envelope(json!({
            "data": {"users": [{"id": "u1"}]},
            "errors": [{"message": "partial"}]
        }));
        assert!(matches!(
            extract_payload(&env, "users"),
            Err(OperationError::Server { .. })
        ));
    }

    #[test]
    fn missing_key_is_a_protocol_error() {
        let env = envelope(json!({"data": {"somethingElse": 1}}));
        assert!(matches!(
            extract_payload(&env, "getProject"),
            Err(OperationError::Protocol { .. })
        ));
    }

    #[test]
    fn empty_envelope_is_a_protocol_error() {
        for body in [json!({}), json!({"data": null, "errors": null}), json!({"data": []})] {
            let env = envelope(body.clone());
            assert!(
                matches!(
                    extract_payload(&env, "getProject"),
                    Err(OperationError::Protocol { .. })
                ),
                "body {body}"
            );
        }
    }

    #[test]
    fn null_payload_without_errors_is_a_protocol_error() {
        let env = envelope(json!({"data": {"getProject": null}}));
        assert!(matches!(
            extract_payload(&env, "getProject"),
            Err(OperationError::Protocol { .. })
        ));
    }

    #[test]
    fn scalar_and_list_payloads_pass_through() {
        let env = envelope(json!({"data": {"countUsers": 7, "users": [{"id": "u"}]}}));
        assert_eq!(extract_payload(&env, "countUsers").expect("count"), json!(7));
        assert_eq!(
            extract_payload(&env, "users").expect("users"),
            json!([{"id": "u"}])
        );
    }

    #[test]
    fn extraction_is_idempotent() {
        let ok = envelope(json!({"data": {"getProject": {"id": "p1"}}}));
        assert_eq!(
            extract_payload(&ok, "getProject").expect("first"),
            extract_payload(&ok, "getProject").expect("second")
        );

        let failed = envelope(json!({"errors": [{"message": "Invalid asset"}]}));
        let first = extract_payload(&failed, "getProject").expect_err("first");
        let second = extract_payload(&failed, "getProject").expect_err("second");
        assert_eq!(first.to_string(), second.to_string());
        assert_eq!(first.messages(), second.messages());
    }

    #[test]
    fn into_payload_moves_the_value_out() {
        let env = ResponseEnvelope::from_data(json!({
            "forceUpdateStatus": {"id": "a", "status": "TODO"}
        }));
        let payload = env.into_payload("forceUpdateStatus").expect("payload");
        assert_eq!(payload["status"], "TODO");

        let env = ResponseEnvelope::from_errors(vec![GraphqlError::new("boom")]);
        assert_eq!(
            env.into_payload("forceUpdateStatus")
                .expect_err("server")
                .messages(),
            vec!["boom"]
        );
    }
}
