//! Kili connector configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::capability::ApiVersion;
use crate::error::{KiliError, KiliResult};

/// Configuration for the Kili connector.
#[derive(Clone, Serialize, Deserialize)]
pub struct KiliConfig {
    /// API key from the Kili account settings
    pub api_key: String,

    /// GraphQL endpoint (default: https://cloud.kili-technology.com/api/label/v2/graphql)
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,

    /// Request timeout
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,

    /// API version the operations are checked against
    #[serde(default)]
    pub api_version: ApiVersion,
}

fn default_api_endpoint() -> String {
    "https://cloud.kili-technology.com/api/label/v2/graphql".into()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl std::fmt::Debug for KiliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KiliConfig")
            .field("api_key", &"[redacted]")
            .field("api_endpoint", &self.api_endpoint)
            .field("timeout", &self.timeout)
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl KiliConfig {
    /// Configuration with `api_key` and every other field at its default.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_endpoint: default_api_endpoint(),
            timeout: default_timeout(),
            api_version: ApiVersion::default(),
        }
    }

    /// Read `KILI_API_KEY`, `KILI_API_ENDPOINT` and `KILI_API_VERSION`.
    pub fn from_env() -> KiliResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`KiliConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> KiliResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("KILI_API_KEY")
            .ok_or_else(|| KiliError::Config("KILI_API_KEY is not set".into()))?;
        let mut config = Self::new(api_key);
        if let Some(endpoint) = lookup("KILI_API_ENDPOINT") {
            config.api_endpoint = endpoint;
        }
        if let Some(version) = lookup("KILI_API_VERSION") {
            config.api_version = version.parse()?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject an empty key or endpoint, and keys that cannot travel in a header.
    pub fn validate(&self) -> KiliResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(KiliError::Config("api_key must not be empty".into()));
        }
        if !self.api_key.bytes().all(|b| b == b' ' || b.is_ascii_graphic()) {
            return Err(KiliError::Config(
                "api_key must only contain printable ASCII characters".into(),
            ));
        }
        if self.api_endpoint.trim().is_empty() {
            return Err(KiliError::Config("api_endpoint must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: KiliConfig = serde_json::from_str(r#"{"api_key": "key"}"#).expect("config");
        assert_eq!(config.api_endpoint, default_api_endpoint());
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.api_version, ApiVersion::V2);
    }

    #[test]
    fn timeout_is_in_seconds() {
        let config: KiliConfig =
            serde_json::from_str(r#"{"api_key": "key", "timeout": 5, "api_version": "v1"}"#)
                .expect("config");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.api_version, ApiVersion::V1);
        let json = serde_json::to_value(&config).expect("serialize");
        assert_eq!(json["timeout"], 5);
    }

    #[test]
    fn reads_environment() {
        let config = KiliConfig::from_lookup(lookup(&[
            ("KILI_API_KEY", "key"),
            ("KILI_API_ENDPOINT", "http://localhost:4000/graphql"),
            ("KILI_API_VERSION", "v1"),
        ]))
        .expect("config");
        assert_eq!(config.api_key, "key");
        assert_eq!(config.api_endpoint, "http://localhost:4000/graphql");
        assert_eq!(config.api_version, ApiVersion::V1);
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let err = KiliConfig::from_lookup(lookup(&[])).expect_err("missing key");
        assert!(matches!(err, KiliError::Config(_)));
    }

    #[test]
    fn bad_version_and_empty_values_are_rejected() {
        assert!(
            KiliConfig::from_lookup(lookup(&[("KILI_API_KEY", "key"), ("KILI_API_VERSION", "v9")]))
                .is_err()
        );
        assert!(KiliConfig::from_lookup(lookup(&[("KILI_API_KEY", " ")])).is_err());
        let mut config = KiliConfig::new("key");
        config.api_endpoint = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn keys_with_control_characters_are_rejected() {
        for key in ["key\n", "\tkey", "k\u{7f}ey", "clé"] {
            let err = KiliConfig::new(key).validate().expect_err("invalid key");
            assert!(matches!(err, KiliError::Config(_)), "{key:?}");
        }
        let err = KiliConfig::from_lookup(lookup(&[("KILI_API_KEY", "key\n")]))
            .expect_err("trailing newline");
        assert!(matches!(err, KiliError::Config(_)));
        assert!(KiliConfig::new("a-valid key_123").validate().is_ok());
    }

    #[test]
    fn debug_redacts_the_key() {
        let rendered = format!("{:?}", KiliConfig::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
    }
}
