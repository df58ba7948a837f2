//! Versioned capability table.
//!
//! Which operations each API version offers. The public surface consults it
//! before building a document, so an unsupported call never reaches the
//! transport.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{KiliError, KiliResult};

/// Kili API version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    /// Legacy API.
    V1,
    /// Current API.
    #[default]
    V2,
}

impl ApiVersion {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        }
    }
}

impl Display for ApiVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = KiliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" => Ok(Self::V1),
            "v2" => Ok(Self::V2),
            other => Err(KiliError::Config(format!("unknown API version {other:?}"))),
        }
    }
}

/// One row of the capability table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    /// GraphQL operation name.
    pub operation: &'static str,
    /// Versions offering it.
    pub versions: &'static [ApiVersion],
}

const ALL: &[ApiVersion] = &[ApiVersion::V1, ApiVersion::V2];

/// Every operation of the public surface.
pub static CAPABILITIES: &[Capability] = &[
    Capability {
        operation: "createAssets",
        versions: ALL,
    },
    Capability {
        operation: "deleteAssetsByExternalId",
        versions: ALL,
    },
    Capability {
        operation: "appendToDataset",
        versions: ALL,
    },
    Capability {
        operation: "appendManyToDataset",
        versions: ALL,
    },
    Capability {
        operation: "updateAsset",
        versions: ALL,
    },
    Capability {
        operation: "updatePropertiesInAsset",
        versions: ALL,
    },
    Capability {
        operation: "deleteFromDataset",
        versions: ALL,
    },
    Capability {
        operation: "deleteManyFromDataset",
        versions: ALL,
    },
    Capability {
        operation: "forceUpdateStatus",
        versions: ALL,
    },
    Capability {
        operation: "getProjects",
        versions: ALL,
    },
    Capability {
        operation: "getProject",
        versions: ALL,
    },
    Capability {
        operation: "users",
        versions: ALL,
    },
    Capability {
        operation: "countUsers",
        versions: ALL,
    },
];

/// Versions offering `operation`; `None` for unknown operations.
#[must_use]
pub fn versions_for(operation: &str) -> Option<&'static [ApiVersion]> {
    CAPABILITIES
        .iter()
        .find(|capability| capability.operation == operation)
        .map(|capability| capability.versions)
}

/// Fail with [`KiliError::Unsupported`] unless `version` offers `operation`.
pub fn ensure_supported(operation: &'static str, version: ApiVersion) -> KiliResult<()> {
    match versions_for(operation) {
        Some(versions) if versions.contains(&version) => Ok(()),
        _ => Err(KiliError::Unsupported { operation, version }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_operation_exists_on_both_versions() {
        for capability in CAPABILITIES {
            for version in [ApiVersion::V1, ApiVersion::V2] {
                assert!(
                    ensure_supported(capability.operation, version).is_ok(),
                    "{} on {version}",
                    capability.operation
                );
            }
        }
        for operation in ["createAssets", "deleteAssetsByExternalId", "getProjects"] {
            assert_eq!(versions_for(operation), Some(ALL));
        }
    }

    #[test]
    fn unknown_operations_are_unsupported() {
        assert_eq!(versions_for("dropDatabase"), None);
        assert!(matches!(
            ensure_supported("dropDatabase", ApiVersion::V2),
            Err(KiliError::Unsupported {
                operation: "dropDatabase",
                version: ApiVersion::V2
            })
        ));
    }

    #[test]
    fn table_has_no_duplicates() {
        let mut names: Vec<_> = CAPABILITIES.iter().map(|c| c.operation).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CAPABILITIES.len());
    }

    #[test]
    fn parses_versions() {
        assert_eq!("V1".parse::<ApiVersion>().expect("v1"), ApiVersion::V1);
        assert_eq!(" v2 ".parse::<ApiVersion>().expect("v2"), ApiVersion::V2);
        assert!("v3".parse::<ApiVersion>().is_err());
        assert_eq!(ApiVersion::default().to_string(), "v2");
    }
}
