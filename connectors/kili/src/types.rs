//! Kili API argument types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Asset labeling status, sent as a bare enum token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetStatus {
    /// Not started.
    #[default]
    Todo,
    /// Being labeled.
    Ongoing,
    /// Labeled.
    Labeled,
    /// Waiting for review.
    ToReview,
    /// Reviewed.
    Reviewed,
}

impl AssetStatus {
    /// GraphQL enum token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::Ongoing => "ONGOING",
            Self::Labeled => "LABELED",
            Self::ToReview => "TO_REVIEW",
            Self::Reviewed => "REVIEWED",
        }
    }
}

/// Arguments of `appendToDataset`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppendToDataset {
    /// Asset content (URL or raw text).
    pub content: String,
    /// Caller-side identifier.
    pub external_id: String,
    /// Original file name.
    #[serde(default)]
    pub filename: String,
    /// Whether the asset is an instruction asset.
    #[serde(default)]
    pub is_instructions: bool,
    /// Instructions text.
    #[serde(default)]
    pub instructions: String,
    /// Whether the asset is a honeypot.
    #[serde(default)]
    pub is_honeypot: bool,
    /// Initial status.
    #[serde(default)]
    pub status: AssetStatus,
    /// Metadata; sent as `{}` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_metadata: Option<Value>,
}

impl AppendToDataset {
    /// Asset with the given content and external id, everything else default.
    #[must_use]
    pub fn new(content: impl Into<String>, external_id: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            external_id: external_id.into(),
            ..Self::default()
        }
    }
}

/// Arguments of `appendManyToDataset`.
///
/// The lists are parallel: index `i` of every list describes asset `i`, so
/// all of them must have the same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppendManyToDataset {
    /// Asset contents.
    pub content_array: Vec<String>,
    /// External ids.
    pub external_id_array: Vec<String>,
    /// File names.
    pub filename_array: Vec<String>,
    /// Instruction flags.
    pub is_instructions_array: Vec<bool>,
    /// Instructions texts.
    pub instructions_array: Vec<String>,
    /// Honeypot flags.
    pub is_honeypot_array: Vec<bool>,
    /// Statuses.
    pub status_array: Vec<AssetStatus>,
    /// Metadata objects.
    pub json_metadata_array: Vec<Value>,
}

impl AppendManyToDataset {
    /// Add one asset to every list.
    #[must_use]
    pub fn push(mut self, asset: AppendToDataset) -> Self {
        self.content_array.push(asset.content);
        self.external_id_array.push(asset.external_id);
        self.filename_array.push(asset.filename);
        self.is_instructions_array.push(asset.is_instructions);
        self.instructions_array.push(asset.instructions);
        self.is_honeypot_array.push(asset.is_honeypot);
        self.status_array.push(asset.status);
        self.json_metadata_array
            .push(asset.json_metadata.unwrap_or_else(empty_object));
        self
    }
}

/// Arguments of `updateAsset`; every field is overwritten.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateAsset {
    /// Asset to update.
    pub asset_id: String,
    /// Project owning the asset.
    pub project_id: String,
    /// Asset content.
    pub content: String,
    /// External id.
    pub external_id: String,
    /// File name.
    pub filename: String,
    /// Instruction flag.
    pub is_instructions: bool,
    /// Instructions text.
    pub instructions: String,
    /// Honeypot flag.
    pub is_honeypot: bool,
    /// Consensus mark.
    pub consensus_mark: f64,
    /// Honeypot mark.
    pub honeypot_mark: f64,
    /// Status.
    pub status: AssetStatus,
    /// Metadata; sent as `{}` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_metadata: Option<Value>,
}

/// Arguments of `updatePropertiesInAsset`. Only set fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetPropertiesUpdate {
    /// New external id.
    pub external_id: Option<String>,
    /// New priority.
    pub priority: Option<i64>,
    /// New metadata. `Some(Value::Null)` is sent as the `null` token, like `None`.
    pub json_metadata: Option<Value>,
    /// New consensus mark.
    pub consensus_mark: Option<f64>,
}

/// Filter for `users` and `countUsers`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFilter {
    /// Match the user owning this API key.
    pub api_key: Option<String>,
    /// Match by email.
    pub email: Option<String>,
    /// Match by organization.
    pub organization_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserWhere<'a> {
    api_key: Option<&'a str>,
    email: Option<&'a str>,
    organization: OrganizationWhere<'a>,
}

#[derive(Serialize)]
pub(crate) struct OrganizationWhere<'a> {
    id: Option<&'a str>,
}

impl UserFilter {
    pub(crate) fn to_where(&self) -> UserWhere<'_> {
        UserWhere {
            api_key: self.api_key.as_deref(),
            email: self.email.as_deref(),
            organization: OrganizationWhere {
                id: self.organization_id.as_deref(),
            },
        }
    }
}

/// Offset pagination passed straight through to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Maximum number of items, `0..=100`.
    pub first: u32,
    /// Number of items skipped.
    pub skip: u32,
}

impl Page {
    /// Largest page the server accepts.
    pub const MAX_FIRST: u32 = 100;
}

impl Default for Page {
    fn default() -> Self {
        Self {
            first: Self::MAX_FIRST,
            skip: 0,
        }
    }
}

pub(crate) fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_tokens_match_serde_names() {
        for status in [
            AssetStatus::Todo,
            AssetStatus::Ongoing,
            AssetStatus::Labeled,
            AssetStatus::ToReview,
            AssetStatus::Reviewed,
        ] {
            assert_eq!(
                serde_json::to_value(status).expect("status"),
                json!(status.as_str())
            );
        }
    }

    #[test]
    fn user_where_keeps_explicit_nulls() {
        let filter = UserFilter {
            email: Some("ann@example.com".into()),
            ..UserFilter::default()
        };
        assert_eq!(
            serde_json::to_value(filter.to_where()).expect("where"),
            json!({"apiKey": null, "email": "ann@example.com", "organization": {"id": null}})
        );
    }

    #[test]
    fn push_fills_every_list_and_defaults_metadata() {
        let batch = AppendManyToDataset::default()
            .push(AppendToDataset::new("a", "e1"))
            .push(AppendToDataset {
                json_metadata: Some(json!({"k": "v"})),
                status: AssetStatus::Labeled,
                ..AppendToDataset::new("b", "e2")
            });
        assert_eq!(batch.content_array, vec!["a", "b"]);
        assert_eq!(batch.status_array, vec![AssetStatus::Todo, AssetStatus::Labeled]);
        assert_eq!(batch.json_metadata_array, vec![json!({}), json!({"k": "v"})]);
        assert_eq!(batch.filename_array.len(), 2);
    }

    #[test]
    fn default_page_is_the_maximum() {
        assert_eq!(Page::default(), Page { first: 100, skip: 0 });
    }
}
