//! Asset mutations.
//!
//! These operations take array-valued arguments and are built with inline
//! literals.

use kili_graphql::{Argument, OperationBuilder};
use serde_json::Value;
use tracing::instrument;

use crate::client::KiliClient;
use crate::error::KiliResult;
use crate::types::{
    AppendManyToDataset, AppendToDataset, AssetPropertiesUpdate, UpdateAsset, empty_object,
};

const CREATED_ASSET_FIELDS: &str =
    "id content externalId createdAt updatedAt isHoneypot status jsonMetadata";

fn strings<S: AsRef<str>>(items: &[S]) -> Vec<Argument> {
    items.iter().map(|item| Argument::from(item.as_ref())).collect()
}

fn flags(items: &[bool]) -> Vec<Argument> {
    items.iter().copied().map(Argument::from).collect()
}

impl KiliClient {
    /// Create one asset per `(content, external id)` pair.
    #[instrument(skip(self, contents, external_ids), fields(assets = contents.len()))]
    pub async fn create_assets<S: AsRef<str>, E: AsRef<str>>(
        &self,
        project_id: &str,
        contents: &[S],
        external_ids: &[E],
    ) -> KiliResult<Value> {
        self.run("createAssets", || {
            OperationBuilder::mutation("createAssets")
                .argument("projectID", project_id)
                .parallel_lists([
                    ("contents", strings(contents)),
                    ("externalIDs", strings(external_ids)),
                ])
                .selection(CREATED_ASSET_FIELDS)
                .build()
        })
        .await
    }

    /// Delete the asset with `external_id` in a project.
    #[instrument(skip(self))]
    pub async fn delete_assets_by_external_id(
        &self,
        project_id: &str,
        external_id: &str,
    ) -> KiliResult<Value> {
        self.run("deleteAssetsByExternalId", || {
            OperationBuilder::mutation("deleteAssetsByExternalId")
                .argument("projectID", project_id)
                .argument("externalID", external_id)
                .selection("id")
                .build()
        })
        .await
    }

    /// Append a single asset to a project's dataset.
    #[instrument(skip(self, asset), fields(external_id = %asset.external_id))]
    pub async fn append_to_dataset(
        &self,
        project_id: &str,
        asset: &AppendToDataset,
    ) -> KiliResult<Value> {
        let metadata = asset.json_metadata.clone().unwrap_or_else(empty_object);
        self.run("appendToDataset", || {
            OperationBuilder::mutation("appendToDataset")
                .argument("projectID", project_id)
                .argument("content", &asset.content)
                .argument("externalID", &asset.external_id)
                .argument("filename", &asset.filename)
                .argument("isInstructions", asset.is_instructions)
                .argument("instructions", &asset.instructions)
                .argument("isHoneypot", asset.is_honeypot)
                .argument("status", Argument::enum_token(asset.status.as_str()))
                .argument("jsonMetadata", metadata)
                .selection("id")
                .build()
        })
        .await
    }

    /// Append several assets at once.
    ///
    /// Every list of `assets` must have the same length; otherwise the call
    /// fails with an argument mismatch before anything is sent.
    #[instrument(skip(self, assets), fields(assets = assets.content_array.len()))]
    pub async fn append_many_to_dataset(
        &self,
        project_id: &str,
        assets: &AppendManyToDataset,
    ) -> KiliResult<Value> {
        self.run("appendManyToDataset", || {
            OperationBuilder::mutation("appendManyToDataset")
                .argument("projectID", project_id)
                .parallel_lists([
                    ("contentArray", strings(&assets.content_array)),
                    ("externalIDArray", strings(&assets.external_id_array)),
                    ("filenameArray", strings(&assets.filename_array)),
                    ("isInstructionsArray", flags(&assets.is_instructions_array)),
                    ("instructionsArray", strings(&assets.instructions_array)),
                    ("isHoneypotArray", flags(&assets.is_honeypot_array)),
                    (
                        "statusArray",
                        assets
                            .status_array
                            .iter()
                            .map(|status| Argument::enum_token(status.as_str()))
                            .collect(),
                    ),
                    (
                        "jsonMetadataArray",
                        assets
                            .json_metadata_array
                            .iter()
                            .cloned()
                            .map(Argument::Json)
                            .collect(),
                    ),
                ])
                .selection("id")
                .build()
        })
        .await
    }

    /// Overwrite every property of an asset.
    #[instrument(skip(self, update), fields(asset_id = %update.asset_id))]
    pub async fn update_asset(&self, update: &UpdateAsset) -> KiliResult<Value> {
        let metadata = update.json_metadata.clone().unwrap_or_else(empty_object);
        self.run("updateAsset", || {
            OperationBuilder::mutation("updateAsset")
                .argument("assetID", &update.asset_id)
                .argument("projectID", &update.project_id)
                .argument("content", &update.content)
                .argument("externalID", &update.external_id)
                .argument("filename", &update.filename)
                .argument("isInstructions", update.is_instructions)
                .argument("instructions", &update.instructions)
                .argument("isHoneypot", update.is_honeypot)
                .argument("consensusMark", update.consensus_mark)
                .argument("honeypotMark", update.honeypot_mark)
                .argument("status", Argument::enum_token(update.status.as_str()))
                .argument("jsonMetadata", metadata)
                .selection("id")
                .build()
        })
        .await
    }

    /// Update selected properties of an asset; unset fields are sent as `null`.
    #[instrument(skip(self, properties))]
    pub async fn update_properties_in_asset(
        &self,
        asset_id: &str,
        properties: &AssetPropertiesUpdate,
    ) -> KiliResult<Value> {
        let data = Argument::object([
            ("externalId", Argument::optional(properties.external_id.as_deref())),
            ("priority", Argument::optional(properties.priority)),
            (
                "jsonMetadata",
                Argument::optional(
                    properties
                        .json_metadata
                        .clone()
                        .filter(|metadata| !metadata.is_null()),
                ),
            ),
            ("consensusMark", Argument::optional(properties.consensus_mark)),
        ]);
        self.run("updatePropertiesInAsset", || {
            OperationBuilder::mutation("updatePropertiesInAsset")
                .argument("where", Argument::object([("id", asset_id)]))
                .argument("data", data)
                .selection("id")
                .build()
        })
        .await
    }

    /// Remove an asset from its dataset.
    #[instrument(skip(self))]
    pub async fn delete_from_dataset(&self, asset_id: &str) -> KiliResult<Value> {
        self.run("deleteFromDataset", || {
            OperationBuilder::mutation("deleteFromDataset")
                .argument("assetID", asset_id)
                .selection("id")
                .build()
        })
        .await
    }

    /// Remove several assets.
    #[instrument(skip(self, asset_ids), fields(assets = asset_ids.len()))]
    pub async fn delete_many_from_dataset<S: AsRef<str>>(
        &self,
        asset_ids: &[S],
    ) -> KiliResult<Value> {
        self.run("deleteManyFromDataset", || {
            OperationBuilder::mutation("deleteManyFromDataset")
                .argument("assetIDs", Argument::List(strings(asset_ids)))
                .selection("id")
                .build()
        })
        .await
    }

    /// Recompute an asset's status server-side.
    #[instrument(skip(self))]
    pub async fn force_update_status(&self, asset_id: &str) -> KiliResult<Value> {
        self.run("forceUpdateStatus", || {
            OperationBuilder::mutation("forceUpdateStatus")
                .argument("assetID", asset_id)
                .selection("id status")
                .build()
        })
        .await
    }
}
