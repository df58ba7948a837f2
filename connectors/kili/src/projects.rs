//! Project queries.

use kili_graphql::{OperationBuilder, OperationError};
use serde_json::Value;
use tracing::instrument;

use crate::client::KiliClient;
use crate::error::KiliResult;
use crate::fields::FieldSelection;

const PROJECT_FIELDS: &[&str] = &[
    "id",
    "title",
    "numberOfAssets",
    "completionPercentage",
    "numberOfAssetsWithoutLabel",
    "numberOfAssetsWithEmptyLabels",
    "numberOfReviewedAssets",
    "numberOfLatestLabels",
    "roles.id",
    "roles.user.id",
    "roles.user.name",
    "roles.user.email",
    "roles.user.organization.id",
    "roles.role",
    "roles.lastLabelingAt",
    "roles.numberOfAnnotations",
    "roles.totalDuration",
    "roles.durationPerLabel",
    "roles.honeypotMark",
    "dataset.id",
    "dataset.honeypotMark",
];

fn project_selection() -> Result<FieldSelection, OperationError> {
    FieldSelection::from_paths("getProjects", PROJECT_FIELDS)
}

impl KiliClient {
    /// Projects a user takes part in, with roles and dataset marks.
    #[instrument(skip(self))]
    pub async fn get_projects(&self, user_id: &str) -> KiliResult<Value> {
        self.run("getProjects", || {
            OperationBuilder::query("getProjects")
                .argument("userID", user_id)
                .selection(project_selection()?.to_string())
                .build()
        })
        .await
    }

    /// A single project's id.
    #[instrument(skip(self))]
    pub async fn get_project(&self, project_id: &str) -> KiliResult<Value> {
        self.run("getProject", || {
            OperationBuilder::query("getProject")
                .argument("projectID", project_id)
                .selection("id")
                .build()
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_selection_nests_roles_and_dataset() {
        let selection = project_selection().expect("selection").to_string();
        assert!(selection.starts_with("id title numberOfAssets"));
        assert!(selection.contains(
            "roles { id user { id name email organization { id } } role lastLabelingAt"
        ));
        assert!(selection.ends_with("dataset { id honeypotMark }"));
    }
}
