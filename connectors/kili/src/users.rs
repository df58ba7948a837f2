//! User queries, built with bound variables.

use kili_graphql::{OperationError, VariablesBuilder};
use serde_json::{Value, json};
use tracing::instrument;

use crate::client::KiliClient;
use crate::error::{KiliError, KiliResult};
use crate::fields::{DEFAULT_USER_FIELDS, FieldSelection};
use crate::types::{Page, UserFilter};

fn check_page(page: Page) -> Result<(), OperationError> {
    if page.first > Page::MAX_FIRST {
        return Err(OperationError::Encoding {
            operation: "users".into(),
            argument: "first".into(),
            message: format!("{} is outside 0..={}", page.first, Page::MAX_FIRST),
        });
    }
    Ok(())
}

impl KiliClient {
    /// Users matching `filter`, with the requested `fields`.
    ///
    /// An empty `fields` selects [`DEFAULT_USER_FIELDS`].
    #[instrument(skip(self, filter, fields))]
    pub async fn users<S: AsRef<str>>(
        &self,
        filter: &UserFilter,
        fields: &[S],
        page: Page,
    ) -> KiliResult<Value> {
        self.run("users", || {
            check_page(page)?;
            let selection = if fields.is_empty() {
                FieldSelection::from_paths("users", DEFAULT_USER_FIELDS)?
            } else {
                FieldSelection::from_paths("users", fields)?
            };
            VariablesBuilder::query("users")
                .variable("where", "UserWhere!", &filter.to_where())
                .variable("first", "PageSize!", &page.first)
                .variable("skip", "Int!", &page.skip)
                .selection(selection.to_string())
                .build()
        })
        .await
    }

    /// Number of users in an organization, or in total without one.
    #[instrument(skip(self))]
    pub async fn count_users(&self, organization_id: Option<&str>) -> KiliResult<u64> {
        let filter = json!({"organization": {"id": organization_id}});
        let payload = self
            .run("countUsers", || {
                VariablesBuilder::query("countUsers")
                    .variable("where", "UserWhere!", &filter)
                    .build()
            })
            .await?;
        payload.as_u64().ok_or_else(|| {
            KiliError::Operation(OperationError::Protocol {
                operation: "countUsers".into(),
                message: format!("expected a non-negative integer, got {payload}"),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_above_the_maximum_are_rejected() {
        assert!(check_page(Page::default()).is_ok());
        assert!(check_page(Page { first: 0, skip: 5 }).is_ok());
        let err = check_page(Page { first: 101, skip: 0 }).expect_err("too large");
        assert!(err.is_pre_flight());
        assert!(matches!(
            err,
            OperationError::Encoding { ref argument, .. } if argument == "first"
        ));
    }
}
