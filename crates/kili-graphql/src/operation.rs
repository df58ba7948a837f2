//! Operation documents and the two ways of building them.
//!
//! [`OperationBuilder`] inlines every argument as a literal and is used by the
//! bulk, array-valued mutations. [`VariablesBuilder`] declares `$variables`
//! and ships their values next to the document; filter-style queries use it.
//! The caller picks the path per operation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::OperationError;
use crate::value::{Argument, is_valid_name, is_valid_type_ref};

/// Root operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Read-only query.
    Query,
    /// Mutation.
    Mutation,
}

impl OperationKind {
    /// Keyword that opens the document.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
        }
    }
}

/// A fully built operation, ready for the transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationDocument {
    operation_name: String,
    kind: OperationKind,
    query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<Map<String, Value>>,
}

impl OperationDocument {
    /// Root field name; also the key of the payload under `data`.
    #[must_use]
    pub fn operation_name(&self) -> &str {
        &self.operation_name
    }

    /// Query or mutation.
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Document text.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Variable map; `None` for documents built with inline literals.
    #[must_use]
    pub const fn variables(&self) -> Option<&Map<String, Value>> {
        self.variables.as_ref()
    }
}

/// Builder for documents whose arguments are inline literals.
#[derive(Debug, Clone)]
pub struct OperationBuilder {
    kind: OperationKind,
    name: String,
    arguments: Vec<(String, Argument)>,
    parallel_groups: Vec<Vec<String>>,
    selection: String,
    deferred: Option<OperationError>,
}

impl OperationBuilder {
    /// Start a document for the root field `name`.
    #[must_use]
    pub fn new(kind: OperationKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            arguments: Vec::new(),
            parallel_groups: Vec::new(),
            selection: String::new(),
            deferred: None,
        }
    }

    /// Start a query document.
    #[must_use]
    pub fn query(name: impl Into<String>) -> Self {
        Self::new(OperationKind::Query, name)
    }

    /// Start a mutation document.
    #[must_use]
    pub fn mutation(name: impl Into<String>) -> Self {
        Self::new(OperationKind::Mutation, name)
    }

    /// Add an argument. Arguments are emitted in insertion order.
    #[must_use]
    pub fn argument(mut self, name: impl Into<String>, value: impl Into<Argument>) -> Self {
        self.arguments.push((name.into(), value.into()));
        self
    }

    /// Add a JSON argument from any serializable value.
    ///
    /// Serialization failures surface from [`OperationBuilder::build`].
    #[must_use]
    pub fn json_argument<T>(mut self, name: impl Into<String>, value: &T) -> Self
    where
        T: Serialize + ?Sized,
    {
        let name = name.into();
        match serde_json::to_value(value) {
            Ok(json) => self.arguments.push((name, Argument::Json(json))),
            Err(err) => {
                if self.deferred.is_none() {
                    self.deferred = Some(OperationError::encoding(
                        self.name.clone(),
                        name,
                        err.to_string(),
                    ));
                }
            }
        }
        self
    }

    /// Add list arguments whose elements correlate by position.
    ///
    /// All lists of one call must have the same length; this is checked by
    /// [`OperationBuilder::build`].
    #[must_use]
    pub fn parallel_lists<I, N>(mut self, lists: I) -> Self
    where
        I: IntoIterator<Item = (N, Vec<Argument>)>,
        N: Into<String>,
    {
        let mut group = Vec::new();
        for (name, items) in lists {
            let name = name.into();
            group.push(name.clone());
            self.arguments.push((name, Argument::List(items)));
        }
        self.parallel_groups.push(group);
        self
    }

    /// Selection set text spliced between the result braces.
    #[must_use]
    pub fn selection(mut self, selection: impl Into<String>) -> Self {
        self.selection = selection.into();
        self
    }

    /// Validate and render the document.
    pub fn build(self) -> Result<OperationDocument, OperationError> {
        check_operation_name(&self.name)?;
        if let Some(err) = self.deferred {
            return Err(err);
        }

        let mut seen = HashSet::new();
        for (name, _) in &self.arguments {
            if !is_valid_name(name) {
                return Err(OperationError::encoding(
                    &self.name,
                    name,
                    "not a valid argument name",
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(OperationError::ArgumentMismatch {
                    operation: self.name.clone(),
                    message: format!("argument `{name}` given more than once"),
                    lengths: Vec::new(),
                });
            }
        }

        for group in &self.parallel_groups {
            check_parallel_group(&self.name, group, &self.arguments)?;
        }

        let mut rendered = Vec::with_capacity(self.arguments.len());
        for (name, value) in &self.arguments {
            rendered.push(format!("{name}: {}", value.to_literal(&self.name, name)?));
        }

        let query = render_document(
            self.kind,
            &self.name,
            "",
            &rendered.join(", "),
            &self.selection,
        );
        debug!(
            operation = %self.name,
            arguments = self.arguments.len(),
            "built inline operation"
        );
        Ok(OperationDocument {
            operation_name: self.name,
            kind: self.kind,
            query,
            variables: None,
        })
    }
}

#[derive(Debug, Clone)]
struct VariableDefinition {
    name: String,
    type_ref: String,
    value: Result<Value, String>,
}

/// Builder for documents whose arguments are bound as `$variables`.
#[derive(Debug, Clone)]
pub struct VariablesBuilder {
    kind: OperationKind,
    name: String,
    variables: Vec<VariableDefinition>,
    selection: String,
}

impl VariablesBuilder {
    /// Start a document for the root field `name`.
    #[must_use]
    pub fn new(kind: OperationKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            variables: Vec::new(),
            selection: String::new(),
        }
    }

    /// Start a query document.
    #[must_use]
    pub fn query(name: impl Into<String>) -> Self {
        Self::new(OperationKind::Query, name)
    }

    /// Declare `$name: type_ref`, pass it as the root field argument `name`,
    /// and bind `value` to it. `None` values are sent as an explicit `null`.
    #[must_use]
    pub fn variable<T>(
        mut self,
        name: impl Into<String>,
        type_ref: impl Into<String>,
        value: &T,
    ) -> Self
    where
        T: Serialize + ?Sized,
    {
        self.variables.push(VariableDefinition {
            name: name.into(),
            type_ref: type_ref.into(),
            value: serde_json::to_value(value).map_err(|err| err.to_string()),
        });
        self
    }

    /// Selection set text spliced between the result braces.
    #[must_use]
    pub fn selection(mut self, selection: impl Into<String>) -> Self {
        self.selection = selection.into();
        self
    }

    /// Validate and render the document and its variable map.
    pub fn build(self) -> Result<OperationDocument, OperationError> {
        check_operation_name(&self.name)?;

        let mut declarations = Vec::with_capacity(self.variables.len());
        let mut arguments = Vec::with_capacity(self.variables.len());
        let mut values = Map::new();
        for definition in self.variables {
            if !is_valid_name(&definition.name) {
                return Err(OperationError::encoding(
                    &self.name,
                    &definition.name,
                    "not a valid variable name",
                ));
            }
            if !is_valid_type_ref(&definition.type_ref) {
                return Err(OperationError::encoding(
                    &self.name,
                    &definition.name,
                    format!("{:?} is not a valid type reference", definition.type_ref),
                ));
            }
            let value = definition.value.map_err(|message| {
                OperationError::encoding(&self.name, &definition.name, message)
            })?;
            if values.insert(definition.name.clone(), value).is_some() {
                return Err(OperationError::ArgumentMismatch {
                    operation: self.name.clone(),
                    message: format!("variable `{}` given more than once", definition.name),
                    lengths: Vec::new(),
                });
            }
            declarations.push(format!("${}: {}", definition.name, definition.type_ref));
            arguments.push(format!("{0}: ${0}", definition.name));
        }

        let header = if declarations.is_empty() {
            String::new()
        } else {
            format!("({})", declarations.join(", "))
        };
        let query = render_document(
            self.kind,
            &self.name,
            &header,
            &arguments.join(", "),
            &self.selection,
        );
        debug!(
            operation = %self.name,
            variables = values.len(),
            "built variable-bound operation"
        );
        Ok(OperationDocument {
            operation_name: self.name,
            kind: self.kind,
            query,
            variables: Some(values),
        })
    }
}

fn check_operation_name(name: &str) -> Result<(), OperationError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(OperationError::encoding(
            name,
            name,
            "not a valid operation name",
        ))
    }
}

fn check_parallel_group(
    operation: &str,
    group: &[String],
    arguments: &[(String, Argument)],
) -> Result<(), OperationError> {
    let lengths: Vec<(String, usize)> = group
        .iter()
        .map(|name| {
            let len = arguments
                .iter()
                .find(|(candidate, _)| candidate == name)
                .and_then(|(_, value)| value.list_len())
                .unwrap_or(0);
            (name.clone(), len)
        })
        .collect();

    let Some((_, expected)) = lengths.first() else {
        return Ok(());
    };
    if lengths.iter().all(|(_, len)| len == expected) {
        return Ok(());
    }

    let summary = lengths
        .iter()
        .map(|(name, len)| format!("{name}={len}"))
        .collect::<Vec<_>>()
        .join(", ");
    Err(OperationError::ArgumentMismatch {
        operation: operation.to_string(),
        message: format!("parallel lists differ in length ({summary})"),
        lengths,
    })
}

fn render_document(
    kind: OperationKind,
    name: &str,
    header: &str,
    arguments: &str,
    selection: &str,
) -> String {
    let mut field = name.to_string();
    if !arguments.is_empty() {
        field.push('(');
        field.push_str(arguments);
        field.push(')');
    }
    let selection = selection.trim();
    if !selection.is_empty() {
        field.push_str(" { ");
        field.push_str(selection);
        field.push_str(" }");
    }
    format!("{} {name}{header} {{ {field} }}", kind.keyword())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn inline_mutation_layout() {
        let document = OperationBuilder::mutation("deleteFromDataset")
            .argument("assetID", "asset-1")
            .selection("id")
            .build()
            .expect("document");
        assert_eq!(
            document.query(),
            r#"mutation deleteFromDataset { deleteFromDataset(assetID: "asset-1") { id } }"#
        );
        assert_eq!(document.operation_name(), "deleteFromDataset");
        assert_eq!(document.kind(), OperationKind::Mutation);
        assert!(document.variables().is_none());
    }

    #[test]
    fn parallel_lists_of_equal_length_build() {
        let document = OperationBuilder::mutation("appendManyToDataset")
            .argument("projectID", "p1")
            .parallel_lists([
                ("contentArray", vec![Argument::from("a"), Argument::from("b")]),
                ("externalIDArray", vec![Argument::from("e1"), Argument::from("e2")]),
                (
                    "statusArray",
                    vec![Argument::enum_token("TODO"), Argument::enum_token("DONE")],
                ),
            ])
            .selection("id")
            .build()
            .expect("document");
        assert!(document.query().contains("statusArray: [TODO, DONE]"));
        assert!(document.query().contains(r#"contentArray: ["a", "b"]"#));
        assert!(!document.query().contains(r#""TODO""#));
    }

    #[test]
    fn parallel_lists_of_unequal_length_fail() {
        let err = OperationBuilder::mutation("createAssets")
            .parallel_lists([
                ("contents", vec![Argument::from("a"), Argument::from("b")]),
                ("externalIDs", vec![Argument::from("e1")]),
            ])
            .build()
            .expect_err("mismatch");
        match err {
            OperationError::ArgumentMismatch {
                operation, lengths, ..
            } => {
                assert_eq!(operation, "createAssets");
                assert_eq!(
                    lengths,
                    vec![("contents".to_string(), 2), ("externalIDs".to_string(), 1)]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn duplicate_arguments_fail() {
        let err = OperationBuilder::query("getProject")
            .argument("projectID", "a")
            .argument("projectID", "b")
            .build()
            .expect_err("duplicate");
        assert!(matches!(err, OperationError::ArgumentMismatch { .. }));
    }

    #[test]
    fn unserializable_json_argument_fails_at_build() {
        let mut metadata = BTreeMap::new();
        metadata.insert((1_u8, 2_u8), "tuple keys are not JSON");
        let err = OperationBuilder::mutation("appendToDataset")
            .json_argument("jsonMetadata", &metadata)
            .build()
            .expect_err("encoding");
        assert!(matches!(
            err,
            OperationError::Encoding { ref argument, .. } if argument == "jsonMetadata"
        ));
    }

    #[test]
    fn invalid_names_fail() {
        assert!(OperationBuilder::query("get project").build().is_err());
        assert!(
            OperationBuilder::query("getProject")
                .argument("project id", "x")
                .build()
                .is_err()
        );
    }

    #[test]
    fn scalar_result_has_no_selection_braces() {
        let document = OperationBuilder::query("countAssets")
            .argument("projectID", "p1")
            .build()
            .expect("document");
        assert_eq!(
            document.query(),
            r#"query countAssets { countAssets(projectID: "p1") }"#
        );
    }

    #[test]
    fn variables_document_declares_and_binds() {
        let filter = json!({"apiKey": null, "email": "a@b.c", "organization": {"id": null}});
        let document = VariablesBuilder::query("users")
            .variable("where", "UserWhere!", &filter)
            .variable("first", "PageSize!", &100)
            .variable("skip", "Int!", &0)
            .selection("email id name")
            .build()
            .expect("document");
        assert_eq!(
            document.query(),
            "query users($where: UserWhere!, $first: PageSize!, $skip: Int!) \
             { users(where: $where, first: $first, skip: $skip) { email id name } }"
        );
        let variables = document.variables().expect("variables");
        assert_eq!(variables["where"], filter);
        assert_eq!(variables["first"], json!(100));
        assert_eq!(variables["skip"], json!(0));
    }

    #[test]
    fn absent_optional_variable_is_explicit_null() {
        let document = VariablesBuilder::query("countUsers")
            .variable("organizationID", "ID", &Option::<String>::None)
            .build()
            .expect("document");
        let variables = document.variables().expect("variables");
        assert!(variables.contains_key("organizationID"));
        assert_eq!(variables["organizationID"], Value::Null);
    }

    #[test]
    fn invalid_variable_type_fails() {
        let err = VariablesBuilder::query("users")
            .variable("where", "User Where", &json!({}))
            .build()
            .expect_err("type");
        assert!(matches!(err, OperationError::Encoding { .. }));
    }
}
