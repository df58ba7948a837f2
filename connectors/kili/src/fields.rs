//! Result field selection from dotted field paths.

use std::fmt::{Display, Formatter};

use kili_graphql::{OperationError, is_valid_name};

/// Fields requested from `users` when the caller does not choose.
pub const DEFAULT_USER_FIELDS: &[&str] = &["email", "id", "name"];

#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldNode {
    name: String,
    children: FieldSelection,
}

/// Nested selection set built from paths such as `organization.id`.
///
/// Fields keep the order in which they were first named; paths sharing a
/// prefix are merged under one sub-selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelection {
    fields: Vec<FieldNode>,
}

impl FieldSelection {
    /// Parse `paths` for `operation` (used to label errors).
    pub fn from_paths<I, S>(operation: &str, paths: I) -> Result<Self, OperationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::default();
        for path in paths {
            let path = path.as_ref();
            let segments: Vec<&str> = path.split('.').collect();
            if let Some(bad) = segments.iter().find(|segment| !is_valid_name(segment)) {
                return Err(OperationError::Encoding {
                    operation: operation.to_string(),
                    argument: path.to_string(),
                    message: format!("{bad:?} is not a valid field name"),
                });
            }
            selection.insert(&segments);
        }
        Ok(selection)
    }

    fn insert(&mut self, segments: &[&str]) {
        let Some((head, rest)) = segments.split_first() else {
            return;
        };
        let position = match self.fields.iter().position(|node| node.name == *head) {
            Some(position) => position,
            None => {
                self.fields.push(FieldNode {
                    name: (*head).to_string(),
                    children: Self::default(),
                });
                self.fields.len() - 1
            }
        };
        self.fields[position].children.insert(rest);
    }

    /// Returns `true` if no field was selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Display for FieldSelection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, node) in self.fields.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&node.name)?;
            if !node.children.is_empty() {
                write!(f, " {{ {} }}", node.children)?;
            }
        }
        Ok(())
    }
}
