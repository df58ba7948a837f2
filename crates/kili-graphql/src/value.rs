//! Typed argument values and their GraphQL literal encoding.
//!
//! Every caller-controlled value reaches the document through [`Argument`],
//! so quoting is decided by the variant rather than by the call site:
//! strings are quoted, enum tokens are validated and left bare, and JSON
//! values are serialized with `serde_json` and then quoted a second time so
//! the server receives a string it can parse as JSON.

use std::fmt::Write as _;

use serde_json::Value;

use crate::error::OperationError;

/// A single argument value, tagged with its GraphQL encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// Quoted string literal.
    String(String),
    /// `true` / `false`.
    Boolean(bool),
    /// Integer literal.
    Int(i64),
    /// Float literal; must be finite.
    Float(f64),
    /// Bare enum token such as `TODO`.
    Enum(String),
    /// JSON value sent as a string literal containing its canonical encoding.
    Json(Value),
    /// Input object literal, `{key: value}`.
    Object(Vec<(String, Argument)>),
    /// List literal, `[a, b]`.
    List(Vec<Argument>),
    /// The `null` token.
    Null,
}

impl Argument {
    /// Quoted string argument.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Enum token argument. The token is checked when the document is built.
    #[must_use]
    pub fn enum_token(token: impl Into<String>) -> Self {
        Self::Enum(token.into())
    }

    /// `None` becomes [`Argument::Null`].
    #[must_use]
    pub fn optional<T: Into<Self>>(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }

    /// List of arbitrary arguments.
    #[must_use]
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Self>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// List of bare enum tokens, rendered as `[TODO, DONE]`.
    #[must_use]
    pub fn enum_list<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(tokens.into_iter().map(|t| Self::Enum(t.into())).collect())
    }

    /// List of JSON values, each double-encoded like [`Argument::Json`].
    #[must_use]
    pub fn json_list<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self::List(values.into_iter().map(Self::Json).collect())
    }

    /// Input object from `(key, value)` pairs, in order.
    #[must_use]
    pub fn object<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Self>,
    {
        Self::Object(
            fields
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Number of items when this is a list.
    #[must_use]
    pub fn list_len(&self) -> Option<usize> {
        match self {
            Self::List(items) => Some(items.len()),
            _ => None,
        }
    }

    /// Render the document literal for this value.
    ///
    /// `operation` and `argument` only label the error.
    pub fn to_literal(&self, operation: &str, argument: &str) -> Result<String, OperationError> {
        let mut out = String::new();
        self.write_literal(operation, argument, &mut out)?;
        Ok(out)
    }

    fn write_literal(
        &self,
        operation: &str,
        argument: &str,
        out: &mut String,
    ) -> Result<(), OperationError> {
        match self {
            Self::String(value) => out.push_str(&quote_string(value)),
            Self::Boolean(value) => out.push_str(if *value { "true" } else { "false" }),
            Self::Int(value) => {
                let _ = write!(out, "{value}");
            }
            Self::Float(value) => {
                let number = serde_json::Number::from_f64(*value).ok_or_else(|| {
                    OperationError::encoding(
                        operation,
                        argument,
                        format!("{value} is not a finite float"),
                    )
                })?;
                let _ = write!(out, "{number}");
            }
            Self::Enum(token) => {
                if !is_valid_enum_token(token) {
                    return Err(OperationError::encoding(
                        operation,
                        argument,
                        format!("{token:?} is not a valid enum value"),
                    ));
                }
                out.push_str(token);
            }
            Self::Json(value) => {
                let canonical = serde_json::to_string(value).map_err(|err| {
                    OperationError::encoding(operation, argument, err.to_string())
                })?;
                out.push_str(&quote_string(&canonical));
            }
            Self::Object(fields) => {
                out.push('{');
                for (index, (key, value)) in fields.iter().enumerate() {
                    if !is_valid_name(key) {
                        return Err(OperationError::encoding(
                            operation,
                            argument,
                            format!("{key:?} is not a valid input field name"),
                        ));
                    }
                    if index > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(key);
                    out.push_str(": ");
                    value.write_literal(operation, argument, out)?;
                }
                out.push('}');
            }
            Self::List(items) => {
                out.push('[');
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        out.push_str(", ");
                    }
                    item.write_literal(operation, argument, out)?;
                }
                out.push(']');
            }
            Self::Null => out.push_str("null"),
        }
        Ok(())
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&String> for Argument {
    fn from(value: &String) -> Self {
        Self::String(value.clone())
    }
}

impl From<bool> for Argument {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Argument {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Argument {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for Argument {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Argument {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Value> for Argument {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Argument {
    fn from(value: Option<T>) -> Self {
        Self::optional(value)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Argument {
    fn from(items: Vec<T>) -> Self {
        Self::list(items)
    }
}

/// Quote `value` as a string literal.
///
/// The JSON string grammar is a subset of GraphQL's, so the JSON encoder's
/// escaping of quotes, backslashes and control characters is reused as is.
#[must_use]
pub fn quote_string(value: &str) -> String {
    Value::String(value.to_owned()).to_string()
}

/// `true` when `name` matches the GraphQL `Name` production.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Enum values are names other than `true`, `false` and `null`.
#[must_use]
pub fn is_valid_enum_token(token: &str) -> bool {
    is_valid_name(token) && !matches!(token, "true" | "false" | "null")
}

/// `true` when `type_ref` is a named, list or non-null type reference.
#[must_use]
pub fn is_valid_type_ref(type_ref: &str) -> bool {
    let inner = type_ref.strip_suffix('!').unwrap_or(type_ref);
    match inner.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
        Some(item) => is_valid_type_ref(item),
        None => is_valid_name(inner),
    }
}
