//! Error types for schema loading and configuration editing

use thiserror::Error;

/// Errors that can occur while loading a field schema
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The `type` attribute names no known field type
    #[error("unknown field type `{kind}` for field `{field}`")]
    UnknownFieldType { field: String, kind: String },

    /// An enum field without any value labels
    #[error("enum field `{0}` has no enumValues")]
    MissingEnumValues(String),

    /// A select field without any options
    #[error("select field `{0}` has no options")]
    MissingOptions(String),

    /// A field entry has no id
    #[error("field with label `{0}` has no id")]
    MissingId(String),

    /// JSON decoding failed
    #[error("invalid schema document: {0}")]
    Json(String),
}

/// Errors raised when editing configuration values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Section does not exist in the form
    #[error("section {0} does not exist")]
    UnknownSection(String),

    /// Field does not exist in the section (or configuration)
    #[error("field {section} - {field} does not exist")]
    UnknownField { section: String, field: String },

    /// Value could not be coerced to the field's type
    #[error("{field}: `{value}` is not a valid {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: &'static str,
    },

    /// Select/enum value outside the permitted list
    #[error("{field} only supports values: {allowed:?}")]
    OptionNotAllowed { field: String, allowed: Vec<String> },

    /// Schema error while building the form
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        SchemaError::Json(err.to_string())
    }
}
