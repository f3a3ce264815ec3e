//! Field metadata for telemetry and configuration entries
//!
//! The JSON form of a field keeps the flat shape used by the configuration
//! source (`"type": "enum"` next to `"enumValues"`), while in memory the
//! type-specific attributes live inside the [`FieldType`] variant they belong
//! to.

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::value::RawValue;

/// Value type of a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Free text
    Str,
    /// Integer
    Int,
    /// Floating point number
    Float,
    /// Boolean flag
    Bool,
    /// Enumeration; raw values are indexes into `values`
    Enum {
        /// Labels in index order
        values: Vec<String>,
    },
    /// One of a fixed set of options
    Select {
        /// Options that may be chosen
        options: Vec<String>,
        /// Options that are shown but cannot be chosen
        disabled_options: Vec<String>,
    },
}

impl FieldType {
    /// Type tag as used in the JSON schema
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Str => "str",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::Enum { .. } => "enum",
            FieldType::Select { .. } => "select",
        }
    }

    /// Enumeration labels, if this is an enum field
    pub fn enum_values(&self) -> Option<&[String]> {
        match self {
            FieldType::Enum { values } => Some(values),
            _ => None,
        }
    }

    /// Decode an enum index to its label
    ///
    /// Returns `None` for non-enum types, unparsable values and indexes
    /// outside the label list.
    pub fn decode_enum(&self, value: &RawValue) -> Option<&str> {
        let values = self.enum_values()?;
        let index = usize::try_from(value.parse_index()?).ok()?;
        values.get(index).map(String::as_str)
    }
}

/// Schema entry describing one field's display metadata and value type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FieldSpecRepr", into = "FieldSpecRepr")]
pub struct FieldSpec {
    /// Identifier used by packets and configuration values
    pub id: String,
    /// Display label, doubles as the table header
    pub label: String,
    /// Unit of measurement (may be empty)
    pub unit: String,
    /// Value type
    pub field_type: FieldType,
    /// Hidden fields are left out of forms and tables entirely
    pub hidden: bool,
    /// Changing this value only takes effect after a restart (UI hint only)
    pub requires_restart: bool,
    /// Optional longer description
    pub description: Option<String>,
}

impl FieldSpec {
    /// Create a visible field spec
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        unit: impl Into<String>,
        field_type: FieldType,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            unit: unit.into(),
            field_type,
            hidden: false,
            requires_restart: false,
            description: None,
        }
    }

    /// Mark the field hidden
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Mark the field as requiring a restart when changed
    pub fn requiring_restart(mut self) -> Self {
        self.requires_restart = true;
        self
    }

    /// Whether the field appears in forms and tables
    pub fn is_visible(&self) -> bool {
        !self.hidden
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Flat JSON representation of a [`FieldSpec`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldSpecRepr {
    #[serde(default)]
    id: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    unit: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, alias = "values", skip_serializing_if = "Option::is_none")]
    enum_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    disabled_options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "is_false")]
    hidden: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    requires_restart: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl TryFrom<FieldSpecRepr> for FieldSpec {
    type Error = SchemaError;

    fn try_from(repr: FieldSpecRepr) -> Result<Self, Self::Error> {
        let field_type = match repr.kind.as_str() {
            "str" => FieldType::Str,
            "int" => FieldType::Int,
            "float" => FieldType::Float,
            "bool" => FieldType::Bool,
            "enum" => match repr.enum_values {
                Some(values) if !values.is_empty() => FieldType::Enum { values },
                _ => return Err(SchemaError::MissingEnumValues(repr.id)),
            },
            "select" => match repr.options {
                Some(options) => FieldType::Select {
                    options,
                    disabled_options: repr.disabled_options.unwrap_or_default(),
                },
                None => return Err(SchemaError::MissingOptions(repr.id)),
            },
            other => {
                return Err(SchemaError::UnknownFieldType {
                    field: repr.id,
                    kind: other.to_string(),
                })
            }
        };

        let label = if repr.label.is_empty() {
            repr.id.clone()
        } else {
            repr.label
        };

        Ok(Self {
            id: repr.id,
            label,
            unit: repr.unit,
            field_type,
            hidden: repr.hidden,
            requires_restart: repr.requires_restart,
            description: repr.description,
        })
    }
}

impl From<FieldSpec> for FieldSpecRepr {
    fn from(spec: FieldSpec) -> Self {
        let kind = spec.field_type.name().to_string();
        let (enum_values, options, disabled_options) = match spec.field_type {
            FieldType::Enum { values } => (Some(values), None, None),
            FieldType::Select {
                options,
                disabled_options,
            } => {
                let disabled = (!disabled_options.is_empty()).then_some(disabled_options);
                (None, Some(options), disabled)
            }
            _ => (None, None, None),
        };

        Self {
            id: spec.id,
            label: spec.label,
            unit: spec.unit,
            kind,
            enum_values,
            options,
            disabled_options,
            hidden: spec.hidden,
            requires_restart: spec.requires_restart,
            description: spec.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_enum_field() {
        let spec: FieldSpec = serde_json::from_value(json!({
            "id": "mode",
            "label": "Mode",
            "unit": "",
            "type": "enum",
            "enumValues": ["SAFE", "NOMINAL"]
        }))
        .unwrap();

        assert_eq!(spec.label, "Mode");
        assert_eq!(
            spec.field_type.enum_values(),
            Some(&["SAFE".to_string(), "NOMINAL".to_string()][..])
        );
    }

    #[test]
    fn test_values_alias() {
        let spec: FieldSpec = serde_json::from_value(json!({
            "id": "heater", "label": "Heater", "type": "enum", "values": ["OFF", "ON"]
        }))
        .unwrap();
        assert_eq!(spec.field_type.decode_enum(&RawValue::from("1")), Some("ON"));
    }

    #[test]
    fn test_parse_select_field() {
        let spec: FieldSpec = serde_json::from_value(json!({
            "id": "tnc-protocol-type",
            "type": "select",
            "requiresRestart": true,
            "options": ["KISS"],
            "disabledOptions": ["AGW"],
            "label": "TNC protocol type"
        }))
        .unwrap();

        assert!(spec.requires_restart);
        assert_eq!(
            spec.field_type,
            FieldType::Select {
                options: vec!["KISS".into()],
                disabled_options: vec!["AGW".into()],
            }
        );
        assert_eq!(spec.unit, "");
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = serde_json::from_value::<FieldSpec>(json!({
            "id": "x", "label": "X", "type": "complex"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("unknown field type"));
    }

    #[test]
    fn test_enum_without_values_rejected() {
        let err = serde_json::from_value::<FieldSpec>(json!({
            "id": "x", "label": "X", "type": "enum"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("no enumValues"));
    }

    #[test]
    fn test_serialize_keeps_flat_shape() {
        let spec = FieldSpec::new(
            "mode",
            "Mode",
            "",
            FieldType::Enum {
                values: vec!["A".into(), "B".into()],
            },
        )
        .hidden();

        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "mode",
                "label": "Mode",
                "unit": "",
                "type": "enum",
                "enumValues": ["A", "B"],
                "hidden": true
            })
        );
    }

    #[test]
    fn test_decode_enum_out_of_range() {
        let ty = FieldType::Enum {
            values: vec!["LOW".into(), "HIGH".into()],
        };
        assert_eq!(ty.decode_enum(&RawValue::from("5")), None);
        assert_eq!(ty.decode_enum(&RawValue::from("-1")), None);
        assert_eq!(ty.decode_enum(&RawValue::Int(1)), Some("HIGH"));
        assert_eq!(FieldType::Str.decode_enum(&RawValue::Int(0)), None);
    }
}
