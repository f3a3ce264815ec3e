//! Telemetry field configuration
//!
//! A [`Configuration`] is the ordered list of [`FieldSpec`]s supplied by the
//! configuration source. It is never mutated in place: edits return a new
//! configuration that shares every untouched spec with the old one.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, SchemaError};
use crate::field::FieldSpec;

/// Ordered, immutable sequence of field specs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ConfigurationRepr")]
pub struct Configuration {
    fields: Vec<Arc<FieldSpec>>,
}

#[derive(Deserialize)]
struct ConfigurationRepr {
    #[serde(default)]
    fields: Vec<FieldSpec>,
}

impl TryFrom<ConfigurationRepr> for Configuration {
    type Error = SchemaError;

    fn try_from(repr: ConfigurationRepr) -> Result<Self, Self::Error> {
        Configuration::new(repr.fields)
    }
}

impl Configuration {
    /// Build a configuration, rejecting specs without an id
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, SchemaError> {
        if let Some(spec) = fields.iter().find(|f| f.id.is_empty()) {
            return Err(SchemaError::MissingId(spec.label.clone()));
        }
        Ok(Self {
            fields: fields.into_iter().map(Arc::new).collect(),
        })
    }

    /// Parse a `{ "fields": [...] }` document
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    /// All field specs in configuration order
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> + '_ {
        self.fields.iter().map(Arc::as_ref)
    }

    /// Field specs that are not hidden, in configuration order
    pub fn visible_fields(&self) -> impl Iterator<Item = &FieldSpec> + '_ {
        self.fields().filter(|f| f.is_visible())
    }

    /// Number of field specs (hidden ones included)
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if there are no field specs at all
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First spec with the given id
    pub fn get(&self, id: &str) -> Option<&FieldSpec> {
        self.fields().find(|f| f.id == id)
    }

    /// Return a configuration where the spec `id` is replaced by `update(spec)`
    ///
    /// Every other spec is shared with `self`.
    pub fn with_field<F>(&self, id: &str, update: F) -> Result<Self, ConfigError>
    where
        F: FnOnce(&FieldSpec) -> FieldSpec,
    {
        let pos = self.position(id)?;
        let mut fields = self.fields.clone();
        fields[pos] = Arc::new(update(&self.fields[pos]));
        Ok(Self { fields })
    }

    /// Return a configuration without the spec `id`
    pub fn without_field(&self, id: &str) -> Result<Self, ConfigError> {
        let pos = self.position(id)?;
        let mut fields = self.fields.clone();
        fields.remove(pos);
        Ok(Self { fields })
    }

    /// Return a configuration with `spec` appended
    pub fn with_appended(&self, spec: FieldSpec) -> Result<Self, SchemaError> {
        if spec.id.is_empty() {
            return Err(SchemaError::MissingId(spec.label));
        }
        let mut fields = self.fields.clone();
        fields.push(Arc::new(spec));
        Ok(Self { fields })
    }

    fn position(&self, id: &str) -> Result<usize, ConfigError> {
        self.fields
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| ConfigError::UnknownField {
                section: "fields".to_string(),
                field: id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldType;

    fn sample() -> Configuration {
        Configuration::new(vec![
            FieldSpec::new("v1", "Voltage", "V", FieldType::Float),
            FieldSpec::new("t1", "Temperature", "C", FieldType::Float),
            FieldSpec::new("dbg", "Debug counter", "", FieldType::Int).hidden(),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_json() {
        let config = Configuration::from_json(
            r#"{"fields": [
                {"id": "v1", "label": "Voltage", "unit": "V", "type": "float"},
                {"id": "h", "label": "Heater", "unit": "", "type": "enum", "enumValues": ["OFF", "ON"]}
            ]}"#,
        )
        .unwrap();

        assert_eq!(config.len(), 2);
        assert_eq!(config.get("h").unwrap().label, "Heater");
    }

    #[test]
    fn test_missing_id_rejected() {
        let err = Configuration::from_json(r#"{"fields": [{"label": "Voltage", "type": "float"}]}"#)
            .unwrap_err();
        assert!(matches!(err, SchemaError::Json(msg) if msg.contains("has no id")));
    }

    #[test]
    fn test_visible_fields_skip_hidden() {
        let config = sample();
        let labels: Vec<_> = config.visible_fields().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["Voltage", "Temperature"]);
    }

    #[test]
    fn test_with_field_shares_untouched_specs() {
        let config = sample();
        let updated = config
            .with_field("t1", |spec| FieldSpec {
                unit: "K".to_string(),
                ..spec.clone()
            })
            .unwrap();

        assert_eq!(updated.get("t1").unwrap().unit, "K");
        assert_eq!(config.get("t1").unwrap().unit, "C");
        assert!(Arc::ptr_eq(&config.fields[0], &updated.fields[0]));
        assert!(Arc::ptr_eq(&config.fields[2], &updated.fields[2]));
        assert!(!Arc::ptr_eq(&config.fields[1], &updated.fields[1]));
    }

    #[test]
    fn test_with_unknown_field() {
        let err = sample().with_field("nope", |s| s.clone()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownField { field, .. } if field == "nope"));
    }

    #[test]
    fn test_without_field() {
        let config = sample().without_field("v1").unwrap();
        assert_eq!(config.len(), 2);
        assert!(config.get("v1").is_none());
    }

    #[test]
    fn test_serialize_round_shape() {
        let config = sample();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["fields"][0]["type"], "float");
        assert_eq!(json["fields"][2]["hidden"], true);
        let back: Configuration = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }
}
