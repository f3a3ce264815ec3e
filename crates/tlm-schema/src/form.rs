//! Configuration form model
//!
//! The client configuration is grouped into named sections, each holding
//! typed entries with their current value:
//!
//! ```json
//! {
//!   "TNC interface": {
//!     "tnc-ip": { "type": "str", "label": "TNC IP", "requiresRestart": true, "value": "127.0.0.1" }
//!   }
//! }
//! ```
//!
//! [`ConfigForm`] holds that document in order, decides which control each
//! entry is edited with, and validates edits against the entry's
//! [`FieldType`]. Editing never mutates a form; [`ConfigForm::set_value`]
//! returns a new form that shares every untouched section and entry.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ConfigError, SchemaError};
use crate::field::{FieldSpec, FieldType};
use crate::value::RawValue;

/// Editing control for a form entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormControl {
    /// Single-line text input (str, int and float fields)
    Text,
    /// On/off toggle (bool fields)
    Toggle,
    /// Drop-down list; enabled options first, then disabled ones
    Dropdown { options: Vec<DropdownOption> },
}

/// One drop-down entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption {
    /// Displayed text; select fields store it as the value
    pub label: String,
    /// Disabled options are listed but cannot be selected
    pub enabled: bool,
}

/// A configuration entry and its current value
#[derive(Debug, Clone, PartialEq)]
pub struct FormEntry {
    /// Field metadata; `spec.id` is the entry key
    pub spec: FieldSpec,
    /// Current value, if any has been set
    pub value: Option<RawValue>,
}

impl FormEntry {
    /// Entry key within its section
    pub fn key(&self) -> &str {
        &self.spec.id
    }

    /// Control used to edit this entry
    pub fn control(&self) -> FormControl {
        match &self.spec.field_type {
            FieldType::Str | FieldType::Int | FieldType::Float => FormControl::Text,
            FieldType::Bool => FormControl::Toggle,
            FieldType::Select {
                options,
                disabled_options,
            } => FormControl::Dropdown {
                options: options
                    .iter()
                    .map(|o| DropdownOption {
                        label: o.clone(),
                        enabled: true,
                    })
                    .chain(disabled_options.iter().map(|o| DropdownOption {
                        label: o.clone(),
                        enabled: false,
                    }))
                    .collect(),
            },
            FieldType::Enum { values } => FormControl::Dropdown {
                options: values
                    .iter()
                    .map(|v| DropdownOption {
                        label: v.clone(),
                        enabled: true,
                    })
                    .collect(),
            },
        }
    }

    /// Value as shown in a form control; unset values show as empty text
    /// and enum indexes show as their label
    pub fn display_value(&self) -> String {
        let Some(value) = &self.value else {
            return String::new();
        };
        match self.spec.field_type.decode_enum(value) {
            Some(label) => label.to_string(),
            None => value.to_string(),
        }
    }
}

/// Named group of entries
#[derive(Debug, Clone, PartialEq)]
pub struct FormSection {
    name: String,
    entries: Vec<Arc<FormEntry>>,
}

impl FormSection {
    /// Section name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All entries, hidden ones included
    pub fn entries(&self) -> impl Iterator<Item = &FormEntry> + '_ {
        self.entries.iter().map(Arc::as_ref)
    }

    /// Entries that are shown in the form
    pub fn visible_entries(&self) -> impl Iterator<Item = &FormEntry> + '_ {
        self.entries().filter(|e| e.spec.is_visible())
    }

    /// Entry by key
    pub fn entry(&self, key: &str) -> Option<&FormEntry> {
        self.entries().find(|e| e.key() == key)
    }
}

/// Sectioned configuration form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigForm {
    sections: Vec<Arc<FormSection>>,
}

impl ConfigForm {
    /// Parse a constraints-with-values document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(json).map_err(SchemaError::from)?;
        Self::from_value(value)
    }

    /// Build a form from an already parsed JSON document
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        let Value::Object(sections) = value else {
            return Err(SchemaError::Json("configuration must be an object".into()).into());
        };

        let mut out = Vec::with_capacity(sections.len());
        for (name, section) in sections {
            let Value::Object(fields) = section else {
                return Err(SchemaError::Json(format!("section {} must be an object", name)).into());
            };

            let mut entries = Vec::with_capacity(fields.len());
            for (key, attrs) in fields {
                let Value::Object(mut attrs) = attrs else {
                    return Err(
                        SchemaError::Json(format!("field {} - {} must be an object", name, key))
                            .into(),
                    );
                };
                let value: Option<RawValue> = match attrs.remove("value") {
                    None | Some(Value::Null) => None,
                    Some(v) => Some(serde_json::from_value(v).map_err(SchemaError::from)?),
                };
                attrs.insert("id".to_string(), Value::String(key));
                let spec: FieldSpec =
                    serde_json::from_value(Value::Object(attrs)).map_err(SchemaError::from)?;
                entries.push(Arc::new(FormEntry { spec, value }));
            }

            out.push(Arc::new(FormSection { name, entries }));
        }

        debug!("Loaded configuration form with {} sections", out.len());
        Ok(Self { sections: out })
    }

    /// Serialize back to the constraints-with-values shape
    pub fn to_json(&self) -> Value {
        let mut doc = Map::new();
        for section in &self.sections {
            let mut fields = Map::new();
            for entry in section.entries() {
                let mut attrs = match serde_json::to_value(&entry.spec) {
                    Ok(Value::Object(attrs)) => attrs,
                    _ => Map::new(),
                };
                attrs.remove("id");
                let value = entry
                    .value
                    .as_ref()
                    .and_then(|v| serde_json::to_value(v).ok())
                    .unwrap_or(Value::Null);
                attrs.insert("value".to_string(), value);
                fields.insert(entry.key().to_string(), Value::Object(attrs));
            }
            doc.insert(section.name.clone(), Value::Object(fields));
        }
        Value::Object(doc)
    }

    /// Plain `{ section: { key: value } }` map for submitting the form
    pub fn values(&self) -> Value {
        let mut doc = Map::new();
        for section in &self.sections {
            let fields: Map<String, Value> = section
                .entries()
                .map(|e| {
                    let value = e
                        .value
                        .as_ref()
                        .and_then(|v| serde_json::to_value(v).ok())
                        .unwrap_or(Value::Null);
                    (e.key().to_string(), value)
                })
                .collect();
            doc.insert(section.name.clone(), Value::Object(fields));
        }
        Value::Object(doc)
    }

    /// Sections in document order
    pub fn sections(&self) -> impl Iterator<Item = &FormSection> + '_ {
        self.sections.iter().map(Arc::as_ref)
    }

    /// Section by name
    pub fn section(&self, name: &str) -> Option<&FormSection> {
        self.sections().find(|s| s.name == name)
    }

    /// Current value of an entry
    pub fn value(&self, section: &str, key: &str) -> Option<&RawValue> {
        self.section(section)?.entry(key)?.value.as_ref()
    }

    /// Return a form with `section`/`key` set to `value`
    ///
    /// The value is validated and coerced against the entry's type first.
    pub fn set_value(
        &self,
        section: &str,
        key: &str,
        value: impl Into<RawValue>,
    ) -> Result<Self, ConfigError> {
        let section_pos = self
            .sections
            .iter()
            .position(|s| s.name == section)
            .ok_or_else(|| ConfigError::UnknownSection(section.to_string()))?;
        let current = &self.sections[section_pos];
        let entry_pos = current
            .entries
            .iter()
            .position(|e| e.key() == key)
            .ok_or_else(|| ConfigError::UnknownField {
                section: section.to_string(),
                field: key.to_string(),
            })?;

        let entry = &current.entries[entry_pos];
        let coerced = coerce(&entry.spec, value.into())?;

        let mut entries = current.entries.clone();
        entries[entry_pos] = Arc::new(FormEntry {
            spec: entry.spec.clone(),
            value: Some(coerced),
        });

        let mut sections = self.sections.clone();
        sections[section_pos] = Arc::new(FormSection {
            name: current.name.clone(),
            entries,
        });
        Ok(Self { sections })
    }

    /// Entries whose value differs from `previous`, as `(section, entry)` pairs
    pub fn changed_since<'a>(&'a self, previous: &ConfigForm) -> Vec<(&'a str, &'a FormEntry)> {
        let mut changed = Vec::new();
        for section in &self.sections {
            let before = previous.sections.iter().find(|s| s.name == section.name);
            if before.is_some_and(|b| Arc::ptr_eq(b, section)) {
                continue;
            }
            for entry in &section.entries {
                let old = before.and_then(|b| b.entries.iter().find(|e| e.key() == entry.key()));
                let same = old.is_some_and(|o| Arc::ptr_eq(o, entry) || o.value == entry.value);
                if !same {
                    changed.push((section.name.as_str(), entry.as_ref()));
                }
            }
        }
        changed
    }

    /// Whether applying this form over `previous` needs a restart
    pub fn requires_restart(&self, previous: &ConfigForm) -> bool {
        self.changed_since(previous)
            .iter()
            .any(|(_, e)| e.spec.requires_restart)
    }
}

fn invalid(spec: &FieldSpec, value: &RawValue, expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        field: spec.id.clone(),
        value: value.to_string(),
        expected,
    }
}

/// Validate `value` against the spec's type and convert it to canonical form
///
/// Enum fields accept a label or an index and are stored as the index, the
/// same encoding telemetry packets use.
pub fn coerce(spec: &FieldSpec, value: RawValue) -> Result<RawValue, ConfigError> {
    match &spec.field_type {
        FieldType::Str => Ok(RawValue::Str(value.to_string())),
        FieldType::Int => match &value {
            RawValue::Int(_) => Ok(value),
            RawValue::Str(s) => s
                .trim()
                .parse()
                .map(RawValue::Int)
                .map_err(|_| invalid(spec, &value, "integer")),
            _ => Err(invalid(spec, &value, "integer")),
        },
        FieldType::Float => match &value {
            RawValue::Float(_) => Ok(value),
            RawValue::Int(n) => Ok(RawValue::Float(*n as f64)),
            RawValue::Str(s) => s
                .trim()
                .parse()
                .map(RawValue::Float)
                .map_err(|_| invalid(spec, &value, "float")),
            RawValue::Bool(_) => Err(invalid(spec, &value, "float")),
        },
        FieldType::Bool => match &value {
            RawValue::Bool(_) => Ok(value),
            RawValue::Str(s) if s.eq_ignore_ascii_case("true") => Ok(RawValue::Bool(true)),
            RawValue::Str(s) if s.eq_ignore_ascii_case("false") => Ok(RawValue::Bool(false)),
            _ => Err(invalid(spec, &value, "boolean")),
        },
        FieldType::Select { options, .. } => {
            let text = value.to_string();
            if options.contains(&text) {
                Ok(RawValue::Str(text))
            } else {
                Err(ConfigError::OptionNotAllowed {
                    field: spec.id.clone(),
                    allowed: options.clone(),
                })
            }
        }
        FieldType::Enum { values } => {
            let index = match &value {
                RawValue::Str(s) => values
                    .iter()
                    .position(|v| v == s)
                    .or_else(|| s.trim().parse().ok()),
                RawValue::Int(n) => usize::try_from(*n).ok(),
                _ => None,
            };
            match index.filter(|i| *i < values.len()) {
                Some(i) => Ok(RawValue::Int(i as i64)),
                None => Err(ConfigError::OptionNotAllowed {
                    field: spec.id.clone(),
                    allowed: values.clone(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client_form() -> ConfigForm {
        ConfigForm::from_value(json!({
            "Mission Control": {
                "relay-enabled": { "type": "bool", "label": "Relay enabled", "value": "false" },
                "norad-id": { "type": "int", "label": "Norad ID", "value": "43017" },
                "longitude": { "type": "float", "label": "Longitude", "value": null }
            },
            "TNC interface": {
                "tnc-protocol-type": {
                    "type": "select",
                    "requiresRestart": true,
                    "options": ["KISS"],
                    "disabledOptions": ["AGW"],
                    "label": "TNC protocol type",
                    "value": "KISS"
                },
                "tnc-ip": { "type": "str", "requiresRestart": true, "label": "TNC IP", "value": "127.0.0.1" },
                "max-connection-attempts": {
                    "type": "int",
                    "requiresRestart": true,
                    "label": "Max connection attempts",
                    "hidden": true,
                    "value": "5"
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_sections_keep_document_order() {
        let form = client_form();
        let names: Vec<_> = form.sections().map(|s| s.name()).collect();
        assert_eq!(names, vec!["Mission Control", "TNC interface"]);
    }

    #[test]
    fn test_hidden_entries_not_visible() {
        let form = client_form();
        let section = form.section("TNC interface").unwrap();
        let keys: Vec<_> = section.visible_entries().map(|e| e.key()).collect();
        assert_eq!(keys, vec!["tnc-protocol-type", "tnc-ip"]);
        assert!(section.entry("max-connection-attempts").is_some());
    }

    #[test]
    fn test_controls() {
        let form = client_form();
        let mc = form.section("Mission Control").unwrap();
        assert_eq!(mc.entry("relay-enabled").unwrap().control(), FormControl::Toggle);
        assert_eq!(mc.entry("norad-id").unwrap().control(), FormControl::Text);

        let tnc = form.section("TNC interface").unwrap();
        assert_eq!(
            tnc.entry("tnc-protocol-type").unwrap().control(),
            FormControl::Dropdown {
                options: vec![
                    DropdownOption { label: "KISS".into(), enabled: true },
                    DropdownOption { label: "AGW".into(), enabled: false },
                ]
            }
        );
    }

    #[test]
    fn test_null_value_is_unset() {
        let form = client_form();
        let entry = form.section("Mission Control").unwrap().entry("longitude").unwrap();
        assert_eq!(entry.value, None);
        assert_eq!(entry.display_value(), "");
    }

    #[test]
    fn test_set_value_coerces() {
        let form = client_form();
        let form = form.set_value("Mission Control", "norad-id", " 25544 ").unwrap();
        let form = form.set_value("Mission Control", "relay-enabled", "TRUE").unwrap();
        let form = form.set_value("Mission Control", "longitude", "24.94").unwrap();

        assert_eq!(form.value("Mission Control", "norad-id"), Some(&RawValue::Int(25544)));
        assert_eq!(form.value("Mission Control", "relay-enabled"), Some(&RawValue::Bool(true)));
        assert_eq!(form.value("Mission Control", "longitude"), Some(&RawValue::Float(24.94)));
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let form = client_form();
        let err = form.set_value("Mission Control", "norad-id", "abc").unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                field: "norad-id".into(),
                value: "abc".into(),
                expected: "integer",
            }
        );

        let err = form.set_value("Mission Control", "relay-enabled", "yes").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { expected: "boolean", .. }));
    }

    #[test]
    fn test_disabled_option_rejected() {
        let form = client_form();
        let err = form.set_value("TNC interface", "tnc-protocol-type", "AGW").unwrap_err();
        assert_eq!(
            err,
            ConfigError::OptionNotAllowed {
                field: "tnc-protocol-type".into(),
                allowed: vec!["KISS".into()],
            }
        );
    }

    #[test]
    fn test_unknown_targets() {
        let form = client_form();
        assert_eq!(
            form.set_value("Nope", "x", "1").unwrap_err(),
            ConfigError::UnknownSection("Nope".into())
        );
        assert!(matches!(
            form.set_value("TNC interface", "x", "1").unwrap_err(),
            ConfigError::UnknownField { .. }
        ));
    }

    #[test]
    fn test_set_value_shares_untouched_sections() {
        let form = client_form();
        let updated = form.set_value("TNC interface", "tnc-ip", "10.0.0.2").unwrap();

        assert!(Arc::ptr_eq(&form.sections[0], &updated.sections[0]));
        assert!(!Arc::ptr_eq(&form.sections[1], &updated.sections[1]));
        assert!(Arc::ptr_eq(
            &form.sections[1].entries[0],
            &updated.sections[1].entries[0]
        ));
        assert_eq!(form.value("TNC interface", "tnc-ip"), Some(&RawValue::from("127.0.0.1")));
    }

    #[test]
    fn test_changes_and_restart() {
        let form = client_form();
        let relay = form.set_value("Mission Control", "relay-enabled", true).unwrap();
        assert_eq!(relay.changed_since(&form).len(), 1);
        assert!(!relay.requires_restart(&form));

        let ip = relay.set_value("TNC interface", "tnc-ip", "10.0.0.2").unwrap();
        let changed = ip.changed_since(&form);
        assert_eq!(changed.len(), 2);
        assert!(ip.requires_restart(&form));

        let same = form.set_value("TNC interface", "tnc-ip", "127.0.0.1").unwrap();
        assert!(same.changed_since(&form).is_empty());
    }

    #[test]
    fn test_values_map() {
        let form = client_form()
            .set_value("Mission Control", "norad-id", 25544i64)
            .unwrap();
        let values = form.values();
        assert_eq!(values["Mission Control"]["norad-id"], json!(25544));
        assert_eq!(values["Mission Control"]["longitude"], Value::Null);
        assert_eq!(values["TNC interface"]["tnc-ip"], json!("127.0.0.1"));
    }

    #[test]
    fn test_to_json_round_trip() {
        let form = client_form();
        let back = ConfigForm::from_value(form.to_json()).unwrap();
        assert_eq!(back, form);
    }

    #[test]
    fn test_enum_edit_stored_as_index() {
        let spec = FieldSpec::new(
            "mode",
            "Mode",
            "",
            FieldType::Enum {
                values: vec!["SAFE".into(), "NOMINAL".into()],
            },
        );

        let by_label = coerce(&spec, RawValue::from("NOMINAL")).unwrap();
        assert_eq!(by_label, RawValue::Int(1));
        assert_eq!(spec.field_type.decode_enum(&by_label), Some("NOMINAL"));
        assert_eq!(coerce(&spec, RawValue::from(0i64)).unwrap(), RawValue::Int(0));
        assert_eq!(coerce(&spec, RawValue::from("1")).unwrap(), RawValue::Int(1));

        assert!(matches!(
            coerce(&spec, RawValue::from("DEPLOY")),
            Err(ConfigError::OptionNotAllowed { .. })
        ));
        assert!(coerce(&spec, RawValue::from(2i64)).is_err());
        assert!(coerce(&spec, RawValue::from(-1i64)).is_err());

        let entry = FormEntry {
            spec,
            value: Some(by_label),
        };
        assert_eq!(entry.display_value(), "NOMINAL");
    }
}
