//! Telemetry Schema Library
//!
//! This crate describes the fields a ground station decodes from satellite
//! telemetry and the client configuration edited alongside it:
//!
//! - **Field specs**: label, unit and a closed [`FieldType`] per field id
//! - **Configuration**: the ordered, immutable list of field specs
//! - **Field catalog**: O(1) lookup of a field id to its spec
//! - **Configuration form**: sectioned, typed settings with validation
//!
//! # Example
//!
//! ```rust
//! use tlm_schema::{Configuration, FieldCatalog, RawValue};
//!
//! let config = Configuration::from_json(
//!     r#"{"fields": [{"id": "h1", "label": "Heater", "type": "enum", "enumValues": ["OFF", "ON"]}]}"#,
//! )
//! .unwrap();
//!
//! let catalog = FieldCatalog::build(&config);
//! let heater = catalog.lookup("h1").unwrap();
//! assert_eq!(heater.field_type.decode_enum(&RawValue::from("1")), Some("ON"));
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod field;
pub mod form;
pub mod value;

pub use catalog::FieldCatalog;
pub use config::Configuration;
pub use error::{ConfigError, SchemaError};
pub use field::{FieldSpec, FieldType};
pub use form::{ConfigForm, DropdownOption, FormControl, FormEntry, FormSection};
pub use value::RawValue;
