//! Field id lookup

use std::collections::HashMap;

use tracing::debug;

use crate::config::Configuration;
use crate::field::FieldSpec;

/// Index from field id to its spec, built once per configuration
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    by_id: HashMap<String, FieldSpec>,
}

impl FieldCatalog {
    /// Index the configuration's fields by id
    ///
    /// When an id appears more than once the later spec wins.
    pub fn build(config: &Configuration) -> Self {
        let mut by_id = HashMap::with_capacity(config.len());
        for spec in config.fields() {
            if by_id.insert(spec.id.clone(), spec.clone()).is_some() {
                debug!("Duplicate field id {} in configuration, keeping later spec", spec.id);
            }
        }
        Self { by_id }
    }

    /// Look up a field by id
    pub fn lookup(&self, id: &str) -> Option<&FieldSpec> {
        self.by_id.get(id)
    }

    /// Number of distinct ids
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// True if the catalog has no entries
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
