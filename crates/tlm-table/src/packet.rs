//! Decoded telemetry packets

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tlm_schema::RawValue;

use crate::error::TableError;

/// One decoded telemetry capture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPacket {
    /// Capture time, fixed-width ISO-8601
    #[serde(rename = "packet_timestamp", alias = "timestamp")]
    pub timestamp: String,
    /// Field id to raw value
    #[serde(default)]
    pub fields: BTreeMap<String, RawValue>,
}

impl RawPacket {
    /// Create an empty packet at `timestamp`
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Add a field value
    pub fn with_field(mut self, id: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.fields.insert(id.into(), value.into());
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PacketDocument {
    Wrapped { packets: Vec<RawPacket> },
    Bare(Vec<RawPacket>),
}

/// Parse a `{ "packets": [...] }` document or a bare packet array
pub fn packets_from_json(json: &str) -> Result<Vec<RawPacket>, TableError> {
    let doc: PacketDocument = serde_json::from_str(json)?;
    Ok(match doc {
        PacketDocument::Wrapped { packets } => packets,
        PacketDocument::Bare(packets) => packets,
    })
}
