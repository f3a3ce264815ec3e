//! Joining packet values with field metadata

use std::collections::HashMap;

use tlm_schema::{FieldCatalog, FieldType, RawValue};
use tracing::{debug, trace};

use crate::packet::RawPacket;

/// A raw field value together with the metadata of its field
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedFieldRecord {
    /// Field label (the table header it belongs under)
    pub label: String,
    /// Unit of measurement
    pub unit: String,
    /// Field type, carrying enum labels for enum fields
    pub field_type: FieldType,
    /// Value exactly as received
    pub value: RawValue,
    /// Whether the field is hidden from the table
    pub hidden: bool,
}

/// Join one packet against the catalog
///
/// Ids missing from the catalog are skipped; the table must stay renderable
/// when the decoder reports fields the configuration no longer knows about.
pub fn enrich(packet: &RawPacket, catalog: &FieldCatalog) -> Vec<EnrichedFieldRecord> {
    packet
        .fields
        .iter()
        .filter_map(|(id, value)| {
            let Some(spec) = catalog.lookup(id) else {
                trace!("Dropping unknown field {} at {}", id, packet.timestamp);
                return None;
            };
            Some(EnrichedFieldRecord {
                label: spec.label.clone(),
                unit: spec.unit.clone(),
                field_type: spec.field_type.clone(),
                value: value.clone(),
                hidden: spec.hidden,
            })
        })
        .collect()
}

/// Enriched records keyed by packet timestamp
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichedData {
    by_timestamp: HashMap<String, Vec<EnrichedFieldRecord>>,
}

impl EnrichedData {
    /// Records for a timestamp (empty if the timestamp is unknown)
    pub fn records(&self, timestamp: &str) -> &[EnrichedFieldRecord] {
        self.by_timestamp
            .get(timestamp)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of distinct timestamps
    pub fn len(&self) -> usize {
        self.by_timestamp.len()
    }

    /// True if no packets were enriched
    pub fn is_empty(&self) -> bool {
        self.by_timestamp.is_empty()
    }
}

/// Enrich every packet, keyed by timestamp
///
/// A packet sharing its timestamp with an earlier one replaces it.
pub fn enrich_packets(packets: &[RawPacket], catalog: &FieldCatalog) -> EnrichedData {
    let mut by_timestamp = HashMap::with_capacity(packets.len());
    for packet in packets {
        let records = enrich(packet, catalog);
        if by_timestamp
            .insert(packet.timestamp.clone(), records)
            .is_some()
        {
            debug!("Packet at {} replaces an earlier one", packet.timestamp);
        }
    }
    EnrichedData { by_timestamp }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tlm_schema::{Configuration, FieldSpec};

    fn catalog() -> FieldCatalog {
        let config = Configuration::new(vec![
            FieldSpec::new("v1", "Voltage", "V", FieldType::Float),
            FieldSpec::new(
                "h1",
                "Heater",
                "",
                FieldType::Enum {
                    values: vec!["OFF".into(), "ON".into()],
                },
            ),
        ])
        .unwrap();
        FieldCatalog::build(&config)
    }

    #[test]
    fn test_enrich_copies_metadata_and_raw_value() {
        let packet = RawPacket::new("2024-01-01T00:00:00Z")
            .with_field("v1", "3.7")
            .with_field("h1", "1");
        let mut records = enrich(&packet, &catalog());
        records.sort_by(|a, b| a.label.cmp(&b.label));

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].label, "Heater");
        assert_eq!(records[0].value, RawValue::from("1"));
        assert_eq!(records[1].label, "Voltage");
        assert_eq!(records[1].unit, "V");
        assert_eq!(records[1].field_type, FieldType::Float);
    }

    #[test]
    fn test_unknown_fields_dropped() {
        let packet = RawPacket::new("2024-01-01T00:00:00Z")
            .with_field("obsolete", 1i64)
            .with_field("v1", 3.7);
        let records = enrich(&packet, &catalog());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].label, "Voltage");
    }

    #[test]
    fn test_same_timestamp_last_write_wins() {
        let packets = vec![
            RawPacket::new("2024-01-01T00:00:00Z").with_field("v1", "3.7"),
            RawPacket::new("2024-01-01T00:00:00Z").with_field("v1", "3.9"),
        ];
        let data = enrich_packets(&packets, &catalog());

        assert_eq!(data.len(), 1);
        let records = data.records("2024-01-01T00:00:00Z");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, RawValue::from("3.9"));
    }

    #[test]
    fn test_unknown_timestamp_has_no_records() {
        let data = enrich_packets(&[], &catalog());
        assert!(data.is_empty());
        assert!(data.records("2024-01-01T00:00:00Z").is_empty());
    }
}
