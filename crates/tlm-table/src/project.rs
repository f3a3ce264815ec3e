//! Pivoting enriched records into a header-major table

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tlm_schema::{Configuration, FieldType};
use tracing::warn;

use crate::enrich::{EnrichedData, EnrichedFieldRecord};

/// Header of the first column
pub const TIMESTAMP_HEADER: &str = "Timestamp";

/// Table ready for display, stored column by column
///
/// `columns[TIMESTAMP_HEADER][i]` is the i-th selected timestamp and every
/// column has the same length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedTable {
    headers: Vec<String>,
    header_units: BTreeMap<String, String>,
    columns: BTreeMap<String, Vec<String>>,
}

impl ProjectedTable {
    /// Column headers, `Timestamp` first
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Unit of a header (`None` for `Timestamp` and unknown headers)
    pub fn unit(&self, header: &str) -> Option<&str> {
        self.header_units.get(header).map(String::as_str)
    }

    /// Header decorated with its unit, e.g. `Voltage (V)`
    pub fn header_with_unit(&self, header: &str) -> String {
        match self.unit(header) {
            Some(unit) if !unit.is_empty() => format!("{} ({})", header, unit),
            _ => header.to_string(),
        }
    }

    /// Cells of one column
    pub fn column(&self, header: &str) -> Option<&[String]> {
        self.columns.get(header).map(Vec::as_slice)
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.column(TIMESTAMP_HEADER).map_or(0, <[String]>::len)
    }

    /// True if there are no data rows
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Cells of one row in header order
    pub fn row(&self, index: usize) -> Option<Vec<&str>> {
        if index >= self.row_count() {
            return None;
        }
        Some(
            self.headers
                .iter()
                .map(|h| {
                    self.columns
                        .get(h)
                        .and_then(|c| c.get(index))
                        .map_or("", String::as_str)
                })
                .collect(),
        )
    }

    /// All rows in selection order
    pub fn rows(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        (0..self.row_count()).filter_map(move |i| self.row(i))
    }
}

/// Build the table for the selected timestamps
///
/// Headers are `Timestamp` followed by the labels of the visible fields in
/// configuration order; a label is listed once even if several fields share
/// it. A configuration without any fields yields a table without headers.
pub fn project(
    selected: &[String],
    enriched: &EnrichedData,
    config: &Configuration,
) -> ProjectedTable {
    if config.is_empty() {
        return ProjectedTable::default();
    }

    let mut headers = vec![TIMESTAMP_HEADER.to_string()];
    let mut header_units = BTreeMap::new();
    let mut seen: HashSet<&str> = HashSet::from([TIMESTAMP_HEADER]);
    for spec in config.visible_fields() {
        if seen.insert(spec.label.as_str()) {
            headers.push(spec.label.clone());
            header_units.insert(spec.label.clone(), spec.unit.clone());
        }
    }

    let mut columns = BTreeMap::new();
    columns.insert(TIMESTAMP_HEADER.to_string(), selected.to_vec());
    for header in headers.iter().skip(1) {
        let cells = selected
            .iter()
            .map(|t| render_cell(enriched.records(t), header, t))
            .collect();
        columns.insert(header.clone(), cells);
    }

    ProjectedTable {
        headers,
        header_units,
        columns,
    }
}

/// Text of the cell for `label`; empty when the packet has no visible field
/// with that label
fn render_cell(records: &[EnrichedFieldRecord], label: &str, timestamp: &str) -> String {
    let Some(record) = records.iter().find(|r| !r.hidden && r.label == label) else {
        return String::new();
    };

    match &record.field_type {
        FieldType::Enum { values } => match record.field_type.decode_enum(&record.value) {
            Some(text) => text.to_string(),
            None => {
                warn!(
                    "Enum value {} for {} at {} outside {} labels",
                    record.value,
                    label,
                    timestamp,
                    values.len()
                );
                String::new()
            }
        },
        _ => record.value.to_string(),
    }
}
