//! Table export as text or CSV

use crate::project::ProjectedTable;

impl ProjectedTable {
    /// Header line cells, decorated with units
    fn export_headers(&self) -> Vec<String> {
        self.headers()
            .iter()
            .map(|h| self.header_with_unit(h))
            .collect()
    }

    /// Format the table as tab-separated text with a short preamble
    pub fn to_text(&self) -> String {
        let mut output = String::new();
        output.push_str("# Telemetry Table Export\n");
        output.push_str(&format!("# Rows: {}\n\n", self.row_count()));

        if self.headers().is_empty() {
            return output;
        }

        output.push_str(&self.export_headers().join("\t"));
        output.push('\n');
        for row in self.rows() {
            output.push_str(&row.join("\t"));
            output.push('\n');
        }

        output
    }

    /// Format the table as CSV
    pub fn to_csv(&self) -> String {
        let mut output = String::new();
        if self.headers().is_empty() {
            return output;
        }

        let header: Vec<String> = self
            .export_headers()
            .iter()
            .map(|h| csv_field(h))
            .collect();
        output.push_str(&header.join(","));
        output.push_str("\r\n");

        for row in self.rows() {
            let cells: Vec<String> = row.iter().map(|c| csv_field(c)).collect();
            output.push_str(&cells.join(","));
            output.push_str("\r\n");
        }

        output
    }
}

/// Quote a CSV field when it contains a delimiter, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
