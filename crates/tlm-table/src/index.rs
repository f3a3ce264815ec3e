//! Timestamp index
//!
//! Timestamps are fixed-width ISO-8601 strings, which sort lexicographically
//! in chronological order. Ordering is done on the strings themselves and
//! never by parsing to an epoch value.

use crate::packet::RawPacket;

/// Distinct packet timestamps, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimestampIndex {
    timestamps: Vec<String>,
}

impl TimestampIndex {
    /// Build the index from the current packet set
    pub fn rebuild(packets: &[RawPacket]) -> Self {
        let mut timestamps: Vec<String> = packets.iter().map(|p| p.timestamp.clone()).collect();
        timestamps.sort_unstable_by(|a, b| b.cmp(a));
        timestamps.dedup();
        Self { timestamps }
    }

    /// Most recent timestamp
    pub fn newest(&self) -> Option<&str> {
        self.timestamps.first().map(String::as_str)
    }

    /// Oldest timestamp
    pub fn oldest(&self) -> Option<&str> {
        self.timestamps.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Timestamps in index order (descending)
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.timestamps.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.timestamps
    }
}
