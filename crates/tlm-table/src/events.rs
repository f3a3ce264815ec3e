//! Change notifications emitted by the pipeline
//!
//! A dashboard drains these after feeding new input to decide what to
//! redraw.

/// Event emitted when the pipeline recomputes derived state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// A new field configuration was loaded
    ConfigurationReplaced {
        /// Number of field specs (hidden ones included)
        fields: usize,
    },

    /// A new packet set was loaded
    PacketsReplaced {
        /// Packets received
        packets: usize,
        /// Distinct timestamps after deduplication
        timestamps: usize,
    },

    /// Window parameters changed
    WindowChanged {
        from_date: String,
        to_date: String,
        max_rows: usize,
    },

    /// The displayed table was rebuilt
    TableRebuilt {
        /// Data rows in the new table
        rows: usize,
        /// Header count, `Timestamp` included
        columns: usize,
    },
}

impl PipelineEvent {
    /// Check if this event reflects new input data (configuration or packets)
    pub fn is_input_change(&self) -> bool {
        matches!(
            self,
            PipelineEvent::ConfigurationReplaced { .. } | PipelineEvent::PacketsReplaced { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_change_classification() {
        assert!(PipelineEvent::ConfigurationReplaced { fields: 1 }.is_input_change());
        assert!(PipelineEvent::PacketsReplaced {
            packets: 2,
            timestamps: 2
        }
        .is_input_change());
        assert!(!PipelineEvent::TableRebuilt { rows: 0, columns: 1 }.is_input_change());
    }
}
