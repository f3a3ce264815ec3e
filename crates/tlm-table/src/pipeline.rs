//! Projection pipeline
//!
//! [`TablePipeline`] owns every structure derived from the configuration and
//! packet set and rebuilds them wholesale when an input is replaced:
//!
//! - new configuration or packets: enrich, index, select, project
//! - new window parameters: select, project
//!
//! Consumers only ever get shared references to the derived state.

use chrono::{DateTime, Duration, Utc};
use tlm_schema::{Configuration, FieldCatalog};
use tracing::{debug, info, warn};

use crate::enrich::{enrich_packets, EnrichedData};
use crate::events::PipelineEvent;
use crate::index::TimestampIndex;
use crate::packet::RawPacket;
use crate::project::{project, ProjectedTable};
use crate::window::{
    bounded_lookback, lookback_days, select, window_start, WindowParams, DEFAULT_LOOKBACK_DAYS,
    DEFAULT_MAX_ROWS,
};

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Initial row cap
    pub max_rows: usize,
    /// Days the default window reaches back before the oldest packet
    pub lookback_days: i64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }
}

impl PipelineConfig {
    fn lookback(&self) -> Duration {
        lookback_days(self.lookback_days).unwrap_or_else(|| {
            warn!(
                "Lookback of {} days out of range, using {}",
                self.lookback_days, DEFAULT_LOOKBACK_DAYS
            );
            Duration::days(DEFAULT_LOOKBACK_DAYS)
        })
    }
}

/// Derived-state holder for one telemetry table
pub struct TablePipeline {
    lookback: Duration,
    fields: Configuration,
    catalog: FieldCatalog,
    packets: Vec<RawPacket>,
    enriched: EnrichedData,
    index: TimestampIndex,
    window: WindowParams,
    selected: Vec<String>,
    table: ProjectedTable,
    event_buffer: Vec<PipelineEvent>,
}

impl TablePipeline {
    /// Create an empty pipeline with the default window ending at `now`
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_config(PipelineConfig::default(), now)
    }

    /// Create with custom configuration
    pub fn with_config(config: PipelineConfig, now: DateTime<Utc>) -> Self {
        let lookback = bounded_lookback(now, config.lookback());
        let window = WindowParams::with_lookback(now, None, lookback, config.max_rows);
        Self {
            lookback,
            fields: Configuration::default(),
            catalog: FieldCatalog::default(),
            packets: Vec::new(),
            enriched: EnrichedData::default(),
            index: TimestampIndex::default(),
            window,
            selected: Vec::new(),
            table: ProjectedTable::default(),
            event_buffer: Vec::new(),
        }
    }

    /// Replace the field configuration and rebuild everything derived from it
    pub fn replace_configuration(&mut self, fields: Configuration) {
        info!("Loaded configuration with {} fields", fields.len());
        self.catalog = FieldCatalog::build(&fields);
        self.fields = fields;
        self.event_buffer.push(PipelineEvent::ConfigurationReplaced {
            fields: self.fields.len(),
        });

        self.enriched = enrich_packets(&self.packets, &self.catalog);
        self.rebuild_table();
    }

    /// Replace the packet set and rebuild everything derived from it
    ///
    /// The window start moves to the configured lookback before the oldest
    /// packet; the window end and row cap are kept.
    pub fn replace_packets(&mut self, packets: Vec<RawPacket>) {
        self.packets = packets;
        self.enriched = enrich_packets(&self.packets, &self.catalog);
        self.index = TimestampIndex::rebuild(&self.packets);
        info!(
            "Loaded {} packets ({} distinct timestamps)",
            self.packets.len(),
            self.index.len()
        );
        self.event_buffer.push(PipelineEvent::PacketsReplaced {
            packets: self.packets.len(),
            timestamps: self.index.len(),
        });

        if let Some(oldest) = self.index.oldest() {
            match window_start(oldest, self.lookback) {
                Ok(from) => {
                    self.window = self.window.clone().with_from_date(from);
                    self.push_window_event();
                }
                Err(e) => warn!("Keeping window start: {}", e),
            }
        }

        self.rebuild_table();
    }

    /// Replace the window parameters; only selection and projection rerun
    pub fn set_window(&mut self, window: WindowParams) {
        if window == self.window {
            debug!("Window unchanged");
            return;
        }
        self.window = window;
        self.push_window_event();
        self.rebuild_table();
    }

    fn push_window_event(&mut self) {
        self.event_buffer.push(PipelineEvent::WindowChanged {
            from_date: self.window.from_date().to_string(),
            to_date: self.window.to_date().to_string(),
            max_rows: self.window.max_rows(),
        });
    }

    fn rebuild_table(&mut self) {
        self.selected = select(&self.index, &self.window);
        self.table = project(&self.selected, &self.enriched, &self.fields);
        debug!(
            "Rebuilt table: {} rows x {} columns",
            self.table.row_count(),
            self.table.headers().len()
        );
        self.event_buffer.push(PipelineEvent::TableRebuilt {
            rows: self.table.row_count(),
            columns: self.table.headers().len(),
        });
    }

    /// Current table
    pub fn table(&self) -> &ProjectedTable {
        &self.table
    }

    /// Current field configuration
    pub fn configuration(&self) -> &Configuration {
        &self.fields
    }

    /// Current timestamp index
    pub fn index(&self) -> &TimestampIndex {
        &self.index
    }

    /// Current window parameters
    pub fn window(&self) -> &WindowParams {
        &self.window
    }

    /// Timestamps selected by the current window
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// Enriched records by timestamp
    pub fn enriched(&self) -> &EnrichedData {
        &self.enriched
    }

    /// Take all buffered events
    pub fn drain_events(&mut self) -> Vec<PipelineEvent> {
        std::mem::take(&mut self.event_buffer)
    }
}
