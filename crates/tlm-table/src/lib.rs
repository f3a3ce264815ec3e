//! Telemetry Table Projection
//!
//! This crate turns decoded telemetry packets into the table a ground
//! station dashboard displays.
//!
//! # Architecture
//!
//! Data flows through a fixed sequence of pure transforms:
//!
//! - **Enrichment**: each packet's values are joined with their field specs;
//!   ids the configuration does not know are dropped
//! - **Indexing**: distinct packet timestamps, newest first
//! - **Windowing**: timestamps inside an inclusive time range, capped at a
//!   row count
//! - **Projection**: a header-major table with enum labels decoded and
//!   missing cells left empty
//!
//! [`TablePipeline`] holds the derived state and reruns only the stages an
//! input change affects.
//!
//! # Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use tlm_schema::{Configuration, FieldSpec, FieldType};
//! use tlm_table::{RawPacket, TablePipeline};
//!
//! let now = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
//! let mut pipeline = TablePipeline::new(now);
//!
//! pipeline.replace_configuration(
//!     Configuration::new(vec![FieldSpec::new("v1", "Voltage", "V", FieldType::Float)]).unwrap(),
//! );
//! pipeline.replace_packets(vec![
//!     RawPacket::new("2024-01-01T00:00:00Z").with_field("v1", "3.7"),
//! ]);
//!
//! let table = pipeline.table();
//! assert_eq!(table.headers(), &["Timestamp", "Voltage"]);
//! assert_eq!(table.row(0).unwrap(), vec!["2024-01-01T00:00:00Z", "3.7"]);
//! ```

pub mod enrich;
pub mod error;
pub mod events;
pub mod export;
pub mod index;
pub mod packet;
pub mod pipeline;
pub mod project;
pub mod window;

pub use enrich::{enrich, enrich_packets, EnrichedData, EnrichedFieldRecord};
pub use error::TableError;
pub use events::PipelineEvent;
pub use index::TimestampIndex;
pub use packet::{packets_from_json, RawPacket};
pub use pipeline::{PipelineConfig, TablePipeline};
pub use project::{project, ProjectedTable, TIMESTAMP_HEADER};
pub use window::{
    select, WindowParams, DEFAULT_LOOKBACK_DAYS, DEFAULT_MAX_ROWS, MAX_LOOKBACK_DAYS,
};
