//! Viewer settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tlm_table::{PipelineConfig, DEFAULT_LOOKBACK_DAYS, DEFAULT_MAX_ROWS, MAX_LOOKBACK_DAYS};
use tracing::{debug, warn};

/// Output format for the projected table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated text with a short preamble
    #[default]
    Text,
    /// Comma-separated values
    Csv,
    /// The table structure as JSON
    Json,
}

/// Viewer settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewerSettings {
    /// Rows shown when no `--max-rows` is given
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
    /// Days the default window reaches back before the oldest packet
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,
    /// Output format when no `--format` is given
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_max_rows() -> usize {
    DEFAULT_MAX_ROWS
}

fn default_lookback_days() -> i64 {
    DEFAULT_LOOKBACK_DAYS
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            format: OutputFormat::default(),
        }
    }
}

impl ViewerSettings {
    /// Get the XDG config directory for tlm-view
    /// Uses $XDG_CONFIG_HOME/tlm-view, falls back to ~/.config/tlm-view
    fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config);
            if path.is_absolute() {
                return Some(path.join("tlm-view"));
            }
        }

        dirs::home_dir().map(|h| h.join(".config").join("tlm-view"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from the default location
    pub fn load() -> Self {
        match Self::settings_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        let Ok(text) = std::fs::read_to_string(path) else {
            debug!("No settings at {}, using defaults", path.display());
            return Self::default();
        };
        Self::parse(&text).unwrap_or_else(|e| {
            warn!("Ignoring invalid settings in {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Parse a settings document
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Pipeline configuration derived from these settings
    ///
    /// `lookback_days` is clamped to `0..=MAX_LOOKBACK_DAYS`.
    pub fn pipeline_config(&self, max_rows: Option<usize>) -> PipelineConfig {
        let lookback_days = self.lookback_days.clamp(0, MAX_LOOKBACK_DAYS);
        if lookback_days != self.lookback_days {
            warn!(
                "lookback_days {} out of range, using {}",
                self.lookback_days, lookback_days
            );
        }
        PipelineConfig {
            max_rows: max_rows.unwrap_or(self.max_rows).max(1),
            lookback_days,
        }
    }
}
