//! Telemetry Table Viewer
//!
//! Loads a field configuration and a set of decoded packets, runs them
//! through the projection pipeline and prints the resulting table.

mod settings;

use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use settings::{OutputFormat, ViewerSettings};
use tlm_schema::Configuration;
use tlm_table::{packets_from_json, TablePipeline, WindowParams};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tlm-view", version, about = "Print decoded telemetry as a table")]
struct Cli {
    /// Field configuration (`{"fields": [...]}`)
    #[arg(long)]
    config: PathBuf,
    /// Decoded packets (`{"packets": [...]}` or a bare array)
    #[arg(long)]
    packets: PathBuf,
    /// Window start (inclusive); defaults to the lookback before the oldest packet
    #[arg(long)]
    from: Option<String>,
    /// Window end (inclusive); defaults to now
    #[arg(long)]
    to: Option<String>,
    /// Maximum number of rows
    #[arg(long)]
    max_rows: Option<usize>,
    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
    /// Settings file to use instead of the default location
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tlm_view=info,tlm_schema=info,tlm_table=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => ViewerSettings::load_from(path),
        None => ViewerSettings::load(),
    };

    let config_text = std::fs::read_to_string(&cli.config)
        .with_context(|| format!("reading configuration {}", cli.config.display()))?;
    let fields = Configuration::from_json(&config_text)
        .with_context(|| format!("parsing configuration {}", cli.config.display()))?;

    let packets_text = std::fs::read_to_string(&cli.packets)
        .with_context(|| format!("reading packets {}", cli.packets.display()))?;
    let packets = packets_from_json(&packets_text)
        .with_context(|| format!("parsing packets {}", cli.packets.display()))?;

    let mut pipeline =
        TablePipeline::with_config(settings.pipeline_config(cli.max_rows), Utc::now());
    pipeline.replace_configuration(fields);
    pipeline.replace_packets(packets);

    if cli.from.is_some() || cli.to.is_some() {
        let current = pipeline.window();
        let window = WindowParams::new(
            cli.from.as_deref().unwrap_or(current.from_date()),
            cli.to.as_deref().unwrap_or(current.to_date()),
            current.max_rows(),
        )?;
        pipeline.set_window(window);
    }

    tracing::info!(
        "Showing {} of {} timestamps ({} .. {})",
        pipeline.selected().len(),
        pipeline.index().len(),
        pipeline.window().from_date(),
        pipeline.window().to_date()
    );

    let table = pipeline.table();
    let output = match cli.format.unwrap_or(settings.format) {
        OutputFormat::Text => table.to_text(),
        OutputFormat::Csv => table.to_csv(),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(table)?;
            json.push('\n');
            json
        }
    };
    print!("{}", output);

    Ok(())
}
