//! Event Log Parser CLI - Summarize, filter and export event logs.

use anyhow::{Context, Result};
use clap::Parser;
use event_log_parser::{
    chart::ChartData,
    config::{Config, OutputFormat},
    export::{CSV_MIME_TYPE, CsvQuoting},
    filter::RowFilter,
    metrics::format_prometheus_metrics,
    parser::parse_log_with_report,
    stats::{LogStats, Statistics},
    table::LogTable,
};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Event Log Parser - Summarize, filter and export space-delimited event logs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log file to analyze ("-" reads stdin)
    file: PathBuf,

    /// Only show and export rows whose type or details contain this term
    #[arg(short, long)]
    search: Option<String>,

    /// Statistics output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Print chart datasets as JSON
    #[arg(long)]
    charts: bool,

    /// Print the visible table rows
    #[arg(long)]
    rows: bool,

    /// Export the visible rows as CSV
    #[arg(short, long)]
    export: bool,

    /// CSV output path (defaults to export_file from the config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Quote CSV cells per RFC 4180
    #[arg(long)]
    quote_csv: bool,

    /// Omit the CSV header row
    #[arg(long)]
    no_header: bool,

    /// Event type whose last detail is a damage amount
    #[arg(long)]
    damage_type: Option<String>,

    /// Config file path
    #[arg(long, env = "EVENT_LOG_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging on stderr so stdout stays machine-readable
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match args.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    apply_overrides(&mut config, &args);
    config.validate().context("Invalid configuration")?;
    debug!("Configuration: {:?}", config);

    let raw = read_input(&args.file).await?;
    info!("Read {} bytes from {}", raw.len(), args.file.display());

    let (events, report) = parse_log_with_report(&raw);
    info!(
        "Parsed {} events ({} blank lines skipped)",
        report.events, report.blank_lines
    );

    let mut stats = LogStats::with_damage_type(&config.damage_type);
    stats.record_events(&events);
    let summary = stats.summary();

    if summary.unparsed_damage_events > 0 {
        warn!(
            "{} {} events had no parsable damage amount",
            summary.unparsed_damage_events, config.damage_type
        );
    }

    println!("{}", render_statistics(&summary, config.format)?);

    if args.charts {
        let charts = ChartData::from_statistics(&summary);
        println!("{}", serde_json::to_string_pretty(&charts)?);
    }

    let mut table = LogTable::from_events(&events);
    if let Some(ref filter) = config.search {
        table.apply_filter(filter);
        info!(
            "Search '{}' matched {} of {} rows",
            filter.term(),
            table.visible_count(),
            table.len()
        );
    }

    if args.rows {
        print!("{}", render_rows(&table));
    }

    if args.export {
        let path = args
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.export_file));
        let csv = config.exporter().export_table(&table)?;

        tokio::fs::write(&path, csv)
            .await
            .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        info!(
            "Exported {} rows to {} ({})",
            table.visible_count(),
            path.display(),
            CSV_MIME_TYPE
        );
    }

    Ok(())
}

/// Apply command-line overrides on top of the loaded config.
fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(ref term) = args.search {
        config.search = Some(RowFilter::new(term));
    }
    if let Some(format) = args.format {
        config.format = format;
    }
    if let Some(ref damage_type) = args.damage_type {
        config.damage_type = damage_type.clone();
    }
    if args.quote_csv {
        config.csv_quoting = CsvQuoting::Rfc4180;
    }
    if args.no_header {
        config.include_header = false;
    }
}

/// Read the whole log, from a file or from stdin for `-`.
///
/// Invalid UTF-8 is replaced rather than rejected.
async fn read_input(path: &Path) -> Result<String> {
    let bytes = if path == Path::new("-") {
        let mut buf = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut buf)
            .await
            .context("Failed to read stdin")?;
        buf
    } else {
        tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read log file: {}", path.display()))?
    };

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Render statistics in the requested format.
fn render_statistics(stats: &Statistics, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => stats.to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(stats)?,
        OutputFormat::Prometheus => format_prometheus_metrics(stats),
    })
}

/// Render the header and visible rows as aligned text.
fn render_rows(table: &LogTable) -> String {
    let mut output = String::new();
    let [timestamp, event_type, details] = LogTable::HEADER;
    output.push_str(&format!(
        "{:<12} {:<12} {}\n",
        timestamp, event_type, details
    ));

    for row in table.visible_rows() {
        output.push_str(&format!(
            "{:<12} {:<12} {}\n",
            row.timestamp, row.event_type, row.details
        ));
    }
    output
}
