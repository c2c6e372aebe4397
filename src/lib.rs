//! Event Log Parser - A Rust library and CLI for analyzing space-delimited event logs.
//!
//! This crate provides:
//! - A tolerant tokenizer and classifier turning log text into events
//! - Single-pass statistics: per-type counts, damage totals, a damage time series
//! - A filterable table view with CSV export
//! - Chart datasets and Prometheus text output for presentation layers
//!
//! # Example
//!
//! ```rust
//! use event_log_parser::{parser::parse_log, stats::aggregate};
//!
//! let log = "10:00 DAMAGE player1 50\n10:01 HEAL player1 20\n10:02 DAMAGE player2 30";
//! let events = parse_log(log);
//! let stats = aggregate(&events);
//!
//! assert_eq!(stats.total_events, 3);
//! assert_eq!(stats.total_damage, 80);
//! println!("{}", stats);
//! ```

pub mod chart;
pub mod config;
pub mod event;
pub mod export;
pub mod filter;
pub mod metrics;
pub mod parser;
pub mod stats;
pub mod table;

pub use chart::ChartData;
pub use config::{Config, ConfigError, OutputFormat};
pub use event::{DAMAGE_EVENT_TYPE, DamagePoint, Event};
pub use export::{CsvExporter, CsvQuoting, ExportError, to_csv};
pub use filter::{RowFilter, filter_rows};
pub use parser::{ParseReport, classify, parse_log, parse_log_with_report, tokenize};
pub use stats::{LogStats, Statistics, aggregate};
pub use table::{LogTable, Row};
