//! CSV export of visible table rows.
//!
//! The default output joins cells with `,` and terminates every line with
//! `\n`, without quoting. Cells containing commas or line breaks therefore
//! do not survive a round trip; [`CsvQuoting::Rfc4180`] opts into quoted
//! output through the `csv` crate.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::table::{LogTable, Row};

/// File name used for exports unless configured otherwise.
pub const DEFAULT_EXPORT_FILE: &str = "log_data.csv";

/// Media type of exported files.
pub const CSV_MIME_TYPE: &str = "text/csv";

/// Errors that can occur while writing quoted CSV.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV flush failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// How cells are escaped on export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CsvQuoting {
    /// Cells are written verbatim
    #[default]
    Never,
    /// Cells are quoted when needed, per RFC 4180
    Rfc4180,
}

/// Export settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvExporter {
    pub quoting: CsvQuoting,
    pub include_header: bool,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self {
            quoting: CsvQuoting::Never,
            include_header: true,
        }
    }
}

impl CsvExporter {
    /// Serialize the visible rows. Hidden rows are skipped.
    pub fn export<'a>(
        &self,
        rows: impl IntoIterator<Item = &'a Row>,
    ) -> Result<String, ExportError> {
        match self.quoting {
            CsvQuoting::Never => Ok(to_csv(rows, self.include_header)),
            CsvQuoting::Rfc4180 => to_quoted_csv(rows, self.include_header),
        }
    }

    /// Serialize the visible rows of a table.
    pub fn export_table(&self, table: &LogTable) -> Result<String, ExportError> {
        self.export(table.rows())
    }
}

/// Serialize visible rows without quoting.
///
/// # Example
///
/// ```
/// use event_log_parser::{export::to_csv, parser::parse_log, table::LogTable};
///
/// let table = LogTable::from_events(&parse_log("10:00 DAMAGE player1 50"));
/// assert_eq!(
///     to_csv(table.rows(), true),
///     "Timestamp,Event,Details\n10:00,DAMAGE,player1 50\n"
/// );
/// ```
pub fn to_csv<'a>(rows: impl IntoIterator<Item = &'a Row>, include_header: bool) -> String {
    let mut output = String::new();

    if include_header {
        push_line(&mut output, &LogTable::HEADER);
    }
    for row in rows.into_iter().filter(|r| r.visible) {
        push_line(&mut output, &row.cells());
    }

    output
}

fn push_line(output: &mut String, cells: &[&str]) {
    output.push_str(&cells.join(","));
    output.push('\n');
}

/// Serialize visible rows with RFC 4180 quoting and `\n` terminators.
pub fn to_quoted_csv<'a>(
    rows: impl IntoIterator<Item = &'a Row>,
    include_header: bool,
) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    if include_header {
        writer.write_record(LogTable::HEADER)?;
    }
    for row in rows.into_iter().filter(|r| r.visible) {
        writer.write_record(row.cells())?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}
