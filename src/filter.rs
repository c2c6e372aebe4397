//! Row filtering for the event table.
//!
//! A row is visible when the search term is empty or appears, ignoring
//! case, in the row's event type or details text. The timestamp column is
//! not searched.

use serde::Deserialize;

use crate::table::Row;

/// A case-insensitive substring filter.
///
/// Deserializes from a bare string so a default search term can live in the
/// config file: `search = "player1"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub struct RowFilter {
    /// Lowercased search term.
    term: String,
}

impl From<String> for RowFilter {
    fn from(term: String) -> Self {
        Self::new(&term)
    }
}

impl RowFilter {
    /// Create a filter for a search term.
    pub fn new(term: &str) -> Self {
        Self {
            term: term.to_lowercase(),
        }
    }

    /// The lowercased search term.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Whether the filter shows every row.
    pub fn is_empty(&self) -> bool {
        self.term.is_empty()
    }

    /// Check if a row's type or details contain the term.
    pub fn matches(&self, row: &Row) -> bool {
        self.matches_fields(&row.event_type, &row.details)
    }

    /// Check if an event type or details text contains the term.
    pub fn matches_fields(&self, event_type: &str, details: &str) -> bool {
        self.term.is_empty()
            || event_type.to_lowercase().contains(&self.term)
            || details.to_lowercase().contains(&self.term)
    }

    /// Recompute the visibility of every row in place.
    pub fn apply(&self, rows: &mut [Row]) {
        for row in rows {
            row.visible = self.matches(row);
        }
    }
}

/// Return the rows with visibility recomputed for `term`.
pub fn filter_rows(rows: &[Row], term: &str) -> Vec<Row> {
    let mut rows = rows.to_vec();
    RowFilter::new(term).apply(&mut rows);
    rows
}
