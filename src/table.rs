//! Tabular view over parsed events.
//!
//! A [`LogTable`] holds one [`Row`] per event, in input order. Filtering
//! only flips row visibility; export reads the visible rows.

use serde::Serialize;

use crate::event::Event;
use crate::filter::RowFilter;

/// One table row derived from an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub timestamp: String,
    #[serde(rename = "type")]
    pub event_type: String,
    /// Details joined with single spaces.
    pub details: String,
    pub visible: bool,
}

impl Row {
    /// Build a visible row from an event.
    pub fn from_event(event: &Event) -> Self {
        Self {
            timestamp: event.timestamp.clone(),
            event_type: event.event_type.clone(),
            details: event.details_text(),
            visible: true,
        }
    }

    /// Cell texts in column order.
    pub fn cells(&self) -> [&str; 3] {
        [
            self.timestamp.as_str(),
            self.event_type.as_str(),
            self.details.as_str(),
        ]
    }
}

/// Rows for every event of one ingestion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogTable {
    rows: Vec<Row>,
}

impl LogTable {
    /// Column titles. The header is never filtered.
    pub const HEADER: [&'static str; 3] = ["Timestamp", "Event", "Details"];

    /// Build a table with every row visible.
    pub fn from_events(events: &[Event]) -> Self {
        Self {
            rows: events.iter().map(Row::from_event).collect(),
        }
    }

    /// All rows, visible or not.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Visible rows in input order.
    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| r.visible)
    }

    pub fn visible_count(&self) -> usize {
        self.visible_rows().count()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Recompute visibility of every row for a filter.
    pub fn apply_filter(&mut self, filter: &RowFilter) {
        filter.apply(&mut self.rows);
    }
}
