//! Data structures representing parsed log events.
//!
//! This module defines the core types used throughout the crate to represent
//! a single classified log line and the points of a damage time series.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Event type whose last detail token carries a damage amount.
pub const DAMAGE_EVENT_TYPE: &str = "DAMAGE";

/// One parsed log line.
///
/// # Example
///
/// A raw line like:
/// ```text
/// 10:00 DAMAGE player1 50
/// ```
///
/// Would be parsed into an `Event` with:
/// - `timestamp`: "10:00"
/// - `event_type`: "DAMAGE"
/// - `details`: ["player1", "50"]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// First field of the line. Opaque, never parsed.
    pub timestamp: String,

    /// Second field of the line. Exact, case-sensitive classification key.
    #[serde(rename = "type")]
    pub event_type: String,

    /// Remaining fields in line order.
    pub details: Vec<String>,
}

impl Event {
    /// Create an event from its parts.
    pub fn new(
        timestamp: impl Into<String>,
        event_type: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            event_type: event_type.into(),
            details,
        }
    }

    /// The details rejoined with single spaces, as shown in tables.
    pub fn details_text(&self) -> String {
        self.details.join(" ")
    }

    /// The last detail token, if the event has any details.
    pub fn last_detail(&self) -> Option<&str> {
        self.details.last().map(String::as_str)
    }

    /// Whether this event has exactly the given type.
    #[inline]
    pub fn is_type(&self, event_type: &str) -> bool {
        self.event_type == event_type
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.timestamp, self.event_type)?;
        for detail in &self.details {
            write!(f, " {}", detail)?;
        }
        Ok(())
    }
}

/// A single point of the damage time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamagePoint {
    /// Timestamp of the damage event, as given in the log.
    pub timestamp: String,

    /// Parsed damage amount.
    pub damage: i64,
}

impl DamagePoint {
    pub fn new(timestamp: impl Into<String>, damage: i64) -> Self {
        Self {
            timestamp: timestamp.into(),
            damage,
        }
    }
}
