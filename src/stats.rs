//! Statistics aggregation over parsed events.
//!
//! This module provides the accumulator that walks an event sequence once,
//! tracking per-type counts, damage totals, the damage time series and a
//! damage distribution.

use hdrhistogram::Histogram;
use serde::Serialize;
use std::collections::HashMap;
use tracing::trace;

use crate::event::{DAMAGE_EVENT_TYPE, DamagePoint, Event};
use crate::parser::parse_damage_amount;

/// Single-pass statistics accumulator.
///
/// Each ingestion should use a fresh accumulator; nothing carries over
/// between calls to [`aggregate`].
#[derive(Debug)]
pub struct LogStats {
    /// Event type whose last detail is read as a damage amount
    damage_type: String,

    /// Counts per event type, in first-seen order
    type_counts: Vec<TypeCount>,

    /// Position of each type in `type_counts`
    type_index: HashMap<String, usize>,

    /// Total number of events recorded
    total_events: u64,

    /// Sum of every parsed damage amount
    total_damage: i64,

    /// Parsed damage amounts in input order
    damage_series: Vec<DamagePoint>,

    /// Damage events that yielded no amount
    unparsed_damage_events: u64,

    /// Histogram of non-negative damage amounts
    damage_histogram: Histogram<u64>,
}

impl LogStats {
    /// Create an accumulator for the default `DAMAGE` event type.
    pub fn new() -> Self {
        Self::with_damage_type(DAMAGE_EVENT_TYPE)
    }

    /// Create an accumulator reading damage from a custom event type.
    pub fn with_damage_type(damage_type: impl Into<String>) -> Self {
        Self {
            damage_type: damage_type.into(),
            type_counts: Vec::new(),
            type_index: HashMap::new(),
            total_events: 0,
            total_damage: 0,
            damage_series: Vec::new(),
            unparsed_damage_events: 0,
            // Auto-resizing, 3 significant figures
            damage_histogram: Histogram::new(3).expect("Failed to create damage histogram"),
        }
    }

    /// The event type treated as damage.
    pub fn damage_type(&self) -> &str {
        &self.damage_type
    }

    /// Record one event.
    pub fn record_event(&mut self, event: &Event) {
        let index = match self.type_index.get(&event.event_type) {
            Some(&index) => index,
            None => {
                self.type_counts.push(TypeCount {
                    event_type: event.event_type.clone(),
                    count: 0,
                });
                let index = self.type_counts.len() - 1;
                self.type_index.insert(event.event_type.clone(), index);
                index
            }
        };
        self.type_counts[index].count += 1;
        self.total_events += 1;

        if !event.is_type(&self.damage_type) {
            return;
        }

        let recorded = event
            .last_detail()
            .and_then(parse_damage_amount)
            .is_some_and(|damage| self.record_damage(&event.timestamp, damage));

        if !recorded {
            self.unparsed_damage_events += 1;
            trace!("No damage amount in event: {}", event);
        }
    }

    /// Record every event of a sequence, in order.
    pub fn record_events<'a>(&mut self, events: impl IntoIterator<Item = &'a Event>) {
        for event in events {
            self.record_event(event);
        }
    }

    /// Add one amount to the totals, returning `false` if the running total
    /// would overflow. Overflowing amounts are left out of the series.
    fn record_damage(&mut self, timestamp: &str, damage: i64) -> bool {
        let Some(total) = self.total_damage.checked_add(damage) else {
            return false;
        };
        self.total_damage = total;
        self.damage_series.push(DamagePoint::new(timestamp, damage));

        if let Ok(value) = u64::try_from(damage) {
            self.damage_histogram.record(value).ok();
        }
        true
    }

    /// Average damage per parsed damage event, `None` if there were none.
    pub fn average_damage(&self) -> Option<f64> {
        if self.damage_series.is_empty() {
            None
        } else {
            Some(self.total_damage as f64 / self.damage_series.len() as f64)
        }
    }

    /// Generate the statistics summary.
    pub fn summary(&self) -> Statistics {
        let h = &self.damage_histogram;
        let damage_percentiles = (h.len() > 0).then(|| DamagePercentiles {
            p50: h.value_at_quantile(0.50),
            p90: h.value_at_quantile(0.90),
            p99: h.value_at_quantile(0.99),
            min: h.min(),
            max: h.max(),
            mean: h.mean(),
        });

        Statistics {
            event_type_counts: self.type_counts.clone(),
            total_events: self.total_events,
            total_damage: self.total_damage,
            damage_series: self.damage_series.clone(),
            average_damage: self.average_damage(),
            unparsed_damage_events: self.unparsed_damage_events,
            damage_percentiles,
        }
    }
}

impl Default for LogStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregate events using the default `DAMAGE` event type.
///
/// # Example
///
/// ```
/// use event_log_parser::{parser::parse_log, stats::aggregate};
///
/// let events = parse_log("10:00 DAMAGE player1 50\n10:02 DAMAGE player2 30");
/// let stats = aggregate(&events);
/// assert_eq!(stats.total_damage, 80);
/// assert_eq!(stats.average_damage, Some(40.0));
/// ```
pub fn aggregate(events: &[Event]) -> Statistics {
    aggregate_with_damage_type(events, DAMAGE_EVENT_TYPE)
}

/// Aggregate events, reading damage from the given event type.
pub fn aggregate_with_damage_type(events: &[Event], damage_type: &str) -> Statistics {
    let mut stats = LogStats::with_damage_type(damage_type);
    stats.record_events(events);
    stats.summary()
}

/// Occurrence count of one event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub event_type: String,
    pub count: u64,
}

/// Distribution of non-negative damage amounts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DamagePercentiles {
    pub p50: u64,
    pub p90: u64,
    pub p99: u64,
    pub min: u64,
    pub max: u64,
    pub mean: f64,
}

/// Summary of an aggregated event sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub event_type_counts: Vec<TypeCount>,
    pub total_events: u64,
    pub total_damage: i64,
    pub damage_series: Vec<DamagePoint>,
    pub average_damage: Option<f64>,
    pub unparsed_damage_events: u64,
    pub damage_percentiles: Option<DamagePercentiles>,
}

impl Statistics {
    /// Count for one event type (zero if never seen).
    pub fn count_for(&self, event_type: &str) -> u64 {
        self.event_type_counts
            .iter()
            .find(|c| c.event_type == event_type)
            .map(|c| c.count)
            .unwrap_or(0)
    }

    /// Number of damage events that contributed an amount.
    pub fn damage_events(&self) -> usize {
        self.damage_series.len()
    }
}

impl std::fmt::Display for Statistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "═══════════════════════════════════════════════════════")?;
        writeln!(f, "                 EVENT LOG STATISTICS")?;
        writeln!(f, "═══════════════════════════════════════════════════════")?;
        writeln!(f)?;
        writeln!(f, "Total Events: {}", self.total_events)?;
        writeln!(f, "Total Damage: {}", self.total_damage)?;
        match self.average_damage {
            Some(avg) => writeln!(f, "Average Damage Per Event: {:.2}", avg)?,
            None => writeln!(f, "Average Damage Per Event: n/a")?,
        }
        if self.unparsed_damage_events > 0 {
            writeln!(
                f,
                "Damage events without amount: {}",
                self.unparsed_damage_events
            )?;
        }
        writeln!(f)?;

        if let Some(ref p) = self.damage_percentiles {
            writeln!(f, "Damage Distribution:")?;
            writeln!(f, "  Min: {}, Max: {}, Mean: {:.1}", p.min, p.max, p.mean)?;
            writeln!(f, "  P50: {}, P90: {}, P99: {}", p.p50, p.p90, p.p99)?;
            writeln!(f)?;
        }

        writeln!(f, "Event Types Breakdown:")?;
        for c in &self.event_type_counts {
            writeln!(f, "  {}: {}", c.event_type, c.count)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_log;
    use proptest::prelude::*;

    const SCENARIO_A: &str =
        "10:00 DAMAGE player1 50\n10:01 HEAL player1 20\n10:02 DAMAGE player2 30";

    #[test]
    fn test_scenario_mixed_events() {
        let stats = aggregate(&parse_log(SCENARIO_A));

        assert_eq!(
            stats.event_type_counts,
            vec![
                TypeCount {
                    event_type: "DAMAGE".to_string(),
                    count: 2
                },
                TypeCount {
                    event_type: "HEAL".to_string(),
                    count: 1
                },
            ]
        );
        assert_eq!(stats.total_events, 3);
        assert_eq!(stats.total_damage, 80);
        assert_eq!(
            stats.damage_series,
            vec![DamagePoint::new("10:00", 50), DamagePoint::new("10:02", 30)]
        );
        assert_eq!(stats.average_damage, Some(40.0));
        assert!(stats.to_string().contains("Average Damage Per Event: 40.00"));
    }

    #[test]
    fn test_scenario_unparsable_damage() {
        let stats = aggregate(&parse_log(
            "10:00 DAMAGE player1 abc\n10:01 DAMAGE player2 10",
        ));

        assert_eq!(stats.count_for("DAMAGE"), 2);
        assert_eq!(stats.total_events, 2);
        assert_eq!(stats.total_damage, 10);
        assert_eq!(stats.damage_series, vec![DamagePoint::new("10:01", 10)]);
        assert_eq!(stats.unparsed_damage_events, 1);
        // Denominator is the series length, not the DAMAGE count
        assert_eq!(stats.average_damage, Some(10.0));
    }

    #[test]
    fn test_scenario_empty_input() {
        let stats = aggregate(&parse_log(""));

        assert_eq!(stats.total_events, 0);
        assert!(stats.event_type_counts.is_empty());
        assert!(stats.damage_series.is_empty());
        assert_eq!(stats.average_damage, None);
        assert!(stats.damage_percentiles.is_none());
        assert!(stats.to_string().contains("Average Damage Per Event: n/a"));
    }

    #[test]
    fn test_scenario_blank_lines() {
        let stats = aggregate(&parse_log("\n\nA B\n\n"));

        assert_eq!(stats.total_events, 1);
        assert_eq!(stats.count_for("B"), 1);
    }

    #[test]
    fn test_damage_leading_integer() {
        let stats = aggregate(&parse_log(
            "10:00 DAMAGE player1 50hp\n10:01 DAMAGE player2 12.5\n10:02 DAMAGE p 30",
        ));

        assert_eq!(stats.total_damage, 92);
        assert_eq!(
            stats.damage_series,
            vec![
                DamagePoint::new("10:00", 50),
                DamagePoint::new("10:01", 12),
                DamagePoint::new("10:02", 30),
            ]
        );
        assert_eq!(stats.unparsed_damage_events, 0);
    }

    #[test]
    fn test_damage_overflow_is_skipped() {
        let raw = format!(
            "1 DAMAGE {}\n2 DAMAGE 1\n3 DAMAGE -5",
            i64::MAX
        );
        let stats = aggregate(&parse_log(&raw));

        assert_eq!(stats.count_for("DAMAGE"), 3);
        assert_eq!(
            stats.damage_series,
            vec![
                DamagePoint::new("1", i64::MAX),
                DamagePoint::new("3", -5),
            ]
        );
        assert_eq!(stats.total_damage, i64::MAX - 5);
        assert_eq!(stats.unparsed_damage_events, 1);

        let sum: i128 = stats.damage_series.iter().map(|p| i128::from(p.damage)).sum();
        assert_eq!(i128::from(stats.total_damage), sum);
    }

    #[test]
    fn test_damage_without_details_is_skipped() {
        let stats = aggregate(&parse_log("10:00 DAMAGE"));

        assert_eq!(stats.count_for("DAMAGE"), 1);
        assert!(stats.damage_series.is_empty());
        assert_eq!(stats.unparsed_damage_events, 1);
    }

    #[test]
    fn test_damage_type_is_case_sensitive() {
        let stats = aggregate(&parse_log("10:00 damage p 50\n10:01 Damage p 40"));

        assert_eq!(stats.total_damage, 0);
        assert_eq!(stats.count_for("damage"), 1);
        assert_eq!(stats.count_for("Damage"), 1);
        assert_eq!(stats.count_for("DAMAGE"), 0);
    }

    #[test]
    fn test_negative_and_signed_damage() {
        let stats = aggregate(&parse_log("1 DAMAGE -20\n2 DAMAGE +50"));

        assert_eq!(stats.total_damage, 30);
        assert_eq!(stats.average_damage, Some(15.0));

        // Only the non-negative amount lands in the distribution
        let p = stats.damage_percentiles.expect("distribution");
        assert_eq!(p.min, 50);
        assert_eq!(p.max, 50);
    }

    #[test]
    fn test_custom_damage_type() {
        let events = parse_log("10:00 HIT p 5\n10:01 DAMAGE p 50");
        let stats = aggregate_with_damage_type(&events, "HIT");

        assert_eq!(stats.total_damage, 5);
        assert_eq!(stats.damage_series, vec![DamagePoint::new("10:00", 5)]);
    }

    #[test]
    fn test_first_seen_order() {
        let stats = aggregate(&parse_log("1 ZED\n2 ALPHA\n3 ZED\n4 MID"));
        let order: Vec<_> = stats
            .event_type_counts
            .iter()
            .map(|c| c.event_type.as_str())
            .collect();
        assert_eq!(order, vec!["ZED", "ALPHA", "MID"]);
    }

    #[test]
    fn test_damage_percentiles() {
        let raw: String = (1..=100)
            .map(|i| format!("{} DAMAGE p {}\n", i, i))
            .collect();
        let stats = aggregate(&parse_log(&raw));
        let p = stats.damage_percentiles.expect("distribution");

        assert_eq!(p.min, 1);
        assert_eq!(p.max, 100);
        assert_eq!(p.p50, 50);
        assert!((p.mean - 50.5).abs() < 0.01);
    }

    #[test]
    fn test_idempotent_aggregation() {
        let events = parse_log(SCENARIO_A);
        assert_eq!(aggregate(&events), aggregate(&events));
    }

    #[test]
    fn test_summary_display_breakdown() {
        let output = aggregate(&parse_log(SCENARIO_A)).to_string();

        assert!(output.contains("Total Events: 3"));
        assert!(output.contains("Total Damage: 80"));
        assert!(output.contains("Event Types Breakdown:"));
        assert!(output.contains("  DAMAGE: 2"));
        assert!(output.contains("  HEAL: 1"));
    }

    fn log_line() -> impl Strategy<Value = String> {
        (
            "[0-9]{2}:[0-9]{2}",
            prop_oneof![
                Just("DAMAGE".to_string()),
                Just("HEAL".to_string()),
                "[A-Z]{1,6}"
            ],
            prop::collection::vec(
                prop_oneof![
                    "[a-z0-9]{1,8}",
                    (-1000i64..1000).prop_map(|v| v.to_string())
                ],
                0..4,
            ),
        )
            .prop_map(|(timestamp, event_type, details)| {
                let mut fields = vec![timestamp, event_type];
                fields.extend(details);
                fields.join(" ")
            })
    }

    fn log_text() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![log_line(), Just(String::new()), Just("  \t".to_string())],
            0..30,
        )
        .prop_map(|lines| lines.join("\n"))
    }

    fn non_blank_lines(raw: &str) -> u64 {
        raw.split('\n').filter(|l| !l.trim().is_empty()).count() as u64
    }

    proptest! {
        #[test]
        fn prop_total_events_matches_non_blank_lines(raw in log_text()) {
            let stats = aggregate(&parse_log(&raw));
            prop_assert_eq!(stats.total_events, non_blank_lines(&raw));
        }

        #[test]
        fn prop_arbitrary_text_is_total(raw in any::<String>()) {
            let stats = aggregate(&parse_log(&raw));
            prop_assert_eq!(stats.total_events, non_blank_lines(&raw));
        }

        #[test]
        fn prop_type_counts_sum_to_total(raw in log_text()) {
            let stats = aggregate(&parse_log(&raw));
            let sum: u64 = stats.event_type_counts.iter().map(|c| c.count).sum();
            prop_assert_eq!(sum, stats.total_events);
        }

        #[test]
        fn prop_total_damage_matches_series(raw in log_text()) {
            let stats = aggregate(&parse_log(&raw));
            let sum: i128 = stats.damage_series.iter().map(|p| i128::from(p.damage)).sum();
            prop_assert_eq!(i128::from(stats.total_damage), sum);
            prop_assert_eq!(stats.average_damage.is_none(), stats.damage_series.is_empty());
        }

        #[test]
        fn prop_aggregation_is_idempotent(raw in log_text()) {
            let events = parse_log(&raw);
            prop_assert_eq!(aggregate(&events), aggregate(&events));
        }
    }
}
