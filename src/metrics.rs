//! Prometheus text exposition of log statistics.
//!
//! Renders a [`Statistics`] snapshot in the Prometheus text format so it can
//! be dropped into a node-exporter textfile directory or scraped by hand.

use crate::stats::Statistics;

/// Escape a label value (backslash, double quote, newline).
fn escape_label(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Format statistics as Prometheus text format.
pub fn format_prometheus_metrics(stats: &Statistics) -> String {
    let mut output = String::with_capacity(2048);

    // Total events
    output.push_str("# HELP eventlog_events_total Total number of events parsed\n");
    output.push_str("# TYPE eventlog_events_total counter\n");
    output.push_str(&format!("eventlog_events_total {}\n", stats.total_events));

    // Events by type
    output.push_str("# HELP eventlog_events_by_type_total Events broken down by event type\n");
    output.push_str("# TYPE eventlog_events_by_type_total counter\n");
    for c in &stats.event_type_counts {
        output.push_str(&format!(
            "eventlog_events_by_type_total{{type=\"{}\"}} {}\n",
            escape_label(&c.event_type),
            c.count
        ));
    }

    // Damage totals
    output.push_str("# HELP eventlog_damage_total Sum of parsed damage amounts\n");
    output.push_str("# TYPE eventlog_damage_total counter\n");
    output.push_str(&format!("eventlog_damage_total {}\n", stats.total_damage));

    output.push_str("# HELP eventlog_damage_events_total Damage events with a parsed amount\n");
    output.push_str("# TYPE eventlog_damage_events_total counter\n");
    output.push_str(&format!(
        "eventlog_damage_events_total {}\n",
        stats.damage_events()
    ));

    output.push_str(
        "# HELP eventlog_unparsed_damage_events_total Damage events without a parsable amount\n",
    );
    output.push_str("# TYPE eventlog_unparsed_damage_events_total counter\n");
    output.push_str(&format!(
        "eventlog_unparsed_damage_events_total {}\n",
        stats.unparsed_damage_events
    ));

    // Average is omitted when not computable
    if let Some(avg) = stats.average_damage {
        output.push_str("# HELP eventlog_damage_average Average damage per damage event\n");
        output.push_str("# TYPE eventlog_damage_average gauge\n");
        output.push_str(&format!("eventlog_damage_average {:.3}\n", avg));
    }

    if let Some(ref p) = stats.damage_percentiles {
        output.push_str("# HELP eventlog_damage Damage amount distribution\n");
        output.push_str("# TYPE eventlog_damage summary\n");
        output.push_str(&format!("eventlog_damage{{quantile=\"0.5\"}} {}\n", p.p50));
        output.push_str(&format!("eventlog_damage{{quantile=\"0.9\"}} {}\n", p.p90));
        output.push_str(&format!("eventlog_damage{{quantile=\"0.99\"}} {}\n", p.p99));
    }

    output
}
