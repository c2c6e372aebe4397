//! Chart datasets derived from statistics.
//!
//! Rendering is left to the caller; these types carry exactly what a
//! charting widget needs and serialize to JSON.

use serde::Serialize;

use crate::stats::Statistics;

/// Kind of chart a dataset is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

/// Labels and values for one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset<T> {
    pub kind: ChartKind,
    pub label: &'static str,
    pub labels: Vec<String>,
    pub values: Vec<T>,
}

/// All chart datasets for one ingestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    /// Count per event type
    pub event_counts: Dataset<u64>,

    /// Damage amount per timestamp
    pub damage_over_time: Dataset<i64>,

    /// Share of each event type
    pub event_distribution: Dataset<u64>,
}

impl ChartData {
    pub fn from_statistics(stats: &Statistics) -> Self {
        let type_labels: Vec<String> = stats
            .event_type_counts
            .iter()
            .map(|c| c.event_type.clone())
            .collect();
        let type_values: Vec<u64> = stats.event_type_counts.iter().map(|c| c.count).collect();

        Self {
            event_counts: Dataset {
                kind: ChartKind::Bar,
                label: "Event Counts",
                labels: type_labels.clone(),
                values: type_values.clone(),
            },
            damage_over_time: Dataset {
                kind: ChartKind::Line,
                label: "Damage",
                labels: stats
                    .damage_series
                    .iter()
                    .map(|p| p.timestamp.clone())
                    .collect(),
                values: stats.damage_series.iter().map(|p| p.damage).collect(),
            },
            event_distribution: Dataset {
                kind: ChartKind::Pie,
                label: "Event Type Distribution",
                labels: type_labels,
                values: type_values,
            },
        }
    }
}
