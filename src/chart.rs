//! Chart-ready series derived from dashboard state.
//!
//! Projection is a pure function of its inputs; rendering the same projection twice
//! must not change anything on screen.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::{clock_label, HistoryBuffer, StatsSnapshot};

/// One point on the sequence timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelinePoint {
    pub label: String,
    pub timestamp: DateTime<Utc>,
    pub sequence_number: u64,
}

/// One slice of the site-partition distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionSlice {
    pub key: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartData {
    pub timeline: Vec<TimelinePoint>,
    pub distribution: Vec<DistributionSlice>,
}

/// Timeline series, oldest first.
pub fn project_timeline(history: &HistoryBuffer) -> Vec<TimelinePoint> {
    history
        .chronological()
        .map(|event| TimelinePoint {
            label: clock_label(&event.timestamp),
            timestamp: event.timestamp,
            sequence_number: event.sequence_number,
        })
        .collect()
}

/// Distribution series; empty when the snapshot or its map is absent.
pub fn project_distribution(stats: Option<&StatsSnapshot>) -> Vec<DistributionSlice> {
    stats
        .and_then(|s| s.sequences_by_site_partition.as_ref())
        .map(|buckets| {
            buckets
                .iter()
                .map(|(key, count)| DistributionSlice {
                    key: key.clone(),
                    count: *count,
                })
                .collect()
        })
        .unwrap_or_default()
}

pub fn project(history: &HistoryBuffer, stats: Option<&StatsSnapshot>) -> ChartData {
    ChartData {
        timeline: project_timeline(history),
        distribution: project_distribution(stats),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::state::sample_event;

    #[test]
    fn empty_inputs_project_to_empty_series() {
        let data = project(&HistoryBuffer::new(), None);
        assert!(data.timeline.is_empty());
        assert!(data.distribution.is_empty());

        let no_map = StatsSnapshot::default();
        assert!(project_distribution(Some(&no_map)).is_empty());
    }

    #[test]
    fn timeline_matches_history_length_and_runs_oldest_first() {
        let mut history = HistoryBuffer::new();
        for n in 1..=25 {
            history.push(sample_event(n));
            assert_eq!(project_timeline(&history).len(), history.len());
        }

        let timeline = project_timeline(&history);
        let sequences: Vec<u64> = timeline.iter().map(|p| p.sequence_number).collect();
        assert_eq!(sequences, (6..=25).collect::<Vec<_>>());
        assert!(timeline.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn distribution_pairs_keys_with_counts() {
        let stats = StatsSnapshot {
            sequences_by_site_partition: Some(BTreeMap::from([
                ("S2-P1".to_string(), 4),
                ("S1-P1".to_string(), 10),
            ])),
            ..Default::default()
        };

        assert_eq!(
            project_distribution(Some(&stats)),
            vec![
                DistributionSlice {
                    key: "S1-P1".to_string(),
                    count: 10
                },
                DistributionSlice {
                    key: "S2-P1".to_string(),
                    count: 4
                },
            ]
        );
    }

    #[test]
    fn projection_is_deterministic() {
        let mut history = HistoryBuffer::new();
        history.push(sample_event(1));
        history.push(sample_event(2));
        let stats = StatsSnapshot {
            sequences_by_site_partition: Some(BTreeMap::from([("S1-P1".to_string(), 2)])),
            ..Default::default()
        };

        assert_eq!(project(&history, Some(&stats)), project(&history, Some(&stats)));
    }
}
