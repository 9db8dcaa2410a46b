//! Operator-facing text for the last-sequence panel, stat cards and history list.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::gateway::api::NextSequenceResponse;

use super::history::{HistoryBuffer, SequenceEvent};
use super::snapshot::StatsSnapshot;

pub const PLACEHOLDER: &str = "-";
pub const EMPTY_HISTORY_MESSAGE: &str =
    "No sequences generated yet. Generate one to start the history.";
const INITIAL_DETAILS: &str = "Waiting for the first sequence";
const RESET_DETAILS: &str = "System reset - ready for new sequences";

/// Wall-clock `HH:MM:SS` in the operator's timezone.
pub fn clock_label(timestamp: &DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// The "last sequence" panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LastSequence {
    Placeholder {
        details: String,
    },
    Issued {
        sequence_number: u64,
        site_id: String,
        partition_id: String,
        invoice_type: String,
        gap_filled: bool,
        node_id: Option<String>,
        processing_time_ms: Option<u64>,
    },
}

impl Default for LastSequence {
    fn default() -> Self {
        LastSequence::Placeholder {
            details: INITIAL_DETAILS.to_string(),
        }
    }
}

impl LastSequence {
    pub fn after_reset() -> Self {
        LastSequence::Placeholder {
            details: RESET_DETAILS.to_string(),
        }
    }

    pub fn issued(event: &SequenceEvent, response: &NextSequenceResponse) -> Self {
        LastSequence::Issued {
            sequence_number: event.sequence_number,
            site_id: event.site_id.clone(),
            partition_id: event.partition_id.clone(),
            invoice_type: event.invoice_type.clone(),
            gap_filled: event.gap_filled,
            node_id: response.node_id.clone(),
            processing_time_ms: event.processing_time_ms,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, LastSequence::Placeholder { .. })
    }

    pub fn headline(&self) -> String {
        match self {
            LastSequence::Placeholder { .. } => PLACEHOLDER.to_string(),
            LastSequence::Issued {
                sequence_number, ..
            } => sequence_number.to_string(),
        }
    }

    pub fn details(&self) -> String {
        match self {
            LastSequence::Placeholder { details } => details.clone(),
            LastSequence::Issued {
                site_id,
                partition_id,
                invoice_type,
                gap_filled,
                node_id,
                processing_time_ms,
                ..
            } => {
                let mut line =
                    format!("Site: {site_id} • Partition: {partition_id} • Type: {invoice_type}");
                if *gap_filled {
                    line.push_str(" (Gap Filled!)");
                }
                if let Some(node) = node_id.as_deref().filter(|n| !n.is_empty()) {
                    line.push_str(&format!(" • Node: {node}"));
                }
                // a zero timing is noise on the panel, though history lines still show it
                if let Some(ms) = processing_time_ms.filter(|ms| *ms > 0) {
                    line.push_str(&format!(" • {ms}ms"));
                }
                line
            }
        }
    }
}

/// Rendered values for the four stat cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCards {
    pub current_counter: String,
    pub total_generated: String,
    pub available_gaps: String,
    pub average_latency_ms: String,
}

impl StatCards {
    pub fn from_snapshot(stats: Option<&StatsSnapshot>) -> Self {
        let count = |value: Option<u64>| {
            value
                .map(|v| v.to_string())
                .unwrap_or_else(|| PLACEHOLDER.to_string())
        };

        Self {
            current_counter: count(stats.and_then(|s| s.current_counter)),
            total_generated: count(stats.and_then(|s| s.total_generated)),
            available_gaps: count(stats.and_then(|s| s.available_gaps)),
            average_latency_ms: stats
                .and_then(|s| s.average_latency_ms)
                .map(|ms| format!("{ms:.2}"))
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
        }
    }
}

pub fn history_line(event: &SequenceEvent) -> String {
    let badge = if event.gap_filled { " [Gap Filled]" } else { "" };
    format!(
        "#{}{} {} ({}) {} • {}ms",
        event.sequence_number,
        badge,
        event.site_partition(),
        event.invoice_type,
        clock_label(&event.timestamp),
        event.processing_time_ms.unwrap_or(0)
    )
}

/// History list, newest first, or the empty-state message.
pub fn history_lines(history: &HistoryBuffer) -> Vec<String> {
    if history.is_empty() {
        return vec![EMPTY_HISTORY_MESSAGE.to_string()];
    }
    history.iter().map(history_line).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::state::history::sample_event;

    #[test]
    fn issued_details_include_optional_parts() {
        let mut event = sample_event(1042);
        event.gap_filled = true;
        event.processing_time_ms = Some(12);
        let response = NextSequenceResponse {
            node_id: Some("node-1".to_string()),
            ..Default::default()
        };

        let last = LastSequence::issued(&event, &response);
        assert_eq!(last.headline(), "1042");
        assert_eq!(
            last.details(),
            "Site: S1 • Partition: P1 • Type: INV (Gap Filled!) • Node: node-1 • 12ms"
        );
    }

    #[test]
    fn zero_processing_time_is_left_out_of_details() {
        let mut event = sample_event(5);
        event.processing_time_ms = Some(0);
        let last = LastSequence::issued(&event, &NextSequenceResponse::default());
        assert_eq!(last.details(), "Site: S1 • Partition: P1 • Type: INV");

        let mut history = HistoryBuffer::new();
        history.push(event);
        assert!(history_lines(&history)[0].ends_with(" • 0ms"));
    }

    #[test]
    fn reset_placeholder() {
        let last = LastSequence::after_reset();
        assert!(last.is_placeholder());
        assert_eq!(last.headline(), "-");
        assert_eq!(last.details(), "System reset - ready for new sequences");
    }

    #[test]
    fn stat_cards_render_absent_values_as_dash() {
        assert_eq!(
            StatCards::from_snapshot(None),
            StatCards {
                current_counter: "-".to_string(),
                total_generated: "-".to_string(),
                available_gaps: "-".to_string(),
                average_latency_ms: "-".to_string(),
            }
        );

        let stats = StatsSnapshot {
            current_counter: Some(0),
            total_generated: Some(42),
            available_gaps: None,
            average_latency_ms: Some(1.234),
            sequences_by_site_partition: Some(BTreeMap::new()),
        };
        let cards = StatCards::from_snapshot(Some(&stats));
        assert_eq!(cards.current_counter, "0");
        assert_eq!(cards.total_generated, "42");
        assert_eq!(cards.available_gaps, "-");
        assert_eq!(cards.average_latency_ms, "1.23");
    }

    #[test]
    fn history_lines_show_empty_state() {
        let mut history = HistoryBuffer::new();
        assert_eq!(history_lines(&history), vec![EMPTY_HISTORY_MESSAGE.to_string()]);

        let mut event = sample_event(7);
        event.gap_filled = true;
        history.push(event);
        let lines = history_lines(&history);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("#7 [Gap Filled] S1-P1 (INV) "));
        assert!(lines[0].ends_with(" • 3ms"));
    }
}
