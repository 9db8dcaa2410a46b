//! Bounded record of recently generated sequences.

use std::collections::VecDeque;
use std::iter::Rev;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Maximum number of generation events kept for display.
pub const HISTORY_CAPACITY: usize = 20;

/// One sequence number handed out by the service, as seen by this dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequenceEvent {
    pub sequence_number: u64,
    pub site_id: String,
    pub partition_id: String,
    pub invoice_type: String,
    pub gap_filled: bool,
    pub timestamp: DateTime<Utc>,
    pub processing_time_ms: Option<u64>,
}

impl SequenceEvent {
    /// `site-partition` key, matching the service's distribution buckets.
    pub fn site_partition(&self) -> String {
        format!("{}-{}", self.site_id, self.partition_id)
    }
}

/// Newest-first buffer that never holds more than [`HISTORY_CAPACITY`] events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryBuffer {
    entries: VecDeque<SequenceEvent>,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_CAPACITY + 1),
        }
    }

    /// Prepend `event`, evicting the oldest entry once over capacity.
    pub fn push(&mut self, event: SequenceEvent) {
        self.entries.push_front(event);
        if self.entries.len() > HISTORY_CAPACITY {
            self.entries.pop_back();
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recently pushed event.
    pub fn latest(&self) -> Option<&SequenceEvent> {
        self.entries.front()
    }

    /// Events newest-first.
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, SequenceEvent> {
        self.entries.iter()
    }

    /// Events oldest-first. The iterator is lazy and can be cloned to restart it.
    pub fn chronological(&self) -> Rev<std::collections::vec_deque::Iter<'_, SequenceEvent>> {
        self.entries.iter().rev()
    }
}

#[cfg(test)]
pub(crate) fn sample_event(sequence_number: u64) -> SequenceEvent {
    use chrono::TimeZone;

    SequenceEvent {
        sequence_number,
        site_id: "S1".to_string(),
        partition_id: "P1".to_string(),
        invoice_type: "INV".to_string(),
        gap_filled: false,
        timestamp: Utc
            .timestamp_opt(1_700_000_000 + sequence_number as i64, 0)
            .single()
            .unwrap(),
        processing_time_ms: Some(3),
    }
}
