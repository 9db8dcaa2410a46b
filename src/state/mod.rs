mod demo;
mod display;
mod history;
mod snapshot;

pub use demo::{Classification, DemoTrace, TraceLine, TraceStyle};
pub use display::{
    clock_label, history_line, history_lines, LastSequence, StatCards, EMPTY_HISTORY_MESSAGE,
    PLACEHOLDER,
};
pub use history::{HistoryBuffer, SequenceEvent, HISTORY_CAPACITY};
pub use snapshot::{HealthState, StatsSnapshot};

#[cfg(test)]
pub(crate) use history::sample_event;

/// Dispatch/apply counters for one poll task.
///
/// Each dispatch takes a ticket; `accept` decides whether a completed response may be
/// applied. Without stale filtering every response is applied in completion order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSequence {
    dispatched: u64,
    applied: u64,
}

impl PollSequence {
    pub fn dispatch(&mut self) -> u64 {
        self.dispatched += 1;
        self.dispatched
    }

    pub fn accept(&mut self, ticket: u64, discard_stale: bool) -> bool {
        if discard_stale && ticket < self.applied {
            return false;
        }
        self.applied = self.applied.max(ticket);
        true
    }
}

/// Everything the dashboard shows, owned by one session.
#[derive(Debug, Default)]
pub struct DashboardState {
    pub history: HistoryBuffer,
    pub last_sequence: LastSequence,
    pub stats: Option<StatsSnapshot>,
    pub health: HealthState,
    pub demo_trace: Option<DemoTrace>,
    pub visible: bool,
    pub(crate) stats_in_flight: usize,
    /// A `StatsLoading(true)` went out and still awaits its `false`.
    pub(crate) stats_loading_shown: bool,
    /// Set once the operator has actually seen the current failure streak.
    pub(crate) stats_failure_notified: bool,
    pub(crate) health_failure_notified: bool,
    pub(crate) stats_polls: PollSequence,
    pub(crate) health_polls: PollSequence,
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            visible: true,
            ..Self::default()
        }
    }
}
