use tokio::sync::broadcast;

use crate::chart::ChartData;
use crate::notifications::Notification;
use crate::state::{DemoTrace, HealthState, LastSequence, SequenceEvent, StatCards};

const EVENT_BUFFER: usize = 256;

/// State changes published to presentation subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    HistoryChanged(Vec<SequenceEvent>),
    LastSequenceChanged(LastSequence),
    StatsUpdated(StatCards),
    StatsLoading(bool),
    HealthChanged(HealthState),
    ChartsUpdated(ChartData),
    DemoTraceChanged(DemoTrace),
    NotificationShown(Notification),
    NotificationLeaving(u64),
    NotificationRemoved(u64),
}

/// Fan-out of [`DashboardEvent`]s; publishing with no subscribers is not an error.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DashboardEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_BUFFER);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: DashboardEvent) {
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
pub(crate) fn drain(receiver: &mut broadcast::Receiver<DashboardEvent>) -> Vec<DashboardEvent> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}
