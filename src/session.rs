//! Per-session application state shared by the scheduler and the orchestrator.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::chart::{self, ChartData};
use crate::config::Config;
use crate::events::{DashboardEvent, EventBus};
use crate::gateway::SequenceApi;
use crate::notifications::{NotificationLevel, NotificationQueue};
use crate::state::{DashboardState, HealthState, StatCards, StatsSnapshot};

/// Handle to one dashboard session. Clones share the same state.
#[derive(Clone)]
pub struct DashboardSession {
    state: Arc<Mutex<DashboardState>>,
    gateway: Arc<dyn SequenceApi>,
    notifications: NotificationQueue,
    events: EventBus,
    discard_stale: bool,
}

impl DashboardSession {
    pub fn new(gateway: Arc<dyn SequenceApi>, config: &Config) -> Self {
        let events = EventBus::new();
        Self {
            state: Arc::new(Mutex::new(DashboardState::new())),
            gateway,
            notifications: NotificationQueue::new(events.clone()),
            events,
            discard_stale: config.discard_stale_responses,
        }
    }

    pub fn gateway(&self) -> &dyn SequenceApi {
        self.gateway.as_ref()
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn notify(&self, message: impl Into<String>, level: NotificationLevel) -> u64 {
        self.notifications.emit(message, level)
    }

    /// Run `f` with exclusive access to the state. Never call across an `.await`.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut DashboardState) -> R) -> R {
        f(&mut self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, DashboardState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_visible(&self) -> bool {
        self.lock().visible
    }

    /// Record visibility; returns the previous value.
    pub(crate) fn set_visible(&self, visible: bool) -> bool {
        std::mem::replace(&mut self.lock().visible, visible)
    }

    pub fn charts(&self) -> ChartData {
        let state = self.lock();
        chart::project(&state.history, state.stats.as_ref())
    }

    pub fn publish_charts(&self) {
        self.events.publish(DashboardEvent::ChartsUpdated(self.charts()));
    }

    /// One stats poll: dispatch, then apply the snapshot if it is still wanted.
    pub async fn refresh_stats(&self) {
        let (ticket, loading_started) = self.with_state(|state| {
            state.stats_in_flight += 1;
            let started = state.stats_in_flight == 1 && state.visible;
            if started {
                state.stats_loading_shown = true;
            }
            (state.stats_polls.dispatch(), started)
        });
        if loading_started {
            self.events.publish(DashboardEvent::StatsLoading(true));
        }

        let result = self.gateway.stats().await;

        let discard_stale = self.discard_stale;
        let (visible, loading_finished, outcome) = self.with_state(|state| {
            state.stats_in_flight = state.stats_in_flight.saturating_sub(1);
            let outcome = match result {
                Ok(response) => {
                    if state.stats_polls.accept(ticket, discard_stale) {
                        state.stats = Some(StatsSnapshot::from(response));
                        state.stats_failure_notified = false;
                        StatsOutcome::Applied(StatCards::from_snapshot(state.stats.as_ref()))
                    } else {
                        StatsOutcome::Discarded
                    }
                }
                Err(err) => {
                    let notify = state.visible && !state.stats_failure_notified;
                    if notify {
                        state.stats_failure_notified = true;
                    }
                    StatsOutcome::Failed {
                        message: err.reason(),
                        notify,
                    }
                }
            };
            let finished = state.stats_in_flight == 0 && state.stats_loading_shown;
            if finished {
                state.stats_loading_shown = false;
            }
            (state.visible, finished, outcome)
        });

        match &outcome {
            StatsOutcome::Applied(_) => debug!(ticket, "Stats snapshot applied"),
            StatsOutcome::Discarded => debug!(ticket, "Discarded stale stats response"),
            StatsOutcome::Failed { message, .. } => {
                warn!(ticket, error = %message, "Stats poll failed, keeping previous snapshot")
            }
        }

        // A shown indicator is always cleared, even if the dashboard was hidden meanwhile
        if loading_finished {
            self.events.publish(DashboardEvent::StatsLoading(false));
        }
        if !visible {
            return;
        }
        match outcome {
            StatsOutcome::Applied(cards) => {
                self.events.publish(DashboardEvent::StatsUpdated(cards));
                self.publish_charts();
            }
            StatsOutcome::Discarded => {}
            StatsOutcome::Failed { message, notify } => {
                if notify {
                    self.notify(
                        format!("Statistics unavailable: {message}"),
                        NotificationLevel::Error,
                    );
                }
            }
        }
    }

    /// One health poll. A failed call marks the service unreachable.
    pub async fn refresh_health(&self) {
        let ticket = self.with_state(|state| state.health_polls.dispatch());

        let result = self.gateway.health().await;

        let discard_stale = self.discard_stale;
        let (visible, change) = self.with_state(|state| {
            if !state.health_polls.accept(ticket, discard_stale) {
                return (state.visible, None);
            }
            let next = match &result {
                Ok(response) => HealthState::from_response(response),
                Err(err) => HealthState::Unreachable {
                    reason: err.reason(),
                },
            };
            let notify = if next.is_unreachable() {
                let notify = state.visible && !state.health_failure_notified;
                if notify {
                    state.health_failure_notified = true;
                }
                notify
            } else {
                state.health_failure_notified = false;
                false
            };
            state.health = next.clone();
            (state.visible, Some((next, notify)))
        });

        let Some((health, notify)) = change else {
            debug!(ticket, "Discarded stale health response");
            return;
        };

        match &health {
            HealthState::Unreachable { reason } => {
                warn!(ticket, error = %reason, "Health poll failed")
            }
            HealthState::Unhealthy { .. } => info!(ticket, "Service reports issues"),
            _ => debug!(ticket, "Health applied"),
        }

        if !visible {
            return;
        }
        if notify {
            if let HealthState::Unreachable { reason } = &health {
                self.notify(
                    format!("Cannot connect to sequence service: {reason}"),
                    NotificationLevel::Error,
                );
            }
        }
        self.events.publish(DashboardEvent::HealthChanged(health));
    }
}

enum StatsOutcome {
    Applied(StatCards),
    Discarded,
    Failed { message: String, notify: bool },
}
