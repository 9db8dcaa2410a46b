use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tracing::info;

use crate::config::Config;
use crate::session::DashboardSession;

use super::ScheduledTask;

/// Intervals of the two independent poll tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollCadence {
    pub stats: Duration,
    pub health: Duration,
}

impl Default for PollCadence {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl PollCadence {
    pub fn from_config(config: &Config) -> Self {
        Self {
            stats: config.stats_interval(),
            health: config.health_interval(),
        }
    }
}

/// Drives the stats and health polls for one session.
pub struct Scheduler {
    session: DashboardSession,
    cadence: PollCadence,
    started: AtomicBool,
    tasks: Mutex<Vec<ScheduledTask>>,
}

impl Scheduler {
    pub fn new(session: DashboardSession, cadence: PollCadence) -> Self {
        Self {
            session,
            cadence,
            started: AtomicBool::new(false),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Start both poll timers. Later calls are no-ops and return `false`.
    pub fn start(&self) -> bool {
        if self.started.swap(true, Ordering::SeqCst) {
            return false;
        }

        let stats_session = self.session.clone();
        let stats = ScheduledTask::every(self.cadence.stats, move || {
            let session = stats_session.clone();
            async move { session.refresh_stats().await }
        });

        let health_session = self.session.clone();
        let health = ScheduledTask::every(self.cadence.health, move || {
            let session = health_session.clone();
            async move { session.refresh_health().await }
        });

        self.tasks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .extend([stats, health]);

        info!(
            stats_ms = self.cadence.stats.as_millis() as u64,
            health_ms = self.cadence.health.as_millis() as u64,
            "Polling started"
        );
        true
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Timers keep running while hidden; only UI side effects are held back.
    /// Becoming visible again triggers one immediate refresh of both polls.
    pub fn set_visible(&self, visible: bool) {
        let was_visible = self.session.set_visible(visible);
        if visible == was_visible {
            return;
        }

        if visible {
            info!("Dashboard visible, refreshing now");
            let session = self.session.clone();
            tokio::spawn(async move {
                tokio::join!(session.refresh_stats(), session.refresh_health());
            });
        } else {
            info!("Dashboard hidden, holding back updates");
        }
    }

    /// Stop both timers. In-flight polls still complete.
    pub fn shutdown(&self) {
        let tasks = std::mem::take(
            &mut *self
                .tasks
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        );
        for task in &tasks {
            task.cancel();
        }
    }
}
