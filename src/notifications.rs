//! Self-expiring operator notifications.
//!
//! Each notification lives for [`NOTIFICATION_TTL`], then spends [`EXIT_TRANSITION`]
//! in a leaving state before it is removed. Notifications are timed independently;
//! there is no cap and no deduplication.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::{self, Instant};
use tracing::debug;

use crate::events::{DashboardEvent, EventBus};
use crate::scheduler::ScheduledTask;

pub const NOTIFICATION_TTL: Duration = Duration::from_millis(3000);
pub const EXIT_TRANSITION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationLevel {
    pub fn label(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "info",
            NotificationLevel::Success => "ok",
            NotificationLevel::Warning => "warn",
            NotificationLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPhase {
    Visible,
    Leaving,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub level: NotificationLevel,
    pub created_at: DateTime<Utc>,
    pub ttl: Duration,
    pub phase: NotificationPhase,
}

#[derive(Debug, Default)]
struct QueueInner {
    next_id: u64,
    live: Vec<Notification>,
}

/// Shared handle to the live notification list.
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    inner: Arc<Mutex<QueueInner>>,
    events: EventBus,
}

impl NotificationQueue {
    pub fn new(events: EventBus) -> Self {
        Self {
            inner: Arc::new(Mutex::new(QueueInner::default())),
            events,
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Show `message` now and schedule its removal. Returns the notification id.
    pub fn emit(&self, message: impl Into<String>, level: NotificationLevel) -> u64 {
        let notification = {
            let mut inner = self.lock();
            inner.next_id += 1;
            let notification = Notification {
                id: inner.next_id,
                message: message.into(),
                level,
                created_at: Utc::now(),
                ttl: NOTIFICATION_TTL,
                phase: NotificationPhase::Visible,
            };
            inner.live.push(notification.clone());
            notification
        };

        let id = notification.id;
        debug!(id, level = level.label(), message = %notification.message, "Notification shown");
        self.events
            .publish(DashboardEvent::NotificationShown(notification));

        // Deadlines are anchored to creation so a late wakeup never stretches the lifetime
        let exit_at = Instant::now() + NOTIFICATION_TTL;
        let queue = self.clone();
        ScheduledTask::at(exit_at, async move {
            queue.begin_exit(id);
            time::sleep_until(exit_at + EXIT_TRANSITION).await;
            queue.remove(id);
        });

        id
    }

    fn begin_exit(&self, id: u64) {
        let leaving = {
            let mut inner = self.lock();
            match inner.live.iter_mut().find(|n| n.id == id) {
                Some(notification) => {
                    notification.phase = NotificationPhase::Leaving;
                    true
                }
                None => false,
            }
        };
        if leaving {
            self.events.publish(DashboardEvent::NotificationLeaving(id));
        }
    }

    /// Remove a notification. Returns `false` if it was already gone.
    pub fn remove(&self, id: u64) -> bool {
        let removed = {
            let mut inner = self.lock();
            let before = inner.live.len();
            inner.live.retain(|n| n.id != id);
            inner.live.len() != before
        };
        if removed {
            debug!(id, "Notification removed");
            self.events.publish(DashboardEvent::NotificationRemoved(id));
        }
        removed
    }

    pub fn live(&self) -> Vec<Notification> {
        self.lock().live.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().live.is_empty()
    }
}
