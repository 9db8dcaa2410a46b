//! Cancellable timer-driven tasks on the tokio clock.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Handle to a scheduled task. Dropping the handle leaves the task running;
/// only [`ScheduledTask::cancel`] stops it.
#[derive(Debug)]
pub struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Run `job` once, `delay` from now.
    pub fn after<F>(delay: Duration, job: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self::at(Instant::now() + delay, job)
    }

    /// Run `job` once at `deadline`.
    pub fn at<F>(deadline: Instant, job: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            time::sleep_until(deadline).await;
            job.await;
        });
        Self { handle }
    }

    /// Spawn a fresh `job()` on every tick, starting immediately.
    ///
    /// Ticks never wait for earlier jobs to finish, so slow jobs overlap rather than
    /// delaying the cadence.
    pub fn every<F, Fut>(period: Duration, mut job: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                tokio::spawn(job());
            }
        });
        Self { handle }
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
