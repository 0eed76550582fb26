//! Recurring task scheduling

use crate::error::PluginError;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Task invoked on every scheduled tick
pub type ScheduledFn = Arc<dyn Fn() -> BoxFuture<'static, Result<(), PluginError>> + Send + Sync>;

/// Host scheduling primitive
pub trait Scheduler: Send + Sync {
    /// Runs `task` once after `initial_delay`, then every `interval`
    ///
    /// # Panics
    /// Implementations may panic if `interval` is zero.
    fn interval(
        &self,
        task: ScheduledFn,
        interval: Duration,
        initial_delay: Duration,
    ) -> ScheduledTask;
}

/// Handle to a running schedule; cancelled on drop
pub struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    pub fn new(handle: JoinHandle<()>) -> Self {
        Self { handle }
    }

    /// Stops the schedule
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Scheduler backed by a spawned tokio task
///
/// Runs are awaited one after another, so a slow run delays the next tick
/// instead of overlapping it. Failed runs are logged and the schedule
/// carries on.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl TokioScheduler {
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for TokioScheduler {
    fn interval(
        &self,
        task: ScheduledFn,
        interval: Duration,
        initial_delay: Duration,
    ) -> ScheduledTask {
        let handle = tokio::spawn(async move {
            tracing::info!(?interval, ?initial_delay, "Starting scheduled task");

            let mut ticker = interval_at(Instant::now() + initial_delay, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if let Err(e) = task().await {
                    tracing::error!(error = %e, "Scheduled task failed");
                }
            }
        });

        ScheduledTask::new(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use futures::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    fn counting_task(counter: Arc<AtomicUsize>, fail: bool) -> ScheduledFn {
        Arc::new(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                if fail {
                    Err(PluginError::dependency("test", ProviderError::Timeout))
                } else {
                    Ok(())
                }
            }
            .boxed()
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_delay_then_interval() {
        let counter = Arc::new(AtomicUsize::new(0));
        let _task = TokioScheduler::new().interval(
            counting_task(counter.clone(), false),
            Duration::from_secs(60),
            Duration::from_secs(5),
        );

        sleep(Duration::from_millis(4900)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(200)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        sleep(Duration::from_secs(59)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        sleep(Duration::from_secs(2)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        sleep(Duration::from_secs(120)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_do_not_stop_schedule() {
        let counter = Arc::new(AtomicUsize::new(0));
        let task = TokioScheduler::new().interval(
            counting_task(counter.clone(), true),
            Duration::from_secs(60),
            Duration::from_secs(5),
        );

        sleep(Duration::from_secs(126)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert!(!task.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_schedule() {
        let counter = Arc::new(AtomicUsize::new(0));
        let task = TokioScheduler::new().interval(
            counting_task(counter.clone(), false),
            Duration::from_secs(60),
            Duration::from_secs(5),
        );

        sleep(Duration::from_secs(6)).await;
        task.cancel();
        sleep(Duration::from_secs(300)).await;

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
