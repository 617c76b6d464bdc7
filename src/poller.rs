//! Periodic refresh of the violation list and the video catalog.
//!
//! Each endpoint gets one task running a single loop: wait for the next tick
//! (or cancellation), fetch, forward the result. The fetch is awaited inside
//! the loop, so a slow response delays the next tick instead of racing it;
//! missed ticks are skipped rather than replayed in a burst.
//!
//! Results are sent to the owner of the session state, which applies them.
//! The pollers never touch that state themselves.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::api::{Backend, FetchError};
use crate::core::violation::{VideoDescriptor, ViolationRecord};

/// Capacity of the update channel. A full channel holds the pollers back.
const UPDATE_CHANNEL_CAPACITY: usize = 16;

/// Callback run after each forwarded update (e.g. request a UI repaint)
pub type Wake = Arc<dyn Fn() + Send + Sync>;

/// A fetch outcome delivered to the session owner
#[derive(Debug, Clone)]
pub enum PollUpdate {
    Violations(Result<Vec<ViolationRecord>, FetchError>),
    Videos(Result<Vec<VideoDescriptor>, FetchError>),
}

/// Endpoint polled by one task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollTarget {
    Violations,
    Videos,
}

impl PollTarget {
    fn name(self) -> &'static str {
        match self {
            PollTarget::Violations => "violations",
            PollTarget::Videos => "videos",
        }
    }

    async fn fetch(self, backend: &dyn Backend) -> PollUpdate {
        match self {
            PollTarget::Violations => PollUpdate::Violations(backend.fetch_violations().await),
            PollTarget::Videos => PollUpdate::Videos(backend.fetch_videos().await),
        }
    }
}

/// Polling intervals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub violations_every: Duration,
    pub videos_every: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            violations_every: Duration::from_secs(5),
            videos_every: Duration::from_secs(5),
        }
    }
}

/// Handle to the running poll tasks
pub struct Pollers {
    cancel: CancellationToken,
    tracker: TaskTracker,
    violations_in_flight: Arc<AtomicBool>,
    videos_in_flight: Arc<AtomicBool>,
}

impl Pollers {
    /// Start both poll tasks on `runtime`.
    ///
    /// The first fetch of each task happens immediately.
    pub fn spawn(
        runtime: &tokio::runtime::Handle,
        backend: Arc<dyn Backend>,
        config: PollConfig,
        wake: Option<Wake>,
    ) -> (Self, mpsc::Receiver<PollUpdate>) {
        let (tx, rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();
        let tracker = TaskTracker::new();

        let pollers = Self {
            cancel: cancel.clone(),
            tracker: tracker.clone(),
            violations_in_flight: Arc::new(AtomicBool::new(false)),
            videos_in_flight: Arc::new(AtomicBool::new(false)),
        };

        for (target, period, in_flight) in [
            (
                PollTarget::Violations,
                config.violations_every,
                Arc::clone(&pollers.violations_in_flight),
            ),
            (
                PollTarget::Videos,
                config.videos_every,
                Arc::clone(&pollers.videos_in_flight),
            ),
        ] {
            let task = poll_loop(
                target,
                period,
                Arc::clone(&backend),
                tx.clone(),
                cancel.clone(),
                in_flight,
                wake.clone(),
            );
            tracker.spawn_on(task, runtime);
        }
        tracker.close();

        (pollers, rx)
    }

    /// Whether a fetch for `target` is currently outstanding
    pub fn is_in_flight(&self, target: PollTarget) -> bool {
        let flag = match target {
            PollTarget::Violations => &self.violations_in_flight,
            PollTarget::Videos => &self.videos_in_flight,
        };
        flag.load(Ordering::SeqCst)
    }

    /// Cancel and wait for both tasks to exit
    pub async fn shutdown(self) {
        self.cancel.cancel();
        self.tracker.wait().await;
        tracing::info!("Pollers stopped");
    }
}

impl Drop for Pollers {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_loop(
    target: PollTarget,
    period: Duration,
    backend: Arc<dyn Backend>,
    tx: mpsc::Sender<PollUpdate>,
    cancel: CancellationToken,
    in_flight: Arc<AtomicBool>,
    wake: Option<Wake>,
) {
    tracing::info!(
        endpoint = target.name(),
        period_ms = period.as_millis() as u64,
        "Poller started"
    );

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        if in_flight.swap(true, Ordering::SeqCst) {
            tracing::debug!(
                endpoint = target.name(),
                "Previous fetch still in flight, skipping tick"
            );
            continue;
        }

        let update = tokio::select! {
            _ = cancel.cancelled() => {
                in_flight.store(false, Ordering::SeqCst);
                break;
            }
            update = target.fetch(backend.as_ref()) => update,
        };
        in_flight.store(false, Ordering::SeqCst);

        if tx.send(update).await.is_err() {
            tracing::debug!(endpoint = target.name(), "Update receiver dropped");
            break;
        }
        if let Some(wake) = &wake {
            wake();
        }
    }

    tracing::info!(endpoint = target.name(), "Poller exiting");
}
