//! Update progress timer
//!
//! While a player update runs, a ticker publishes how much of the expected
//! update window remains. The ticker owns its task: stopping it or dropping
//! it aborts the task, so no ticks outlive the update.

use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Tick interval of the progress timer (~60 FPS)
pub const PROGRESS_TICK: Duration = Duration::from_millis(16);

/// Expected upper bound of an update
pub const UPDATE_WINDOW: Duration = Duration::from_secs(5 * 60);

/// Percentage of the update window still remaining, clamped to [0, 100]
pub fn remaining_percent(started: Instant, now: Instant) -> f64 {
    let elapsed = now.saturating_duration_since(started);
    let fraction = elapsed.as_secs_f64() / UPDATE_WINDOW.as_secs_f64();
    ((1.0 - fraction) * 100.0).clamp(0.0, 100.0)
}

/// Periodic publisher of [`remaining_percent`]
pub struct ProgressTicker {
    started: Instant,
    handle: Option<JoinHandle<()>>,
    receiver: watch::Receiver<f64>,
}

impl ProgressTicker {
    /// Start ticking for an update that began at `started`
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(started: Instant, tick: Duration) -> Self {
        let tick = tick.max(Duration::from_millis(1));
        let (sender, receiver) = watch::channel(remaining_percent(started, Instant::now()));

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                if sender.send(remaining_percent(started, Instant::now())).is_err() {
                    break;
                }
            }
        });

        tracing::debug!(tick_ms = tick.as_millis() as u64, "Progress ticker started");

        Self {
            started,
            handle: Some(handle),
            receiver,
        }
    }

    /// Start with the default tick
    pub fn start_now() -> Self {
        Self::start(Instant::now(), PROGRESS_TICK)
    }

    /// When the tracked update began
    pub fn started(&self) -> Instant {
        self.started
    }

    /// Latest published percentage
    pub fn current(&self) -> f64 {
        *self.receiver.borrow()
    }

    /// Receiver for progress updates; closes once the ticker stops
    pub fn subscribe(&self) -> watch::Receiver<f64> {
        self.receiver.clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().map_or(false, |h| !h.is_finished())
    }

    /// Stop ticking. Idempotent.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!("Progress ticker stopped");
        }
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_percent_bounds() {
        let start = Instant::now();
        assert_eq!(remaining_percent(start, start), 100.0);

        let halfway = start + UPDATE_WINDOW / 2;
        assert!((remaining_percent(start, halfway) - 50.0).abs() < 1e-9);

        let overdue = start + UPDATE_WINDOW * 2;
        assert_eq!(remaining_percent(start, overdue), 0.0);
    }

    #[test]
    fn test_remaining_percent_before_start() {
        let now = Instant::now();
        let later = now + Duration::from_secs(10);
        assert_eq!(remaining_percent(later, now), 100.0);
    }

    #[tokio::test]
    async fn test_ticker_publishes() {
        let ticker = ProgressTicker::start(Instant::now(), Duration::from_millis(5));
        let mut rx = ticker.subscribe();

        let changed = tokio::time::timeout(Duration::from_secs(1), rx.changed()).await;
        assert!(changed.is_ok());
        assert!(ticker.is_running());
        assert!(ticker.current() <= 100.0);
    }

    #[tokio::test]
    async fn test_stop_closes_channel() {
        let mut ticker = ProgressTicker::start(Instant::now(), Duration::from_millis(5));
        let mut rx = ticker.subscribe();
        ticker.stop();
        ticker.stop();

        let drained = tokio::time::timeout(Duration::from_secs(1), async {
            while rx.changed().await.is_ok() {}
        })
        .await;

        assert!(drained.is_ok(), "ticker kept publishing after stop");
        assert!(!ticker.is_running());
    }

    #[tokio::test]
    async fn test_drop_closes_channel() {
        let ticker = ProgressTicker::start(Instant::now(), Duration::from_millis(5));
        let mut rx = ticker.subscribe();
        drop(ticker);

        let drained = tokio::time::timeout(Duration::from_secs(1), async {
            while rx.changed().await.is_ok() {}
        })
        .await;

        assert!(drained.is_ok(), "ticker kept publishing after drop");
    }
}
