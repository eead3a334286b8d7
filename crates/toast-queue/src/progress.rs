//! Elapsed-time progress for timed toasts.
//!
//! A ticker task recomputes the ratio on a fixed interval and publishes it
//! through a watch channel. The ticker stops when the ratio reaches 1, when
//! the toast leaves the queue, or when every watcher is gone.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::AbortHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// `(now - started) / duration`, clamped to `[0, 1]`.
///
/// Persistent toasts (`duration == 0`) always report `0`.
pub fn elapsed_ratio(started: Instant, duration: Duration, now: Instant) -> f64 {
    if duration.is_zero() {
        return 0.0;
    }
    let elapsed = now.saturating_duration_since(started);
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

/// Receiver side of a toast's progress ticker.
#[derive(Debug, Clone)]
pub struct ProgressWatch {
    rx: watch::Receiver<f64>,
}

impl ProgressWatch {
    /// Latest published ratio.
    pub fn ratio(&self) -> f64 {
        *self.rx.borrow()
    }

    /// Wait for the next ratio. Returns `None` once the toast has left the
    /// queue.
    pub async fn changed(&mut self) -> Option<f64> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }
}

/// Ticker owned by a queue entry. Dropping it stops the task.
pub(crate) struct ProgressTicker {
    tx: Arc<watch::Sender<f64>>,
    task: AbortHandle,
}

impl ProgressTicker {
    /// Spawn the ticker. The first watcher is created before the task so
    /// the task never observes an empty receiver set on startup.
    pub(crate) fn start(
        started: Instant,
        duration: Duration,
        period: Duration,
    ) -> Option<(Self, ProgressWatch)> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No tokio runtime, progress ticker not started");
            return None;
        };
        let (tx, rx) = watch::channel(elapsed_ratio(started, duration, Instant::now()));
        let tx = Arc::new(tx);
        let task = runtime.spawn(tick_loop(Arc::clone(&tx), started, duration, period));
        let ticker = Self {
            tx,
            task: task.abort_handle(),
        };
        Some((ticker, ProgressWatch { rx }))
    }

    pub(crate) fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    pub(crate) fn watch(&self) -> ProgressWatch {
        ProgressWatch {
            rx: self.tx.subscribe(),
        }
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn tick_loop(
    tx: Arc<watch::Sender<f64>>,
    started: Instant,
    duration: Duration,
    period: Duration,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        let ratio = elapsed_ratio(started, duration, Instant::now());
        if tx.send(ratio).is_err() {
            // Every watcher dropped
            break;
        }
        if ratio >= 1.0 {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_zero_duration_is_zero() {
        let now = Instant::now();
        assert_eq!(elapsed_ratio(now, Duration::ZERO, now + Duration::from_secs(5)), 0.0);
    }

    #[test]
    fn ratio_is_clamped() {
        let start = Instant::now();
        let d = Duration::from_millis(1000);
        assert_eq!(elapsed_ratio(start, d, start), 0.0);
        assert_eq!(elapsed_ratio(start, d, start + Duration::from_millis(250)), 0.25);
        assert_eq!(elapsed_ratio(start, d, start + Duration::from_millis(5000)), 1.0);
    }

    #[test]
    fn ratio_before_start_is_zero() {
        let start = Instant::now() + Duration::from_secs(1);
        assert_eq!(elapsed_ratio(start, Duration::from_secs(1), Instant::now()), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_publishes_until_complete() {
        let started = Instant::now();
        let (ticker, mut watch) = ProgressTicker::start(
            started,
            Duration::from_millis(200),
            Duration::from_millis(50),
        )
        .expect("runtime present");

        let mut seen = Vec::new();
        while let Ok(Some(ratio)) =
            tokio::time::timeout(Duration::from_secs(1), watch.changed()).await
        {
            seen.push(ratio);
            if ratio >= 1.0 {
                break;
            }
        }

        assert_eq!(seen.last().copied(), Some(1.0));
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!ticker.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_ticker_ends_watch() {
        let (ticker, mut watch) = ProgressTicker::start(
            Instant::now(),
            Duration::from_secs(10),
            Duration::from_millis(50),
        )
        .expect("runtime present");
        drop(ticker);

        let mut last = None;
        while let Some(ratio) = watch.changed().await {
            last = Some(ratio);
        }
        assert!(last.is_none_or(|r| r < 1.0));
    }
}
