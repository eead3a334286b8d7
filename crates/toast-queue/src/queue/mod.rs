//! The toast queue and its timers.
//!
//! Toasts are kept in insertion order, oldest first. Each entry owns at most
//! one lifecycle timer (auto-dismiss, then exit transition) and at most one
//! progress ticker. Dropping an entry aborts both, so nothing fires against
//! a toast that already left the list.


use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::task::AbortHandle;

use crate::config::QueueConfig;
use crate::id::IdGenerator;
use crate::progress::{ProgressTicker, ProgressWatch};
use crate::subscription::{Listeners, Subscription};
use crate::types::{Toast, ToastId, ToastKind, ToastPhase};
use crate::Result;

/// Cloneable handle to one toast queue. All clones share the same state.
#[derive(Clone)]
pub struct ToastQueue {
    inner: Arc<Inner>,
}

struct Inner {
    config: QueueConfig,
    ids: IdGenerator,
    state: Mutex<QueueState>,
    listeners: Arc<Listeners>,
}

#[derive(Default)]
struct QueueState {
    entries: Vec<Entry>,
}

struct Entry {
    toast: Toast,
    lifecycle: Option<AbortHandle>,
    progress: Option<ProgressTicker>,
}

impl Drop for Entry {
    fn drop(&mut self) {
        self.cancel_lifecycle();
    }
}

impl Entry {
    fn cancel_lifecycle(&mut self) {
        if let Some(timer) = self.lifecycle.take() {
            timer.abort();
        }
    }
}

impl QueueState {
    fn position(&self, id: &ToastId) -> Option<usize> {
        self.entries.iter().position(|e| &e.toast.id == id)
    }

    fn snapshot(&self) -> Vec<Toast> {
        self.entries.iter().map(|e| e.toast.clone()).collect()
    }
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    AutoDismiss,
    Exit,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::from_parts(QueueConfig::default())
    }
}

impl ToastQueue {
    /// Queue with default timings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue with custom timings.
    pub fn with_config(config: QueueConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config))
    }

    fn from_parts(config: QueueConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                ids: IdGenerator::default(),
                state: Mutex::new(QueueState::default()),
                listeners: Arc::new(Listeners::default()),
            }),
        }
    }

    pub fn config(&self) -> &QueueConfig {
        &self.inner.config
    }

    /// Append a toast and return its id.
    ///
    /// A non-zero `duration` arms the auto-dismiss timer; zero keeps the
    /// toast until it is dismissed.
    pub fn notify(
        &self,
        message: impl Into<String>,
        kind: ToastKind,
        duration: Duration,
    ) -> ToastId {
        let toast = Toast::new(self.inner.ids.next(), message.into(), kind, duration);
        let id = toast.id.clone();
        tracing::debug!(id = %id, kind = %kind, duration_ms = toast.duration_ms, "Toast added");

        {
            let mut state = self.lock();
            // Push before arming so the timer always finds its entry.
            state.entries.push(Entry {
                toast,
                lifecycle: None,
                progress: None,
            });
            if !duration.is_zero() {
                let timer = self.schedule(id.clone(), duration, Stage::AutoDismiss);
                if let Some(entry) = state.entries.last_mut() {
                    entry.lifecycle = timer;
                }
            }
            self.inner.listeners.enqueue(state.snapshot());
        }

        self.inner.listeners.deliver();
        id
    }

    pub fn success(&self, message: impl Into<String>) -> ToastId {
        self.notify_kind(message, ToastKind::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> ToastId {
        self.notify_kind(message, ToastKind::Error)
    }

    pub fn info(&self, message: impl Into<String>) -> ToastId {
        self.notify_kind(message, ToastKind::Info)
    }

    pub fn warning(&self, message: impl Into<String>) -> ToastId {
        self.notify_kind(message, ToastKind::Warning)
    }

    fn notify_kind(&self, message: impl Into<String>, kind: ToastKind) -> ToastId {
        self.notify(message, kind, self.inner.config.duration_for(kind))
    }

    /// Start the exit transition of `id`; the toast leaves the list when it
    /// ends. Returns whether the toast was present.
    ///
    /// Dismissing a toast that is already exiting changes nothing and arms
    /// no second timer.
    pub fn dismiss(&self, id: &ToastId) -> bool {
        let exit = self.inner.config.exit_transition;

        {
            let mut state = self.lock();
            let Some(idx) = state.position(id) else {
                return false;
            };

            let entry = &mut state.entries[idx];
            if entry.toast.phase == ToastPhase::Exiting {
                return true;
            }
            entry.cancel_lifecycle();
            entry.toast.phase = ToastPhase::Exiting;

            let timer = if exit.is_zero() {
                None
            } else {
                self.schedule(id.clone(), exit, Stage::Exit)
            };
            match timer {
                Some(timer) => state.entries[idx].lifecycle = Some(timer),
                None => {
                    state.entries.remove(idx);
                }
            }
            self.inner.listeners.enqueue(state.snapshot());
        }

        tracing::debug!(id = %id, "Toast dismissed");
        self.inner.listeners.deliver();
        true
    }

    /// Remove `id` right away, skipping the exit transition.
    /// Returns whether the toast was present.
    pub fn remove(&self, id: &ToastId) -> bool {
        {
            let mut state = self.lock();
            let Some(idx) = state.position(id) else {
                return false;
            };
            state.entries.remove(idx);
            self.inner.listeners.enqueue(state.snapshot());
        }

        tracing::debug!(id = %id, "Toast removed");
        self.inner.listeners.deliver();
        true
    }

    /// Remove every toast and cancel all timers. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let removed = {
            let mut state = self.lock();
            let removed = std::mem::take(&mut state.entries);
            if !removed.is_empty() {
                self.inner.listeners.enqueue(Vec::new());
            }
            removed
        };
        let count = removed.len();
        drop(removed);

        if count > 0 {
            tracing::debug!(count, "Toast queue cleared");
            self.inner.listeners.deliver();
        }
        count
    }

    /// Current toasts, oldest first.
    pub fn snapshot(&self) -> Vec<Toast> {
        self.lock().snapshot()
    }

    pub fn get(&self, id: &ToastId) -> Option<Toast> {
        let state = self.lock();
        state.position(id).map(|idx| state.entries[idx].toast.clone())
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Register a listener called with the new snapshot after every change.
    ///
    /// Snapshots arrive in the order the changes were made. The listener
    /// runs without the queue lock held, so it may call back into the queue;
    /// the snapshot of such a nested change is delivered once the current
    /// call returns. Under concurrent changes, a thread already delivering
    /// also delivers snapshots queued by other threads.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&[Toast]) + Send + Sync + 'static,
    {
        self.inner.listeners.add(Arc::new(listener))
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.len()
    }

    /// Watch the elapsed-time ratio of a timed toast.
    ///
    /// Returns `None` for unknown or persistent toasts, or when no tokio
    /// runtime is available. Watchers of one toast share a single ticker.
    pub fn track_progress(&self, id: &ToastId) -> Option<ProgressWatch> {
        let period = self.inner.config.progress_interval;
        let mut state = self.lock();
        let idx = state.position(id)?;
        let entry = &mut state.entries[idx];
        if entry.toast.is_persistent() {
            return None;
        }

        if let Some(ticker) = entry.progress.as_ref().filter(|t| t.is_running()) {
            return Some(ticker.watch());
        }

        let (ticker, watch) =
            ProgressTicker::start(entry.toast.started, entry.toast.duration(), period)?;
        entry.progress = Some(ticker);
        Some(watch)
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Spawn a lifecycle timer for `id`. The task holds a weak reference
    /// and re-checks the entry when it fires.
    fn schedule(&self, id: ToastId, delay: Duration, stage: Stage) -> Option<AbortHandle> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(id = %id, ?stage, "No tokio runtime, toast timer not scheduled");
            return None;
        };

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let queue = ToastQueue { inner };
            match stage {
                Stage::AutoDismiss => {
                    queue.dismiss(&id);
                }
                Stage::Exit => {
                    queue.remove(&id);
                }
            }
        });
        Some(task.abort_handle())
    }
}

impl std::fmt::Debug for ToastQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToastQueue")
            .field("len", &self.len())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
