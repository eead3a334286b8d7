//! Change listeners for renderers.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use crate::types::Toast;

type Listener = Arc<dyn Fn(&[Toast]) + Send + Sync>;

/// Registered listeners, called with the full snapshot after each change.
///
/// Snapshots are queued in commit order (the caller holds the queue lock
/// while enqueueing) and handed out by one delivering thread at a time, so
/// the last snapshot a listener sees is always the current state.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: AtomicU64,
    slots: Mutex<Vec<(u64, Listener)>>,
    outbox: Mutex<Outbox>,
}

#[derive(Default)]
struct Outbox {
    pending: VecDeque<Vec<Toast>>,
    delivering: bool,
}

/// Clears the delivering flag if a listener panics mid-delivery.
struct DeliveryGuard<'a>(&'a Mutex<Outbox>);

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .delivering = false;
    }
}

impl Listeners {
    pub(crate) fn add(self: &Arc<Self>, listener: Listener) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));
        Subscription {
            id,
            listeners: Arc::downgrade(self),
        }
    }

    fn remove(&self, id: u64) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(slot_id, _)| *slot_id != id);
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Queue a snapshot for delivery. Call with the queue lock held.
    pub(crate) fn enqueue(&self, snapshot: Vec<Toast>) {
        self.outbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pending
            .push_back(snapshot);
    }

    /// Deliver queued snapshots in order. Call without the queue lock.
    ///
    /// If another thread is already delivering, it picks up what was queued
    /// here; a listener that changes the queue re-enters this way too.
    pub(crate) fn deliver(&self) {
        {
            let mut outbox = self.outbox.lock().unwrap_or_else(PoisonError::into_inner);
            if outbox.delivering {
                return;
            }
            outbox.delivering = true;
        }
        let guard = DeliveryGuard(&self.outbox);

        loop {
            let next = {
                let mut outbox = self.outbox.lock().unwrap_or_else(PoisonError::into_inner);
                match outbox.pending.pop_front() {
                    Some(snapshot) => snapshot,
                    None => {
                        outbox.delivering = false;
                        std::mem::forget(guard);
                        return;
                    }
                }
            };
            self.emit(&next);
        }
    }

    /// Call every listener. The slot lock is released first so a listener
    /// may subscribe, unsubscribe or touch the queue.
    fn emit(&self, snapshot: &[Toast]) {
        let current: Vec<Listener> = self
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in current {
            listener(snapshot);
        }
    }
}

/// Handle returned by [`crate::ToastQueue::subscribe`].
///
/// The listener stays attached until this value is dropped or
/// [`Subscription::unsubscribe`] is called.
#[must_use = "dropping a Subscription detaches its listener"]
pub struct Subscription {
    id: u64,
    listeners: Weak<Listeners>,
}

impl Subscription {
    /// Detach the listener now.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.remove(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    #[test]
    fn drop_detaches_listener() {
        let listeners = Arc::new(Listeners::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let sub = listeners.add(Arc::new(move |_: &[Toast]| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        listeners.enqueue(Vec::new());
        listeners.deliver();
        drop(sub);
        listeners.enqueue(Vec::new());
        listeners.deliver();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(listeners.len(), 0);
    }

    #[test]
    fn panicking_listener_does_not_stall_delivery() {
        let listeners = Arc::new(Listeners::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _sub = listeners.add(Arc::new(move |_: &[Toast]| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("renderer failed");
            }
        }));

        listeners.enqueue(Vec::new());
        let first = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| listeners.deliver()));
        assert!(first.is_err());

        listeners.enqueue(Vec::new());
        listeners.deliver();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unsubscribe_only_removes_own_slot() {
        let listeners = Arc::new(Listeners::default());
        let a = listeners.add(Arc::new(|_: &[Toast]| {}));
        let _b = listeners.add(Arc::new(|_: &[Toast]| {}));

        a.unsubscribe();
        assert_eq!(listeners.len(), 1);
    }

    #[test]
    fn subscription_outliving_listeners_is_harmless() {
        let listeners = Arc::new(Listeners::default());
        let sub = listeners.add(Arc::new(|_: &[Toast]| {}));
        drop(listeners);
        drop(sub);
    }
}
