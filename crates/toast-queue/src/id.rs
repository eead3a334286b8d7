//! Toast id generation.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

use crate::types::ToastId;

/// Builds ids from the creation time, a per-queue sequence and a random salt.
///
/// The sequence alone keeps ids unique inside one queue; the salt keeps two
/// queues created in the same millisecond apart.
#[derive(Debug, Default)]
pub(crate) struct IdGenerator {
    seq: AtomicU64,
}

impl IdGenerator {
    pub(crate) fn next(&self) -> ToastId {
        let millis = chrono::Utc::now().timestamp_millis();
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let salt: u32 = rand::thread_rng().r#gen();
        ToastId::new(format!("{millis:x}-{seq:x}-{salt:08x}"))
    }
}
