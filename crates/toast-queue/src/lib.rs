//! In-memory toast notification queue.
//!
//! Producers call [`ToastQueue::notify`] (or the kind shorthands) and get an
//! id back immediately. Timed toasts expire on their own, go through a short
//! exit transition and then leave the list. Renderers read snapshots and
//! subscribe to changes; they never own queue state.

pub mod config;
pub mod global;
mod id;
pub mod progress;
pub mod promise;
mod queue;
pub mod subscription;
pub mod types;

// Re-exports for convenience
pub use config::QueueConfig;
pub use progress::{ProgressWatch, elapsed_ratio};
pub use promise::{PromiseMessages, ToastMessage};
pub use queue::ToastQueue;
pub use subscription::Subscription;
pub use types::{Toast, ToastId, ToastKind, ToastPhase};

/// Errors raised by queue setup and the process-wide handle.
#[derive(Debug, thiserror::Error)]
pub enum ToastError {
    #[error("Toast queue not installed")]
    NotInstalled,

    #[error("Invalid {field}: {reason}")]
    InvalidDuration {
        field: &'static str,
        reason: &'static str,
    },
}

/// Result type alias for toast queue operations.
pub type Result<T> = std::result::Result<T, ToastError>;
