//! Process-wide access to the application's toast queue.
//!
//! The composition root creates one [`ToastQueue`] and installs it here.
//! Code without a handle injected can still raise toasts through these
//! functions; they forward to that same queue and keep no state of their own.

use std::future::Future;
use std::sync::{LazyLock, PoisonError, RwLock};
use std::time::Duration;

use crate::promise::PromiseMessages;
use crate::queue::ToastQueue;
use crate::types::{ToastId, ToastKind};
use crate::{Result, ToastError};

static INSTALLED: LazyLock<RwLock<Option<ToastQueue>>> = LazyLock::new(|| RwLock::new(None));

/// Make `queue` the process-wide queue. Returns the previously installed one.
pub fn install(queue: ToastQueue) -> Option<ToastQueue> {
    let mut slot = INSTALLED.write().unwrap_or_else(PoisonError::into_inner);
    tracing::debug!("Toast queue installed");
    slot.replace(queue)
}

/// Remove the process-wide queue.
pub fn uninstall() -> Option<ToastQueue> {
    INSTALLED
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
}

/// Handle to the installed queue.
pub fn handle() -> Result<ToastQueue> {
    INSTALLED
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .ok_or(ToastError::NotInstalled)
}

pub fn notify(
    message: impl Into<String>,
    kind: ToastKind,
    duration: Duration,
) -> Result<ToastId> {
    Ok(handle()?.notify(message, kind, duration))
}

pub fn success(message: impl Into<String>) -> Result<ToastId> {
    Ok(handle()?.success(message))
}

pub fn error(message: impl Into<String>) -> Result<ToastId> {
    Ok(handle()?.error(message))
}

pub fn info(message: impl Into<String>) -> Result<ToastId> {
    Ok(handle()?.info(message))
}

pub fn warning(message: impl Into<String>) -> Result<ToastId> {
    Ok(handle()?.warning(message))
}

pub fn dismiss(id: &ToastId) -> Result<bool> {
    Ok(handle()?.dismiss(id))
}

pub fn remove(id: &ToastId) -> Result<bool> {
    Ok(handle()?.remove(id))
}

/// [`ToastQueue::promise`] on the installed queue. The outer error means no
/// queue is installed, in which case `work` is not run.
pub async fn promise<F, T, E>(
    work: F,
    messages: PromiseMessages<T, E>,
) -> Result<std::result::Result<T, E>>
where
    F: Future<Output = std::result::Result<T, E>>,
{
    let queue = handle()?;
    Ok(queue.promise(work, messages).await)
}
