//! Loading → success/error toasts around a fallible future.

use std::future::Future;
use std::time::Duration;

use crate::queue::ToastQueue;
use crate::types::{ToastId, ToastKind};

type Render<T> = Box<dyn Fn(&T) -> String + Send + Sync>;

/// Toast text: fixed, or rendered from the outcome.
pub enum ToastMessage<T> {
    Text(String),
    Render(Render<T>),
}

impl<T> ToastMessage<T> {
    /// Message built from the resolved value or the error.
    pub fn with<F>(render: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self::Render(Box::new(render))
    }

    pub fn render(&self, value: &T) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Render(render) => render(value),
        }
    }
}

impl<T> From<&str> for ToastMessage<T> {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl<T> From<String> for ToastMessage<T> {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Messages shown by [`ToastQueue::promise`].
pub struct PromiseMessages<T, E> {
    pub loading: String,
    pub success: ToastMessage<T>,
    pub error: ToastMessage<E>,
}

impl<T, E> PromiseMessages<T, E> {
    pub fn new(loading: impl Into<String>) -> Self {
        Self {
            loading: loading.into(),
            success: ToastMessage::from("Done"),
            error: ToastMessage::from("Something went wrong"),
        }
    }

    pub fn success(mut self, message: impl Into<ToastMessage<T>>) -> Self {
        self.success = message.into();
        self
    }

    pub fn error(mut self, message: impl Into<ToastMessage<E>>) -> Self {
        self.error = message.into();
        self
    }
}

/// Removes the loading toast exactly once: on completion, or on drop when
/// the wrapping future is cancelled.
struct LoadingGuard<'a> {
    queue: &'a ToastQueue,
    id: Option<ToastId>,
}

impl LoadingGuard<'_> {
    fn finish(mut self) {
        if let Some(id) = self.id.take() {
            self.queue.remove(&id);
        }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            tracing::debug!(id = %id, "Promise dropped before completion");
            self.queue.remove(&id);
        }
    }
}

impl ToastQueue {
    /// Show a persistent loading toast while `work` runs, then replace it
    /// with a success or error toast.
    ///
    /// The outcome of `work` is returned unchanged; an error is shown *and*
    /// handed back to the caller.
    pub async fn promise<F, T, E>(&self, work: F, messages: PromiseMessages<T, E>) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        let loading = LoadingGuard {
            queue: self,
            id: Some(self.notify(messages.loading, ToastKind::Info, Duration::ZERO)),
        };

        let outcome = work.await;
        loading.finish();

        match &outcome {
            Ok(value) => {
                self.success(messages.success.render(value));
            }
            Err(err) => {
                self.error(messages.error.render(err));
            }
        }
        outcome
    }
}
