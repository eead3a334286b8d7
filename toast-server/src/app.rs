use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use toast_queue::{Subscription, ToastQueue};

use crate::config::AppConfig;
use crate::events;

const WS_CHANNEL_CAPACITY: usize = 256;

/// Application shared state accessible from axum handlers and background tasks.
///
/// Owns the one toast queue of the process. Queue changes are bridged into
/// the WebSocket broadcast channel for as long as this state lives.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    /// Broadcast channel for WebSocket messages
    ws_tx: broadcast::Sender<String>,
    config: AppConfig,
    queue: ToastQueue,
    shutdown_token: CancellationToken,
    /// Keeps the queue → WebSocket bridge attached
    _bridge: Subscription,
}

impl SharedState {
    pub fn new(config: AppConfig) -> Result<Self, anyhow::Error> {
        let queue = ToastQueue::with_config(config.queue_config())?;
        let (ws_tx, _) = broadcast::channel(WS_CHANNEL_CAPACITY);

        let bridge_tx = ws_tx.clone();
        let bridge = queue.subscribe(move |toasts| {
            // No connected clients is not an error
            let _ = bridge_tx.send(events::toasts_message(toasts));
        });

        Ok(Self {
            inner: Arc::new(SharedStateInner {
                ws_tx,
                config,
                queue,
                shutdown_token: CancellationToken::new(),
                _bridge: bridge,
            }),
        })
    }

    pub fn server_port(&self) -> u16 {
        self.inner.config.server_port
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn queue(&self) -> &ToastQueue {
        &self.inner.queue
    }

    pub fn subscribe_ws(&self) -> broadcast::Receiver<String> {
        self.inner.ws_tx.subscribe()
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.inner.shutdown_token
    }
}
