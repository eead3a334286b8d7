use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use toast_queue::{ToastId, ToastQueue};

use crate::app::SharedState;
use crate::events;

/// Replies queued for one client before its socket stops reading them.
const REPLY_CAPACITY: usize = 16;

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: SharedState) {
    let (mut sender, mut receiver) = socket.split();
    // Subscribe before reading the snapshot so no change falls in between
    let mut rx = state.subscribe_ws();

    let client_id = uuid::Uuid::new_v4().to_string();
    let greeting = [
        events::connected_message(&client_id),
        events::toasts_message(&state.queue().snapshot()),
    ];
    for msg in greeting {
        if sender.send(Message::Text(msg.into())).await.is_err() {
            return;
        }
    }

    tracing::info!("WebSocket client connected: {}", client_id);

    // Replies to this client only, e.g. pong
    let (reply_tx, mut reply_rx) = mpsc::channel::<String>(REPLY_CAPACITY);

    // Forward broadcast messages and own replies to this client
    let cid = client_id.clone();
    let mut send_task = tokio::spawn(async move {
        loop {
            let msg = tokio::select! {
                frame = rx.recv() => match frame {
                    Ok(msg) => msg,
                    // Every frame is a full snapshot, so skipped ones are harmless
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(client = %cid, skipped, "WebSocket client lagged");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                },
                Some(reply) = reply_rx.recv() => reply,
            };
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    // Receive messages from this client and handle routing
    let queue = state.queue().clone();
    let cid = client_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    if !route_client_frame(&text, &queue, &reply_tx).await {
                        break;
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
        tracing::info!("WebSocket client disconnected: {}", cid);
    });

    // Wait for either task to finish
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }
}

/// Handle one client frame. A reply goes back to that client only.
/// Returns `false` once the client's send side is gone.
async fn route_client_frame(
    text: &str,
    queue: &ToastQueue,
    reply_tx: &mpsc::Sender<String>,
) -> bool {
    match handle_client_message(text, queue) {
        Some(reply) => reply_tx.send(reply).await.is_ok(),
        None => true,
    }
}

/// Route an incoming client message. Returns the reply for the sender, if any.
///
/// Renderers dismiss toasts with `{"type":"dismiss","id":"..."}`.
fn handle_client_message(text: &str, queue: &ToastQueue) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<serde_json::Value>(text) else {
        tracing::debug!("Ignoring non-JSON WebSocket message");
        return None;
    };
    let msg_type = msg.get("type").and_then(|t| t.as_str()).unwrap_or("");

    match msg_type {
        "ping" => Some(events::pong_message()),
        "dismiss" => {
            if let Some(id) = msg.get("id").and_then(|v| v.as_str()) {
                queue.dismiss(&ToastId::from(id));
            }
            None
        }
        other => {
            tracing::debug!(msg_type = other, "Ignoring unknown WebSocket message");
            None
        }
    }
}
