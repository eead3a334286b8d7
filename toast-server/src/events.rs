//! WebSocket event names and payload builders.
//!
//! Renderers connected to `/ws` receive these as JSON text frames.

use serde_json::json;
use toast_queue::Toast;

pub const CONNECTED: &str = "connected";
pub const TOASTS: &str = "toasts";
pub const PONG: &str = "pong";

/// Full snapshot frame, sent on connect and after every queue change.
pub fn toasts_message(toasts: &[Toast]) -> String {
    json!({
        "type": TOASTS,
        "data": toasts,
    })
    .to_string()
}

pub fn connected_message(client_id: &str) -> String {
    json!({
        "type": CONNECTED,
        "data": { "clientId": client_id },
    })
    .to_string()
}

pub fn pong_message() -> String {
    json!({ "type": PONG }).to_string()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::Value;
    use toast_queue::{ToastKind, ToastQueue};

    use super::*;

    #[test]
    fn toasts_message_wraps_snapshot() {
        let queue = ToastQueue::new();
        queue.notify("hello", ToastKind::Warning, Duration::ZERO);

        let msg: Value = serde_json::from_str(&toasts_message(&queue.snapshot())).expect("json");
        assert_eq!(msg["type"], "toasts");
        assert_eq!(msg["data"][0]["message"], "hello");
        assert_eq!(msg["data"][0]["kind"], "warning");
        assert_eq!(msg["data"][0]["duration_ms"], 0);
    }

    #[test]
    fn empty_snapshot_is_empty_array() {
        let msg: Value = serde_json::from_str(&toasts_message(&[])).expect("json");
        assert_eq!(msg["data"], Value::Array(Vec::new()));
    }
}
