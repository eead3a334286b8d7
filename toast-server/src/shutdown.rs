use std::time::Duration;

use tokio::time::sleep;

use crate::app::SharedState;

pub async fn graceful_shutdown(state: &SharedState) {
    tracing::info!("Shutdown sequence started");

    state.shutdown_token().cancel();
    tracing::info!("Shutdown: server stop requested");

    let cleared = state.queue().clear();
    tracing::info!(cleared, "Shutdown: toast queue cleared");

    toast_queue::global::uninstall();
    tracing::info!("Shutdown: process-wide toast handle removed");

    // Let WebSocket tasks flush the final empty snapshot
    sleep(Duration::from_millis(200)).await;
    tracing::info!("Shutdown sequence completed");
}

#[cfg(test)]
mod tests {
    use toast_queue::ToastKind;

    use super::*;
    use crate::config::AppConfig;

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_and_clears() {
        let state = SharedState::new(AppConfig::default()).expect("state");
        state.queue().notify("pending", ToastKind::Info, Duration::from_secs(5));
        let mut rx = state.subscribe_ws();

        graceful_shutdown(&state).await;

        assert!(state.shutdown_token().is_cancelled());
        assert!(state.queue().is_empty());
        let last: serde_json::Value =
            serde_json::from_str(&rx.recv().await.expect("frame")).expect("json");
        assert_eq!(last["data"], serde_json::json!([]));
    }
}
