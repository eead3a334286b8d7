use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::app::SharedState;
use super::{api, websocket};

/// Create the axum router with all routes.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        // --- Core ---
        .route("/status", get(status_handler))
        .route("/ws", get(websocket::ws_handler))
        // --- Toasts ---
        .route(
            "/api/toasts",
            get(api::toasts::list_toasts)
                .post(api::toasts::create_toast)
                .delete(api::toasts::clear_toasts),
        )
        .route("/api/toasts/promise", post(api::toasts::run_promise))
        .route("/api/toasts/{id}", delete(api::toasts::dismiss_toast))
        // --- Middleware ---
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn status_handler() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
