//! Toast queue API:
//!   GET    /api/toasts          – current toasts, oldest first
//!   POST   /api/toasts          – raise a toast
//!   DELETE /api/toasts          – remove every toast
//!   DELETE /api/toasts/{id}     – dismiss one toast
//!   POST   /api/toasts/promise  – run a simulated job wrapped in loading/result toasts

use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use toast_queue::{PromiseMessages, ToastId, ToastKind, ToastMessage};

use crate::app::SharedState;

use super::{err_json, ok_json};

/// Upper bound for client-supplied durations.
const MAX_DURATION_MS: u64 = 600_000;
/// Upper bound for simulated job length.
const MAX_JOB_DELAY_MS: u64 = 60_000;

type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

#[derive(Debug, Deserialize)]
pub struct CreateToastRequest {
    pub message: String,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PromiseRequest {
    pub loading: String,
    #[serde(default)]
    pub success: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub delay_ms: u64,
    #[serde(default)]
    pub fail: bool,
}

#[derive(Debug, thiserror::Error)]
#[error("Simulated job failed after {0} ms")]
struct SimulatedJobError(u64);

/// GET /api/toasts
pub async fn list_toasts(State(state): State<SharedState>) -> Json<Value> {
    ok_json(json!(state.queue().snapshot()))
}

/// POST /api/toasts
pub async fn create_toast(
    State(state): State<SharedState>,
    Json(body): Json<CreateToastRequest>,
) -> ApiResult {
    if body.message.trim().is_empty() {
        return Err(err_json(400, "message must not be empty"));
    }
    if body.duration_ms.is_some_and(|ms| ms > MAX_DURATION_MS) {
        return Err(err_json(
            400,
            &format!("duration_ms must be at most {MAX_DURATION_MS}"),
        ));
    }

    let queue = state.queue();
    let kind = body
        .kind
        .as_deref()
        .map(ToastKind::from_str_lossy)
        .unwrap_or_default();
    let duration = body
        .duration_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| queue.config().duration_for(kind));

    let id = queue.notify(body.message, kind, duration);
    Ok(ok_json(json!({ "id": id })))
}

/// DELETE /api/toasts/{id}
pub async fn dismiss_toast(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Json<Value> {
    let dismissed = state.queue().dismiss(&ToastId::from(id));
    ok_json(json!({ "dismissed": dismissed }))
}

/// DELETE /api/toasts
pub async fn clear_toasts(State(state): State<SharedState>) -> Json<Value> {
    let cleared = state.queue().clear();
    ok_json(json!({ "cleared": cleared }))
}

/// POST /api/toasts/promise
///
/// `{value}` in the success message is replaced with the job's elapsed
/// milliseconds. Dropping the request mid-job removes the loading toast.
pub async fn run_promise(
    State(state): State<SharedState>,
    Json(body): Json<PromiseRequest>,
) -> ApiResult {
    if body.loading.trim().is_empty() {
        return Err(err_json(400, "loading must not be empty"));
    }
    let delay_ms = body.delay_ms.min(MAX_JOB_DELAY_MS);
    let fail = body.fail;

    let mut messages = PromiseMessages::new(body.loading);
    if let Some(template) = body.success {
        messages = messages.success(ToastMessage::with(move |ms: &u64| {
            template.replace("{value}", &ms.to_string())
        }));
    }
    if let Some(text) = body.error {
        messages = messages.error(text);
    }

    let work = async move {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        if fail {
            Err(SimulatedJobError(delay_ms))
        } else {
            Ok(delay_ms)
        }
    };

    match state.queue().promise(work, messages).await {
        Ok(elapsed_ms) => Ok(ok_json(json!({
            "outcome": "success",
            "elapsed_ms": elapsed_ms,
        }))),
        Err(e) => {
            tracing::warn!(error = %e, "Promise job failed");
            Err(err_json(500, &e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    use crate::config::AppConfig;
    use crate::server::router::create_router;

    use super::*;

    fn test_state() -> SharedState {
        SharedState::new(AppConfig::default()).expect("state")
    }

    async fn call(
        state: &SharedState,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .expect("request");

        let response = create_router(state.clone())
            .oneshot(request)
            .await
            .expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn create_then_list() {
        let state = test_state();
        let (status, body) = call(
            &state,
            Method::POST,
            "/api/toasts",
            Some(json!({ "message": "Saved", "kind": "success", "duration_ms": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let id = body["data"]["id"].as_str().expect("id").to_string();

        let (status, body) = call(&state, Method::GET, "/api/toasts", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["id"], id.as_str());
        assert_eq!(body["data"][0]["kind"], "success");
    }

    #[tokio::test]
    async fn unknown_kind_falls_back_to_info() {
        let state = test_state();
        call(
            &state,
            Method::POST,
            "/api/toasts",
            Some(json!({ "message": "x", "kind": "sparkly" })),
        )
        .await;

        let toast = &state.queue().snapshot()[0];
        assert_eq!(toast.kind, ToastKind::Info);
        assert_eq!(toast.duration(), state.queue().config().default_duration);
    }

    #[tokio::test]
    async fn empty_message_is_rejected() {
        let state = test_state();
        let (status, body) = call(
            &state,
            Method::POST,
            "/api/toasts",
            Some(json!({ "message": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert!(state.queue().is_empty());
    }

    #[tokio::test]
    async fn oversized_duration_is_rejected() {
        let state = test_state();
        let (status, _) = call(
            &state,
            Method::POST,
            "/api/toasts",
            Some(json!({ "message": "x", "duration_ms": MAX_DURATION_MS + 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn dismiss_reports_presence_and_is_idempotent() {
        let state = test_state();
        let id = state.queue().notify("bye", ToastKind::Info, Duration::ZERO);
        let uri = format!("/api/toasts/{id}");

        let (status, body) = call(&state, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["dismissed"], true);

        let (status, _) = call(&state, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(&state, Method::DELETE, "/api/toasts/unknown", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["dismissed"], false);
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let state = test_state();
        state.queue().info("a");
        state.queue().error("b");

        let (_, body) = call(&state, Method::DELETE, "/api/toasts", None).await;
        assert_eq!(body["data"]["cleared"], 2);
        assert!(state.queue().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn promise_success_interpolates_value() {
        let state = test_state();
        let (status, body) = call(
            &state,
            Method::POST,
            "/api/toasts/promise",
            Some(json!({ "loading": "Working", "success": "Took {value} ms", "delay_ms": 250 })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["elapsed_ms"], 250);
        let toasts = state.queue().snapshot();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, ToastKind::Success);
        assert_eq!(toasts[0].message, "Took 250 ms");
    }

    #[tokio::test(start_paused = true)]
    async fn promise_failure_returns_500_and_error_toast() {
        let state = test_state();
        let (status, body) = call(
            &state,
            Method::POST,
            "/api/toasts/promise",
            Some(json!({ "loading": "Working", "error": "Nope", "fail": true })),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Simulated job failed after 0 ms");
        let toasts = state.queue().snapshot();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, ToastKind::Error);
        assert_eq!(toasts[0].message, "Nope");
    }

    #[tokio::test]
    async fn status_reports_ok() {
        let state = test_state();
        let (status, body) = call(&state, Method::GET, "/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
