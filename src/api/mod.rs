//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers, response structures and
//! the WebSocket event stream.

pub mod handlers;
pub mod responses;
pub mod ws;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;
use ws::events_ws_handler;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/pomodoro/start", post(start_handler))
        .route("/api/pomodoro/pause", post(pause_handler))
        .route("/api/pomodoro/resume", post(resume_handler))
        .route("/api/pomodoro/reset", post(reset_handler))
        .route("/api/pomodoro/switch", post(switch_handler))
        .route("/api/pomodoro/presence", post(presence_handler))
        .route("/api/pomodoro/auto-pause", post(auto_pause_handler))
        .route("/api/pomodoro/state", get(state_handler))
        .route("/ws/pomodoro", get(events_ws_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::state::TimerSettings;

    fn app() -> (Arc<AppState>, Router) {
        let state = Arc::new(AppState::new(8000, "127.0.0.1".to_string(), TimerSettings::default()));
        (Arc::clone(&state), create_router(state))
    }

    async fn call(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(body) => Body::from(body.to_string()),
                None => Body::empty(),
            })
            .unwrap();

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn start_then_read_state() {
        let (_, router) = app();

        let (status, body) = call(&router, "POST", "/api/pomodoro/start", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["state"]["state"], "running");

        let (status, body) = call(&router, "GET", "/api/pomodoro/state", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["session_type"], "work");
        assert_eq!(body["formatted_time"], "25:00");
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_session_type_is_rejected_before_the_timer() {
        let (state, router) = app();
        state.timer.start().unwrap();

        let (status, body) = call(
            &router,
            "POST",
            "/api/pomodoro/switch",
            Some(json!({ "session_type": "nap" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["reason"], "InvalidSessionType");
        assert_eq!(body["state"]["state"], "running");
        assert_eq!(body["state"]["session_type"], "work");
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_switch_bodies_get_structured_rejections() {
        let (state, router) = app();
        state.timer.start().unwrap();

        for body in [json!({ "session_type": 5 }), json!({}), json!({ "session_type": null })] {
            let (status, reply) = call(&router, "POST", "/api/pomodoro/switch", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(reply["success"], false);
            assert_eq!(reply["reason"], "InvalidSessionType");
            assert_eq!(reply["state"]["state"], "running");
            assert_eq!(reply["state"]["session_type"], "work");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn switch_selects_the_requested_session() {
        let (_, router) = app();
        let (status, body) = call(
            &router,
            "POST",
            "/api/pomodoro/switch",
            Some(json!({ "session_type": "long_break" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Switched to long_break");
        assert_eq!(body["state"]["time_left_seconds"], 900);
    }

    #[tokio::test(start_paused = true)]
    async fn presence_round_trip_through_http() {
        let (_, router) = app();
        call(&router, "POST", "/api/pomodoro/start", None).await;

        let (_, body) = call(&router, "POST", "/api/pomodoro/presence", Some(json!({ "present": false }))).await;
        assert_eq!(body["action"], "auto_paused");
        assert_eq!(body["state"]["state"], "paused_auto");

        let (status, body) = call(&router, "POST", "/api/pomodoro/resume", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["reason"], "PersonAbsent");
        assert_eq!(body["state"]["state"], "paused_auto");

        let (_, body) = call(&router, "POST", "/api/pomodoro/start", None).await;
        assert_eq!(body["reason"], "AutoPauseActive");

        let (_, body) = call(&router, "POST", "/api/pomodoro/presence", Some(json!({ "present": true }))).await;
        assert_eq!(body["action"], "auto_resumed");
        assert_eq!(body["state"]["state"], "running");
    }

    #[tokio::test(start_paused = true)]
    async fn auto_pause_toggle_and_reset() {
        let (state, router) = app();

        let (_, body) = call(&router, "POST", "/api/pomodoro/auto-pause", Some(json!({ "enabled": false }))).await;
        assert_eq!(body["state"]["auto_pause_enabled"], false);

        call(&router, "POST", "/api/pomodoro/start", None).await;
        let (_, body) = call(&router, "POST", "/api/pomodoro/presence", Some(json!({ "present": false }))).await;
        assert_eq!(body["action"], "presence_updated");

        let (_, body) = call(&router, "POST", "/api/pomodoro/pause", None).await;
        assert_eq!(body["state"]["state"], "paused");

        let (_, body) = call(&router, "POST", "/api/pomodoro/reset", None).await;
        assert_eq!(body["state"]["state"], "stopped");
        assert_eq!(state.get_last_action().0.as_deref(), Some("reset"));
    }

    #[tokio::test]
    async fn health_reports_version() {
        let (_, router) = app();
        let (status, body) = call(&router, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
