//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use tracing::{error, info, warn};

use crate::{
    error::TimerError,
    state::{AppState, SessionType, TimerSnapshot},
};
use super::responses::{
    AutoPauseRequest, CommandResponse, HealthResponse, PresenceResponse, PresenceUpdateRequest,
    SwitchSessionRequest,
};

pub type CommandReply = (StatusCode, Json<CommandResponse>);

/// HTTP status for a refused command. Expected refusals are still a
/// successful request carrying `success: false`.
fn status_for(error: &TimerError) -> StatusCode {
    match error {
        TimerError::AutoPauseActive | TimerError::PersonAbsent => StatusCode::OK,
        TimerError::InvalidSessionType(_) => StatusCode::BAD_REQUEST,
        TimerError::StatePoisoned(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn reject(state: &AppState, action: &str, error: TimerError) -> CommandReply {
    match &error {
        TimerError::StatePoisoned(_) => error!("{} failed: {}", action, error),
        _ => warn!("{} refused: {}", action, error),
    }
    let current = state.timer.get_state().ok();
    (status_for(&error), Json(CommandResponse::failure(&error, current)))
}

fn reply(
    state: &AppState,
    action: &str,
    result: Result<TimerSnapshot, TimerError>,
    message: String,
) -> CommandReply {
    match result {
        Ok(snapshot) => {
            info!("{} endpoint called - {}", action, message);
            state.record_action(action);
            (StatusCode::OK, Json(CommandResponse::ok(message, snapshot)))
        }
        Err(e) => reject(state, action, e),
    }
}

/// Handle POST /api/pomodoro/start
pub async fn start_handler(State(state): State<Arc<AppState>>) -> CommandReply {
    let result = state.timer.start();
    reply(&state, "start", result, "Timer started".to_string())
}

/// Handle POST /api/pomodoro/pause - always a manual pause
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> CommandReply {
    let result = state.timer.pause(true);
    reply(&state, "pause", result, "Timer paused".to_string())
}

/// Handle POST /api/pomodoro/resume - manual resume
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> CommandReply {
    let result = state.timer.resume(true);
    reply(&state, "resume", result, "Timer resumed".to_string())
}

/// Handle POST /api/pomodoro/reset
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> CommandReply {
    let result = state.timer.reset();
    reply(&state, "reset", result, "Timer reset".to_string())
}

/// Handle POST /api/pomodoro/switch - the session type is validated before
/// the timer is touched
pub async fn switch_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SwitchSessionRequest>, JsonRejection>,
) -> CommandReply {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let error = TimerError::InvalidSessionType(rejection.body_text());
            return reject(&state, "switch", error);
        }
    };

    let session_type = match request.session_type.parse::<SessionType>() {
        Ok(session_type) => session_type,
        Err(e) => return reject(&state, "switch", e),
    };

    let result = state.timer.switch_session(session_type);
    reply(&state, "switch", result, format!("Switched to {}", session_type))
}

/// Handle POST /api/pomodoro/auto-pause
pub async fn auto_pause_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AutoPauseRequest>,
) -> CommandReply {
    let result = state.timer.set_auto_pause(request.enabled);
    let message = format!(
        "Auto-pause {}",
        if request.enabled { "enabled" } else { "disabled" }
    );
    reply(&state, "auto-pause", result, message)
}

/// Handle POST /api/pomodoro/presence - one sample from the presence detector
pub async fn presence_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PresenceUpdateRequest>,
) -> Result<Json<PresenceResponse>, CommandReply> {
    match state.presence.update_presence(request.present) {
        Ok(outcome) => Ok(Json(PresenceResponse::from(outcome))),
        Err(e) => Err(reject(&state, "presence", e)),
    }
}

/// Handle GET /api/pomodoro/state
pub async fn state_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimerSnapshot>, StatusCode> {
    match state.timer.get_state() {
        Ok(snapshot) => Ok(Json(snapshot)),
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.get_uptime(),
        host: state.host.clone(),
        port: state.port,
        last_action,
        last_action_time,
    })
}
