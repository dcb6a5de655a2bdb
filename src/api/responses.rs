//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::TimerError,
    services::{PresenceAction, PresenceOutcome},
    state::TimerSnapshot,
};

/// Body of POST /api/pomodoro/switch. Kept as a string so unknown values
/// reach the handler and get a structured rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchSessionRequest {
    pub session_type: String,
}

/// Body of POST /api/pomodoro/presence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceUpdateRequest {
    pub present: bool,
}

/// Body of POST /api/pomodoro/auto-pause
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoPauseRequest {
    pub enabled: bool,
}

/// Result of a timer command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub state: Option<TimerSnapshot>,
}

impl CommandResponse {
    /// Create a success response
    pub fn ok(message: String, state: TimerSnapshot) -> Self {
        Self {
            success: true,
            reason: None,
            message,
            timestamp: Utc::now(),
            state: Some(state),
        }
    }

    /// Create a failure response carrying the current state, if readable
    pub fn failure(error: &TimerError, state: Option<TimerSnapshot>) -> Self {
        Self {
            success: false,
            reason: Some(error.reason().to_string()),
            message: error.to_string(),
            timestamp: Utc::now(),
            state,
        }
    }
}

/// Result of a presence sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceResponse {
    pub action: PresenceAction,
    pub person_present: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub state: TimerSnapshot,
}

impl From<PresenceOutcome> for PresenceResponse {
    fn from(outcome: PresenceOutcome) -> Self {
        Self {
            action: outcome.action,
            person_present: outcome.person_present,
            message: outcome.action.message().to_string(),
            timestamp: Utc::now(),
            state: outcome.state,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime: String,
    pub host: String,
    pub port: u16,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}
