//! Outbound timer events

use serde::{Deserialize, Serialize};

use super::{SessionCompletion, TimerSnapshot};

/// Everything the engine announces to observers. Serialized as
/// `{"type": ..., "payload": ...}` for the WebSocket stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum TimerEvent {
    #[serde(rename = "timer_state")]
    Tick(TimerSnapshot),
    AutoPaused(TimerSnapshot),
    AutoResumed(TimerSnapshot),
    SessionComplete(SessionCompletion),
    StateChanged(TimerSnapshot),
}

impl TimerEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            TimerEvent::Tick(_) => "timer_state",
            TimerEvent::AutoPaused(_) => "auto_paused",
            TimerEvent::AutoResumed(_) => "auto_resumed",
            TimerEvent::SessionComplete(_) => "session_complete",
            TimerEvent::StateChanged(_) => "state_changed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{SessionType, TimerPhase};

    fn snapshot() -> TimerSnapshot {
        TimerSnapshot {
            session_type: SessionType::Work,
            time_left_seconds: 1000,
            state: TimerPhase::PausedAuto,
            sessions_completed: 0,
            person_present: false,
            auto_pause_enabled: true,
            progress_percent: 33.0,
            formatted_time: "16:40".to_string(),
        }
    }

    #[test]
    fn events_serialize_with_type_and_payload() {
        let value = serde_json::to_value(TimerEvent::AutoPaused(snapshot())).unwrap();
        assert_eq!(value["type"], "auto_paused");
        assert_eq!(value["payload"]["state"], "paused_auto");
        assert_eq!(value["payload"]["time_left_seconds"], 1000);

        let tick = serde_json::to_value(TimerEvent::Tick(snapshot())).unwrap();
        assert_eq!(tick["type"], TimerEvent::Tick(snapshot()).kind());
    }
}
