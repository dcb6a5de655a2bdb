//! Presence-driven pause controller
//!
//! Turns a stream of "person present" samples into timer pauses and resumes.
//! Only transitions of the signal act on the timer: a falling edge while
//! running auto-pauses, a rising edge while auto-paused auto-resumes. Manual
//! pauses are never touched.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    error::TimerError,
    state::{SessionTimer, TimerPhase, TimerSnapshot},
};

/// What a presence sample did to the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceAction {
    PresenceUpdated,
    AutoPaused,
    AutoResumed,
}

impl PresenceAction {
    pub fn message(&self) -> &'static str {
        match self {
            PresenceAction::PresenceUpdated => "Presence updated",
            PresenceAction::AutoPaused => "Timer auto-paused - person not detected",
            PresenceAction::AutoResumed => "Timer auto-resumed - person detected",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PresenceOutcome {
    pub action: PresenceAction,
    pub person_present: bool,
    pub state: TimerSnapshot,
}

/// Stateless controller; the presence flag itself lives in the timer
#[derive(Debug, Clone)]
pub struct PresenceController {
    timer: SessionTimer,
}

impl PresenceController {
    pub fn new(timer: SessionTimer) -> Self {
        Self { timer }
    }

    /// Feed one presence sample. Runs atomically with respect to every other
    /// timer operation.
    pub fn update_presence(&self, present: bool) -> Result<PresenceOutcome, TimerError> {
        self.timer.with_lock(|timer| {
            let previous = timer.record_presence(present);

            let action = if !timer.auto_pause_enabled() {
                PresenceAction::PresenceUpdated
            } else if timer.phase() == TimerPhase::Running && !present && previous {
                timer.pause(false);
                PresenceAction::AutoPaused
            } else if timer.phase() == TimerPhase::PausedAuto && present && !previous {
                match timer.resume(false) {
                    Ok(_) => PresenceAction::AutoResumed,
                    Err(e) => {
                        warn!("Automatic resume refused: {}", e);
                        PresenceAction::PresenceUpdated
                    }
                }
            } else {
                PresenceAction::PresenceUpdated
            };

            match action {
                PresenceAction::PresenceUpdated => {
                    debug!("Presence sample {} -> {}, no timer action", previous, present)
                }
                _ => info!("Presence changed {} -> {}: {:?}", previous, present, action),
            }

            PresenceOutcome {
                action,
                person_present: present,
                state: timer.snapshot(),
            }
        })
    }
}
