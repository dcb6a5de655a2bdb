//! Pure session timer state machine
//!
//! `TimerCore` owns the countdown and the work/break rotation. It does no I/O
//! and knows nothing about time sources or locking: the engine drives `tick()`
//! once per second and drains the queued events after every operation.

use tracing::{debug, info};

use crate::error::TimerError;

use super::{
    events::TimerEvent,
    timer_state::{format_time, progress_percent},
    SessionCompletion, SessionDurations, SessionType, TimerPhase, TimerSettings, TimerSnapshot,
};

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer was not running, nothing changed
    Idle,
    /// One second was counted down
    Ticked,
    /// The period ran out and the rotation advanced
    Completed,
}

#[derive(Debug)]
pub struct TimerCore {
    durations: SessionDurations,
    sessions_until_long_break: u32,
    session_type: SessionType,
    time_left: u64,
    phase: TimerPhase,
    sessions_completed: u32,
    person_present: bool,
    auto_pause_enabled: bool,
    pending: Vec<TimerEvent>,
}

impl TimerCore {
    pub fn new(settings: &TimerSettings) -> Self {
        Self {
            durations: settings.durations,
            sessions_until_long_break: settings.sessions_until_long_break.max(1),
            session_type: SessionType::Work,
            time_left: settings.durations.work,
            phase: TimerPhase::Stopped,
            sessions_completed: 0,
            person_present: true,
            auto_pause_enabled: settings.auto_pause_enabled,
            pending: Vec::new(),
        }
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn person_present(&self) -> bool {
        self.person_present
    }

    pub fn auto_pause_enabled(&self) -> bool {
        self.auto_pause_enabled
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            session_type: self.session_type,
            time_left_seconds: self.time_left,
            state: self.phase,
            sessions_completed: self.sessions_completed,
            person_present: self.person_present,
            auto_pause_enabled: self.auto_pause_enabled,
            progress_percent: progress_percent(self.current_duration(), self.time_left),
            formatted_time: format_time(self.time_left),
        }
    }

    /// Take the events queued since the last drain, in emission order
    pub fn drain_events(&mut self) -> Vec<TimerEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn start(&mut self) -> Result<TimerSnapshot, TimerError> {
        if self.phase == TimerPhase::PausedAuto {
            return Err(TimerError::AutoPauseActive);
        }
        if self.phase != TimerPhase::Running {
            info!("Timer started: {} with {}s left", self.session_type, self.time_left);
            self.phase = TimerPhase::Running;
            self.notify_state_change();
        }
        Ok(self.snapshot())
    }

    /// Pause a running timer. Pausing anything else is a no-op, not an error.
    pub fn pause(&mut self, manual: bool) -> TimerSnapshot {
        if self.phase != TimerPhase::Running {
            debug!("Pause ignored, timer is {:?}", self.phase);
            return self.snapshot();
        }
        if !manual && !self.auto_pause_enabled {
            debug!("Automatic pause ignored, auto-pause is disabled");
            return self.snapshot();
        }

        self.phase = if manual {
            TimerPhase::PausedManual
        } else {
            TimerPhase::PausedAuto
        };
        info!(
            "Timer paused{} at {}s",
            if manual { "" } else { " automatically" },
            self.time_left
        );
        self.notify_state_change();
        if !manual {
            let snapshot = self.snapshot();
            self.pending.push(TimerEvent::AutoPaused(snapshot));
        }
        self.snapshot()
    }

    /// Resume a paused timer. Absence blocks resuming an auto-pause no matter
    /// who asks.
    pub fn resume(&mut self, manual: bool) -> Result<TimerSnapshot, TimerError> {
        if !self.phase.is_paused() {
            debug!("Resume ignored, timer is {:?}", self.phase);
            return Ok(self.snapshot());
        }
        if self.phase == TimerPhase::PausedAuto && !self.person_present {
            return Err(TimerError::PersonAbsent);
        }

        let previous = self.phase;
        self.phase = TimerPhase::Running;
        info!(
            "Timer resumed{} at {}s",
            if manual { "" } else { " automatically" },
            self.time_left
        );
        self.notify_state_change();
        if previous == TimerPhase::PausedAuto {
            let snapshot = self.snapshot();
            self.pending.push(TimerEvent::AutoResumed(snapshot));
        }
        Ok(self.snapshot())
    }

    pub fn reset(&mut self) -> TimerSnapshot {
        self.phase = TimerPhase::Stopped;
        self.time_left = self.current_duration();
        info!("Timer reset to {} ({}s)", self.session_type, self.time_left);
        self.notify_state_change();
        self.snapshot()
    }

    /// Point the timer at another session type with a full period. Run state
    /// is left to the caller.
    pub fn select_session(&mut self, session_type: SessionType) -> TimerSnapshot {
        self.session_type = session_type;
        self.time_left = self.current_duration();
        info!("Switched to {} session", session_type);
        self.notify_state_change();
        self.snapshot()
    }

    /// Record the latest presence sample and return the previous one
    pub fn record_presence(&mut self, present: bool) -> bool {
        std::mem::replace(&mut self.person_present, present)
    }

    pub fn set_auto_pause(&mut self, enabled: bool) -> TimerSnapshot {
        if self.auto_pause_enabled != enabled {
            info!("Auto-pause {}", if enabled { "enabled" } else { "disabled" });
            self.auto_pause_enabled = enabled;
            self.notify_state_change();
        }
        self.snapshot()
    }

    /// Count down one second while running
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != TimerPhase::Running {
            return TickOutcome::Idle;
        }

        self.time_left = self.time_left.saturating_sub(1);
        let snapshot = self.snapshot();
        self.pending.push(TimerEvent::Tick(snapshot));

        if self.time_left == 0 {
            self.complete_session();
            TickOutcome::Completed
        } else {
            TickOutcome::Ticked
        }
    }

    fn complete_session(&mut self) {
        let completed = self.session_type;
        self.phase = TimerPhase::Stopped;

        let next = if completed == SessionType::Work {
            self.sessions_completed += 1;
            if self.sessions_completed % self.sessions_until_long_break == 0 {
                SessionType::LongBreak
            } else {
                SessionType::ShortBreak
            }
        } else {
            SessionType::Work
        };

        self.session_type = next;
        self.time_left = self.current_duration();
        info!(
            "{} session complete ({} completed), next up: {}",
            completed, self.sessions_completed, next
        );

        let completion = SessionCompletion {
            completed_session_type: completed,
            next_session_type: next,
            sessions_completed: self.sessions_completed,
            state: self.snapshot(),
        };
        self.pending.push(TimerEvent::SessionComplete(completion));
        self.notify_state_change();
    }

    fn current_duration(&self) -> u64 {
        self.durations.duration(self.session_type)
    }

    fn notify_state_change(&mut self) {
        let snapshot = self.snapshot();
        self.pending.push(TimerEvent::StateChanged(snapshot));
    }
}
