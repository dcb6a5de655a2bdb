//! Timer value types: session kinds, phases, durations and snapshots

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::TimerError;

/// Kind of period in the work/break rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    Work,
    ShortBreak,
    LongBreak,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Work => "work",
            SessionType::ShortBreak => "short_break",
            SessionType::LongBreak => "long_break",
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, SessionType::Work)
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionType {
    type Err = TimerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(SessionType::Work),
            "short_break" => Ok(SessionType::ShortBreak),
            "long_break" => Ok(SessionType::LongBreak),
            other => Err(TimerError::InvalidSessionType(other.to_string())),
        }
    }
}

/// Run state of the timer. The two paused variants are kept apart so a
/// manual pause is never overridden by presence changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    #[default]
    Stopped,
    Running,
    #[serde(rename = "paused")]
    PausedManual,
    PausedAuto,
}

impl TimerPhase {
    pub fn is_paused(&self) -> bool {
        matches!(self, TimerPhase::PausedManual | TimerPhase::PausedAuto)
    }
}

/// Nominal length of each session type, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionDurations {
    pub work: u64,
    pub short_break: u64,
    pub long_break: u64,
}

impl SessionDurations {
    /// Build durations from whole minutes. `None` if any value overflows
    /// when converted to seconds.
    pub fn from_minutes(work: u64, short_break: u64, long_break: u64) -> Option<Self> {
        Some(Self {
            work: work.checked_mul(60)?,
            short_break: short_break.checked_mul(60)?,
            long_break: long_break.checked_mul(60)?,
        })
    }

    pub fn duration(&self, session_type: SessionType) -> u64 {
        match session_type {
            SessionType::Work => self.work,
            SessionType::ShortBreak => self.short_break,
            SessionType::LongBreak => self.long_break,
        }
    }
}

impl Default for SessionDurations {
    fn default() -> Self {
        Self {
            work: 1500,
            short_break: 300,
            long_break: 900,
        }
    }
}

/// Construction-time knobs for a session timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSettings {
    pub durations: SessionDurations,
    /// Every n-th completed work session is followed by a long break
    pub sessions_until_long_break: u32,
    pub auto_pause_enabled: bool,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            durations: SessionDurations::default(),
            sessions_until_long_break: 4,
            auto_pause_enabled: true,
        }
    }
}

/// Immutable view of the timer handed to callers and observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub session_type: SessionType,
    pub time_left_seconds: u64,
    pub state: TimerPhase,
    pub sessions_completed: u32,
    pub person_present: bool,
    pub auto_pause_enabled: bool,
    pub progress_percent: f64,
    pub formatted_time: String,
}

/// Payload emitted when a period runs out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCompletion {
    pub completed_session_type: SessionType,
    pub next_session_type: SessionType,
    pub sessions_completed: u32,
    pub state: TimerSnapshot,
}

/// Format seconds as zero-padded `MM:SS`
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Percentage of `total` already elapsed given `left` remaining
pub fn progress_percent(total: u64, left: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (total.saturating_sub(left) as f64 / total as f64) * 100.0
}
