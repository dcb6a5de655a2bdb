//! State management module
//!
//! This module contains the timer state machine, the engine that serializes
//! access to it, and the shared application state.

pub mod app_state;
pub mod events;
pub mod session_timer;
pub mod timer_core;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use events::TimerEvent;
pub use session_timer::{LockedTimer, SessionTimer};
pub use timer_core::{TickOutcome, TimerCore};
pub use timer_state::{
    SessionCompletion, SessionDurations, SessionType, TimerPhase, TimerSettings, TimerSnapshot,
};
