//! Focus Timer - a presence-aware Pomodoro session timer
//!
//! This library provides the work/break session timer, the controller that
//! pauses and resumes it from a "person present" signal, and the HTTP and
//! WebSocket surface that exposes both.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::TimerError;
pub use services::PresenceController;
pub use state::{AppState, SessionTimer};
pub use utils::signals::shutdown_signal;
