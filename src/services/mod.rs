//! Services module
//!
//! Components that drive the session timer from external signals.

pub mod presence;

// Re-export main types
pub use presence::{PresenceAction, PresenceController, PresenceOutcome};
