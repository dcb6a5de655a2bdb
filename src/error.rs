//! Error taxonomy for timer operations
//!
//! Every variant here is an expected, recoverable condition. Handlers turn
//! them into structured responses instead of failing the request.

use thiserror::Error;

/// Reasons a timer operation can be refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// Manual start attempted while the timer is paused for absence
    #[error("Timer is auto-paused. Please ensure you are visible to the camera.")]
    AutoPauseActive,

    /// Resume attempted while the person is not detected
    #[error("Cannot resume - person not detected. Please stay visible to the camera.")]
    PersonAbsent,

    /// Unknown session type supplied at the command boundary
    #[error("Invalid session type: {0}")]
    InvalidSessionType(String),

    /// The engine lock was poisoned by a panicking holder
    #[error("Failed to lock timer state: {0}")]
    StatePoisoned(String),
}

impl TimerError {
    /// Stable machine-readable reason code
    pub fn reason(&self) -> &'static str {
        match self {
            TimerError::AutoPauseActive => "AutoPauseActive",
            TimerError::PersonAbsent => "PersonAbsent",
            TimerError::InvalidSessionType(_) => "InvalidSessionType",
            TimerError::StatePoisoned(_) => "StatePoisoned",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_codes_are_stable() {
        assert_eq!(TimerError::AutoPauseActive.reason(), "AutoPauseActive");
        assert_eq!(TimerError::PersonAbsent.reason(), "PersonAbsent");
        assert_eq!(
            TimerError::InvalidSessionType("nap".into()).reason(),
            "InvalidSessionType"
        );
    }

    #[test]
    fn messages_explain_the_refusal() {
        assert!(TimerError::PersonAbsent.to_string().contains("not detected"));
        assert_eq!(
            TimerError::InvalidSessionType("nap".into()).to_string(),
            "Invalid session type: nap"
        );
    }
}
