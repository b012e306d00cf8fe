//! Error types for timer operations

use thiserror::Error;

/// Why a timer operation was refused.
///
/// None of these are fatal: the UI shows the message as a toast and the
/// registry is left as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("timer \"{name}\" not found")]
    NotFound { name: String },

    #[error("timer \"{name}\" {reason}")]
    InvalidTransition { name: String, reason: &'static str },

    /// The expiry callback claimed the timer before the cancel did.
    #[error("timer \"{name}\" has already fired or been stopped")]
    AlreadyFired { name: String },

    #[error("timer \"{name}\" is too long")]
    DurationOverflow { name: String },
}

impl TimerError {
    pub(crate) fn not_found(name: &str) -> Self {
        Self::NotFound {
            name: name.to_string(),
        }
    }

    pub(crate) fn invalid(name: &str, reason: &'static str) -> Self {
        Self::InvalidTransition {
            name: name.to_string(),
            reason,
        }
    }

    pub(crate) fn already_fired(name: &str) -> Self {
        Self::AlreadyFired {
            name: name.to_string(),
        }
    }
}
