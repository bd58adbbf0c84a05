//! Errors reported by the practice session controller.

use thiserror::Error;

/// Everything the controller can reject.
///
/// None of these are fatal: the controller is always left in a state from
/// which the user can reconfigure and try again.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// A duration was zero, negative or not a number.
    #[error("{field} must be a positive number of minutes (got {value})")]
    Configuration { field: &'static str, value: f64 },

    /// `start()` was called before any configuration was stored.
    #[error("session has not been configured")]
    Unconfigured,

    /// The audio capture resource could not be acquired.
    #[error("audio capture unavailable: {0}")]
    CaptureUnavailable(String),

    /// The requested action is not allowed in the current state.
    #[error("cannot {action}: {reason}")]
    InvalidTransition {
        action: &'static str,
        reason: String,
    },
}
