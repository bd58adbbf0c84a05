//! Practice session core.
//!
//! Owns the `Idle → Recording → Reward` state machine, the loud-time accumulator
//! and the rolling level history shown by the VU meter. Audio capture is reached
//! only through [`CaptureSource`](crate::recording::CaptureSource), so the whole
//! module can be driven tick by tick from tests.

pub mod config;
pub mod controller;
pub mod error;
pub mod history;
pub mod level;
pub mod snapshot;

pub use config::{SessionConfig, SessionSettings};
pub use controller::PracticeSession;
pub use error::SessionError;
pub use history::{LevelHistory, HISTORY_LEN};
pub use level::{display_color, display_height, normalize_db, LevelBand};
pub use snapshot::{SessionSnapshot, SessionState};
