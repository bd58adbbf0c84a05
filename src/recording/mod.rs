//! Microphone capture for practube.
//!
//! The session controller only sees the [`CaptureSource`] contract: acquire a
//! handle, read the instantaneous peak in dBFS, release the handle. `CpalCapture`
//! is the real microphone; `ScriptedCapture` replays fixed readings.

pub mod audio;
pub mod scripted;
pub mod source;

pub use audio::{find_device_by_name, suppress_alsa_warnings, CpalCapture, CpalCaptureHandle};
pub use scripted::ScriptedCapture;
pub use source::{amplitude_to_db, CaptureError, CaptureSource};
