//! The audio capture contract used by the session controller.

use thiserror::Error;

use crate::session::level::SILENCE_DB;

/// Reasons an audio capture resource cannot be acquired.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("No audio input device available")]
    NoDevice,

    #[error(
        "Audio input device '{0}' not found. Use 'practube list-devices' to see available devices."
    )]
    DeviceNotFound(String),

    #[error("Device index {index} is out of range (0-{max})")]
    IndexOutOfRange { index: usize, max: usize },

    #[error("Failed to enumerate devices: {0}")]
    Enumerate(String),

    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to open audio stream: {0}")]
    Stream(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A source of instantaneous peak levels.
///
/// The handle owns whatever keeps capture running; `end` consumes it so a
/// released handle cannot be read again.
pub trait CaptureSource {
    type Handle;

    /// Acquires the capture resource and starts metering.
    ///
    /// # Errors
    /// - If no device is available or the stream cannot be opened
    fn begin(&mut self) -> Result<Self::Handle, CaptureError>;

    /// Peak level in dBFS since the previous reading.
    fn peak_level_db(&self, handle: &Self::Handle) -> f32;

    /// Stops capture and releases the resource.
    fn end(&mut self, handle: Self::Handle);
}

/// Converts a linear peak amplitude (full scale = 1.0) into dBFS.
///
/// Silence and anything quieter than the metering floor report [`SILENCE_DB`].
pub fn amplitude_to_db(amplitude: f32) -> f32 {
    if amplitude > 0.0 {
        (20.0 * amplitude.log10()).max(SILENCE_DB)
    } else {
        SILENCE_DB
    }
}
