//! Microphone metering through cpal.
//!
//! Audio is captured from the configured input device at its native format,
//! mixed down to mono, and reduced to a running absolute peak. Samples are not
//! kept: the session only needs the loudness of the last polling interval.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample};
use std::sync::{Arc, Mutex, PoisonError};

use super::source::{amplitude_to_db, CaptureError, CaptureSource};

#[cfg(target_os = "linux")]
use std::fs::OpenOptions;
#[cfg(target_os = "linux")]
use std::os::unix::io::AsRawFd;

/// Meters the peak level of a specified or default input device.
pub struct CpalCapture {
    /// Device name, numeric index, or "default" for the system default device
    device_name: String,
}

/// A running input stream and the peak it has seen since the last reading.
pub struct CpalCaptureHandle {
    /// Active audio input stream (capture stops when dropped)
    stream: cpal::Stream,
    /// Largest absolute mono sample since the last reading, full scale = 1.0
    peak: Arc<Mutex<f32>>,
    /// Resolved device name, for logging
    device_name: String,
    sample_rate: u32,
}

impl CpalCaptureHandle {
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl CpalCapture {
    /// Creates a capture source for `device_name` ("default", an index, or a device name).
    ///
    /// No device is opened until [`CaptureSource::begin`] is called.
    pub fn new(device_name: String) -> Self {
        Self { device_name }
    }
}

impl CaptureSource for CpalCapture {
    type Handle = CpalCaptureHandle;

    /// Opens the input device and starts metering.
    ///
    /// # Errors
    /// - If the specified device is not available
    /// - If the device reports an unsupported sample format
    /// - If audio stream creation fails
    fn begin(&mut self) -> Result<CpalCaptureHandle, CaptureError> {
        let device = suppress_alsa_warnings(|| {
            let host = cpal::default_host();

            if self.device_name == "default" {
                host.default_input_device().ok_or(CaptureError::NoDevice)
            } else {
                find_device_by_name(&host, &self.device_name)
            }
        })?;

        let device_name = device
            .name()
            .unwrap_or_else(|_| "Unknown device".to_string());
        tracing::info!("Capture device: {}", device_name);

        let device_config = device
            .default_input_config()
            .map_err(|e| CaptureError::Stream(e.to_string()))?;
        let sample_rate = device_config.sample_rate().0;
        let channels = device_config.channels() as usize;
        let sample_format = device_config.sample_format();

        tracing::debug!(
            "Device configuration: {}Hz, {} channels, {:?}",
            sample_rate,
            channels,
            sample_format
        );

        let peak = Arc::new(Mutex::new(0.0f32));
        let stream_config: cpal::StreamConfig = device_config.into();

        let stream = match sample_format {
            SampleFormat::I16 => {
                build_peak_stream::<i16>(&device, &stream_config, channels, Arc::clone(&peak))
            }
            SampleFormat::U16 => {
                build_peak_stream::<u16>(&device, &stream_config, channels, Arc::clone(&peak))
            }
            SampleFormat::F32 => {
                build_peak_stream::<f32>(&device, &stream_config, channels, Arc::clone(&peak))
            }
            other => Err(CaptureError::UnsupportedFormat(format!("{other:?}"))),
        }?;

        stream
            .play()
            .map_err(|e| CaptureError::Stream(e.to_string()))?;

        tracing::debug!("Audio stream started");
        Ok(CpalCaptureHandle {
            stream,
            peak,
            device_name,
            sample_rate,
        })
    }

    /// Returns the peak since the previous reading in dBFS and resets it.
    fn peak_level_db(&self, handle: &CpalCaptureHandle) -> f32 {
        let mut peak = handle.peak.lock().unwrap_or_else(PoisonError::into_inner);
        let amplitude = *peak;
        *peak = 0.0;
        amplitude_to_db(amplitude)
    }

    fn end(&mut self, handle: CpalCaptureHandle) {
        if let Err(e) = handle.stream.pause() {
            tracing::debug!("Failed to pause stream before release: {}", e);
        }
        tracing::info!("Capture released: {}", handle.device_name);
        drop(handle);
    }
}

/// Builds an input stream that folds every callback into the shared peak cell.
fn build_peak_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    peak: Arc<Mutex<f32>>,
) -> Result<cpal::Stream, CaptureError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                let callback_peak = mono_peak(data, channels);
                let mut peak = peak.lock().unwrap_or_else(PoisonError::into_inner);
                if callback_peak > *peak {
                    *peak = callback_peak;
                }
            },
            |err| {
                tracing::error!("Audio stream error: {}", err);
            },
            None,
        )
        .map_err(|e| CaptureError::Stream(e.to_string()))
}

/// Largest absolute value of the mono mix of interleaved `data`.
///
/// Multi-channel frames are averaged before taking the magnitude.
fn mono_peak<T>(data: &[T], channels: usize) -> f32
where
    T: Sample,
    f32: FromSample<T>,
{
    let channels = channels.max(1);
    data.chunks_exact(channels)
        .map(|frame| {
            let sum: f32 = frame.iter().map(|&s| s.to_sample::<f32>()).sum();
            (sum / channels as f32).abs()
        })
        .fold(0.0, f32::max)
}

/// Finds an audio input device by name or numeric index.
///
/// # Arguments
/// * `host` - The cpal audio host
/// * `device_spec` - A device name or a numeric index (0, 1, 2, etc.)
///
/// # Errors
/// - If no device with the specified name/index is found
pub fn find_device_by_name(
    host: &cpal::Host,
    device_spec: &str,
) -> Result<cpal::Device, CaptureError> {
    let mut devices: Vec<_> = host
        .input_devices()
        .map_err(|e| CaptureError::Enumerate(e.to_string()))?
        .collect();

    if let Ok(index) = device_spec.parse::<usize>() {
        if index < devices.len() {
            return Ok(devices.swap_remove(index));
        }
        return Err(CaptureError::IndexOutOfRange {
            index,
            max: devices.len().saturating_sub(1),
        });
    }

    devices
        .into_iter()
        .find(|device| device.name().is_ok_and(|name| name == device_spec))
        .ok_or_else(|| CaptureError::DeviceNotFound(device_spec.to_string()))
}

/// Temporarily redirects stderr to /dev/null to suppress ALSA library warnings on Linux.
/// On non-Linux platforms, this is a no-op since ALSA doesn't exist.
#[cfg(target_os = "linux")]
pub fn suppress_alsa_warnings<F, T>(f: F) -> Result<T, CaptureError>
where
    F: FnOnce() -> Result<T, CaptureError>,
{
    let dev_null = OpenOptions::new().write(true).open("/dev/null")?;
    let dev_null_fd = dev_null.as_raw_fd();

    // Save the current stderr file descriptor
    let old_stderr = unsafe { libc::dup(libc::STDERR_FILENO) };
    if old_stderr == -1 {
        return Err(std::io::Error::last_os_error().into());
    }

    if unsafe { libc::dup2(dev_null_fd, libc::STDERR_FILENO) } == -1 {
        let err = std::io::Error::last_os_error();
        unsafe { libc::close(old_stderr) };
        return Err(err.into());
    }

    let result = f();

    // Restore the original stderr
    unsafe {
        libc::dup2(old_stderr, libc::STDERR_FILENO);
        libc::close(old_stderr);
    }

    result
}

/// On non-Linux platforms, no stderr suppression is needed since ALSA doesn't exist.
#[cfg(not(target_os = "linux"))]
pub fn suppress_alsa_warnings<F, T>(f: F) -> Result<T, CaptureError>
where
    F: FnOnce() -> Result<T, CaptureError>,
{
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_peak_of_float_samples() {
        assert_eq!(mono_peak(&[0.1f32, -0.5, 0.25], 1), 0.5);
    }

    #[test]
    fn mono_peak_averages_channels_first() {
        // Opposite-phase stereo cancels out, in-phase stereo does not
        let peak = mono_peak(&[0.5f32, -0.5, 0.4, 0.2], 2);
        assert!((peak - 0.3).abs() < 1e-6);
    }

    #[test]
    fn mono_peak_of_integer_samples() {
        let peak = mono_peak(&[i16::MIN, 0], 1);
        assert_eq!(peak, 1.0);
    }

    #[test]
    fn mono_peak_of_empty_buffer_is_silence() {
        assert_eq!(mono_peak::<f32>(&[], 2), 0.0);
    }
}
