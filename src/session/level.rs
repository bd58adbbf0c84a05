//! Level math shared by the controller and the VU meter.

use serde::Serialize;

/// Floor of the metering range, reported for digital silence.
pub const SILENCE_DB: f32 = -160.0;

/// Readings strictly above this count as practice time.
pub const DEFAULT_LOUDNESS_THRESHOLD_DB: f32 = -20.0;

/// Rescales a peak reading in dBFS into `[0, 1]`.
///
/// `-160 dB` maps to 0 and `0 dB` maps to 1; anything outside is clamped.
pub fn normalize_db(raw_db: f32) -> f32 {
    if raw_db.is_nan() {
        return 0.0;
    }
    ((raw_db - SILENCE_DB) / -SILENCE_DB).clamp(0.0, 1.0)
}

/// Visual magnitude of a normalized level.
///
/// Square-root compression: quiet input still moves the bars noticeably.
pub fn display_height(level: f32) -> f32 {
    level.clamp(0.0, 1.0).sqrt()
}

/// Color class of a meter bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelBand {
    Low,
    Mid,
    High,
}

impl LevelBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Mid => "mid",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for LevelBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a normalized level: below 0.6 is low, below 0.8 is mid, the rest high.
pub fn display_color(level: f32) -> LevelBand {
    if level < 0.6 {
        LevelBand::Low
    } else if level < 0.8 {
        LevelBand::Mid
    } else {
        LevelBand::High
    }
}
