//! Session durations and controller tuning.

use std::time::Duration;

use serde::Serialize;

use super::error::SessionError;
use super::level::DEFAULT_LOUDNESS_THRESHOLD_DB;

/// Default tick period of the polling loop.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Practice and reward durations, fixed for the lifetime of one session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionConfig {
    practice_seconds: f64,
    reward_seconds: f64,
}

impl SessionConfig {
    /// Builds a configuration from minutes, which may be fractional.
    ///
    /// # Errors
    /// - `SessionError::Configuration` if either value is not a positive finite number
    pub fn from_minutes(practice_minutes: f64, reward_minutes: f64) -> Result<Self, SessionError> {
        let practice_minutes = validate_minutes("practice time", practice_minutes)?;
        let reward_minutes = validate_minutes("reward time", reward_minutes)?;
        Ok(Self {
            practice_seconds: practice_minutes * 60.0,
            reward_seconds: reward_minutes * 60.0,
        })
    }

    pub fn practice_seconds(&self) -> f64 {
        self.practice_seconds
    }

    pub fn reward_seconds(&self) -> f64 {
        self.reward_seconds
    }

    pub fn reward_duration(&self) -> Duration {
        Duration::from_secs_f64(self.reward_seconds)
    }
}

fn validate_minutes(field: &'static str, value: f64) -> Result<f64, SessionError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SessionError::Configuration { field, value })
    }
}

/// Controller tuning that comes from the application config rather than the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    /// Time credited for each loud tick; also the polling period.
    pub tick_interval: Duration,
    /// Readings strictly above this (dBFS) count as practice.
    pub loudness_threshold_db: f32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            loudness_threshold_db: DEFAULT_LOUDNESS_THRESHOLD_DB,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn converts_minutes_to_seconds() {
        let config = SessionConfig::from_minutes(1.5, 0.5).unwrap();
        assert_eq!(config.practice_seconds(), 90.0);
        assert_eq!(config.reward_seconds(), 30.0);
        assert_eq!(config.reward_duration(), Duration::from_secs(30));
    }

    #[test]
    fn rejects_non_positive_durations() {
        assert_matches!(
            SessionConfig::from_minutes(0.0, 1.0),
            Err(SessionError::Configuration { field: "practice time", .. })
        );
        assert_matches!(
            SessionConfig::from_minutes(1.0, -2.0),
            Err(SessionError::Configuration { field: "reward time", .. })
        );
    }

    #[test]
    fn rejects_non_finite_durations() {
        assert!(SessionConfig::from_minutes(f64::NAN, 1.0).is_err());
        assert!(SessionConfig::from_minutes(1.0, f64::INFINITY).is_err());
    }
}
