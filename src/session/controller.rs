//! The practice session state machine.

use std::time::Duration;

use super::config::{SessionConfig, SessionSettings};
use super::error::SessionError;
use super::history::{LevelHistory, HISTORY_LEN};
use super::level::normalize_db;
use super::snapshot::{SessionSnapshot, SessionState};
use crate::recording::CaptureSource;

/// Ticks between periodic progress log lines (one second at the default interval).
const PROGRESS_LOG_TICKS: u64 = 20;

/// Drives one practice session at a time.
///
/// `Idle --start--> Recording --finish--> Reward --restart--> Idle`, with
/// `tick` as the only mutation while recording and `abandon` as the way back
/// out of `Recording` without a reward. The capture handle is held exactly
/// while the state is `Recording`.
pub struct PracticeSession<C: CaptureSource> {
    capture: C,
    handle: Option<C::Handle>,
    settings: SessionSettings,
    config: Option<SessionConfig>,
    state: SessionState,
    /// Loud time so far, accumulated in whole ticks so it never drifts
    elapsed: Duration,
    can_finish: bool,
    history: LevelHistory,
    ticks: u64,
}

impl<C: CaptureSource> PracticeSession<C> {
    pub fn new(capture: C, settings: SessionSettings) -> Self {
        Self {
            capture,
            handle: None,
            settings,
            config: None,
            state: SessionState::Idle,
            elapsed: Duration::ZERO,
            can_finish: false,
            history: LevelHistory::new(),
            ticks: 0,
        }
    }

    /// Stores practice and reward durations for the next session.
    ///
    /// # Errors
    /// - `Configuration` if either duration is not a positive number
    /// - `InvalidTransition` if a session is already running or showing its reward
    pub fn configure(
        &mut self,
        practice_minutes: f64,
        reward_minutes: f64,
    ) -> Result<(), SessionError> {
        if self.state != SessionState::Idle {
            return Err(self.rejected("configure"));
        }
        let config = SessionConfig::from_minutes(practice_minutes, reward_minutes)?;
        tracing::info!(
            "Session configured: practice={}min, reward={}min",
            practice_minutes,
            reward_minutes
        );
        self.config = Some(config);
        Ok(())
    }

    /// Acquires audio capture and enters `Recording` with a fresh accumulator.
    ///
    /// # Errors
    /// - `InvalidTransition` unless the state is `Idle`
    /// - `Unconfigured` if `configure` has not succeeded yet
    /// - `CaptureUnavailable` if the capture resource cannot be acquired; the
    ///   state stays `Idle`
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Idle {
            return Err(self.rejected("start"));
        }
        let config = self.config.ok_or(SessionError::Unconfigured)?;

        let handle = self.capture.begin().map_err(|e| {
            tracing::error!("Failed to acquire audio capture: {}", e);
            SessionError::CaptureUnavailable(e.to_string())
        })?;

        self.handle = Some(handle);
        self.elapsed = Duration::ZERO;
        self.can_finish = false;
        self.history.reset();
        self.ticks = 0;
        self.state = SessionState::Recording;

        tracing::info!(
            "Practice started: target {:.1}s above {}dBFS",
            config.practice_seconds(),
            self.settings.loudness_threshold_db
        );
        Ok(())
    }

    /// Samples the current peak level once.
    ///
    /// Appends the normalized level to the history and, when the raw reading is
    /// above the loudness threshold, credits one tick interval of practice.
    /// Does nothing outside `Recording`.
    pub fn tick(&mut self) {
        let (Some(handle), Some(config)) = (self.handle.as_ref(), self.config) else {
            return;
        };

        let raw_db = self.capture.peak_level_db(handle);
        self.history.push(normalize_db(raw_db));

        if raw_db > self.settings.loudness_threshold_db {
            self.elapsed += self.settings.tick_interval;
        }

        if !self.can_finish && self.elapsed.as_secs_f64() >= config.practice_seconds() {
            self.can_finish = true;
            tracing::info!(
                "Practice target reached after {} ticks ({:.2}s loud)",
                self.ticks + 1,
                self.elapsed.as_secs_f64()
            );
        }

        self.ticks += 1;
        if self.ticks.is_multiple_of(PROGRESS_LOG_TICKS) {
            tracing::debug!(
                "Practice: {:.2}s / {:.1}s, last reading {:.1}dBFS",
                self.elapsed.as_secs_f64(),
                config.practice_seconds(),
                raw_db
            );
        }
    }

    /// Ends practice and moves to the reward.
    ///
    /// # Errors
    /// - `InvalidTransition` unless recording with the practice target reached;
    ///   nothing changes in that case
    pub fn finish(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Recording {
            return Err(self.rejected("finish"));
        }
        if !self.can_finish {
            let remaining = self.snapshot().remaining_seconds();
            return Err(SessionError::InvalidTransition {
                action: "finish",
                reason: format!("{remaining}s of practice remaining"),
            });
        }

        self.release_capture();
        self.state = SessionState::Reward;
        tracing::info!(
            "Practice finished: {:.2}s loud over {} ticks",
            self.elapsed.as_secs_f64(),
            self.ticks
        );
        Ok(())
    }

    /// Leaves the reward and returns to `Idle`, keeping the last configuration.
    ///
    /// # Errors
    /// - `InvalidTransition` unless the state is `Reward`
    pub fn restart(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Reward {
            return Err(self.rejected("restart"));
        }
        self.clear_progress();
        self.state = SessionState::Idle;
        tracing::info!("Session reset for a new practice");
        Ok(())
    }

    /// Drops an unfinished practice and returns to `Idle`.
    ///
    /// No-op outside `Recording`.
    pub fn abandon(&mut self) {
        if self.state != SessionState::Recording {
            return;
        }
        self.release_capture();
        tracing::info!(
            "Practice abandoned after {:.2}s loud",
            self.elapsed.as_secs_f64()
        );
        self.clear_progress();
        self.state = SessionState::Idle;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> Option<SessionConfig> {
        self.config
    }

    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Target in seconds, 0 until configured.
    pub fn practice_seconds(&self) -> f64 {
        self.config.map_or(0.0, |c| c.practice_seconds())
    }

    pub fn can_finish(&self) -> bool {
        self.can_finish
    }

    pub fn level_history(&self) -> &[f32; HISTORY_LEN] {
        self.history.levels()
    }

    /// Whether the capture resource is currently held.
    pub fn is_capturing(&self) -> bool {
        self.handle.is_some()
    }

    pub fn capture(&self) -> &C {
        &self.capture
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            elapsed_seconds: self.elapsed_seconds(),
            practice_seconds: self.practice_seconds(),
            reward_seconds: self.config.map_or(0.0, |c| c.reward_seconds()),
            can_finish: self.can_finish,
            level_history: *self.history.levels(),
        }
    }

    fn release_capture(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.capture.end(handle);
        }
    }

    fn clear_progress(&mut self) {
        self.elapsed = Duration::ZERO;
        self.can_finish = false;
        self.history.reset();
        self.ticks = 0;
    }

    fn rejected(&self, action: &'static str) -> SessionError {
        tracing::debug!("Rejected {} while {}", action, self.state);
        SessionError::InvalidTransition {
            action,
            reason: format!("session is {}", self.state),
        }
    }
}

impl<C: CaptureSource> Drop for PracticeSession<C> {
    fn drop(&mut self) {
        self.release_capture();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::ScriptedCapture;
    use assert_matches::assert_matches;

    fn recording_session(capture: &ScriptedCapture, practice_minutes: f64) -> PracticeSession<ScriptedCapture> {
        let mut session = PracticeSession::new(capture.clone(), SessionSettings::default());
        session.configure(practice_minutes, 1.0).unwrap();
        session.start().unwrap();
        session
    }

    #[test]
    fn starts_idle_with_silent_history() {
        let session = PracticeSession::new(ScriptedCapture::constant(-10.0), SessionSettings::default());
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.level_history(), &[0.0; HISTORY_LEN]);
        assert!(!session.is_capturing());
    }

    #[test]
    fn start_requires_configuration() {
        let mut session = PracticeSession::new(ScriptedCapture::constant(-10.0), SessionSettings::default());
        assert_matches!(session.start(), Err(SessionError::Unconfigured));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn quiet_tick_does_not_advance() {
        let capture = ScriptedCapture::constant(-25.0);
        let mut session = recording_session(&capture, 1.0);
        session.tick();
        assert_eq!(session.elapsed_seconds(), 0.0);
        assert_eq!(session.level_history().len(), HISTORY_LEN);
    }

    #[test]
    fn loud_tick_advances_by_one_interval() {
        let capture = ScriptedCapture::constant(-10.0);
        let mut session = recording_session(&capture, 1.0);
        session.tick();
        assert_eq!(session.elapsed_seconds(), 0.05);
    }

    #[test]
    fn threshold_reading_itself_is_quiet() {
        let capture = ScriptedCapture::constant(-20.0);
        let mut session = recording_session(&capture, 1.0);
        session.tick();
        assert_eq!(session.elapsed_seconds(), 0.0);
    }

    #[test]
    fn tick_records_normalized_level() {
        let capture = ScriptedCapture::sequence([-80.0]);
        let mut session = recording_session(&capture, 1.0);
        session.tick();
        assert_eq!(session.level_history()[HISTORY_LEN - 1], 0.5);
    }

    #[test]
    fn tick_outside_recording_is_ignored() {
        let mut session = PracticeSession::new(ScriptedCapture::constant(-10.0), SessionSettings::default());
        session.configure(1.0, 1.0).unwrap();
        session.tick();
        assert_eq!(session.elapsed_seconds(), 0.0);
        assert_eq!(session.level_history(), &[0.0; HISTORY_LEN]);
    }

    #[test]
    fn finish_is_rejected_until_target_reached() {
        // 0.01 minutes = 0.6s = 12 loud ticks
        let capture = ScriptedCapture::constant(-10.0);
        let mut session = recording_session(&capture, 0.01);
        for _ in 0..11 {
            session.tick();
        }
        assert_matches!(
            session.finish(),
            Err(SessionError::InvalidTransition { action: "finish", .. })
        );
        assert_eq!(session.state(), SessionState::Recording);
        assert!(session.is_capturing());

        session.tick();
        assert!(session.can_finish());
        session.finish().unwrap();
        assert_eq!(session.state(), SessionState::Reward);
        assert!(!session.is_capturing());
        assert_eq!(capture.ended(), 1);
    }

    #[test]
    fn can_finish_survives_quiet_ticks() {
        let capture = ScriptedCapture::constant(-10.0);
        let mut session = recording_session(&capture, 0.001);
        session.tick();
        session.tick();
        assert!(session.can_finish());

        capture.set_fallback(-60.0);
        for _ in 0..30 {
            session.tick();
        }
        assert!(session.can_finish());
    }

    #[test]
    fn failed_capture_stays_idle_and_reports_reason() {
        let mut session = PracticeSession::new(ScriptedCapture::failing("mic unplugged"), SessionSettings::default());
        session.configure(1.0, 1.0).unwrap();
        let err = session.start().unwrap_err();
        assert_matches!(&err, SessionError::CaptureUnavailable(reason) if reason.contains("mic unplugged"));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(!session.is_capturing());
    }

    #[test]
    fn second_start_is_rejected_without_reacquiring() {
        let capture = ScriptedCapture::constant(-10.0);
        let mut session = recording_session(&capture, 1.0);
        assert_matches!(
            session.start(),
            Err(SessionError::InvalidTransition { action: "start", .. })
        );
        assert_eq!(capture.begun(), 1);
    }

    #[test]
    fn configure_is_rejected_while_recording() {
        let capture = ScriptedCapture::constant(-10.0);
        let mut session = recording_session(&capture, 1.0);
        assert!(session.configure(2.0, 2.0).is_err());
        assert_eq!(session.practice_seconds(), 60.0);
    }

    #[test]
    fn abandon_releases_capture_and_resets() {
        let capture = ScriptedCapture::constant(-10.0);
        let mut session = recording_session(&capture, 1.0);
        session.tick();
        session.abandon();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.elapsed_seconds(), 0.0);
        assert_eq!(capture.active(), 0);
    }

    #[test]
    fn drop_releases_capture() {
        let capture = ScriptedCapture::constant(-10.0);
        {
            let _session = recording_session(&capture, 1.0);
            assert_eq!(capture.active(), 1);
        }
        assert_eq!(capture.active(), 0);
    }

    #[test]
    fn restart_only_from_reward() {
        let capture = ScriptedCapture::constant(-10.0);
        let mut session = recording_session(&capture, 0.001);
        assert!(session.restart().is_err());
        session.tick();
        session.tick();
        session.finish().unwrap();
        session.restart().unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(!session.can_finish());
        assert_eq!(
            session.config(),
            Some(SessionConfig::from_minutes(0.001, 1.0).unwrap())
        );
    }
}
