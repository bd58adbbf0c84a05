//! Read-only view of the session handed to the screens.

use serde::Serialize;

use super::history::HISTORY_LEN;

/// Which screen is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Waiting for durations and a start request
    #[default]
    Idle,
    /// Capturing audio and accumulating practice time
    Recording,
    /// Practice done, reward content is showing
    Reward,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Recording => write!(f, "recording"),
            Self::Reward => write!(f, "reward"),
        }
    }
}

/// Everything a screen needs to render one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub elapsed_seconds: f64,
    pub practice_seconds: f64,
    pub reward_seconds: f64,
    pub can_finish: bool,
    pub level_history: [f32; HISTORY_LEN],
}

impl SessionSnapshot {
    /// Whole seconds of loud practice still required, never negative.
    pub fn remaining_seconds(&self) -> u64 {
        (self.practice_seconds - self.elapsed_seconds).max(0.0).trunc() as u64
    }

    /// Fraction of the practice target reached, capped at 1.
    pub fn progress(&self) -> f64 {
        if self.practice_seconds <= 0.0 {
            return 0.0;
        }
        (self.elapsed_seconds / self.practice_seconds).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(elapsed: f64, practice: f64) -> SessionSnapshot {
        SessionSnapshot {
            state: SessionState::Recording,
            elapsed_seconds: elapsed,
            practice_seconds: practice,
            reward_seconds: 60.0,
            can_finish: elapsed >= practice,
            level_history: [0.0; HISTORY_LEN],
        }
    }

    #[test]
    fn remaining_truncates_and_floors_at_zero() {
        assert_eq!(snapshot(0.0, 60.0).remaining_seconds(), 60);
        assert_eq!(snapshot(10.5, 60.0).remaining_seconds(), 49);
        assert_eq!(snapshot(75.0, 60.0).remaining_seconds(), 0);
    }

    #[test]
    fn progress_is_capped() {
        assert_eq!(snapshot(30.0, 60.0).progress(), 0.5);
        assert_eq!(snapshot(90.0, 60.0).progress(), 1.0);
    }

    #[test]
    fn serializes_state_in_lowercase() {
        let json = serde_json::to_value(snapshot(1.0, 60.0)).unwrap();
        assert_eq!(json["state"], "recording");
        assert_eq!(json["level_history"].as_array().unwrap().len(), HISTORY_LEN);
    }
}
