//! Fixed-width sliding window of recent levels.

use serde::Serialize;

/// Number of bars on the meter.
pub const HISTORY_LEN: usize = 20;

/// The last [`HISTORY_LEN`] normalized levels, oldest first.
///
/// The length is fixed by the type: pushing drops the oldest entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelHistory {
    levels: [f32; HISTORY_LEN],
}

impl LevelHistory {
    /// A window of silence.
    pub fn new() -> Self {
        Self {
            levels: [0.0; HISTORY_LEN],
        }
    }

    /// Appends `level` as the newest entry, shifting everything one slot left.
    pub fn push(&mut self, level: f32) {
        self.levels.rotate_left(1);
        self.levels[HISTORY_LEN - 1] = level.clamp(0.0, 1.0);
    }

    pub fn reset(&mut self) {
        self.levels = [0.0; HISTORY_LEN];
    }

    pub fn levels(&self) -> &[f32; HISTORY_LEN] {
        &self.levels
    }

    pub fn newest(&self) -> f32 {
        self.levels[HISTORY_LEN - 1]
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for LevelHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_as_twenty_zeros() {
        let history = LevelHistory::new();
        assert_eq!(history.len(), HISTORY_LEN);
        assert!(history.levels().iter().all(|&l| l == 0.0));
    }

    #[test]
    fn push_drops_oldest_and_keeps_length() {
        let mut history = LevelHistory::new();
        for i in 0..25 {
            history.push(i as f32 / 100.0);
            assert_eq!(history.len(), HISTORY_LEN);
        }
        // 25 pushes: entries 5..25 remain, oldest first
        assert_eq!(history.levels()[0], 0.05);
        assert_eq!(history.newest(), 0.24);
    }

    #[test]
    fn reset_restores_silence() {
        let mut history = LevelHistory::new();
        history.push(0.9);
        history.reset();
        assert_eq!(history, LevelHistory::new());
    }
}
