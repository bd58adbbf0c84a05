//! Reward playback.
//!
//! Once practice is finished the reward site is opened in the system browser
//! and the reward screen counts down the earned minutes.

use std::time::{Duration, Instant};

use anyhow::anyhow;
use webbrowser::Browser;

/// Something that can show the reward content.
pub trait RewardPlayer: Send {
    /// Starts playback of `url`.
    ///
    /// # Errors
    /// - If the content cannot be shown
    fn play(&mut self, url: &str) -> anyhow::Result<()>;
}

/// Opens the reward URL in the default web browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserPlayer;

impl RewardPlayer for BrowserPlayer {
    fn play(&mut self, url: &str) -> anyhow::Result<()> {
        if !Browser::is_available() {
            return Err(anyhow!("No web browser available"));
        }
        webbrowser::open(url).map_err(|e| anyhow!("Failed to open {url}: {e}"))?;
        tracing::info!("Reward opened in browser: {}", url);
        Ok(())
    }
}

/// Countdown over the earned reward time.
#[derive(Debug, Clone, Copy)]
pub struct RewardTimer {
    started_at: Instant,
    duration: Duration,
}

impl RewardTimer {
    pub fn new(started_at: Instant, duration: Duration) -> Self {
        Self {
            started_at,
            duration,
        }
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.duration
            .saturating_sub(now.saturating_duration_since(self.started_at))
    }

    pub fn is_over(&self, now: Instant) -> bool {
        self.remaining(now).is_zero()
    }
}
