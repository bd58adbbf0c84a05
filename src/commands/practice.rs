//! Practice session command.
//!
//! Runs the setup, practice and reward screens in one terminal session. The
//! practice screen polls the microphone on a fixed tick until the user has
//! practiced loudly for long enough and chooses to finish.

use std::time::Instant;

use crate::config::PractubeConfig;
use crate::recording::{CaptureSource, CpalCapture};
use crate::reward::{BrowserPlayer, RewardPlayer, RewardTimer};
use crate::scheduler::{SystemClock, TickScheduler};
use crate::session::{PracticeSession, SessionError, SessionState};
use crate::ui::{
    PracticeCommand, PractubeTui, RewardCommand, RewardView, SetupAction, SetupForm,
};

/// How long the setup and reward screens block on input before redrawing.
const IDLE_POLL: std::time::Duration = std::time::Duration::from_millis(250);

/// What a screen hands back to the session loop.
enum Flow {
    /// The controller changed state; show the matching screen
    Next,
    Quit,
}

/// Handles a practice session from setup through reward.
///
/// `practice_minutes` and `reward_minutes` pre-fill the setup screen; when
/// absent the configured defaults are used.
///
/// # Errors
/// - If the configuration cannot be loaded
/// - If the terminal cannot be initialized or drawn
pub async fn handle_practice(
    practice_minutes: Option<f64>,
    reward_minutes: Option<f64>,
) -> Result<(), anyhow::Error> {
    tracing::info!("=== practube session started ===");

    let config = match PractubeConfig::load_or_create() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Failed to load configuration: {err:#}");
            let mut tui = PractubeTui::new()?;
            tui.show_error(&format!(
                "Configuration Error:\n\n{err:#}\n\nPlease check your ~/.config/practube/practube.toml file and try again."
            ))?;
            tui.cleanup()?;
            return Err(err.context("Configuration error"));
        }
    };

    tracing::info!(
        "Configuration loaded: device={}, threshold={}dBFS, tick={}ms",
        config.audio.device,
        config.audio.loudness_threshold_db,
        config.audio.tick_interval_ms
    );

    let capture = CpalCapture::new(config.audio.device.clone());
    let mut session = PracticeSession::new(capture, config.session_settings());
    let mut form = SetupForm::new(
        practice_minutes.unwrap_or(config.session.practice_minutes),
        reward_minutes.unwrap_or(config.session.reward_minutes),
    );

    let mut tui = PractubeTui::new()?;
    let result = run_session(&mut tui, &mut session, &mut form, &config).await;

    // Release the microphone before handing the terminal back
    session.abandon();
    tui.cleanup()?;

    tracing::info!("=== practube session exited ===");
    result
}

async fn run_session<C: CaptureSource>(
    tui: &mut PractubeTui,
    session: &mut PracticeSession<C>,
    form: &mut SetupForm,
    config: &PractubeConfig,
) -> anyhow::Result<()> {
    loop {
        let flow = match session.state() {
            SessionState::Idle => run_setup(tui, session, form)?,
            SessionState::Recording => run_practice(tui, session)?,
            SessionState::Reward => run_reward(tui, session, config).await?,
        };
        if let Flow::Quit = flow {
            return Ok(());
        }
    }
}

/// Setup screen: collect durations, configure and start.
fn run_setup<C: CaptureSource>(
    tui: &mut PractubeTui,
    session: &mut PracticeSession<C>,
    form: &mut SetupForm,
) -> anyhow::Result<Flow> {
    loop {
        tui.draw_setup(form)?;

        let Some(key) = tui.next_key(IDLE_POLL)? else {
            continue;
        };

        match form.handle_key(key) {
            SetupAction::None => {}
            SetupAction::Quit => return Ok(Flow::Quit),
            SetupAction::Submit => {
                let (practice, reward) = match form.minutes() {
                    Ok(minutes) => minutes,
                    Err(message) => {
                        form.set_error(message);
                        continue;
                    }
                };
                if let Err(e) = session.configure(practice, reward) {
                    form.set_error(e.to_string());
                    continue;
                }
                match session.start() {
                    Ok(()) => return Ok(Flow::Next),
                    Err(e @ SessionError::CaptureUnavailable(_)) => {
                        tui.show_error(&format!(
                            "Recording Error:\n\n{e}\n\nPlease check your audio configuration and try again."
                        ))?;
                    }
                    Err(e) => form.set_error(e.to_string()),
                }
            }
        }
    }
}

/// Practice screen: tick on schedule, render, react to input.
fn run_practice<C: CaptureSource>(
    tui: &mut PractubeTui,
    session: &mut PracticeSession<C>,
) -> anyhow::Result<Flow> {
    let mut scheduler = TickScheduler::new(SystemClock, session.settings().tick_interval);
    scheduler.start();
    let mut notice: Option<String> = None;

    tracing::debug!("Entering practice loop. Press 'Enter' to finish or 'Escape'/'q' to stop.");

    loop {
        for _ in 0..scheduler.poll() {
            session.tick();
        }

        tui.draw_practice(&session.snapshot(), notice.as_deref())?;

        let Some(key) = tui.next_key(scheduler.time_until_next())? else {
            continue;
        };

        match PracticeCommand::from_key(key) {
            PracticeCommand::Continue => {}
            PracticeCommand::Finish => match session.finish() {
                Ok(()) => {
                    scheduler.stop();
                    return Ok(Flow::Next);
                }
                Err(e) => notice = Some(format!("Not yet: {e}")),
            },
            PracticeCommand::Abandon => {
                scheduler.stop();
                session.abandon();
                return Ok(Flow::Next);
            }
        }
    }
}

/// Reward screen: open the reward and count down the earned time.
async fn run_reward<C: CaptureSource>(
    tui: &mut PractubeTui,
    session: &mut PracticeSession<C>,
    config: &PractubeConfig,
) -> anyhow::Result<Flow> {
    let reward_duration = session
        .config()
        .map(|c| c.reward_duration())
        .unwrap_or_default();
    let timer = RewardTimer::new(Instant::now(), reward_duration);
    let url = config.reward.url.as_str();

    let mut browser_error = if config.reward.open_browser {
        open_reward(url).await.err()
    } else {
        None
    };
    let mut announced_end = false;

    loop {
        let now = Instant::now();
        if !announced_end && timer.is_over(now) {
            announced_end = true;
            tracing::info!("Reward time over");
        }

        tui.draw_reward(&RewardView {
            url,
            remaining: timer.remaining(now),
            browser_error: browser_error.as_deref(),
        })?;

        let Some(key) = tui.next_key(IDLE_POLL)? else {
            continue;
        };

        match RewardCommand::from_key(key) {
            RewardCommand::Stay => {}
            RewardCommand::Reopen => browser_error = open_reward(url).await.err(),
            RewardCommand::NewPractice => {
                session.restart()?;
                return Ok(Flow::Next);
            }
            RewardCommand::Quit => return Ok(Flow::Quit),
        }
    }
}

/// Opens the reward in the browser off the main task.
///
/// Returns the failure as a display message for the reward screen.
async fn open_reward(url: &str) -> Result<(), String> {
    let url = url.to_string();
    let result = tokio::task::spawn_blocking(move || BrowserPlayer.play(&url)).await;

    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            tracing::warn!("Failed to open reward: {}", e);
            Err(e.to_string())
        }
        Err(e) => {
            tracing::warn!("Reward launch task failed: {}", e);
            Err(format!("Failed to open browser: {e}"))
        }
    }
}
