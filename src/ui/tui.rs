//! Terminal ownership and frame routing.

use std::io::{self, Stdout};
use std::time::Duration;

use ratatui::crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use super::{error, practice, reward, setup};
use crate::session::SessionSnapshot;

/// Owns the alternate-screen terminal for the whole session.
pub struct PractubeTui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Whether cleanup has been performed
    cleaned_up: bool,
}

impl PractubeTui {
    /// Enters raw mode and the alternate screen.
    ///
    /// # Errors
    /// - If terminal cannot be initialized
    /// - If raw mode cannot be enabled
    /// - If alternate screen cannot be entered
    pub fn new() -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            cleaned_up: false,
        })
    }

    pub fn draw_setup(&mut self, form: &setup::SetupForm) -> anyhow::Result<()> {
        self.terminal
            .draw(|frame| setup::render(frame, frame.area(), form))?;
        Ok(())
    }

    pub fn draw_practice(
        &mut self,
        snapshot: &SessionSnapshot,
        notice: Option<&str>,
    ) -> anyhow::Result<()> {
        self.terminal
            .draw(|frame| practice::render(frame, frame.area(), snapshot, notice))?;
        Ok(())
    }

    pub fn draw_reward(&mut self, view: &reward::RewardView) -> anyhow::Result<()> {
        self.terminal
            .draw(|frame| reward::render(frame, frame.area(), view))?;
        Ok(())
    }

    /// Shows `message` on a red screen until any key is pressed.
    ///
    /// # Errors
    /// - If terminal rendering or event polling fails
    pub fn show_error(&mut self, message: &str) -> anyhow::Result<()> {
        loop {
            self.terminal
                .draw(|frame| error::render_error(frame, frame.area(), message))?;
            if self.next_key(Duration::from_millis(100))?.is_some() {
                return Ok(());
            }
        }
    }

    /// Waits up to `timeout` for a key press.
    ///
    /// Key releases and non-key events count as no input.
    ///
    /// # Errors
    /// - If event polling fails
    pub fn next_key(&mut self, timeout: Duration) -> anyhow::Result<Option<KeyEvent>> {
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(Some(key));
                }
            }
        }
        Ok(None)
    }

    /// Restores the terminal and exits alternate screen mode.
    ///
    /// # Errors
    /// - If terminal mode cannot be disabled
    /// - If cursor cannot be shown
    pub fn cleanup(&mut self) -> anyhow::Result<()> {
        if self.cleaned_up {
            return Ok(());
        }
        self.cleaned_up = true;

        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for PractubeTui {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
