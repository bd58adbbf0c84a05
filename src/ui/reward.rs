//! Reward screen: earned time countdown.

use std::time::Duration;

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    prelude::*,
    widgets::{Block, Padding, Paragraph},
};

use super::{BG, FG, HELP_FG};

/// User input on the reward screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardCommand {
    Stay,
    /// Open the reward URL again ('o')
    Reopen,
    /// Start a new practice ('n')
    NewPractice,
    /// Leave the application (Escape, 'q' or Ctrl+C)
    Quit,
}

impl RewardCommand {
    pub fn from_key(key: KeyEvent) -> Self {
        match key.code {
            KeyCode::Char('o') => Self::Reopen,
            KeyCode::Char('n') => Self::NewPractice,
            KeyCode::Char('q') | KeyCode::Esc => Self::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Self::Quit,
            _ => Self::Stay,
        }
    }
}

/// What the reward screen shows.
pub struct RewardView<'a> {
    pub url: &'a str,
    pub remaining: Duration,
    /// Why the browser could not be opened, if it failed
    pub browser_error: Option<&'a str>,
}

/// Formats a countdown as `m:ss`, rounding partial seconds up.
pub fn format_countdown(remaining: Duration) -> String {
    let total_secs = remaining.as_millis().div_ceil(1000);
    let minutes = total_secs / 60;
    let secs = total_secs % 60;
    format!("{minutes}:{secs:02}")
}

/// Renders the reward screen.
pub fn render(frame: &mut Frame, area: Rect, view: &RewardView) {
    let padding_block = Block::default()
        .padding(Padding::uniform(1))
        .style(Style::default().fg(FG).bg(BG));
    frame.render_widget(&padding_block, area);
    let inner = padding_block.inner(area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new("Great practice!")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        layout[0],
    );

    let countdown = if view.remaining.is_zero() {
        Line::styled(
            "Reward time is over",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else {
        Line::from(vec![
            Span::raw("Reward time left: "),
            Span::styled(
                format_countdown(view.remaining),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ])
    };
    frame.render_widget(
        Paragraph::new(countdown).alignment(Alignment::Center),
        layout[1],
    );

    let location = match view.browser_error {
        Some(error) => Text::from(vec![
            Line::styled(error.to_string(), Style::default().fg(Color::Yellow)),
            Line::raw(format!("Open {} yourself", view.url)),
        ]),
        None => Text::from(format!("Enjoy {}", view.url)),
    };
    frame.render_widget(
        Paragraph::new(location)
            .alignment(Alignment::Center)
            .wrap(ratatui::widgets::Wrap { trim: true }),
        layout[2],
    );

    frame.render_widget(
        Paragraph::new("o reopen, n new practice, q quit")
            .alignment(Alignment::Center)
            .style(Style::default().fg(HELP_FG)),
        layout[4],
    );
}
