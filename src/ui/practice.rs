//! Practice screen: progress, remaining time and the VU meter.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    prelude::*,
    widgets::{Block, Gauge, Padding, Paragraph},
};

use super::meter::VuMeter;
use super::{BG, FG, HELP_FG};
use crate::session::SessionSnapshot;

/// User input during practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeCommand {
    /// Keep practicing (no key or an unbound key)
    Continue,
    /// Try to finish practice (Enter)
    Finish,
    /// Stop without a reward and return to setup (Escape, 'q' or Ctrl+C)
    Abandon,
}

impl PracticeCommand {
    pub fn from_key(key: KeyEvent) -> Self {
        match key.code {
            KeyCode::Enter => {
                tracing::debug!("Enter pressed: requesting finish");
                Self::Finish
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                tracing::debug!("Escape or 'q' pressed: abandoning practice");
                Self::Abandon
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                tracing::debug!("Ctrl+C pressed: abandoning practice");
                Self::Abandon
            }
            _ => Self::Continue,
        }
    }
}

/// Renders one practice frame.
///
/// `notice` is shown under the meter, typically why a finish was refused.
pub fn render(frame: &mut Frame, area: Rect, snapshot: &SessionSnapshot, notice: Option<&str>) {
    let padding_block = Block::default()
        .padding(Padding::uniform(1))
        .style(Style::default().fg(FG).bg(BG));
    frame.render_widget(&padding_block, area);
    let inner = padding_block.inner(area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new("Practicing...")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        layout[0],
    );

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Blue).bg(Color::Rgb(30, 30, 30)))
        .ratio(snapshot.progress())
        .label(format!("{:.0}%", snapshot.progress() * 100.0));
    frame.render_widget(gauge, layout[1]);

    frame.render_widget(
        Paragraph::new(format!("Remaining: {}s", snapshot.remaining_seconds()))
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::BOLD)),
        layout[2],
    );

    frame.render_widget(VuMeter::new(&snapshot.level_history), layout[3]);

    let (status, status_style) = if snapshot.can_finish {
        (
            "Practice complete! Press Enter to finish.",
            Style::default().fg(Color::Green),
        )
    } else {
        ("Keep going, only loud practice counts.", Style::default().fg(HELP_FG))
    };
    frame.render_widget(
        Paragraph::new(status)
            .alignment(Alignment::Center)
            .style(status_style),
        layout[4],
    );

    if let Some(notice) = notice {
        frame.render_widget(
            Paragraph::new(notice)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Yellow)),
            layout[5],
        );
    }

    frame.render_widget(
        Paragraph::new("Enter finish, q stop")
            .alignment(Alignment::Center)
            .style(Style::default().fg(HELP_FG)),
        layout[6],
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_keys_to_commands() {
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(PracticeCommand::from_key(key(KeyCode::Enter)), PracticeCommand::Finish);
        assert_eq!(PracticeCommand::from_key(key(KeyCode::Esc)), PracticeCommand::Abandon);
        assert_eq!(
            PracticeCommand::from_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            PracticeCommand::Abandon
        );
        assert_eq!(PracticeCommand::from_key(key(KeyCode::Char(' '))), PracticeCommand::Continue);
    }
}
