//! Setup screen: choose practice and reward minutes.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use super::{BG, FG, HELP_FG, HIGHLIGHT_FG};

/// Which input has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupField {
    Practice,
    Reward,
}

/// What the setup screen asks the session loop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupAction {
    None,
    /// Configure and start with the entered durations (Enter)
    Submit,
    /// Leave the application (Escape, 'q' or Ctrl+C)
    Quit,
}

/// The two duration inputs and the last validation message.
pub struct SetupForm {
    practice: Input,
    reward: Input,
    focus: SetupField,
    error: Option<String>,
}

impl SetupForm {
    /// Creates the form pre-filled with the given minutes.
    pub fn new(practice_minutes: f64, reward_minutes: f64) -> Self {
        Self {
            practice: Input::new(practice_minutes.to_string()),
            reward: Input::new(reward_minutes.to_string()),
            focus: SetupField::Practice,
            error: None,
        }
    }

    /// Applies one key press.
    ///
    /// Only digits and a decimal point reach the inputs, so 'q' stays free to quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> SetupAction {
        match key.code {
            KeyCode::Enter => return SetupAction::Submit,
            KeyCode::Esc | KeyCode::Char('q') => return SetupAction::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return SetupAction::Quit
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focus = match self.focus {
                    SetupField::Practice => SetupField::Reward,
                    SetupField::Reward => SetupField::Practice,
                };
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => self.edit(key),
            KeyCode::Backspace
            | KeyCode::Delete
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::Home
            | KeyCode::End => self.edit(key),
            _ => {}
        }
        SetupAction::None
    }

    fn edit(&mut self, key: KeyEvent) {
        let input = match self.focus {
            SetupField::Practice => &mut self.practice,
            SetupField::Reward => &mut self.reward,
        };
        input.handle_event(&Event::Key(key));
        self.error = None;
    }

    /// Parses both inputs as minutes.
    ///
    /// Range checks are left to the session configuration.
    ///
    /// # Errors
    /// - A message naming the field that is not a number
    pub fn minutes(&self) -> Result<(f64, f64), String> {
        let practice = parse_minutes("Practice minutes", self.practice.value())?;
        let reward = parse_minutes("Reward minutes", self.reward.value())?;
        Ok((practice, reward))
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn focus(&self) -> SetupField {
        self.focus
    }

    pub fn practice_text(&self) -> &str {
        self.practice.value()
    }

    pub fn reward_text(&self) -> &str {
        self.reward.value()
    }
}

fn parse_minutes(field: &str, text: &str) -> Result<f64, String> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| format!("{field} must be a number"))
}

/// Renders the setup screen.
pub fn render(frame: &mut Frame, area: Rect, form: &SetupForm) {
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
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new("practube").style(Style::default().fg(FG).add_modifier(Modifier::BOLD)),
        layout[0],
    );
    frame.render_widget(
        Paragraph::new("Practice out loud, then enjoy your reward.")
            .style(Style::default().fg(HELP_FG)),
        layout[1],
    );

    render_input(
        frame,
        layout[2],
        " Practice minutes ",
        &form.practice,
        form.focus == SetupField::Practice,
    );
    render_input(
        frame,
        layout[3],
        " Reward minutes ",
        &form.reward,
        form.focus == SetupField::Reward,
    );

    if let Some(error) = form.error() {
        frame.render_widget(
            Paragraph::new(error).style(Style::default().fg(Color::Red)),
            layout[4],
        );
    }

    frame.render_widget(
        Paragraph::new("Tab switch field, Enter start, q quit")
            .alignment(Alignment::Center)
            .style(Style::default().fg(HELP_FG)),
        layout[6],
    );
}

fn render_input(frame: &mut Frame, area: Rect, title: &str, input: &Input, focused: bool) {
    let border_style = if focused {
        Style::default().fg(HIGHLIGHT_FG)
    } else {
        Style::default().fg(HELP_FG)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    let input_inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(input.value()).style(Style::default().fg(FG)),
        input_inner,
    );

    if focused {
        let cursor_x = input_inner.x + input.visual_cursor() as u16;
        frame.set_cursor_position(Position::new(cursor_x, input_inner.y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(form: &mut SetupForm, code: KeyCode) -> SetupAction {
        form.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn prefilled_with_whole_and_fractional_minutes() {
        let form = SetupForm::new(1.0, 2.5);
        assert_eq!(form.practice_text(), "1");
        assert_eq!(form.reward_text(), "2.5");
        assert_eq!(form.minutes(), Ok((1.0, 2.5)));
    }

    #[test]
    fn typing_edits_the_focused_field() {
        let mut form = SetupForm::new(1.0, 1.0);
        press(&mut form, KeyCode::Backspace);
        press(&mut form, KeyCode::Char('3'));
        press(&mut form, KeyCode::Tab);
        press(&mut form, KeyCode::Char('0'));
        assert_eq!(form.focus(), SetupField::Reward);
        assert_eq!(form.minutes(), Ok((3.0, 10.0)));
    }

    #[test]
    fn letters_are_not_typed() {
        let mut form = SetupForm::new(1.0, 1.0);
        press(&mut form, KeyCode::Char('x'));
        assert_eq!(form.practice_text(), "1");
    }

    #[test]
    fn enter_submits_and_q_quits() {
        let mut form = SetupForm::new(1.0, 1.0);
        assert_eq!(press(&mut form, KeyCode::Enter), SetupAction::Submit);
        assert_eq!(press(&mut form, KeyCode::Char('q')), SetupAction::Quit);
        assert_eq!(press(&mut form, KeyCode::Esc), SetupAction::Quit);
    }

    #[test]
    fn empty_field_is_not_a_number() {
        let mut form = SetupForm::new(1.0, 1.0);
        press(&mut form, KeyCode::Backspace);
        assert_eq!(
            form.minutes(),
            Err("Practice minutes must be a number".to_string())
        );
    }

    #[test]
    fn editing_clears_the_error() {
        let mut form = SetupForm::new(1.0, 1.0);
        form.set_error("bad");
        press(&mut form, KeyCode::Char('5'));
        assert_eq!(form.error(), None);
    }
}
