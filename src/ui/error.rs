//! Full-screen error message.

use ratatui::{prelude::*, widgets::Paragraph};

const ERROR_BG: Color = Color::Rgb(255, 0, 0);
const ERROR_FG: Color = Color::Rgb(255, 255, 255);

/// Draws `message` centered on a red screen.
///
/// Text wraps to 80% of the screen width.
pub fn render_error(frame: &mut Frame, area: Rect, message: &str) {
    frame.buffer_mut().set_style(area, Style::default().bg(ERROR_BG));

    let padding_x = area.width / 10;
    let text_width = (area.width * 80) / 100;
    let text_height = message.lines().count() as u16;

    let paragraph = Paragraph::new(message)
        .style(Style::default().fg(ERROR_FG).bg(ERROR_BG))
        .alignment(Alignment::Center)
        .wrap(ratatui::widgets::Wrap { trim: true });

    let centered_area = Rect {
        x: area.x + padding_x,
        y: area.y + area.height.saturating_sub(text_height) / 2,
        width: text_width,
        height: area.height - area.height.saturating_sub(text_height) / 2,
    };

    frame.render_widget(paragraph, centered_area);
}
