//! VU meter drawn from the level history.

use ratatui::{buffer::Buffer, layout::Rect, style::Color, style::Style, widgets::Widget};

use crate::session::{display_color, display_height, LevelBand};

const BAR_WIDTH: u16 = 2;
const BAR_GAP: u16 = 1;
const BAR_SYMBOL: &str = "█";

/// Rows a bar occupies in a meter `available` rows tall.
///
/// A fifth of the height is always lit so silent bars stay visible; the
/// rest scales with [`display_height`].
pub fn bar_rows(level: f32, available: u16) -> u16 {
    if available == 0 {
        return 0;
    }
    let base = (available / 5).max(1);
    let scale = available - base;
    base + (display_height(level) * scale as f32).round() as u16
}

pub fn band_color(band: LevelBand) -> Color {
    match band {
        LevelBand::Low => Color::Blue,
        LevelBand::Mid => Color::Yellow,
        LevelBand::High => Color::Red,
    }
}

/// One bar per level, oldest on the left, bottom-aligned and centered.
pub struct VuMeter<'a> {
    levels: &'a [f32],
}

impl<'a> VuMeter<'a> {
    pub fn new(levels: &'a [f32]) -> Self {
        Self { levels }
    }
}

impl Widget for VuMeter<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() || self.levels.is_empty() {
            return;
        }

        let total_width =
            (self.levels.len() as u16 * (BAR_WIDTH + BAR_GAP)).saturating_sub(BAR_GAP);
        let left = area.x + area.width.saturating_sub(total_width) / 2;

        for (i, &level) in self.levels.iter().enumerate() {
            let x = left + i as u16 * (BAR_WIDTH + BAR_GAP);
            if x + BAR_WIDTH > area.right() {
                break;
            }
            let style = Style::default().fg(band_color(display_color(level)));
            for row in 0..bar_rows(level, area.height) {
                let y = area.bottom() - 1 - row;
                for dx in 0..BAR_WIDTH {
                    if let Some(cell) = buf.cell_mut((x + dx, y)) {
                        cell.set_symbol(BAR_SYMBOL).set_style(style);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_bar_keeps_base_height() {
        assert_eq!(bar_rows(0.0, 10), 2);
        assert_eq!(bar_rows(0.0, 3), 1);
    }

    #[test]
    fn full_bar_fills_the_meter() {
        assert_eq!(bar_rows(1.0, 10), 10);
    }

    #[test]
    fn quarter_level_reaches_halfway_up_the_scale() {
        // sqrt(0.25) = 0.5 of the 8 scaled rows on top of the 2 base rows
        assert_eq!(bar_rows(0.25, 10), 6);
    }

    #[test]
    fn renders_colored_bars_from_the_bottom() {
        let area = Rect::new(0, 0, 6, 5);
        let mut buf = Buffer::empty(area);
        VuMeter::new(&[0.0, 1.0]).render(area, &mut buf);

        // two bars of width 2 with a gap, centered in 6 columns: x = 0..2 and 3..5
        assert_eq!(buf[(0u16, 4u16)].symbol(), BAR_SYMBOL);
        assert_eq!(buf[(0u16, 3u16)].symbol(), " ");
        assert_eq!(buf[(0u16, 4u16)].fg, Color::Blue);
        assert_eq!(buf[(3u16, 0u16)].symbol(), BAR_SYMBOL);
        assert_eq!(buf[(3u16, 0u16)].fg, Color::Red);
        assert_eq!(buf[(2u16, 4u16)].symbol(), " ");
    }
}
