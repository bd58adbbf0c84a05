//! Terminal screens for practube.
//!
//! Each screen is a pure render function of controller state; `PractubeTui`
//! owns the terminal and routes a frame to the right one.

use ratatui::style::Color;

pub mod error;
pub mod meter;
pub mod practice;
pub mod reward;
pub mod setup;
pub mod tui;

pub use meter::VuMeter;
pub use practice::PracticeCommand;
pub use reward::{RewardCommand, RewardView};
pub use setup::{SetupAction, SetupForm};
pub use tui::PractubeTui;

/// Common colors/styles.
const BG: Color = Color::Rgb(0, 0, 0);
const FG: Color = Color::Rgb(255, 255, 255);
const HELP_FG: Color = Color::Rgb(100, 100, 100);
const HIGHLIGHT_FG: Color = Color::Rgb(206, 224, 220);
