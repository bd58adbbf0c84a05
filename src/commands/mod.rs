//! Application command handlers for practube.
//!
//! # Commands
//! - `practice`: setup, practice and reward screens (default)
//! - `list_devices`: List available audio input devices
//! - `logs`: Display recent log entries
//! - `config`: Open configuration file in user's preferred editor

pub mod config;
pub mod list_devices;
pub mod logs;
pub mod practice;

pub use config::handle_config;
pub use list_devices::handle_list_devices;
pub use logs::handle_logs;
pub use practice::handle_practice;
