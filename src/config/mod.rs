//! Configuration management for practube.
//!
//! Settings live in a single TOML file in the user's config directory. Every
//! field has a default, so a partial or missing file still yields a usable
//! configuration.

pub mod file;

pub use file::{get_config_path, AudioConfig, PractubeConfig, RewardConfig, SessionDefaults};
