//! practube: practice out loud, then watch your reward.
//!
//! The library target holds everything; `main.rs` only starts the runtime.

pub mod app;
pub mod commands;
pub mod config;
pub mod logging;
pub mod recording;
pub mod reward;
pub mod scheduler;
pub mod session;
pub mod ui;
