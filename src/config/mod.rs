//! Configuration management for tether.
//!
//! This module handles loading and saving configuration from `~/.tether/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{ApiConfig, Config, GeneralConfig, SyncConfig};
