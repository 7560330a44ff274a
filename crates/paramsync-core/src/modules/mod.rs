//! Process-level support modules.

pub mod config;

pub use config::{default_config_path, load_config, save_config, CONFIG_FILE};
