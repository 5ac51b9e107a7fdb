/// Configuration module - Load and validate shredder configuration
pub mod loader;
pub mod schema;

pub use loader::{adjacent_config_path, load_adjacent_config, load_config};
pub use schema::{Config, ConfigError};
