/// Configuration schema for the shredder
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::security::{DEFAULT_CHUNK_SIZE, DEFAULT_PASSES};

/// Upper bound on passes (the 35-pass Gutmann pattern count).
pub const MAX_PASSES: u32 = 35;
/// Smallest accepted write chunk.
pub const MIN_CHUNK_SIZE: usize = 512;
/// Largest accepted write chunk (16 MiB).
pub const MAX_CHUNK_SIZE: usize = 16 * 1024 * 1024;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Number of overwrite passes per file
    #[serde(default = "default_passes")]
    pub passes: u32,

    /// Bytes of random data generated and written per write call
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Treat a missing path as already shredded
    #[serde(default)]
    pub ignore_missing: bool,

    /// Log level: "trace", "debug", "info", "warn", "error", "off"
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Default pass count, prioritizing the compile-time override
pub fn default_passes() -> u32 {
    // If SHRED_DEFAULT_PASSES was set at build time, use it when it is sane
    option_env!("SHRED_DEFAULT_PASSES")
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|p| (1..=MAX_PASSES).contains(p))
        .unwrap_or(DEFAULT_PASSES)
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            passes: default_passes(),
            chunk_size: default_chunk_size(),
            ignore_missing: false,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.passes == 0 {
            return Err(ConfigError::Invalid("passes must be at least 1".to_string()));
        }

        if self.passes > MAX_PASSES {
            return Err(ConfigError::Invalid(format!(
                "passes must be at most {}, got {}",
                MAX_PASSES, self.passes
            )));
        }

        if !(MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE).contains(&self.chunk_size) {
            return Err(ConfigError::Invalid(format!(
                "chunk_size must be between {} and {} bytes, got {}",
                MIN_CHUNK_SIZE, MAX_CHUNK_SIZE, self.chunk_size
            )));
        }

        let level = self.log_level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "log_level must be one of {}, got {:?}",
                LOG_LEVELS.join(", "),
                self.log_level
            )));
        }

        Ok(())
    }
}
