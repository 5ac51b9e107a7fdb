/// Command-line interface for the `shred` binary
use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, ConfigError, load_adjacent_config, load_config};

#[derive(Debug, Parser)]
#[command(name = "shred")]
#[command(about = "Overwrite files with random data, sync, then delete them", long_about = None)]
pub struct Cli {
    /// Files to shred
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Number of overwrite passes
    #[arg(short = 'n', long)]
    pub passes: Option<u32>,

    /// Bytes written per write call
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// JSON config file (defaults to <executable>.config if present)
    #[arg(short, long, env = "SHRED_CONFIG")]
    pub config: Option<PathBuf>,

    /// Do not fail on paths that do not exist
    #[arg(short = 'f', long)]
    pub ignore_missing: bool,

    /// Log level (overridden by RUST_LOG)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Merge built-in defaults, the config file and command-line flags,
    /// in increasing order of precedence, then validate.
    pub fn resolve_config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => load_adjacent_config()?.unwrap_or_default(),
        };

        if let Some(passes) = self.passes {
            config.passes = passes;
        }
        if let Some(chunk_size) = self.chunk_size {
            config.chunk_size = chunk_size;
        }
        if self.ignore_missing {
            config.ignore_missing = true;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }

        config.validate()?;
        Ok(config)
    }
}
