/// Configuration loader
use super::schema::{Config, ConfigError};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Path of the config file next to the executable: `<executable>.config`
pub fn adjacent_config_path() -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    Some(PathBuf::from(format!("{}.config", exe_path.display())))
}

/// Load and validate a JSON configuration file
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config_content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config: Config = serde_json::from_str(&config_content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    config.validate()?;
    debug!(path = %path.display(), passes = config.passes, "loaded config");

    Ok(config)
}

/// Load `<executable>.config` if it exists.
///
/// A missing file is not an error; a present but broken one is.
pub fn load_adjacent_config() -> Result<Option<Config>, ConfigError> {
    match adjacent_config_path() {
        Some(path) if path.is_file() => load_config(&path).map(Some),
        _ => Ok(None),
    }
}
