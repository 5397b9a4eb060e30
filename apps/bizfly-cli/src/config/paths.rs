//! Config file location

use crate::error::{CliError, CliResult};
use std::path::PathBuf;

/// File name used under the home directory when no path is given
pub const DEFAULT_CONFIG_FILE_NAME: &str = ".bizfly.yaml";

/// Configuration paths for the bizfly CLI
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Path to the YAML settings file
    pub config_file: PathBuf,
}

impl ConfigPaths {
    /// Resolve the config file path
    ///
    /// An explicit path wins; otherwise `~/.bizfly.yaml`.
    pub fn resolve(explicit: Option<PathBuf>) -> CliResult<Self> {
        if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
            return Ok(Self { config_file: path });
        }

        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("failed to get home dir".to_string()))?;

        Ok(Self {
            config_file: home.join(DEFAULT_CONFIG_FILE_NAME),
        })
    }
}
