// src/core/settings.rs

//! # Settings
//!
//! User settings read from `<config_dir>/config.toml`. Every field is optional;
//! a missing file yields the defaults. `FLOWCODER_COMMANDS_DIR` overrides the
//! command store location from the file.

use crate::constants::{COMMANDS_DIR_ENV, DEFAULT_MAX_RECURSION_DEPTH};
use crate::core::paths::{self, PathError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reading or writing `config.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A filesystem I/O error occurred.
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    /// The config directory could not be resolved.
    #[error("Path error: {0}")]
    Path(#[from] PathError),
    /// `config.toml` is not valid TOML for these settings.
    #[error("Failed to parse settings file '{path}': {source}")]
    Parse {
        /// Settings file that failed to parse.
        path: String,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
    /// Settings could not be written as TOML.
    #[error("Failed to serialize settings to TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// User settings from `config.toml`. Missing fields take their defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Where command files live. `~` and `$VAR` are expanded.
    pub commands_dir: Option<String>,
    /// Nesting limit handed to execution contexts.
    pub max_recursion_depth: usize,
    /// Promote dangerous Bash findings to errors during `check`.
    pub strict_bash_security: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            commands_dir: None,
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
            strict_bash_security: false,
        }
    }
}

impl Settings {
    /// Loads the settings from the standard location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&paths::get_settings_path()?)
    }

    /// Loads settings from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No settings file at {}, using defaults.", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Writes the settings as TOML to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Resolves the command store directory: env override, then file value, then default.
    pub fn commands_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Ok(dir) = std::env::var(COMMANDS_DIR_ENV)
            && !dir.trim().is_empty()
        {
            return Ok(paths::expand_path(&dir)?);
        }
        match &self.commands_dir {
            Some(dir) => Ok(paths::expand_path(dir)?),
            None => Ok(paths::get_default_commands_dir()?),
        }
    }
}
