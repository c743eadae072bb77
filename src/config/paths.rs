//! Path management for splitsheet
//!
//! ## Path Resolution Order
//!
//! 1. `SPLITSHEET_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/splitsheet` or `~/.config/splitsheet`
//! 3. Windows: `%APPDATA%\splitsheet`

use std::path::{Path, PathBuf};

use crate::error::SplitError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "SPLITSHEET_DATA_DIR";

/// Locations of the settings file and the sheet's data files
#[derive(Debug, Clone)]
pub struct SplitsheetPaths {
    base_dir: PathBuf,
}

impl SplitsheetPaths {
    /// Resolve paths from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home/config directory can be determined.
    pub fn new() -> Result<Self, SplitError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Use an explicit base directory (tests)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory holding the JSON data files
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ordered participant registry
    pub fn participants_file(&self) -> PathBuf {
        self.data_dir().join("participants.json")
    }

    /// Submitted transactions
    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.json")
    }

    /// Stored exchange rates for converted previews
    pub fn rates_file(&self) -> PathBuf {
        self.data_dir().join("rates.json")
    }

    /// Create the base and data directories if missing
    pub fn ensure_directories(&self) -> Result<(), SplitError> {
        std::fs::create_dir_all(self.data_dir()).map_err(|e| {
            SplitError::Io(format!(
                "Failed to create data directory {}: {}",
                self.data_dir().display(),
                e
            ))
        })
    }

    /// Check if splitsheet has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, SplitError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME").map_err(|_| {
                SplitError::Config("Could not determine HOME directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("splitsheet"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, SplitError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| SplitError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("splitsheet"))
}
