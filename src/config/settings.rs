//! User settings for splitsheet
//!
//! The sheet's native currency, the split mode new transactions open with,
//! display preferences and the default log filter.

use serde::{Deserialize, Serialize};

use super::paths::SplitsheetPaths;
use crate::error::SplitError;
use crate::models::money::MAX_SCALE;
use crate::models::{Money, MoneyParseError, SplitMode};

/// User settings for splitsheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// The sheet's native currency; all allocation runs in it
    #[serde(default = "default_currency_code")]
    pub currency_code: String,

    /// Decimal places of the currency's minor unit
    #[serde(default = "default_currency_scale")]
    pub currency_scale: u32,

    /// Symbol used in tables
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Split mode a new transaction opens with
    #[serde(default)]
    pub default_mode: SplitMode,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// `tracing` filter used when `SPLITSHEET_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency_code() -> String {
    "USD".to_string()
}

fn default_currency_scale() -> u32 {
    2
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_code: default_currency_code(),
            currency_scale: default_currency_scale(),
            currency_symbol: default_currency_symbol(),
            default_mode: SplitMode::default(),
            date_format: default_date_format(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &SplitsheetPaths) -> Result<Self, SplitError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Not persisted until `init` or an explicit save
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| SplitError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| SplitError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &SplitsheetPaths) -> Result<(), SplitError> {
        self.validate()?;
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| SplitError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| SplitError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Reject settings the money model cannot represent
    pub fn validate(&self) -> Result<(), SplitError> {
        if self.currency_scale > MAX_SCALE {
            return Err(SplitError::Config(format!(
                "currency_scale {} exceeds the maximum of {}",
                self.currency_scale, MAX_SCALE
            )));
        }
        if self.currency_code.trim().is_empty() {
            return Err(SplitError::Config("currency_code cannot be empty".into()));
        }
        Ok(())
    }

    /// Parse an amount typed by the user in the sheet currency
    pub fn parse_money(&self, input: &str) -> Result<Money, MoneyParseError> {
        Money::parse(input, self.currency_scale, self.currency_code.clone())
    }

    /// Zero in the sheet currency
    pub fn zero(&self) -> Money {
        Money::zero(self.currency_scale, self.currency_code.clone())
    }
}
