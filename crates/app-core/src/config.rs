//! Application configuration
//!
//! Settings for the date picker and location autocomplete. Every field has a
//! default so a partial (or empty) JSON document is a valid configuration.

use crate::calendar_grid::DEFAULT_MONTHS_SHOWN;
use crate::date_selection::SelectionMode;
use crate::formatting::DEFAULT_CACHE_CAPACITY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for [`AppConfig`]
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Date picker settings
    #[serde(default)]
    pub picker: PickerConfig,

    /// Location autocomplete settings
    #[serde(default)]
    pub autocomplete: AutocompleteConfig,
}

impl AppConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path).await?;
        Self::from_json(&contents)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.picker.months_shown == 0 {
            return Err(ConfigError::Invalid(
                "picker.monthsShown must be at least 1".to_string(),
            ));
        }
        if self.autocomplete.country.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "autocomplete.country must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Date picker settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickerConfig {
    /// Months rendered from the current month onwards
    #[serde(default = "default_months_shown")]
    pub months_shown: usize,

    /// Language selected when the picker opens, if the table has it
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Localization table on disk; the bundled table is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localizations_path: Option<PathBuf>,

    /// Single day or range selection
    #[serde(default)]
    pub selection_mode: SelectionMode,

    /// Show departure and return times in the footer
    #[serde(default = "default_true")]
    pub time_selection: bool,

    /// Memoized strings per formatting cache
    #[serde(default = "default_cache_capacity")]
    pub format_cache_capacity: usize,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            months_shown: default_months_shown(),
            default_language: default_language(),
            localizations_path: None,
            selection_mode: SelectionMode::default(),
            time_selection: true,
            format_cache_capacity: default_cache_capacity(),
        }
    }
}

/// Location autocomplete settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteConfig {
    /// Market the suggestions are ranked for
    #[serde(default = "default_country")]
    pub country: String,

    /// Language of the suggestion names
    #[serde(default = "default_locale")]
    pub language: String,

    /// Quiet period before a query is sent
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl AutocompleteConfig {
    /// Debounce period as a duration
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            country: default_country(),
            language: default_locale(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_months_shown() -> usize {
    DEFAULT_MONTHS_SHOWN
}

fn default_language() -> String {
    i18n::language::PREFERRED_LANGUAGE.to_string()
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

fn default_country() -> String {
    "IN".to_string()
}

fn default_locale() -> String {
    "en-GB".to_string()
}

fn default_debounce_ms() -> u64 {
    300
}
