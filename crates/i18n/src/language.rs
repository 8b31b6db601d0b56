//! Calendar localization table
//!
//! The table maps a language name (as shown in the language picker, e.g.
//! `"English"`) to its month and weekday names. It is loaded once when the
//! date picker opens and is read-only afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Language picked when the table contains it
pub const PREFERRED_LANGUAGE: &str = "English";

/// Localization table shipped with the crate
const BUNDLED_TABLE: &str = include_str!("../resources/calendar_localizations.json");

/// Errors that can occur while loading the localization table
#[derive(Debug, Error)]
pub enum I18nError {
    /// Resource could not be read
    #[error("Failed to read localization resource: {0}")]
    Io(#[from] std::io::Error),

    /// Resource is not a valid table
    #[error("Failed to decode localization resource: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type for i18n operations
pub type Result<T> = std::result::Result<T, I18nError>;

/// Month names for one language
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MonthNames {
    /// Full names, January first
    #[serde(default)]
    pub full: Vec<String>,
    /// Abbreviated names, January first
    #[serde(default)]
    pub short: Vec<String>,
}

/// Weekday names for one language
///
/// Lists are expected to start at Sunday.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DayNames {
    /// Full names
    #[serde(default)]
    pub full: Vec<String>,
    /// Abbreviated names
    #[serde(default)]
    pub short: Vec<String>,
    /// Minimal names (one or two letters)
    #[serde(default)]
    pub min: Vec<String>,
}

/// Month and weekday names for one language
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LanguageData {
    /// Month names
    pub months: MonthNames,
    /// Weekday names
    pub days: DayNames,
}

/// Language name to localized calendar names
///
/// # Example
///
/// ```
/// use i18n::LanguageTable;
///
/// let table = LanguageTable::bundled().unwrap();
/// assert_eq!(table.default_language(), Some("English"));
/// assert_eq!(table.get("English").unwrap().months.short[0], "Jan");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageTable {
    languages: BTreeMap<String, LanguageData>,
}

impl LanguageTable {
    /// Create an empty table
    ///
    /// Every lookup against an empty table falls back to default formatting.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Decode a table from its JSON representation
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The table bundled with the application
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_TABLE)
    }

    /// The bundled table, or an empty table if it cannot be decoded
    pub fn bundled_or_empty() -> Self {
        Self::bundled().unwrap_or_else(|e| {
            tracing::warn!("Failed to decode bundled language data: {}", e);
            Self::empty()
        })
    }

    /// Load a table from a resource file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_json(&contents)
    }

    /// Load a table, degrading to an empty table on failure
    ///
    /// There is no retry: a failed load leaves every language on default
    /// formatting for the lifetime of the picker.
    pub async fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path).await {
            Ok(table) => {
                tracing::debug!(
                    "Loaded {} calendar languages from {}",
                    table.len(),
                    path.display()
                );
                table
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to load language data from {}: {}",
                    path.display(),
                    e
                );
                Self::empty()
            }
        }
    }

    /// Insert or replace a language
    pub fn insert(&mut self, name: impl Into<String>, data: LanguageData) {
        self.languages.insert(name.into(), data);
    }

    /// Look up a language by name
    pub fn get(&self, name: &str) -> Option<&LanguageData> {
        self.languages.get(name)
    }

    /// Check whether a language is present
    pub fn contains(&self, name: &str) -> bool {
        self.languages.contains_key(name)
    }

    /// Language names in ascending order
    pub fn available_languages(&self) -> Vec<String> {
        self.languages.keys().cloned().collect()
    }

    /// Language to select when the picker opens
    ///
    /// English when present, otherwise the first name in sorted order.
    pub fn default_language(&self) -> Option<&str> {
        if let Some((name, _)) = self.languages.get_key_value(PREFERRED_LANGUAGE) {
            return Some(name.as_str());
        }
        self.languages.keys().next().map(String::as_str)
    }

    /// Number of languages
    pub fn len(&self) -> usize {
        self.languages.len()
    }

    /// Check if the table has no languages
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}
