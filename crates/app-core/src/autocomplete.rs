//! Location autocomplete for the origin/destination sheet
//!
//! Suggestions come from a [`LocationProvider`], which stands in for the
//! remote autocomplete endpoint. [`LocationSearch`] sits between the text
//! field and the provider: it skips empty and repeated queries, debounces
//! typing, and publishes the latest results.

use crate::config::AutocompleteConfig;
use crate::search::Place;
use app_state::Observable;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::watch;

/// Errors that can occur during autocomplete operations
#[derive(Debug, Error)]
pub enum AutocompleteError {
    /// Provider failed to answer
    #[error("Provider error: {0}")]
    Provider(String),

    /// Response could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type for autocomplete operations
pub type Result<T> = std::result::Result<T, AutocompleteError>;

/// An airport or city suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutocompleteItem {
    /// Provider identifier
    pub id: String,
    /// Airport or city name
    pub name: String,
    /// IATA code
    pub code: String,
    /// City name
    pub city: String,
    /// Country name
    pub country: String,
    /// `airport` or `city`
    #[serde(rename = "type")]
    pub kind: String,
}

impl AutocompleteItem {
    /// `City, Country`
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }

    /// Code and city as shown in the search form
    pub fn place(&self) -> Place {
        Place::new(&self.code, &self.city)
    }

    fn matches(&self, needle: &str) -> bool {
        [&self.name, &self.code, &self.city, &self.country]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Autocomplete endpoint response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutocompleteResponse {
    /// Suggestions in ranking order
    pub data: Vec<AutocompleteItem>,
}

impl AutocompleteResponse {
    /// Decode a response body
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Parameters sent with every suggestion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery {
    /// Text typed so far
    pub search: String,
    /// Market country code
    pub country: String,
    /// Locale of the returned names
    pub language: String,
}

/// Source of location suggestions
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Suggestions for a query
    async fn suggest(&self, query: &LocationQuery) -> Result<Vec<AutocompleteItem>>;
}

/// Provider answering from a fixed list
///
/// Matches the query case-insensitively against name, code, city and country.
#[derive(Debug, Clone, Default)]
pub struct StaticLocationProvider {
    items: Vec<AutocompleteItem>,
}

impl StaticLocationProvider {
    /// Provider over `items`
    pub fn new(items: Vec<AutocompleteItem>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl LocationProvider for StaticLocationProvider {
    async fn suggest(&self, query: &LocationQuery) -> Result<Vec<AutocompleteItem>> {
        let needle = query.search.to_lowercase();
        Ok(self
            .items
            .iter()
            .filter(|item| item.matches(&needle))
            .cloned()
            .collect())
    }
}

/// Search state behind the location sheet
pub struct LocationSearch<P> {
    provider: P,
    config: AutocompleteConfig,
    results: Observable<Vec<AutocompleteItem>>,
    last_query: Mutex<Option<String>>,
    generation: AtomicU64,
}

impl<P: LocationProvider> LocationSearch<P> {
    /// Create a search over `provider`
    pub fn new(provider: P, config: AutocompleteConfig) -> Self {
        Self {
            provider,
            config,
            results: Observable::new(Vec::new()),
            last_query: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Latest results
    pub fn results(&self) -> Vec<AutocompleteItem> {
        self.results.get()
    }

    /// Subscribe to result changes
    pub fn subscribe(&self) -> watch::Receiver<Vec<AutocompleteItem>> {
        self.results.subscribe()
    }

    /// Run a query immediately
    ///
    /// An empty query clears the results without asking the provider. The
    /// same query twice in a row is answered from the current results. If the
    /// provider fails, the error is logged and the previous results stay.
    pub async fn search(&self, text: &str) -> Vec<AutocompleteItem> {
        let query = text.trim();

        {
            let mut last = self.last_query.lock();
            if last.as_deref() == Some(query) {
                return self.results.get();
            }
            *last = Some(query.to_string());
        }

        if query.is_empty() {
            self.results.set(Vec::new());
            return Vec::new();
        }

        let request = LocationQuery {
            search: query.to_string(),
            country: self.config.country.clone(),
            language: self.config.language.clone(),
        };

        match self.provider.suggest(&request).await {
            Ok(items) => {
                tracing::debug!("{} suggestions for {:?}", items.len(), query);
                self.results.set(items.clone());
                items
            }
            Err(e) => {
                tracing::warn!("Failed to fetch suggestions for {:?}: {}", query, e);
                // Let the same text be retried
                *self.last_query.lock() = None;
                self.results.get()
            }
        }
    }

    /// Run a query after the debounce period
    ///
    /// Returns `None` when newer input arrived during the wait.
    pub async fn search_debounced(&self, text: &str) -> Option<Vec<AutocompleteItem>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.config.debounce()).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            return None;
        }
        Some(self.search(text).await)
    }

    /// Forget the last query and results, e.g. when the sheet closes
    pub fn reset(&self) {
        *self.last_query.lock() = None;
        self.results.set(Vec::new());
    }
}

impl<P> std::fmt::Debug for LocationSearch<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationSearch")
            .field("config", &self.config)
            .field("last_query", &*self.last_query.lock())
            .finish_non_exhaustive()
    }
}
