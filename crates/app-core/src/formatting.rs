//! Date and time labels for the picker footer and month headers
//!
//! Formatted strings are memoized in small LRU caches keyed by the day or
//! time value, since the same few dates are redrawn on every tap.

use chrono::{Datelike, NaiveDate, NaiveTime};
use i18n::CalendarLabels;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;

/// Shown in place of a date that has not been picked yet
pub const DATE_PLACEHOLDER: &str = "MMM DD, YYYY";

/// Default number of memoized strings per cache
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// `MMM d, yyyy`
const DATE_FORMAT: &str = "%b %-d, %Y";

/// `h:mm a`
const TIME_FORMAT: &str = "%-I:%M %p";

/// Memoizing formatter for calendar labels
pub struct CalendarFormatter {
    dates: Mutex<LruCache<NaiveDate, String>>,
    times: Mutex<LruCache<NaiveTime, String>>,
}

impl CalendarFormatter {
    /// Create a formatter keeping up to `capacity` strings per cache
    ///
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            dates: Mutex::new(LruCache::new(capacity)),
            times: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Date as `Mar 5, 2024`, or the placeholder when there is none
    pub fn formatted_date(&self, date: Option<NaiveDate>) -> String {
        let Some(date) = date else {
            return DATE_PLACEHOLDER.to_string();
        };

        let mut cache = self.dates.lock();
        cache
            .get_or_insert(date, || date.format(DATE_FORMAT).to_string())
            .clone()
    }

    /// Time as `9:05 AM`
    pub fn formatted_time(&self, time: NaiveTime) -> String {
        let mut cache = self.times.lock();
        cache
            .get_or_insert(time, || time.format(TIME_FORMAT).to_string())
            .clone()
    }

    /// Number of memoized date strings
    pub fn cached_dates(&self) -> usize {
        self.dates.lock().len()
    }

    /// Number of memoized time strings
    pub fn cached_times(&self) -> usize {
        self.times.lock().len()
    }
}

impl Default for CalendarFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl std::fmt::Debug for CalendarFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarFormatter")
            .field("cached_dates", &self.cached_dates())
            .field("cached_times", &self.cached_times())
            .finish()
    }
}

/// Month header label in the selected language
pub fn month_label(month: NaiveDate, labels: &CalendarLabels<'_>) -> String {
    labels.month_short(month.month())
}

/// Year shown next to the month header
pub fn year_label(month: NaiveDate) -> String {
    month.format("%Y").to_string()
}
