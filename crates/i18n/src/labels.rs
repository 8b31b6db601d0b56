//! Calendar label resolution
//!
//! Labels are looked up by numeric index in the selected language. Anything
//! that cannot be resolved (no table, unknown language, short arrays) falls
//! back to default formatting one entry at a time, so malformed localization
//! data never fails a lookup.

use crate::language::{LanguageData, LanguageTable};

/// Month names used when a language cannot supply one
pub const DEFAULT_MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Weekday header used when a language cannot supply one (Monday first)
pub const DEFAULT_WEEKDAY_SHORT: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

/// Minimal weekday header used when a language cannot supply one (Monday first)
pub const DEFAULT_WEEKDAY_MIN: [&str; 7] = ["M", "T", "W", "T", "F", "S", "S"];

/// The language currently chosen in the picker
///
/// Selecting a language only changes which table entry is read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LanguageSelection {
    selected: Option<String>,
}

impl LanguageSelection {
    /// Select the table's default language, if it has any
    pub fn for_table(table: &LanguageTable) -> Self {
        Self {
            selected: table.default_language().map(str::to_string),
        }
    }

    /// Selection that matches nothing (default formatting)
    pub fn none() -> Self {
        Self::default()
    }

    /// Name of the selected language
    pub fn name(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Switch to another language
    ///
    /// Returns false and keeps the current selection when `name` is not in
    /// the table.
    pub fn select(&mut self, table: &LanguageTable, name: &str) -> bool {
        if !table.contains(name) {
            tracing::debug!("Ignoring unknown calendar language {}", name);
            return false;
        }
        self.selected = Some(name.to_string());
        true
    }
}

/// Label resolver for one language
#[derive(Debug, Clone, Copy)]
pub struct CalendarLabels<'a> {
    data: Option<&'a LanguageData>,
}

impl<'a> CalendarLabels<'a> {
    /// Resolve labels for the selected language in `table`
    pub fn new(table: &'a LanguageTable, selection: &LanguageSelection) -> Self {
        Self {
            data: selection.name().and_then(|name| table.get(name)),
        }
    }

    /// Resolve labels from language data directly
    pub fn from_data(data: Option<&'a LanguageData>) -> Self {
        Self { data }
    }

    /// Labels that always use default formatting
    pub fn fallback() -> Self {
        Self { data: None }
    }

    /// Check whether a language is backing these labels
    pub fn is_localized(&self) -> bool {
        self.data.is_some()
    }

    /// Abbreviated month name for `month` (1-12)
    pub fn month_short(&self, month: u32) -> String {
        self.month_from(month, |data| &data.months.short)
    }

    /// Full month name for `month` (1-12)
    pub fn month_full(&self, month: u32) -> String {
        self.month_from(month, |data| &data.months.full)
    }

    /// Abbreviated weekday header, Monday first
    pub fn weekday_short_headers(&self) -> [String; 7] {
        match self.data {
            Some(data) => monday_first(&data.days.short, &DEFAULT_WEEKDAY_SHORT),
            None => DEFAULT_WEEKDAY_SHORT.map(str::to_string),
        }
    }

    /// Minimal weekday header, Monday first
    pub fn weekday_min_headers(&self) -> [String; 7] {
        match self.data {
            Some(data) => monday_first(&data.days.min, &DEFAULT_WEEKDAY_MIN),
            None => DEFAULT_WEEKDAY_MIN.map(str::to_string),
        }
    }

    fn month_from(&self, month: u32, names: impl Fn(&LanguageData) -> &Vec<String>) -> String {
        let index = month.checked_sub(1).map(|i| i as usize);
        self.data
            .zip(index)
            .and_then(|(data, i)| names(data).get(i))
            .cloned()
            .unwrap_or_else(|| default_month_name(month))
    }
}

fn default_month_name(month: u32) -> String {
    month
        .checked_sub(1)
        .and_then(|i| DEFAULT_MONTH_NAMES.get(i as usize))
        .map(|name| name.to_string())
        .unwrap_or_default()
}

/// Reorder a Sunday-first weekday list so it starts on Monday
///
/// A complete list is rotated left once. A list of any other length is
/// resolved slot by slot, using `defaults` for entries it cannot supply.
pub fn monday_first(source: &[String], defaults: &[&str; 7]) -> [String; 7] {
    if source.len() == 7 {
        let mut days = source.to_vec();
        days.rotate_left(1);
        return std::array::from_fn(|i| std::mem::take(&mut days[i]));
    }

    std::array::from_fn(|i| {
        source
            .get((i + 1) % 7)
            .cloned()
            .unwrap_or_else(|| defaults[i].to_string())
    })
}
