//! Internationalization for Skyfare
//!
//! This crate provides the calendar localization table (month and weekday
//! names per language), loading it from the bundled resource, and label
//! resolution with fallback to default formatting.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod labels;
pub mod language;

pub use labels::{CalendarLabels, LanguageSelection};
pub use language::{DayNames, I18nError, LanguageData, LanguageTable, MonthNames};
