//! Core application logic for Skyfare
//!
//! This crate contains the view-models behind the flight search screens: the
//! date range picker and its calendar grid, the search form, and location
//! autocomplete.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod autocomplete;
pub mod calendar_grid;
pub mod config;
pub mod date_picker;
pub mod date_selection;
pub mod formatting;
pub mod search;
