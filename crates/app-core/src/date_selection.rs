//! Date range selection
//!
//! The selector tracks a rolling two-step selection: the first tap picks a
//! single day, the second tap turns it into the inclusive range between the
//! two days, and a further tap starts over. Days before "today" can never be
//! tapped and are dropped when a range is materialized.
//!
//! All values are calendar days ([`NaiveDate`]), never timestamps.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Progress of the current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionState {
    /// Nothing selected
    #[default]
    None,
    /// One day selected
    FirstDateSelected,
    /// A range of days selected
    RangeSelected,
}

impl SelectionState {
    /// State implied by the number of selected days
    pub fn for_count(count: usize) -> Self {
        match count {
            0 => SelectionState::None,
            1 => SelectionState::FirstDateSelected,
            _ => SelectionState::RangeSelected,
        }
    }
}

/// Whether taps pick one day or a range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionMode {
    /// Every tap replaces the selection with one day
    Single,
    /// Taps alternate between a first day and a range
    #[default]
    Range,
}

/// Selected days and the state they imply
///
/// The state always matches the number of days: none for zero, first-date for
/// one, range for two or more.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateSelection {
    selected_dates: Vec<NaiveDate>,
    selection_state: SelectionState,
}

impl DateSelection {
    /// Empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection holding `dates` verbatim, with the state derived from its length
    pub fn from_dates(dates: Vec<NaiveDate>) -> Self {
        let selection_state = SelectionState::for_count(dates.len());
        Self {
            selected_dates: dates,
            selection_state,
        }
    }

    /// Single-day selection
    pub fn single(day: NaiveDate) -> Self {
        Self::from_dates(vec![day])
    }

    /// Selected days in order
    pub fn dates(&self) -> &[NaiveDate] {
        &self.selected_dates
    }

    /// Current state
    pub fn state(&self) -> SelectionState {
        self.selection_state
    }

    /// Number of selected days
    pub fn len(&self) -> usize {
        self.selected_dates.len()
    }

    /// Check if nothing is selected
    pub fn is_empty(&self) -> bool {
        self.selected_dates.is_empty()
    }

    /// First selected day
    pub fn first(&self) -> Option<NaiveDate> {
        self.selected_dates.first().copied()
    }

    /// Last selected day
    pub fn last(&self) -> Option<NaiveDate> {
        self.selected_dates.last().copied()
    }

    /// Departure day: the first selected day
    pub fn departure(&self) -> Option<NaiveDate> {
        self.first()
    }

    /// Return day: the last selected day once two or more days are selected
    pub fn return_date(&self) -> Option<NaiveDate> {
        if self.selected_dates.len() < 2 {
            return None;
        }
        self.last()
    }

    /// Consume the selection and return its days
    pub fn into_dates(self) -> Vec<NaiveDate> {
        self.selected_dates
    }
}

/// Result of a tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Day is before today and was rejected
    IgnoredPast,
    /// Tap was accepted but left the selection as it was
    Unchanged,
    /// Selection changed
    Changed,
}

impl SelectOutcome {
    /// Check if the selection changed
    pub fn is_changed(&self) -> bool {
        matches!(self, SelectOutcome::Changed)
    }
}

/// How a day cell should be drawn
///
/// Variants are listed in precedence order: a day that is both an endpoint
/// and in the past is drawn as an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DayAppearance {
    /// First or last selected day
    Endpoint,
    /// Strictly between the endpoints of a range
    InRange,
    /// Before today
    Past,
    /// Anything else
    Normal,
}

/// Selection state machine for the calendar picker
///
/// # Example
///
/// ```
/// use app_core::date_selection::{DateRangeSelector, SelectionMode, SelectionState};
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
/// let mut selector = DateRangeSelector::with_today(SelectionMode::Range, today);
///
/// selector.select(NaiveDate::from_ymd_opt(2024, 3, 18).unwrap());
/// selector.select(NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
///
/// assert_eq!(selector.selection().state(), SelectionState::RangeSelected);
/// assert_eq!(selector.selection().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct DateRangeSelector {
    selection: DateSelection,
    mode: SelectionMode,
    today: NaiveDate,
}

impl DateRangeSelector {
    /// Create a selector using the device's current day as today
    pub fn new(mode: SelectionMode) -> Self {
        Self::with_today(mode, Local::now().date_naive())
    }

    /// Create a selector with an explicit today
    pub fn with_today(mode: SelectionMode, today: NaiveDate) -> Self {
        Self {
            selection: DateSelection::new(),
            mode,
            today,
        }
    }

    /// Replace the selection with a caller-supplied one
    ///
    /// Used when the picker is reopened with an earlier result. The days are
    /// taken as given; only the state is derived.
    pub fn seed(&mut self, dates: Vec<NaiveDate>) {
        self.selection = DateSelection::from_dates(dates);
    }

    /// Current selection
    pub fn selection(&self) -> &DateSelection {
        &self.selection
    }

    /// Departure day of the current selection
    pub fn departure(&self) -> Option<NaiveDate> {
        self.selection.departure()
    }

    /// Return day of the current selection, if it spans two or more days
    pub fn return_date(&self) -> Option<NaiveDate> {
        self.selection.return_date()
    }

    /// Consume the selector and return its selection
    pub fn into_selection(self) -> DateSelection {
        self.selection
    }

    /// Current mode
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Switch between single and range mode
    ///
    /// The existing selection is kept; the next tap follows the new mode.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
    }

    /// The reference day for past-date checks
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Move the reference day, e.g. after midnight
    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    /// Drop the selection
    pub fn clear(&mut self) {
        self.selection = DateSelection::new();
    }

    /// Handle a tap on `day`
    ///
    /// Days before today are rejected without touching the selection.
    pub fn select(&mut self, day: NaiveDate) -> SelectOutcome {
        if self.is_past(day) {
            tracing::debug!("Ignoring tap on past day {}", day);
            return SelectOutcome::IgnoredPast;
        }
        self.transition(day)
    }

    /// Apply the selection transition for `day` without the past-day guard
    pub fn transition(&mut self, day: NaiveDate) -> SelectOutcome {
        let next = match (self.mode, self.selection.state()) {
            (SelectionMode::Single, _) => DateSelection::single(day),
            (SelectionMode::Range, SelectionState::None) => DateSelection::single(day),
            (SelectionMode::Range, SelectionState::FirstDateSelected) => {
                let Some(anchor) = self.selection.first() else {
                    return SelectOutcome::Unchanged;
                };
                if anchor == day {
                    return SelectOutcome::Unchanged;
                }
                let dates = materialize_range(anchor.min(day), anchor.max(day), self.today);
                DateSelection {
                    selected_dates: dates,
                    selection_state: SelectionState::RangeSelected,
                }
            }
            (SelectionMode::Range, SelectionState::RangeSelected) => DateSelection::single(day),
        };

        if next == self.selection {
            return SelectOutcome::Unchanged;
        }

        tracing::debug!(
            "Selection {:?} -> {:?} ({} days)",
            self.selection.state(),
            next.state(),
            next.len()
        );
        self.selection = next;
        SelectOutcome::Changed
    }

    /// Check whether `day` is before today
    pub fn is_past(&self, day: NaiveDate) -> bool {
        day < self.today
    }

    /// Check whether `day` is the single selected day or an end of the range
    pub fn is_endpoint(&self, day: NaiveDate) -> bool {
        match self.selection.dates() {
            [] => false,
            [only] => *only == day,
            [first, .., last] => *first == day || *last == day,
        }
    }

    /// Check whether `day` lies strictly between the ends of the range
    pub fn is_in_range(&self, day: NaiveDate) -> bool {
        match self.selection.dates() {
            [first, .., last] => *first < day && day < *last,
            _ => false,
        }
    }

    /// Appearance of the cell for `day`
    pub fn classify(&self, day: NaiveDate) -> DayAppearance {
        if self.is_endpoint(day) {
            DayAppearance::Endpoint
        } else if self.is_in_range(day) {
            DayAppearance::InRange
        } else if self.is_past(day) {
            DayAppearance::Past
        } else {
            DayAppearance::Normal
        }
    }
}

/// Every day from `start` to `end` inclusive, skipping days before `today`
///
/// Returns an empty list when the whole span is in the past or `end` is
/// before `start`.
pub fn materialize_range(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Vec<NaiveDate> {
    let capacity = (end - start).num_days().max(-1) + 1;
    let mut dates = Vec::with_capacity(capacity as usize);

    for day in start.iter_days().take_while(|day| *day <= end) {
        if day >= today {
            dates.push(day);
        }
    }

    dates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 3, 15)
    }

    fn range_selector() -> DateRangeSelector {
        DateRangeSelector::with_today(SelectionMode::Range, today())
    }

    #[test]
    fn test_state_for_count() {
        assert_eq!(SelectionState::for_count(0), SelectionState::None);
        assert_eq!(SelectionState::for_count(1), SelectionState::FirstDateSelected);
        assert_eq!(SelectionState::for_count(2), SelectionState::RangeSelected);
        assert_eq!(SelectionState::for_count(40), SelectionState::RangeSelected);
    }

    #[test]
    fn test_departure_and_return_follow_selection() {
        let mut selector = range_selector();
        assert_eq!(selector.departure(), None);
        assert_eq!(selector.return_date(), None);

        selector.select(date(2024, 3, 18));
        assert_eq!(selector.departure(), Some(date(2024, 3, 18)));
        assert_eq!(selector.return_date(), None);

        selector.select(date(2024, 3, 21));
        assert_eq!(selector.departure(), Some(date(2024, 3, 18)));
        assert_eq!(selector.return_date(), Some(date(2024, 3, 21)));
    }

    #[test]
    fn test_same_day_range_has_return_date() {
        let selection = DateSelection::from_dates(vec![date(2024, 3, 20), date(2024, 3, 20)]);
        assert_eq!(selection.departure(), Some(date(2024, 3, 20)));
        assert_eq!(selection.return_date(), Some(date(2024, 3, 20)));
    }

    #[test]
    fn test_first_tap_selects_single_day() {
        let mut selector = range_selector();
        assert_eq!(selector.select(date(2024, 3, 20)), SelectOutcome::Changed);

        assert_eq!(selector.selection().state(), SelectionState::FirstDateSelected);
        assert_eq!(selector.selection().dates(), &[date(2024, 3, 20)]);
    }

    #[test]
    fn test_second_tap_builds_contiguous_range() {
        let mut selector = range_selector();
        selector.select(date(2024, 3, 16));
        selector.select(date(2024, 3, 22));

        let selection = selector.selection();
        assert_eq!(selection.state(), SelectionState::RangeSelected);
        assert_eq!(selection.len(), 7);
        assert_eq!(selection.first(), Some(date(2024, 3, 16)));
        assert_eq!(selection.last(), Some(date(2024, 3, 22)));
        for pair in selection.dates().windows(2) {
            assert_eq!(pair[1] - pair[0], chrono::Duration::days(1));
        }
    }

    #[test]
    fn test_second_tap_earlier_day_sorts_endpoints() {
        let mut selector = range_selector();
        selector.select(date(2024, 3, 25));
        selector.select(date(2024, 3, 20));

        assert_eq!(selector.selection().first(), Some(date(2024, 3, 20)));
        assert_eq!(selector.selection().last(), Some(date(2024, 3, 25)));
        assert_eq!(selector.selection().len(), 6);
    }

    #[test]
    fn test_range_crosses_year_boundary() {
        let mut selector =
            DateRangeSelector::with_today(SelectionMode::Range, date(2024, 12, 1));
        selector.select(date(2024, 12, 30));
        selector.select(date(2025, 1, 2));

        assert_eq!(
            selector.selection().dates(),
            &[
                date(2024, 12, 30),
                date(2024, 12, 31),
                date(2025, 1, 1),
                date(2025, 1, 2)
            ]
        );
    }

    #[test]
    fn test_range_crosses_leap_day() {
        let mut selector = DateRangeSelector::with_today(SelectionMode::Range, date(2024, 2, 1));
        selector.select(date(2024, 2, 28));
        selector.select(date(2024, 3, 1));

        assert_eq!(
            selector.selection().dates(),
            &[date(2024, 2, 28), date(2024, 2, 29), date(2024, 3, 1)]
        );
    }

    #[test]
    fn test_same_day_retap_is_noop() {
        let mut selector = range_selector();
        selector.select(date(2024, 3, 20));

        assert_eq!(selector.select(date(2024, 3, 20)), SelectOutcome::Unchanged);
        assert_eq!(selector.selection().state(), SelectionState::FirstDateSelected);
        assert_eq!(selector.selection().dates(), &[date(2024, 3, 20)]);
    }

    #[test]
    fn test_tap_after_range_restarts() {
        let mut selector = range_selector();
        selector.select(date(2024, 3, 16));
        selector.select(date(2024, 3, 18));
        selector.select(date(2024, 4, 2));

        assert_eq!(selector.selection().state(), SelectionState::FirstDateSelected);
        assert_eq!(selector.selection().dates(), &[date(2024, 4, 2)]);
    }

    #[test]
    fn test_past_taps_are_ignored_in_every_state() {
        let past = date(2024, 3, 14);
        let mut selector = range_selector();

        assert_eq!(selector.select(past), SelectOutcome::IgnoredPast);
        assert!(selector.selection().is_empty());

        selector.select(date(2024, 3, 20));
        let before = selector.selection().clone();
        assert_eq!(selector.select(past), SelectOutcome::IgnoredPast);
        assert_eq!(selector.selection(), &before);

        selector.select(date(2024, 3, 22));
        let before = selector.selection().clone();
        assert_eq!(selector.select(date(2023, 1, 1)), SelectOutcome::IgnoredPast);
        assert_eq!(selector.selection(), &before);

        let mut single = DateRangeSelector::with_today(SelectionMode::Single, today());
        assert_eq!(single.select(past), SelectOutcome::IgnoredPast);
        assert!(single.selection().is_empty());
    }

    #[test]
    fn test_today_is_selectable() {
        let mut selector = range_selector();
        assert_eq!(selector.select(today()), SelectOutcome::Changed);
    }

    #[test]
    fn test_unguarded_transition_clamps_range_at_today() {
        let mut selector = range_selector();
        selector.select(date(2024, 3, 20));
        selector.transition(date(2024, 3, 10));

        let selection = selector.selection();
        assert_eq!(selection.state(), SelectionState::RangeSelected);
        assert_eq!(selection.first(), Some(date(2024, 3, 15)));
        assert_eq!(selection.last(), Some(date(2024, 3, 20)));
        assert_eq!(selection.len(), 6);
        assert!(!selection.dates().contains(&date(2024, 3, 10)));
    }

    #[test]
    fn test_single_mode_always_holds_one_day() {
        let mut selector = DateRangeSelector::with_today(SelectionMode::Single, today());
        for day in [20, 22, 22, 16, 31, 15] {
            selector.select(date(2024, 3, day));
            assert_eq!(selector.selection().len(), 1);
            assert_eq!(selector.selection().state(), SelectionState::FirstDateSelected);
        }
        assert_eq!(selector.selection().dates(), &[date(2024, 3, 15)]);
    }

    #[test]
    fn test_single_mode_replaces_seeded_range() {
        let mut selector = DateRangeSelector::with_today(SelectionMode::Single, today());
        selector.seed(vec![date(2024, 3, 16), date(2024, 3, 17)]);
        selector.select(date(2024, 3, 19));
        assert_eq!(selector.selection().dates(), &[date(2024, 3, 19)]);
    }

    #[test]
    fn test_seed_derives_state() {
        let mut selector = range_selector();

        selector.seed(vec![date(2024, 3, 18)]);
        assert_eq!(selector.selection().state(), SelectionState::FirstDateSelected);

        selector.seed(vec![date(2024, 3, 18), date(2024, 3, 19), date(2024, 3, 20)]);
        assert_eq!(selector.selection().state(), SelectionState::RangeSelected);

        selector.seed(vec![]);
        assert_eq!(selector.selection().state(), SelectionState::None);
    }

    #[test]
    fn test_seeded_past_days_are_kept_verbatim() {
        let mut selector = range_selector();
        let seeded = vec![date(2024, 3, 1), date(2024, 3, 2)];
        selector.seed(seeded.clone());
        assert_eq!(selector.selection().dates(), seeded.as_slice());
    }

    #[test]
    fn test_endpoint_classification() {
        let mut selector = range_selector();
        assert!(!selector.is_endpoint(date(2024, 3, 20)));

        selector.select(date(2024, 3, 20));
        assert!(selector.is_endpoint(date(2024, 3, 20)));
        assert!(!selector.is_endpoint(date(2024, 3, 21)));

        selector.select(date(2024, 3, 23));
        assert!(selector.is_endpoint(date(2024, 3, 20)));
        assert!(selector.is_endpoint(date(2024, 3, 23)));
        assert!(!selector.is_endpoint(date(2024, 3, 21)));
    }

    #[test]
    fn test_in_range_excludes_endpoints() {
        let mut selector = range_selector();
        selector.select(date(2024, 3, 20));
        assert!(!selector.is_in_range(date(2024, 3, 20)));

        selector.select(date(2024, 3, 23));
        assert!(!selector.is_in_range(date(2024, 3, 20)));
        assert!(selector.is_in_range(date(2024, 3, 21)));
        assert!(selector.is_in_range(date(2024, 3, 22)));
        assert!(!selector.is_in_range(date(2024, 3, 23)));
        assert!(!selector.is_in_range(date(2024, 3, 24)));
    }

    #[test]
    fn test_endpoint_and_in_range_are_exclusive() {
        let start = date(2024, 3, 1);
        let days: Vec<NaiveDate> = start.iter_days().take(45).collect();

        let mut selector = range_selector();
        let taps = [date(2024, 3, 18), date(2024, 3, 26), date(2024, 4, 3)];
        for tap in std::iter::once(None).chain(taps.iter().copied().map(Some)) {
            if let Some(tap) = tap {
                selector.select(tap);
            }
            for day in &days {
                assert!(
                    !(selector.is_endpoint(*day) && selector.is_in_range(*day)),
                    "{day} is both endpoint and in range"
                );
            }
        }
    }

    #[test]
    fn test_classify_precedence() {
        let mut selector = range_selector();
        selector.seed(vec![date(2024, 3, 13), date(2024, 3, 14), date(2024, 3, 15), date(2024, 3, 16)]);

        assert_eq!(selector.classify(date(2024, 3, 13)), DayAppearance::Endpoint);
        assert_eq!(selector.classify(date(2024, 3, 14)), DayAppearance::InRange);
        assert_eq!(selector.classify(date(2024, 3, 12)), DayAppearance::Past);
        assert_eq!(selector.classify(date(2024, 3, 17)), DayAppearance::Normal);
    }

    #[test]
    fn test_materialize_range_all_past_is_empty() {
        let dates = materialize_range(date(2024, 3, 1), date(2024, 3, 5), today());
        assert!(dates.is_empty());
    }

    #[test]
    fn test_materialize_range_reversed_is_empty() {
        let dates = materialize_range(date(2024, 3, 20), date(2024, 3, 18), today());
        assert!(dates.is_empty());
    }

    #[test]
    fn test_materialize_range_length() {
        let start = date(2024, 3, 15);
        let end = date(2024, 5, 2);
        let dates = materialize_range(start, end, today());
        assert_eq!(dates.len() as i64, (end - start).num_days() + 1);
    }

    #[test]
    fn test_clear_resets_state() {
        let mut selector = range_selector();
        selector.select(date(2024, 3, 20));
        selector.clear();
        assert_eq!(selector.selection().state(), SelectionState::None);
        assert!(selector.selection().is_empty());
    }

    #[test]
    fn test_selection_serializes_camel_case() {
        let selection = DateSelection::single(date(2024, 3, 20));
        let json = serde_json::to_value(&selection).unwrap();
        assert_eq!(json["selectedDates"][0], "2024-03-20");
        assert_eq!(json["selectionState"], "firstDateSelected");
    }
}
