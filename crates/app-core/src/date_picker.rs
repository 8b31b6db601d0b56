//! Calendar picker session
//!
//! A [`DatePicker`] lives from the moment the picker sheet opens until it is
//! confirmed or dismissed. It owns the selection exclusively, publishes a
//! snapshot after every change, and hands the selected days back by value on
//! confirmation.

use crate::calendar_grid::{CalendarMonth, GridCell, MonthWindow};
use crate::config::PickerConfig;
use crate::date_selection::{
    DateRangeSelector, DateSelection, DayAppearance, SelectOutcome, SelectionMode,
};
use crate::formatting::{self, CalendarFormatter};
use app_state::{Change, Observable};
use chrono::{Local, NaiveDate, NaiveTime};
use i18n::{CalendarLabels, LanguageSelection, LanguageTable};
use tokio::sync::{broadcast, watch};

/// How the picker was opened
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PickerRequest {
    /// Days returned by an earlier confirmation
    pub seed: Vec<NaiveDate>,
    /// Single day or range selection
    pub mode: SelectionMode,
}

impl PickerRequest {
    /// Range selection with nothing picked
    pub fn range() -> Self {
        Self {
            seed: Vec::new(),
            mode: SelectionMode::Range,
        }
    }

    /// Single day selection with nothing picked
    pub fn single() -> Self {
        Self {
            seed: Vec::new(),
            mode: SelectionMode::Single,
        }
    }

    /// Request using the configured selection mode
    pub fn from_config(config: &PickerConfig) -> Self {
        Self {
            seed: Vec::new(),
            mode: config.selection_mode,
        }
    }

    /// Reopen with an earlier selection
    pub fn with_seed(mut self, seed: Vec<NaiveDate>) -> Self {
        self.seed = seed;
        self
    }
}

/// State published to the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerSnapshot {
    /// Current selection
    pub selection: DateSelection,
    /// Selected language, if the table has any
    pub language: Option<String>,
    /// Weekday column headers, Monday first
    pub weekday_headers: [String; 7],
    /// Footer label for the first day
    pub departure_label: String,
    /// Footer label for the last day of a range
    pub return_label: String,
    /// Whether the return column is shown
    pub shows_return: bool,
    /// Departure time
    pub departure_time: NaiveTime,
    /// Return time
    pub return_time: NaiveTime,
    /// Footer time labels, when time selection is on
    pub time_labels: Option<(String, String)>,
}

/// A day cell ready to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    /// Day of the month
    pub day: u32,
    /// The concrete date
    pub date: NaiveDate,
    /// How to draw it
    pub appearance: DayAppearance,
}

/// One month of the scrolling calendar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSection {
    /// Sticky header month name
    pub month_label: String,
    /// Sticky header year
    pub year_label: String,
    /// Month layout
    pub month: CalendarMonth,
    /// Grid cells, `None` for leading blanks
    pub cells: Vec<Option<DayCell>>,
}

impl MonthSection {
    /// Cells grouped into rows of seven
    pub fn rows(&self) -> impl Iterator<Item = &[Option<DayCell>]> {
        self.cells.chunks(crate::calendar_grid::DAYS_PER_WEEK)
    }
}

/// An open date picker
pub struct DatePicker {
    config: PickerConfig,
    table: LanguageTable,
    language: LanguageSelection,
    selector: DateRangeSelector,
    formatter: CalendarFormatter,
    departure_time: NaiveTime,
    return_time: NaiveTime,
    time_selection: bool,
    state: Observable<PickerSnapshot>,
}

impl DatePicker {
    /// Open the picker, loading the localization table first
    ///
    /// Without a configured path the table bundled with the app is used. A
    /// table that fails to load leaves every label on default formatting.
    pub async fn open(config: PickerConfig, request: PickerRequest) -> Self {
        let table = match &config.localizations_path {
            Some(path) => LanguageTable::load_or_empty(path).await,
            None => LanguageTable::bundled_or_empty(),
        };
        Self::new(config, table, request, Local::now().date_naive())
    }

    /// Create a picker with an already loaded table
    pub fn new(
        config: PickerConfig,
        table: LanguageTable,
        request: PickerRequest,
        today: NaiveDate,
    ) -> Self {
        let mut language = LanguageSelection::for_table(&table);
        language.select(&table, &config.default_language);

        let mut selector = DateRangeSelector::with_today(request.mode, today);
        if !request.seed.is_empty() {
            selector.seed(request.seed);
        }

        let formatter = CalendarFormatter::new(config.format_cache_capacity);
        let departure_time = default_time();
        let time_selection = config.time_selection;

        let initial = build_snapshot(
            &selector,
            &table,
            &language,
            &formatter,
            departure_time,
            departure_time,
            time_selection,
        );

        tracing::debug!(
            "Opened date picker in {:?} mode with {} seeded days",
            request.mode,
            initial.selection.len()
        );

        Self {
            config,
            table,
            language,
            selector,
            formatter,
            departure_time,
            return_time: departure_time,
            time_selection,
            state: Observable::new(initial),
        }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> PickerSnapshot {
        self.state.get()
    }

    /// Subscribe to snapshots
    pub fn subscribe(&self) -> watch::Receiver<PickerSnapshot> {
        self.state.subscribe()
    }

    /// Subscribe to change events
    pub fn subscribe_events(&self) -> broadcast::Receiver<Change> {
        self.state.subscribe_events()
    }

    /// Current selection
    pub fn selection(&self) -> &DateSelection {
        self.selector.selection()
    }

    /// Selection mode
    pub fn mode(&self) -> SelectionMode {
        self.selector.mode()
    }

    /// Handle a tap on a day cell
    pub fn tap(&mut self, day: NaiveDate) -> SelectOutcome {
        let outcome = self.selector.select(day);
        if outcome.is_changed() {
            self.publish();
        }
        outcome
    }

    /// Appearance of the cell for `day`
    pub fn classify(&self, day: NaiveDate) -> DayAppearance {
        self.selector.classify(day)
    }

    /// Move the reference day, e.g. after midnight
    pub fn set_today(&mut self, today: NaiveDate) {
        self.selector.set_today(today);
        self.publish();
    }

    /// Languages offered in the language sheet, sorted
    pub fn available_languages(&self) -> Vec<String> {
        self.table.available_languages()
    }

    /// Selected language
    pub fn language(&self) -> Option<&str> {
        self.language.name()
    }

    /// Switch the label language
    ///
    /// Returns false when `name` is not in the table.
    pub fn select_language(&mut self, name: &str) -> bool {
        if !self.language.select(&self.table, name) {
            return false;
        }
        self.publish();
        true
    }

    /// Label resolver for the selected language
    pub fn labels(&self) -> CalendarLabels<'_> {
        CalendarLabels::new(&self.table, &self.language)
    }

    /// Set the departure time
    pub fn set_departure_time(&mut self, time: NaiveTime) {
        self.departure_time = time;
        self.publish();
    }

    /// Set the return time
    pub fn set_return_time(&mut self, time: NaiveTime) {
        self.return_time = time;
        self.publish();
    }

    /// Show or hide the footer times
    pub fn set_time_selection(&mut self, enabled: bool) {
        self.time_selection = enabled;
        self.publish();
    }

    /// The months the calendar scrolls through, starting at the current month
    pub fn months(&self) -> MonthWindow {
        MonthWindow::new(self.selector.today(), self.config.months_shown)
    }

    /// Render-ready section for `month`
    pub fn month_section(&self, month: CalendarMonth) -> MonthSection {
        let labels = self.labels();
        let cells = month
            .cells()
            .map(|cell| match cell {
                GridCell::Blank => None,
                GridCell::Day { day, date } => Some(DayCell {
                    day,
                    date,
                    appearance: self.selector.classify(date),
                }),
            })
            .collect();

        MonthSection {
            month_label: formatting::month_label(month.first_day(), &labels),
            year_label: formatting::year_label(month.first_day()),
            month,
            cells,
        }
    }

    /// Sections for every month in the window
    pub fn month_sections(&self) -> Vec<MonthSection> {
        self.months()
            .iter()
            .map(|month| self.month_section(month))
            .collect()
    }

    /// Close the picker, handing the selection to the caller
    pub fn confirm(self) -> Vec<NaiveDate> {
        let dates = self.selector.into_selection().into_dates();
        tracing::debug!("Date picker confirmed with {} days", dates.len());
        dates
    }

    /// Close the picker without a result
    pub fn dismiss(self) {
        tracing::debug!("Date picker dismissed");
    }

    fn publish(&self) {
        self.state.set(build_snapshot(
            &self.selector,
            &self.table,
            &self.language,
            &self.formatter,
            self.departure_time,
            self.return_time,
            self.time_selection,
        ));
    }
}

impl std::fmt::Debug for DatePicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatePicker")
            .field("selection", self.selector.selection())
            .field("mode", &self.selector.mode())
            .field("language", &self.language.name())
            .finish_non_exhaustive()
    }
}

fn default_time() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn build_snapshot(
    selector: &DateRangeSelector,
    table: &LanguageTable,
    language: &LanguageSelection,
    formatter: &CalendarFormatter,
    departure_time: NaiveTime,
    return_time: NaiveTime,
    time_selection: bool,
) -> PickerSnapshot {
    let selection = selector.selection().clone();
    let labels = CalendarLabels::new(table, language);

    PickerSnapshot {
        departure_label: formatter.formatted_date(selection.departure()),
        return_label: formatter.formatted_date(selection.return_date()),
        shows_return: selector.mode() == SelectionMode::Range,
        weekday_headers: labels.weekday_short_headers(),
        language: language.name().map(str::to_string),
        departure_time,
        return_time,
        time_labels: time_selection.then(|| {
            (
                formatter.formatted_time(departure_time),
                formatter.formatted_time(return_time),
            )
        }),
        selection,
    }
}
