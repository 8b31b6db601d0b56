//! Month grid layout
//!
//! Each month is laid out Monday first: the 1st is preceded by as many blank
//! cells as it takes to land in its weekday column, followed by one cell per
//! day. Months are computed independently of each other.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of months the picker shows by default
pub const DEFAULT_MONTHS_SHOWN: usize = 12;

/// Cells per grid row
pub const DAYS_PER_WEEK: usize = 7;

/// One cell of the month grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GridCell {
    /// Placeholder before the 1st of the month
    Blank,
    /// A day of the month
    Day {
        /// Day of the month (1-31)
        day: u32,
        /// The concrete date
        date: NaiveDate,
    },
}

impl GridCell {
    /// Date of a day cell
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            GridCell::Blank => None,
            GridCell::Day { date, .. } => Some(*date),
        }
    }
}

/// Layout of one month
///
/// # Example
///
/// ```
/// use app_core::calendar_grid::CalendarMonth;
/// use chrono::NaiveDate;
///
/// let february = CalendarMonth::new(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
/// assert_eq!(february.days_in_month(), 29);
/// // 2024-02-01 is a Thursday
/// assert_eq!(february.first_weekday_offset(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMonth {
    first_day: NaiveDate,
    days_in_month: u32,
    first_weekday_offset: u32,
}

impl CalendarMonth {
    /// Layout of the month containing `anchor`
    pub fn new(anchor: NaiveDate) -> Self {
        let first_day = anchor - Days::new(u64::from(anchor.day0()));
        let days_in_month = first_day
            .iter_days()
            .take_while(|day| day.month() == first_day.month())
            .count() as u32;

        Self {
            first_day,
            days_in_month,
            first_weekday_offset: monday_offset(first_day.weekday().number_from_sunday()),
        }
    }

    /// The 1st of the month
    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// Year
    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    /// Month (1-12)
    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    /// Number of days (28-31)
    pub fn days_in_month(&self) -> u32 {
        self.days_in_month
    }

    /// Blank cells before the 1st, Monday = 0 through Sunday = 6
    pub fn first_weekday_offset(&self) -> u32 {
        self.first_weekday_offset
    }

    /// Date of `day` in this month
    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        if day == 0 || day > self.days_in_month {
            return None;
        }
        self.first_day.with_day(day)
    }

    /// Check whether `date` falls in this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// The following month
    pub fn next(&self) -> Self {
        Self::new(self.first_day + Days::new(u64::from(self.days_in_month)))
    }

    /// Blank placeholders followed by one cell per day
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        let blanks = std::iter::repeat(GridCell::Blank).take(self.first_weekday_offset as usize);
        let days = (1..=self.days_in_month).map(move |day| GridCell::Day {
            day,
            date: self.first_day + Days::new(u64::from(day - 1)),
        });
        blanks.chain(days)
    }

    /// Cells grouped into rows of seven
    ///
    /// The last row is not padded and may be shorter.
    pub fn rows(&self) -> impl Iterator<Item = Vec<GridCell>> + '_ {
        let mut cells = self.cells();
        std::iter::from_fn(move || {
            let row: Vec<GridCell> = cells.by_ref().take(DAYS_PER_WEEK).collect();
            (!row.is_empty()).then_some(row)
        })
    }

    /// Number of rows the grid needs
    pub fn week_count(&self) -> usize {
        let cells = (self.first_weekday_offset + self.days_in_month) as usize;
        cells.div_ceil(DAYS_PER_WEEK)
    }
}

/// Convert a Sunday = 1 weekday number into a Monday-first column
pub fn monday_offset(weekday_from_sunday: u32) -> u32 {
    (weekday_from_sunday + 5) % 7
}

/// Consecutive months starting at an anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    start: CalendarMonth,
    count: usize,
}

impl MonthWindow {
    /// `count` months starting with the month containing `anchor`
    pub fn new(anchor: NaiveDate, count: usize) -> Self {
        Self {
            start: CalendarMonth::new(anchor),
            count,
        }
    }

    /// The default window of twelve months
    pub fn from_anchor(anchor: NaiveDate) -> Self {
        Self::new(anchor, DEFAULT_MONTHS_SHOWN)
    }

    /// Number of months in the window
    pub fn len(&self) -> usize {
        self.count
    }

    /// Check if the window is empty
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Months in order
    pub fn iter(&self) -> impl Iterator<Item = CalendarMonth> {
        std::iter::successors(Some(self.start), |month| Some(month.next())).take(self.count)
    }

    /// Month at `offset` from the start
    pub fn month(&self, offset: usize) -> Option<CalendarMonth> {
        self.iter().nth(offset)
    }
}
