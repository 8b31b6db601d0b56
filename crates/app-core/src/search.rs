//! Flight search form
//!
//! Holds everything the home screen collects before a search: trip type,
//! origin and destination (one pair, or one per leg for multi-city), travel
//! dates, passengers and cabin class.

use crate::autocomplete::AutocompleteItem;
use crate::date_selection::DateSelection;
use chrono::{Days, NaiveDate};
use thiserror::Error;
use uuid::Uuid;

/// Fewest adults on a booking
pub const MIN_ADULTS: u8 = 1;
/// Most adults on a booking
pub const MAX_ADULTS: u8 = 9;
/// Most children on a booking
pub const MAX_CHILDREN: u8 = 8;
/// Oldest age that still counts as a child
pub const MAX_CHILD_AGE: u8 = 17;

/// Days between the default departure and return
const DEFAULT_TRIP_LENGTH: u64 = 7;

/// `EEE,d MMM`
const SHORT_DATE_FORMAT: &str = "%a,%-d %b";

/// Errors raised by search form operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// Multi-city leg index is out of bounds
    #[error("No trip at index {0}")]
    InvalidTripIndex(usize),

    /// Child index is out of bounds
    #[error("No child at index {0}")]
    InvalidChildIndex(usize),

    /// Age is above the child limit
    #[error("Child age {0} is above {max}", max = MAX_CHILD_AGE)]
    InvalidChildAge(u8),

    /// A location was picked while no location sheet was open
    #[error("No location sheet is open")]
    NoLocationTarget,

    /// Origin and destination are the same airport
    #[error("Origin and destination are both {0}")]
    SameOriginAndDestination(String),

    /// Return date is before departure
    #[error("Return {end} is before departure {start}")]
    ReturnBeforeDeparture {
        /// Departure date
        start: NaiveDate,
        /// Return date
        end: NaiveDate,
    },
}

/// Result type for search form operations
pub type Result<T> = std::result::Result<T, SearchError>;

/// Kind of journey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TripType {
    /// Out and back
    #[default]
    Return,
    /// Outbound only
    OneWay,
    /// Several independent legs
    MultiCity,
}

impl TripType {
    /// All trip types in selector order
    pub const ALL: [TripType; 3] = [TripType::Return, TripType::OneWay, TripType::MultiCity];

    /// Label shown in the trip type selector
    pub fn label(&self) -> &'static str {
        match self {
            TripType::Return => "Return",
            TripType::OneWay => "One way",
            TripType::MultiCity => "Multi city",
        }
    }
}

/// Cabin class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TravelClass {
    /// Economy
    #[default]
    Economy,
    /// Premium economy
    PremiumEconomy,
    /// Business
    Business,
    /// First class
    FirstClass,
}

impl TravelClass {
    /// All classes in selector order
    pub const ALL: [TravelClass; 4] = [
        TravelClass::Economy,
        TravelClass::PremiumEconomy,
        TravelClass::Business,
        TravelClass::FirstClass,
    ];

    /// Label shown in the class selector
    pub fn label(&self) -> &'static str {
        match self {
            TravelClass::Economy => "Economy",
            TravelClass::PremiumEconomy => "Premium Economy",
            TravelClass::Business => "Business",
            TravelClass::FirstClass => "First Class",
        }
    }
}

/// An airport as shown in the form
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Place {
    /// IATA code
    pub code: String,
    /// City name
    pub city: String,
}

impl Place {
    /// Create a place
    pub fn new(code: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            city: city.into(),
        }
    }

    /// Default origin
    pub fn default_origin() -> Self {
        Self::new("COK", "Cochin")
    }

    /// Default destination
    pub fn default_destination() -> Self {
        Self::new("DXB", "Dubai")
    }
}

/// One leg of a multi-city search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    /// Stable identifier for list rendering
    pub id: Uuid,
    /// Departure airport
    pub origin: Place,
    /// Arrival airport
    pub destination: Place,
    /// Travel date
    pub date: NaiveDate,
}

impl Trip {
    /// Leg with the default airports
    pub fn new_default(date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin: Place::default_origin(),
            destination: Place::default_destination(),
            date,
        }
    }

    fn swap(&mut self) {
        std::mem::swap(&mut self.origin, &mut self.destination);
    }
}

/// Which end of a journey the location sheet is editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationField {
    /// Departure airport
    Origin,
    /// Arrival airport
    Destination,
}

/// Location being edited while the sheet is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationTarget {
    /// Origin or destination
    pub field: LocationField,
    /// Multi-city leg (0 otherwise)
    pub trip_index: usize,
}

/// Passenger counts
///
/// Counts stay within their limits; the stepper buttons report whether they
/// had any effect so the view can disable them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passengers {
    adults: u8,
    children: u8,
    children_ages: Vec<Option<u8>>,
}

impl Default for Passengers {
    fn default() -> Self {
        Self {
            adults: MIN_ADULTS,
            children: 0,
            children_ages: Vec::new(),
        }
    }
}

impl Passengers {
    /// Number of adults
    pub fn adults(&self) -> u8 {
        self.adults
    }

    /// Number of children
    pub fn children(&self) -> u8 {
        self.children
    }

    /// Ages of the children, `None` until picked
    pub fn children_ages(&self) -> &[Option<u8>] {
        &self.children_ages
    }

    /// Add an adult
    pub fn increment_adults(&mut self) -> bool {
        step_up(&mut self.adults, MAX_ADULTS)
    }

    /// Remove an adult
    pub fn decrement_adults(&mut self) -> bool {
        step_down(&mut self.adults, MIN_ADULTS)
    }

    /// Add a child
    pub fn increment_children(&mut self) -> bool {
        let changed = step_up(&mut self.children, MAX_CHILDREN);
        if changed {
            self.children_ages.push(None);
        }
        changed
    }

    /// Remove the last child
    pub fn decrement_children(&mut self) -> bool {
        let changed = step_down(&mut self.children, 0);
        if changed {
            self.children_ages.pop();
        }
        changed
    }

    /// Record the age of a child
    pub fn set_child_age(&mut self, index: usize, age: u8) -> Result<()> {
        if age > MAX_CHILD_AGE {
            return Err(SearchError::InvalidChildAge(age));
        }
        let slot = self
            .children_ages
            .get_mut(index)
            .ok_or(SearchError::InvalidChildIndex(index))?;
        *slot = Some(age);
        Ok(())
    }

    /// Total travellers
    pub fn total(&self) -> u8 {
        self.adults + self.children
    }

    /// Summary such as `2 Adults, 1 Child`
    pub fn summary(&self) -> String {
        let mut text = format!(
            "{} Adult{}",
            self.adults,
            if self.adults > 1 { "s" } else { "" }
        );
        if self.children > 0 {
            text.push_str(&format!(
                ", {} Child{}",
                self.children,
                if self.children > 1 { "ren" } else { "" }
            ));
        }
        text
    }
}

fn step_up(count: &mut u8, max: u8) -> bool {
    if *count >= max {
        return false;
    }
    *count += 1;
    true
}

fn step_down(count: &mut u8, min: u8) -> bool {
    if *count <= min {
        return false;
    }
    *count -= 1;
    true
}

/// Validated search, ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Trip type
    pub trip_type: TripType,
    /// Legs in travel order
    pub legs: Vec<(Place, Place, NaiveDate)>,
    /// Number of adults
    pub adults: u8,
    /// Number of children
    pub children: u8,
    /// Cabin class
    pub travel_class: TravelClass,
    /// Only non-stop flights
    pub direct_flights_only: bool,
}

/// State of the search form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchForm {
    /// Trip type
    pub trip_type: TripType,
    /// Departure airport for return and one-way trips
    pub origin: Place,
    /// Arrival airport for return and one-way trips
    pub destination: Place,
    /// Outbound date
    pub start_date: NaiveDate,
    /// Return date
    pub end_date: NaiveDate,
    /// Passenger counts
    pub passengers: Passengers,
    /// Cabin class
    pub travel_class: TravelClass,
    /// Only non-stop flights
    pub direct_flights_only: bool,
    trips: Vec<Trip>,
    location_target: Option<LocationTarget>,
}

impl SearchForm {
    /// Form with default airports, departing `today` and returning a week later
    pub fn new(today: NaiveDate) -> Self {
        Self {
            trip_type: TripType::default(),
            origin: Place::default_origin(),
            destination: Place::default_destination(),
            start_date: today,
            end_date: today + Days::new(DEFAULT_TRIP_LENGTH),
            passengers: Passengers::default(),
            travel_class: TravelClass::default(),
            direct_flights_only: false,
            trips: vec![Trip::new_default(today)],
            location_target: None,
        }
    }

    /// Switch trip type
    ///
    /// Multi-city always has at least one leg.
    pub fn select_trip_type(&mut self, trip_type: TripType) {
        self.trip_type = trip_type;
        if trip_type == TripType::MultiCity && self.trips.is_empty() {
            self.trips.push(Trip::new_default(self.start_date));
        }
    }

    /// Multi-city legs
    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    /// Append a leg with the default airports
    pub fn add_trip(&mut self) -> &Trip {
        let date = self.trips.last().map_or(self.start_date, |trip| trip.date);
        self.trips.push(Trip::new_default(date));
        &self.trips[self.trips.len() - 1]
    }

    /// Remove a leg
    ///
    /// The last remaining leg is never removed; returns whether a leg was
    /// removed.
    pub fn remove_trip(&mut self, index: usize) -> Result<bool> {
        if index >= self.trips.len() {
            return Err(SearchError::InvalidTripIndex(index));
        }
        if self.trips.len() == 1 {
            return Ok(false);
        }
        self.trips.remove(index);
        Ok(true)
    }

    /// Set the date of a leg
    pub fn set_trip_date(&mut self, index: usize, date: NaiveDate) -> Result<()> {
        self.trip_mut(index)?.date = date;
        Ok(())
    }

    /// Location currently being edited
    pub fn location_target(&self) -> Option<LocationTarget> {
        self.location_target
    }

    /// Check whether the location sheet is open
    pub fn is_location_sheet_open(&self) -> bool {
        self.location_target.is_some()
    }

    /// Open the location sheet for an origin or destination
    ///
    /// `trip_index` is only checked in multi-city mode.
    pub fn open_location_sheet(&mut self, field: LocationField, trip_index: usize) -> Result<()> {
        if self.trip_type == TripType::MultiCity && trip_index >= self.trips.len() {
            return Err(SearchError::InvalidTripIndex(trip_index));
        }
        self.location_target = Some(LocationTarget { field, trip_index });
        Ok(())
    }

    /// Close the location sheet without picking anything
    pub fn close_location_sheet(&mut self) {
        self.location_target = None;
    }

    /// Apply a picked suggestion to the location being edited and close the sheet
    pub fn apply_location(&mut self, item: &AutocompleteItem) -> Result<()> {
        let target = self.location_target.ok_or(SearchError::NoLocationTarget)?;
        let place = item.place();

        let slot = if self.trip_type == TripType::MultiCity {
            let trip = self.trip_mut(target.trip_index)?;
            match target.field {
                LocationField::Origin => &mut trip.origin,
                LocationField::Destination => &mut trip.destination,
            }
        } else {
            match target.field {
                LocationField::Origin => &mut self.origin,
                LocationField::Destination => &mut self.destination,
            }
        };

        tracing::debug!("Setting {:?} to {}", target.field, place.code);
        *slot = place;
        self.location_target = None;
        Ok(())
    }

    /// Swap origin and destination
    pub fn swap_places(&mut self) {
        std::mem::swap(&mut self.origin, &mut self.destination);
    }

    /// Swap origin and destination of one leg
    pub fn swap_trip(&mut self, index: usize) -> Result<()> {
        self.trip_mut(index)?.swap();
        Ok(())
    }

    /// Copy the days confirmed in the date picker into the form
    ///
    /// The first day becomes the departure; with two or more days the last
    /// becomes the return. An empty selection leaves the dates alone.
    pub fn apply_dates(&mut self, dates: &[NaiveDate]) {
        self.apply_selection(&DateSelection::from_dates(dates.to_vec()));
    }

    /// Copy a picker selection into the form
    pub fn apply_selection(&mut self, selection: &DateSelection) {
        let Some(departure) = selection.departure() else {
            return;
        };
        self.start_date = departure;
        if let Some(return_date) = selection.return_date() {
            self.end_date = return_date;
        }
    }

    /// Dates as `Mon,4 Mar - Mon,11 Mar`
    pub fn format_date_range(&self) -> String {
        format!(
            "{} - {}",
            format_single_date(self.start_date),
            format_single_date(self.end_date)
        )
    }

    /// Passengers and class as `2 Adults, 1 Child - Economy`
    pub fn format_passengers(&self) -> String {
        format!(
            "{} - {}",
            self.passengers.summary(),
            self.travel_class.label()
        )
    }

    /// Validate the form into a request
    pub fn to_request(&self) -> Result<SearchRequest> {
        let legs = match self.trip_type {
            TripType::Return => {
                if self.end_date < self.start_date {
                    return Err(SearchError::ReturnBeforeDeparture {
                        start: self.start_date,
                        end: self.end_date,
                    });
                }
                vec![
                    (self.origin.clone(), self.destination.clone(), self.start_date),
                    (self.destination.clone(), self.origin.clone(), self.end_date),
                ]
            }
            TripType::OneWay => vec![(
                self.origin.clone(),
                self.destination.clone(),
                self.start_date,
            )],
            TripType::MultiCity => self
                .trips
                .iter()
                .map(|trip| (trip.origin.clone(), trip.destination.clone(), trip.date))
                .collect(),
        };

        if let Some((origin, _, _)) = legs.iter().find(|(from, to, _)| from.code == to.code) {
            return Err(SearchError::SameOriginAndDestination(origin.code.clone()));
        }

        Ok(SearchRequest {
            trip_type: self.trip_type,
            legs,
            adults: self.passengers.adults(),
            children: self.passengers.children(),
            travel_class: self.travel_class,
            direct_flights_only: self.direct_flights_only,
        })
    }

    fn trip_mut(&mut self, index: usize) -> Result<&mut Trip> {
        self.trips
            .get_mut(index)
            .ok_or(SearchError::InvalidTripIndex(index))
    }
}

/// Date as `Mon,4 Mar`
pub fn format_single_date(date: NaiveDate) -> String {
    date.format(SHORT_DATE_FORMAT).to_string()
}
