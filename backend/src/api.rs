//! Public API surface for dso-finder.
//!
//! Plain data types exchanged with collaborators: the search request going in
//! and the darkness window, observability records and warnings coming out.
//! All types derive Serialize so a presentation layer can ship them as JSON.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DsoError, Result};
use crate::services::magnitude_limit::limiting_magnitude;

pub use crate::ephemeris::{EquatorialCoordinates, HorizontalCoordinates};
pub use crate::models::{ModifiedJulianDate, TimeGrid};

/// Latitude of the default observing site, degrees.
pub const DEFAULT_LATITUDE: f64 = 47.17;
/// Longitude of the default observing site, degrees (east positive).
pub const DEFAULT_LONGITUDE: f64 = 8.01;
/// Elevation of the default observing site, meters.
pub const DEFAULT_ELEVATION_M: f64 = 550.0;

/// Geographic location of the observer.
///
/// Fields are private so that every value in circulation has passed
/// [`ObserverLocation::new`].
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ObserverLocation {
    latitude: f64,
    longitude: f64,
    elevation_m: f64,
}

impl ObserverLocation {
    pub fn new(latitude: f64, longitude: f64, elevation_m: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(DsoError::InvalidLocation(format!(
                "latitude must be between -90 and 90 degrees, got {latitude}"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(DsoError::InvalidLocation(format!(
                "longitude must be between -180 and 180 degrees, got {longitude}"
            )));
        }
        if !elevation_m.is_finite() {
            return Err(DsoError::InvalidLocation(
                "elevation must be a finite number of meters".to_string(),
            ));
        }
        Ok(Self {
            latitude,
            longitude,
            elevation_m,
        })
    }

    /// The built-in default site.
    pub fn default_site() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            elevation_m: DEFAULT_ELEVATION_M,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn elevation_m(&self) -> f64 {
        self.elevation_m
    }
}

impl Default for ObserverLocation {
    fn default() -> Self {
        Self::default_site()
    }
}

/// Time period in Modified Julian Date (MJD) format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Period {
    /// Start time in MJD
    pub start: ModifiedJulianDate,
    /// End time in MJD
    pub stop: ModifiedJulianDate,
}

impl Period {
    /// Returns `None` unless `start < stop`.
    pub fn new(start: ModifiedJulianDate, stop: ModifiedJulianDate) -> Option<Self> {
        if start.value() < stop.value() {
            Some(Self { start, stop })
        } else {
            None
        }
    }

    /// Length of the interval in days.
    pub fn duration(&self) -> qtty::Days {
        qtty::Days::new(self.stop.value() - self.start.value())
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration().value() * 24.0
    }

    pub fn midpoint(&self) -> ModifiedJulianDate {
        ModifiedJulianDate::new((self.start.value() + self.stop.value()) / 2.0)
    }

    /// Check if a given MJD instant lies inside this interval (inclusive start, exclusive end).
    pub fn contains(&self, t_mjd: ModifiedJulianDate) -> bool {
        self.start.value() <= t_mjd.value() && t_mjd.value() < self.stop.value()
    }
}

/// Whether the window is the night in progress or a chosen calendar night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Night following the reference instant; never starts in the past
    #[default]
    Now,
    /// Night of the reference instant's local calendar date
    SpecificNight,
}

/// How a darkness window was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowStatus {
    /// Astronomical night reported as computed
    Computed,
    /// Astronomical night with its start clamped to the reference instant
    StartsNow,
    /// Astronomical night of a chosen calendar date
    SpecificNight,
    /// Computed window was empty or inverted
    FallbackInvalid,
    /// The sun never went below the twilight limit
    FallbackNoDarkness,
    /// The computation itself failed
    FallbackError,
}

impl WindowStatus {
    pub fn is_fallback(&self) -> bool {
        matches!(
            self,
            WindowStatus::FallbackInvalid
                | WindowStatus::FallbackNoDarkness
                | WindowStatus::FallbackError
        )
    }
}

/// Darkness window handed to the evaluator. `start < end` always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DarknessWindow {
    pub start: ModifiedJulianDate,
    pub end: ModifiedJulianDate,
    pub status: WindowStatus,
    /// Human-readable description of how the window was derived
    pub diagnostic: String,
}

impl DarknessWindow {
    pub fn period(&self) -> Period {
        Period {
            start: self.start,
            stop: self.end,
        }
    }

    pub fn start_utc(&self) -> DateTime<Utc> {
        self.start.to_datetime()
    }

    pub fn end_utc(&self) -> DateTime<Utc> {
        self.end.to_datetime()
    }

    pub fn duration_hours(&self) -> f64 {
        self.period().duration_hours()
    }
}

/// Magnitude filter: either a sky-darkness class or explicit bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MagnitudeFilter {
    /// Bortle class 1-9; objects fainter than the class limit are dropped
    SkyClass { bortle: u8 },
    /// Inclusive bounds; reversed bounds are swapped
    Manual { min: f64, max: f64 },
}

impl Default for MagnitudeFilter {
    fn default() -> Self {
        MagnitudeFilter::SkyClass { bortle: 5 }
    }
}

impl MagnitudeFilter {
    /// Inclusive `(min, max)` magnitude range with `min <= max`.
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            MagnitudeFilter::SkyClass { bortle } => {
                (f64::NEG_INFINITY, limiting_magnitude(bortle))
            }
            MagnitudeFilter::Manual { min, max } if min > max => (max, min),
            MagnitudeFilter::Manual { min, max } => (min, max),
        }
    }

    pub fn admits(&self, magnitude: f64) -> bool {
        let (min, max) = self.bounds();
        magnitude >= min && magnitude <= max
    }
}

/// One of the eight compass points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardinalDirection {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CardinalDirection {
    pub const ALL: [CardinalDirection; 8] = [
        CardinalDirection::N,
        CardinalDirection::NE,
        CardinalDirection::E,
        CardinalDirection::SE,
        CardinalDirection::S,
        CardinalDirection::SW,
        CardinalDirection::W,
        CardinalDirection::NW,
    ];

    /// Compass point whose 45° sector contains `azimuth_deg`.
    pub fn from_azimuth(azimuth_deg: f64) -> Self {
        let az = azimuth_deg.rem_euclid(360.0);
        let index = ((az + 22.5) / 45.0).floor() as usize % 8;
        Self::ALL[index]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CardinalDirection::N => "N",
            CardinalDirection::NE => "NE",
            CardinalDirection::E => "E",
            CardinalDirection::SE => "SE",
            CardinalDirection::S => "S",
            CardinalDirection::SW => "SW",
            CardinalDirection::W => "W",
            CardinalDirection::NW => "NW",
        }
    }
}

impl fmt::Display for CardinalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardinalDirection {
    type Err = DsoError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.as_str() == upper)
            .ok_or_else(|| DsoError::InvalidRequest(format!("unknown direction '{s}'")))
    }
}

/// Everything one search needs. Built by the caller or from
/// [`crate::config::SearchConfig`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub location: ObserverLocation,
    /// "Now" for [`SearchMode::Now`], or any instant on the chosen local date
    pub reference: DateTime<Utc>,
    pub mode: SearchMode,
    /// Local UTC offset in minutes; the host's offset when `None`
    pub utc_offset_minutes: Option<i32>,
    pub min_altitude: f64,
    /// Records whose peak exceeds this are dropped
    pub max_altitude: f64,
    pub magnitude: MagnitudeFilter,
    /// Allowed object types; empty admits every type
    pub object_types: Vec<String>,
    pub peak_direction: Option<CardinalDirection>,
    pub max_results: usize,
    pub sort_by_brightness: bool,
}

impl SearchRequest {
    pub const DEFAULT_MIN_ALTITUDE: f64 = 20.0;
    pub const DEFAULT_MAX_RESULTS: usize = 20;

    /// Request with the default filters and display settings.
    pub fn new(location: ObserverLocation, reference: DateTime<Utc>, mode: SearchMode) -> Self {
        Self {
            location,
            reference,
            mode,
            utc_offset_minutes: None,
            min_altitude: Self::DEFAULT_MIN_ALTITUDE,
            max_altitude: 90.0,
            magnitude: MagnitudeFilter::default(),
            object_types: Vec::new(),
            peak_direction: None,
            max_results: Self::DEFAULT_MAX_RESULTS,
            sort_by_brightness: true,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_results == 0 {
            return Err(DsoError::InvalidRequest(
                "max_results must be at least 1".to_string(),
            ));
        }
        for (label, value) in [
            ("min_altitude", self.min_altitude),
            ("max_altitude", self.max_altitude),
        ] {
            if !value.is_finite() || !(-90.0..=90.0).contains(&value) {
                return Err(DsoError::InvalidRequest(format!(
                    "{label} must be between -90 and 90 degrees, got {value}"
                )));
            }
        }
        if self.min_altitude > self.max_altitude {
            return Err(DsoError::InvalidRequest(format!(
                "min_altitude {} exceeds max_altitude {}",
                self.min_altitude, self.max_altitude
            )));
        }
        match self.magnitude {
            MagnitudeFilter::SkyClass { bortle } if !(1..=9).contains(&bortle) => {
                return Err(DsoError::InvalidRequest(format!(
                    "Bortle class must be 1-9, got {bortle}"
                )));
            }
            MagnitudeFilter::Manual { min, max } if !min.is_finite() || !max.is_finite() => {
                return Err(DsoError::InvalidRequest(
                    "magnitude bounds must be finite".to_string(),
                ));
            }
            _ => {}
        }
        if let Some(minutes) = self.utc_offset_minutes {
            if minutes.abs() >= 24 * 60 {
                return Err(DsoError::InvalidRequest(format!(
                    "UTC offset out of range: {minutes} minutes"
                )));
            }
        }
        Ok(())
    }
}

/// One catalog object that is observable in the darkness window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservabilityRecord {
    pub name: String,
    pub object_type: String,
    pub constellation: String,
    pub magnitude: f64,
    /// Right ascension as written in the catalog
    pub ra: String,
    /// Declination as written in the catalog
    pub dec: String,
    pub ra_formatted: String,
    pub dec_formatted: String,
    pub coordinates: EquatorialCoordinates,
    /// Highest altitude over the whole grid, degrees
    pub peak_altitude: f64,
    /// Azimuth at the peak, degrees
    pub peak_azimuth: f64,
    pub peak_direction: CardinalDirection,
    pub peak_time: ModifiedJulianDate,
    /// Altitude at every grid instant, degrees
    pub altitudes: Vec<f64>,
    /// Azimuth at every grid instant, degrees
    pub azimuths: Vec<f64>,
    /// Threshold the record was admitted with
    pub min_altitude: f64,
    /// Longest run of samples at or above `min_altitude`, hours
    pub max_continuous_hours: f64,
}

impl ObservabilityRecord {
    pub fn peak_time_utc(&self) -> DateTime<Utc> {
        self.peak_time.to_datetime()
    }
}

/// Altitude/azimuth track of an arbitrary target, unfiltered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetTrace {
    pub name: String,
    pub coordinates: EquatorialCoordinates,
    pub altitudes: Vec<f64>,
    pub azimuths: Vec<f64>,
    pub peak_altitude: f64,
    pub peak_time: ModifiedJulianDate,
}

/// Non-fatal per-object failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectWarning {
    pub name: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Found,
    /// No object passed the filters; the window itself is still valid
    NoObjects,
}

/// Result of one search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub window: DarknessWindow,
    pub grid: TimeGrid,
    /// Selected records, in display order
    pub records: Vec<ObservabilityRecord>,
    /// Number of records that passed every filter before selection
    pub candidates: usize,
    pub warnings: Vec<ObjectWarning>,
    /// Moon illuminated fraction at the window midpoint
    pub moon_illumination: Option<f64>,
    pub status: SearchStatus,
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod api_tests;
