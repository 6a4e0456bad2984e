//! Search configuration file support.
//!
//! This module reads search settings (observer location, night selection,
//! filters and display options) from TOML configuration files and turns them
//! into a validated [`SearchRequest`].

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::{
    CardinalDirection, MagnitudeFilter, ObserverLocation, SearchMode, SearchRequest,
    DEFAULT_ELEVATION_M, DEFAULT_LATITUDE, DEFAULT_LONGITUDE,
};
use crate::error::{DsoError, Result};
use crate::models::catalog;
use crate::services::astronomical_night::{local_to_utc, resolve_utc_offset};

/// Name of the configuration file looked up by [`SearchConfig::from_default_location`].
pub const CONFIG_FILE_NAME: &str = "dso-finder.toml";

/// Search configuration from file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub location: LocationSettings,
    #[serde(default)]
    pub time: TimeSettings,
    #[serde(default)]
    pub filters: FilterSettings,
    #[serde(default)]
    pub display: DisplaySettings,
}

/// Observer location settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSettings {
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_elevation_m")]
    pub elevation_m: f64,
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            elevation_m: DEFAULT_ELEVATION_M,
        }
    }
}

/// Which night to search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSettings {
    #[serde(default)]
    pub mode: SearchMode,
    /// Local calendar date, required for `specific_night`
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Local UTC offset in minutes; the host offset when absent
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

/// Object filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSettings {
    #[serde(default = "default_min_altitude")]
    pub min_altitude_deg: f64,
    #[serde(default = "default_max_altitude")]
    pub max_altitude_deg: f64,
    #[serde(default)]
    pub magnitude: MagnitudeFilter,
    #[serde(default)]
    pub object_types: Vec<String>,
    #[serde(default)]
    pub peak_direction: Option<String>,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            min_altitude_deg: default_min_altitude(),
            max_altitude_deg: default_max_altitude(),
            magnitude: MagnitudeFilter::default(),
            object_types: Vec::new(),
            peak_direction: None,
        }
    }
}

/// Result display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_sort_by_brightness")]
    pub sort_by_brightness: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            sort_by_brightness: default_sort_by_brightness(),
        }
    }
}

fn default_latitude() -> f64 {
    DEFAULT_LATITUDE
}

fn default_longitude() -> f64 {
    DEFAULT_LONGITUDE
}

fn default_elevation_m() -> f64 {
    DEFAULT_ELEVATION_M
}

fn default_min_altitude() -> f64 {
    SearchRequest::DEFAULT_MIN_ALTITUDE
}

fn default_max_altitude() -> f64 {
    90.0
}

fn default_max_results() -> usize {
    SearchRequest::DEFAULT_MAX_RESULTS
}

fn default_sort_by_brightness() -> bool {
    true
}

impl SearchConfig {
    /// Load search configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(SearchConfig)` if successful
    /// * `Err(DsoError::Config)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| DsoError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Parse search configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| DsoError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Load search configuration from the default location.
    ///
    /// Searches for `dso-finder.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self> {
        let search_paths = [
            PathBuf::from(CONFIG_FILE_NAME),
            PathBuf::from("backend").join(CONFIG_FILE_NAME),
            PathBuf::from("..").join(CONFIG_FILE_NAME),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(DsoError::Config(format!(
            "No {} found in standard locations",
            CONFIG_FILE_NAME
        )))
    }

    pub fn observer_location(&self) -> Result<ObserverLocation> {
        ObserverLocation::new(
            self.location.latitude,
            self.location.longitude,
            self.location.elevation_m,
        )
    }

    /// Build a validated request. `now` is the reference for `now` mode; a
    /// specific night uses local noon of the configured date.
    pub fn to_request(&self, now: DateTime<Utc>) -> Result<SearchRequest> {
        let location = self.observer_location()?;

        let reference = match self.time.mode {
            SearchMode::Now => now,
            SearchMode::SpecificNight => {
                let date = self.time.date.ok_or_else(|| {
                    DsoError::Config("time.date is required for specific_night".to_string())
                })?;
                let offset = resolve_utc_offset(self.time.utc_offset_minutes);
                let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN);
                local_to_utc(date.and_time(noon), offset)
            }
        };

        let peak_direction = self
            .filters
            .peak_direction
            .as_deref()
            .map(str::parse::<CardinalDirection>)
            .transpose()?;

        let known = catalog::object_types();
        for object_type in &self.filters.object_types {
            if !known.contains(object_type) {
                warn!("Object type '{object_type}' does not occur in the catalog");
            }
        }

        let request = SearchRequest {
            location,
            reference,
            mode: self.time.mode,
            utc_offset_minutes: self.time.utc_offset_minutes,
            min_altitude: self.filters.min_altitude_deg,
            max_altitude: self.filters.max_altitude_deg,
            magnitude: self.filters.magnitude,
            object_types: self.filters.object_types.clone(),
            peak_direction,
            max_results: self.display.max_results,
            sort_by_brightness: self.display.sort_by_brightness,
        };
        request.validate()?;
        Ok(request)
    }
}
