//! Visibility computation service.
//!
//! Evaluates every catalog object over a [`TimeGrid`] spanning the darkness
//! window and keeps those that pass:
//!
//! - Object type filter (empty means every type)
//! - Magnitude filter (sky class limit or manual bounds)
//! - Altitude threshold reached at least once on the grid
//!
//! Each survivor becomes an [`ObservabilityRecord`] carrying its full
//! altitude/azimuth track. A failed transform for one object is turned into
//! an [`ObjectWarning`] and the loop carries on.

use log::{debug, warn};

use crate::api::{
    CardinalDirection, MagnitudeFilter, ObjectWarning, ObservabilityRecord, ObserverLocation,
    TargetTrace,
};
use crate::ephemeris::{EphemerisProvider, EquatorialCoordinates, HorizontalCoordinates};
use crate::error::{DsoError, Result};
use crate::models::catalog::{self, format_dec, format_ra, CatalogEntry};
use crate::models::TimeGrid;

/// Object filters applied before any coordinate work.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityFilter<'a> {
    pub min_altitude: f64,
    pub magnitude: MagnitudeFilter,
    pub object_types: &'a [String],
}

impl VisibilityFilter<'_> {
    fn admits_type(&self, object_type: &str) -> bool {
        self.object_types.is_empty() || self.object_types.iter().any(|t| t == object_type)
    }
}

/// Records and per-object warnings from one evaluation pass.
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    pub records: Vec<ObservabilityRecord>,
    pub warnings: Vec<ObjectWarning>,
}

/// Evaluate the built-in catalog. Output follows catalog order.
pub fn evaluate<P: EphemerisProvider + ?Sized>(
    provider: &P,
    location: &ObserverLocation,
    grid: &TimeGrid,
    filter: &VisibilityFilter<'_>,
) -> Evaluation {
    evaluate_entries(provider, location, grid, filter, catalog::catalog())
}

/// Evaluate an arbitrary slice of entries.
pub fn evaluate_entries<P: EphemerisProvider + ?Sized>(
    provider: &P,
    location: &ObserverLocation,
    grid: &TimeGrid,
    filter: &VisibilityFilter<'_>,
    entries: &[CatalogEntry],
) -> Evaluation {
    let mut evaluation = Evaluation::default();

    for entry in entries {
        if !filter.admits_type(entry.object_type) || !filter.magnitude.admits(entry.magnitude) {
            continue;
        }

        match evaluate_entry(provider, location, grid, filter.min_altitude, entry) {
            Ok(Some(record)) => evaluation.records.push(record),
            Ok(None) => {}
            Err(e) => {
                warn!("Skipping {}: {e}", entry.name);
                evaluation.warnings.push(ObjectWarning {
                    name: entry.name.to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    debug!(
        "Evaluated {} entries over {} grid points: {} observable, {} warnings",
        entries.len(),
        grid.len(),
        evaluation.records.len(),
        evaluation.warnings.len()
    );
    evaluation
}

/// Track one entry; `Ok(None)` when it never reaches `min_altitude`.
fn evaluate_entry<P: EphemerisProvider + ?Sized>(
    provider: &P,
    location: &ObserverLocation,
    grid: &TimeGrid,
    min_altitude: f64,
    entry: &CatalogEntry,
) -> Result<Option<ObservabilityRecord>> {
    let coordinates = entry.coordinates()?;
    let track = compute_track(provider, &coordinates, location, grid)?;

    if !track.altitudes.iter().any(|&alt| alt >= min_altitude) {
        return Ok(None);
    }

    // Peak is the maximum over the whole grid, not only the visible samples
    let peak = track.peak_index();
    let peak_azimuth = track.azimuths[peak];

    Ok(Some(ObservabilityRecord {
        name: entry.name.to_string(),
        object_type: entry.object_type.to_string(),
        constellation: entry.constellation.to_string(),
        magnitude: entry.magnitude,
        ra: entry.ra.to_string(),
        dec: entry.dec.to_string(),
        ra_formatted: format_ra(coordinates.ra.value()),
        dec_formatted: format_dec(coordinates.dec.value()),
        coordinates,
        peak_altitude: track.altitudes[peak],
        peak_azimuth,
        peak_direction: CardinalDirection::from_azimuth(peak_azimuth),
        peak_time: grid.times()[peak],
        max_continuous_hours: longest_run_hours(&track.altitudes, min_altitude, grid.step_hours()),
        min_altitude,
        altitudes: track.altitudes,
        azimuths: track.azimuths,
    }))
}

struct Track {
    altitudes: Vec<f64>,
    azimuths: Vec<f64>,
}

impl Track {
    /// Index of the first maximum altitude.
    fn peak_index(&self) -> usize {
        self.altitudes
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |(best, best_alt), (i, &alt)| {
                if alt > best_alt {
                    (i, alt)
                } else {
                    (best, best_alt)
                }
            })
            .0
    }
}

fn compute_track<P: EphemerisProvider + ?Sized>(
    provider: &P,
    coordinates: &EquatorialCoordinates,
    location: &ObserverLocation,
    grid: &TimeGrid,
) -> Result<Track> {
    let horizontal: Vec<HorizontalCoordinates> =
        provider.target_altaz(coordinates, location, grid.times())?;
    if horizontal.len() != grid.len() {
        return Err(DsoError::InvalidRequest(format!(
            "provider returned {} positions for {} instants",
            horizontal.len(),
            grid.len()
        )));
    }
    if horizontal
        .iter()
        .any(|h| !h.altitude.value().is_finite() || !h.azimuth.value().is_finite())
    {
        return Err(crate::ephemeris::EphemerisError::NonFinite {
            what: "horizontal coordinate",
        }
        .into());
    }

    Ok(Track {
        altitudes: horizontal.iter().map(|h| h.altitude.value()).collect(),
        azimuths: horizontal.iter().map(|h| h.azimuth.value()).collect(),
    })
}

/// Longest stretch of consecutive samples at or above `threshold`, in hours.
///
/// Each qualifying sample stands for one grid step.
pub fn longest_run_hours(altitudes: &[f64], threshold: f64, step_hours: f64) -> f64 {
    let mut longest = 0usize;
    let mut current = 0usize;
    for &alt in altitudes {
        if alt >= threshold {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest as f64 * step_hours
}

/// Altitude/azimuth track of an arbitrary target given in sexagesimal form.
pub fn trace_custom_target<P: EphemerisProvider + ?Sized>(
    provider: &P,
    location: &ObserverLocation,
    grid: &TimeGrid,
    name: &str,
    ra: &str,
    dec: &str,
) -> Result<TargetTrace> {
    let coordinates = catalog::parse_equatorial(ra, dec)?;
    let track = compute_track(provider, &coordinates, location, grid)?;
    let peak = track.peak_index();

    Ok(TargetTrace {
        name: name.to_string(),
        coordinates,
        peak_altitude: track.altitudes[peak],
        peak_time: grid.times()[peak],
        altitudes: track.altitudes,
        azimuths: track.azimuths,
    })
}
