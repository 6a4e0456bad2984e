//! End-to-end search pipeline.
//!
//! location + time settings → darkness window → time grid → visibility
//! evaluation → peak filters → selection.

use log::{info, warn};
use rand::Rng;

use crate::api::{SearchOutcome, SearchRequest, SearchStatus};
use crate::ephemeris::{Almanac, EphemerisProvider};
use crate::error::{DsoError, Result};
use crate::models::TimeGrid;
use crate::services::astronomical_night::{resolve_utc_offset, solve_darkness_window};
use crate::services::selection::select;
use crate::services::visibility_computer::{evaluate, VisibilityFilter};

/// Run a search with the built-in [`Almanac`] and the thread-local RNG.
pub fn search(request: &SearchRequest) -> Result<SearchOutcome> {
    run_search(&Almanac::new(), request, &mut rand::thread_rng())
}

/// Run a search with an explicit provider and random source.
///
/// Only request validation can fail; window and per-object problems are
/// reported inside the outcome.
pub fn run_search<P, R>(provider: &P, request: &SearchRequest, rng: &mut R) -> Result<SearchOutcome>
where
    P: EphemerisProvider + ?Sized,
    R: Rng + ?Sized,
{
    request.validate()?;

    let offset = resolve_utc_offset(request.utc_offset_minutes);
    let window = solve_darkness_window(
        provider,
        &request.location,
        request.reference,
        request.mode,
        offset,
    );
    let grid = TimeGrid::spanning(window.start, window.end).ok_or_else(|| {
        DsoError::InvalidRequest(format!(
            "darkness window {:?} to {:?} is empty",
            window.start, window.end
        ))
    })?;

    let filter = VisibilityFilter {
        min_altitude: request.min_altitude,
        magnitude: request.magnitude,
        object_types: &request.object_types,
    };
    let mut evaluation = evaluate(provider, &request.location, &grid, &filter);

    evaluation.records.retain(|r| {
        r.peak_altitude <= request.max_altitude
            && request.peak_direction.map_or(true, |d| r.peak_direction == d)
    });

    let moon_illumination = match provider.moon_illumination(window.period().midpoint()) {
        Ok(fraction) => Some(fraction),
        Err(e) => {
            warn!("Moon illumination unavailable: {e}");
            None
        }
    };

    let candidates = evaluation.records.len();
    let records = select(
        evaluation.records,
        request.max_results,
        request.sort_by_brightness,
        rng,
    );
    let status = if records.is_empty() {
        SearchStatus::NoObjects
    } else {
        SearchStatus::Found
    };

    info!(
        "Search complete: {} of {} candidates selected over {:.1} h ({} warnings)",
        records.len(),
        candidates,
        window.duration_hours(),
        evaluation.warnings.len()
    );

    Ok(SearchOutcome {
        window,
        grid,
        records,
        candidates,
        warnings: evaluation.warnings,
        moon_illumination,
        status,
    })
}
