//! Coordinate and ephemeris provider.
//!
//! The observability engine never computes positions itself; it asks an
//! [`EphemerisProvider`] for horizontal coordinates of the Sun or of a fixed
//! equatorial target at a batch of instants, and for the Moon's illuminated
//! fraction. [`Almanac`] is the built-in provider, backed by siderust.

pub mod almanac;

pub use almanac::Almanac;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::ObserverLocation;
use crate::models::ModifiedJulianDate;

/// Errors raised by an ephemeris provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EphemerisError {
    /// No instants were supplied
    #[error("no time instants supplied")]
    EmptyTimes,

    /// A NaN or infinite input
    #[error("non-finite {what}")]
    NonFinite { what: &'static str },

    /// An input outside its physical range
    #[error("{what} out of range: {value}")]
    OutOfRange { what: &'static str, value: f64 },
}

/// Fixed J2000 equatorial coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquatorialCoordinates {
    /// Right ascension
    pub ra: qtty::Degrees,
    /// Declination
    pub dec: qtty::Degrees,
}

impl EquatorialCoordinates {
    pub fn new(ra_deg: f64, dec_deg: f64) -> Self {
        Self {
            ra: qtty::Degrees::new(ra_deg),
            dec: qtty::Degrees::new(dec_deg),
        }
    }
}

/// Local horizontal coordinates. Azimuth is measured from north through east.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalCoordinates {
    pub altitude: qtty::Degrees,
    pub azimuth: qtty::Degrees,
}

/// Source of positions for the observability engine.
///
/// Implementations must be pure functions of (coordinate, location, time) so
/// a single provider can serve independent searches concurrently.
pub trait EphemerisProvider: Send + Sync {
    /// Horizontal coordinates of the Sun at each instant.
    fn sun_altaz(
        &self,
        location: &ObserverLocation,
        times: &[ModifiedJulianDate],
    ) -> Result<Vec<HorizontalCoordinates>, EphemerisError>;

    /// Horizontal coordinates of a fixed equatorial target at each instant.
    fn target_altaz(
        &self,
        target: &EquatorialCoordinates,
        location: &ObserverLocation,
        times: &[ModifiedJulianDate],
    ) -> Result<Vec<HorizontalCoordinates>, EphemerisError>;

    /// Illuminated fraction of the Moon (0 = new, 1 = full).
    fn moon_illumination(&self, time: ModifiedJulianDate) -> Result<f64, EphemerisError>;
}
