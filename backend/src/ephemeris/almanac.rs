//! siderust-backed ephemeris.
//!
//! Sun and fixed-target positions come from siderust's altitude and azimuth
//! providers (VSOP87 Sun, J2000 ICRS directions carried to the date), and the
//! Moon's illuminated fraction from its geocentric phase geometry.

use siderust::bodies::Sun;
use siderust::coordinates::centers::Geodetic;
use siderust::coordinates::frames::ECEF;
use siderust::coordinates::spherical::direction::ICRS;
use siderust::ephemeris::Vsop87Ephemeris;
use siderust::event::altitude::AltitudeProvider;
use siderust::event::azimuth::AzimuthProvider;
use siderust::moon_phase_geocentric;
use siderust::qtty::{Degree, Degrees as SiderustDegrees, Meter, Quantity, Radians};
use siderust::time::{JulianDate as SiderustJD, ModifiedJulianDate as SiderustMJD};

use super::{EphemerisError, EphemerisProvider, EquatorialCoordinates, HorizontalCoordinates};
use crate::api::ObserverLocation;
use crate::models::ModifiedJulianDate;

/// Built-in [`EphemerisProvider`] on top of siderust.
#[derive(Debug, Clone, Copy, Default)]
pub struct Almanac;

impl Almanac {
    pub fn new() -> Self {
        Self
    }
}

/// Convert an API `ObserverLocation` to a siderust geodetic site.
fn to_site(location: &ObserverLocation) -> Geodetic<ECEF> {
    Geodetic::<ECEF>::new(
        SiderustDegrees::new(location.longitude()),
        SiderustDegrees::new(location.latitude()),
        Quantity::<Meter>::new(location.elevation_m()),
    )
}

/// UTC instant on siderust's TT axis.
fn to_siderust_mjd(time: ModifiedJulianDate) -> SiderustMJD {
    SiderustMJD::from_chrono(time.to_datetime())
}

fn degrees(angle: Radians) -> f64 {
    angle.to::<Degree>().value()
}

fn horizontal<T>(body: &T, site: &Geodetic<ECEF>, time: ModifiedJulianDate) -> HorizontalCoordinates
where
    T: AltitudeProvider + AzimuthProvider,
{
    let mjd = to_siderust_mjd(time);
    HorizontalCoordinates {
        altitude: qtty::Degrees::new(degrees(body.altitude_at(site, mjd))),
        azimuth: qtty::Degrees::new(degrees(body.azimuth_at(site, mjd)).rem_euclid(360.0)),
    }
}

fn check_inputs(
    location: &ObserverLocation,
    times: &[ModifiedJulianDate],
) -> Result<(), EphemerisError> {
    if times.is_empty() {
        return Err(EphemerisError::EmptyTimes);
    }
    let lat = location.latitude();
    let lon = location.longitude();
    if !lat.is_finite() {
        return Err(EphemerisError::NonFinite { what: "latitude" });
    }
    if !lon.is_finite() {
        return Err(EphemerisError::NonFinite { what: "longitude" });
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(EphemerisError::OutOfRange {
            what: "latitude",
            value: lat,
        });
    }
    if times.iter().any(|t| !t.value().is_finite()) {
        return Err(EphemerisError::NonFinite { what: "time" });
    }
    Ok(())
}

impl EphemerisProvider for Almanac {
    fn sun_altaz(
        &self,
        location: &ObserverLocation,
        times: &[ModifiedJulianDate],
    ) -> Result<Vec<HorizontalCoordinates>, EphemerisError> {
        check_inputs(location, times)?;
        let site = to_site(location);
        Ok(times.iter().map(|&t| horizontal(&Sun, &site, t)).collect())
    }

    fn target_altaz(
        &self,
        target: &EquatorialCoordinates,
        location: &ObserverLocation,
        times: &[ModifiedJulianDate],
    ) -> Result<Vec<HorizontalCoordinates>, EphemerisError> {
        check_inputs(location, times)?;
        let (ra, dec) = (target.ra.value(), target.dec.value());
        if !ra.is_finite() || !dec.is_finite() {
            return Err(EphemerisError::NonFinite {
                what: "target coordinate",
            });
        }
        if !(-90.0..=90.0).contains(&dec) {
            return Err(EphemerisError::OutOfRange {
                what: "declination",
                value: dec,
            });
        }

        let site = to_site(location);
        let direction = ICRS::new(SiderustDegrees::new(ra), SiderustDegrees::new(dec));
        Ok(times
            .iter()
            .map(|&t| horizontal(&direction, &site, t))
            .collect())
    }

    fn moon_illumination(&self, time: ModifiedJulianDate) -> Result<f64, EphemerisError> {
        if !time.value().is_finite() {
            return Err(EphemerisError::NonFinite { what: "time" });
        }
        let jd = SiderustJD::from_chrono(time.to_datetime());
        let phase = moon_phase_geocentric::<Vsop87Ephemeris>(jd);
        Ok(phase.illuminated_fraction.value().clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::{TimeZone, Utc};

    fn mjd(y: i32, m: u32, d: u32, h: u32, min: u32) -> ModifiedJulianDate {
        ModifiedJulianDate::from_datetime(Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap())
    }

    #[test]
    fn test_pole_altitude_matches_latitude() {
        let location = ObserverLocation::new(47.17, 8.01, 550.0).unwrap();
        let pole = EquatorialCoordinates::new(0.0, 90.0);
        let times: Vec<_> = (0..24).map(|h| mjd(2024, 1, 1, h, 0)).collect();
        let out = Almanac::new().target_altaz(&pole, &location, &times).unwrap();
        // J2000 pole has precessed by about a third of a degree
        for h in out {
            assert_abs_diff_eq!(h.altitude.value(), 47.17, epsilon = 0.6);
        }
    }

    #[test]
    fn test_sun_at_solar_noon_near_solstice() {
        // 47.17°N: 90 - 47.17 + 23.44
        let location = ObserverLocation::new(47.17, 8.01, 550.0).unwrap();
        let out = Almanac::new()
            .sun_altaz(&location, &[mjd(2024, 6, 20, 11, 29)])
            .unwrap();
        assert_abs_diff_eq!(out[0].altitude.value(), 66.27, epsilon = 0.3);
        assert_abs_diff_eq!(out[0].azimuth.value(), 180.0, epsilon = 3.0);
    }

    #[test]
    fn test_sun_below_horizon_at_local_midnight() {
        let location = ObserverLocation::new(47.17, 8.01, 550.0).unwrap();
        let out = Almanac::new()
            .sun_altaz(&location, &[mjd(2024, 1, 15, 23, 30)])
            .unwrap();
        assert!(out[0].altitude.value() < -18.0);
    }

    #[test]
    fn test_azimuth_is_normalised() {
        let location = ObserverLocation::new(-33.0, 151.0, 0.0).unwrap();
        let times: Vec<_> = (0..48).map(|i| mjd(2024, 3, 1, 0, 0).add_days(i as f64 / 48.0)).collect();
        let out = Almanac::new().sun_altaz(&location, &times).unwrap();
        assert!(out
            .iter()
            .all(|h| (0.0..360.0).contains(&h.azimuth.value())));
    }

    #[test]
    fn test_empty_times_rejected() {
        let location = ObserverLocation::new(0.0, 0.0, 0.0).unwrap();
        let err = Almanac::new().sun_altaz(&location, &[]).unwrap_err();
        assert_eq!(err, EphemerisError::EmptyTimes);
    }

    #[test]
    fn test_bad_declination_rejected() {
        let location = ObserverLocation::new(0.0, 0.0, 0.0).unwrap();
        let target = EquatorialCoordinates::new(10.0, 95.0);
        let err = Almanac::new()
            .target_altaz(&target, &location, &[mjd(2024, 1, 1, 0, 0)])
            .unwrap_err();
        assert!(matches!(err, EphemerisError::OutOfRange { what: "declination", .. }));
    }

    #[test]
    fn test_moon_illumination_full_and_new() {
        let almanac = Almanac::new();
        // full moon 2024-01-25 17:54 UTC, new moon 2024-02-09 22:59 UTC
        let full = almanac.moon_illumination(mjd(2024, 1, 25, 17, 54)).unwrap();
        let new = almanac.moon_illumination(mjd(2024, 2, 9, 22, 59)).unwrap();
        assert!(full > 0.95, "full moon illumination {full}");
        assert!(new < 0.05, "new moon illumination {new}");
    }
}
