//! Astronomical night computation service.
//!
//! Computes the astronomical night (Sun altitude < -18°) around a local
//! midnight for a given observer location. A specific-night search uses the
//! midnight that follows the reference's local date; a search from now starts
//! with the night in progress (the previous evening before local noon).
//! The solver never fails: any degenerate or failed computation degrades to a
//! fixed local-clock window (21:00 to 03:00) with a diagnostic explaining why.

use chrono::{
    DateTime, Days, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta,
    Timelike, Utc,
};
use log::{debug, warn};

use crate::api::{DarknessWindow, ObserverLocation, SearchMode, WindowStatus};
use crate::ephemeris::{EphemerisError, EphemerisProvider};
use crate::models::ModifiedJulianDate;

/// Sun altitude below which the sky counts as astronomically dark.
pub const ASTRONOMICAL_TWILIGHT_DEG: f64 = -18.0;

/// Sun samples across the 24 hours centred on local midnight.
pub const NIGHT_SAMPLES: usize = 100;

/// Local clock hours of the fallback window.
pub const FALLBACK_START_HOUR: u32 = 21;
pub const FALLBACK_END_HOUR: u32 = 3;

/// Offset used when a configured offset is not representable.
pub const DEFAULT_UTC_OFFSET_SECONDS: i32 = 3600;

/// Local hour before which a search from now belongs to the previous night.
const NOON_HOUR: u32 = 12;

/// Attempts in NOW mode: the first night, then the next one if the first
/// has already elapsed.
const MAX_NOW_ATTEMPTS: usize = 2;

/// Resolve the local UTC offset: explicit minutes if given, otherwise the
/// host's current offset.
pub fn resolve_utc_offset(minutes: Option<i32>) -> FixedOffset {
    match minutes {
        Some(m) => FixedOffset::east_opt(m.saturating_mul(60)).unwrap_or_else(default_offset),
        None => host_utc_offset(),
    }
}

/// Current UTC offset of the host's local time zone.
///
/// chrono reports UTC when the host zone cannot be read.
pub fn host_utc_offset() -> FixedOffset {
    Local::now().offset().fix()
}

fn default_offset() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECONDS).unwrap_or_else(|| Utc.fix())
}

/// Zone label such as `UTC+01:00` for a fixed offset.
pub fn zone_label(offset: FixedOffset) -> String {
    let secs = offset.local_minus_utc();
    let sign = if secs < 0 { '-' } else { '+' };
    let secs = secs.abs();
    format!("UTC{}{:02}:{:02}", sign, secs / 3600, (secs % 3600) / 60)
}

pub(crate) fn local_to_utc(local: NaiveDateTime, offset: FixedOffset) -> DateTime<Utc> {
    let shift = TimeDelta::seconds(i64::from(offset.local_minus_utc()));
    let naive_utc = local.checked_sub_signed(shift).unwrap_or(local);
    DateTime::from_naive_utc_and_offset(naive_utc, Utc)
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(1)).unwrap_or(date)
}

fn previous_day(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(1)).unwrap_or(date)
}

/// Local date whose following midnight is sampled first.
fn first_night_date(reference: DateTime<Utc>, mode: SearchMode, offset: FixedOffset) -> NaiveDate {
    let local = reference.with_timezone(&offset);
    match mode {
        SearchMode::Now if local.hour() < NOON_HOUR => previous_day(local.date_naive()),
        _ => local.date_naive(),
    }
}

fn hhmm(instant: ModifiedJulianDate, offset: FixedOffset) -> String {
    instant
        .to_datetime()
        .with_timezone(&offset)
        .format("%H:%M")
        .to_string()
}

/// Fixed 21:00 to 03:00 local window on the reference's local date, moved one
/// day forward if it has already ended.
pub fn fallback_window(reference: DateTime<Utc>, offset: FixedOffset) -> (DateTime<Utc>, DateTime<Utc>) {
    let date = reference.with_timezone(&offset).date_naive();
    let start_time = NaiveTime::from_hms_opt(FALLBACK_START_HOUR, 0, 0).unwrap_or(NaiveTime::MIN);
    let end_time = NaiveTime::from_hms_opt(FALLBACK_END_HOUR, 0, 0).unwrap_or(NaiveTime::MIN);

    let mut start = local_to_utc(date.and_time(start_time), offset);
    let mut end = local_to_utc(next_day(date).and_time(end_time), offset);
    if end < reference {
        start += TimeDelta::days(1);
        end += TimeDelta::days(1);
    }
    (start, end)
}

fn fallback(
    reference: DateTime<Utc>,
    offset: FixedOffset,
    status: WindowStatus,
    reason: String,
) -> DarknessWindow {
    let (start, end) = fallback_window(reference, offset);
    warn!("{reason}; using fallback window {start} to {end}");
    DarknessWindow {
        start: ModifiedJulianDate::from_datetime(start),
        end: ModifiedJulianDate::from_datetime(end),
        status,
        diagnostic: format!(
            "{reason}. Using fallback window: {} to {} UTC",
            start.format("%Y-%m-%d %H:%M"),
            end.format("%Y-%m-%d %H:%M")
        ),
    }
}

/// Dark interval found around one local midnight.
#[derive(Debug, Clone, Copy, PartialEq)]
enum NightSamples {
    /// No sample below the twilight limit
    NoDarkness,
    Dark {
        start: ModifiedJulianDate,
        end: ModifiedJulianDate,
        /// Every sample was dark
        continuous: bool,
    },
}

/// Sample the Sun across ±12 h of the local midnight following `local_date`.
fn sample_night<P: EphemerisProvider + ?Sized>(
    provider: &P,
    location: &ObserverLocation,
    local_date: NaiveDate,
    offset: FixedOffset,
) -> Result<NightSamples, EphemerisError> {
    let midnight = local_to_utc(next_day(local_date).and_time(NaiveTime::MIN), offset);
    let center = ModifiedJulianDate::from_datetime(midnight);
    debug!("Sampling sun altitude around local midnight {midnight} ({NIGHT_SAMPLES} samples)");

    let step = 1.0 / (NIGHT_SAMPLES - 1) as f64;
    let times: Vec<ModifiedJulianDate> = (0..NIGHT_SAMPLES)
        .map(|i| center.add_days(-0.5 + step * i as f64))
        .collect();

    let sun = provider.sun_altaz(location, &times)?;
    let dark: Vec<ModifiedJulianDate> = times
        .iter()
        .zip(&sun)
        .filter(|(_, h)| h.altitude.value() < ASTRONOMICAL_TWILIGHT_DEG)
        .map(|(t, _)| *t)
        .collect();

    match (dark.first(), dark.last()) {
        (Some(&start), Some(&end)) => Ok(NightSamples::Dark {
            start,
            end,
            continuous: dark.len() == times.len(),
        }),
        _ => Ok(NightSamples::NoDarkness),
    }
}

/// Compute the darkness window for a search.
///
/// In [`SearchMode::Now`] the night in progress is tried first, the window
/// never starts before `reference`, and a night that has already ended is
/// replaced by the following one. In
/// [`SearchMode::SpecificNight`] the night of the reference's local date is
/// reported as computed. The returned window always satisfies `start < end`.
pub fn solve_darkness_window<P: EphemerisProvider + ?Sized>(
    provider: &P,
    location: &ObserverLocation,
    reference: DateTime<Utc>,
    mode: SearchMode,
    offset: FixedOffset,
) -> DarknessWindow {
    let mut local_date = first_night_date(reference, mode, offset);

    for attempt in 0..MAX_NOW_ATTEMPTS {
        let samples = match sample_night(provider, location, local_date, offset) {
            Ok(samples) => samples,
            Err(e) => {
                return fallback(
                    reference,
                    offset,
                    WindowStatus::FallbackError,
                    format!("Error computing astronomical night: {e}"),
                )
            }
        };

        let (start, end, continuous) = match samples {
            NightSamples::NoDarkness => {
                return fallback(
                    reference,
                    offset,
                    WindowStatus::FallbackNoDarkness,
                    format!("No astronomical darkness found for the night of {local_date}"),
                )
            }
            NightSamples::Dark {
                start,
                end,
                continuous,
            } => (start, end, continuous),
        };

        if end <= start {
            return fallback(
                reference,
                offset,
                WindowStatus::FallbackInvalid,
                format!("Computed darkness window for {local_date} is empty"),
            );
        }

        let note = if continuous {
            " (continuous darkness through the sampled day)"
        } else {
            ""
        };

        match mode {
            SearchMode::SpecificNight => {
                debug!("Astronomical night for {local_date}: {start:?} to {end:?}");
                return DarknessWindow {
                    start,
                    end,
                    status: WindowStatus::SpecificNight,
                    diagnostic: format!(
                        "Astronomical night for the night of {local_date}: {} - {}{note}",
                        hhmm(start, offset),
                        hhmm(end, offset)
                    ),
                };
            }
            SearchMode::Now => {
                let now = ModifiedJulianDate::from_datetime(reference);
                if end <= now {
                    debug!("Night of {local_date} already over (attempt {})", attempt + 1);
                    local_date = next_day(local_date);
                    continue;
                }
                if start < now {
                    return DarknessWindow {
                        start: now,
                        end,
                        status: WindowStatus::StartsNow,
                        diagnostic: format!(
                            "Astronomical night in progress, window from now until {}{note}",
                            hhmm(end, offset)
                        ),
                    };
                }
                return DarknessWindow {
                    start,
                    end,
                    status: WindowStatus::Computed,
                    diagnostic: format!(
                        "Astronomical night: {} - {}{note}",
                        hhmm(start, offset),
                        hhmm(end, offset)
                    ),
                };
            }
        }
    }

    fallback(
        reference,
        offset,
        WindowStatus::FallbackInvalid,
        "No upcoming astronomical night found".to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::{Almanac, EquatorialCoordinates, HorizontalCoordinates};
    use chrono::TimeZone;

    fn cet() -> FixedOffset {
        FixedOffset::east_opt(3600).unwrap()
    }

    /// Provider returning a constant sun altitude, or failing.
    struct ConstantSun(Option<f64>);

    impl EphemerisProvider for ConstantSun {
        fn sun_altaz(
            &self,
            _location: &ObserverLocation,
            times: &[ModifiedJulianDate],
        ) -> Result<Vec<HorizontalCoordinates>, EphemerisError> {
            let alt = self.0.ok_or(EphemerisError::NonFinite { what: "test" })?;
            Ok(times
                .iter()
                .map(|_| HorizontalCoordinates {
                    altitude: qtty::Degrees::new(alt),
                    azimuth: qtty::Degrees::new(0.0),
                })
                .collect())
        }

        fn target_altaz(
            &self,
            _target: &EquatorialCoordinates,
            _location: &ObserverLocation,
            _times: &[ModifiedJulianDate],
        ) -> Result<Vec<HorizontalCoordinates>, EphemerisError> {
            Err(EphemerisError::EmptyTimes)
        }

        fn moon_illumination(&self, _time: ModifiedJulianDate) -> Result<f64, EphemerisError> {
            Ok(0.0)
        }
    }

    /// Provider that is dark from 19:00 to 05:00 UTC every day.
    struct ClockSun;

    impl EphemerisProvider for ClockSun {
        fn sun_altaz(
            &self,
            _location: &ObserverLocation,
            times: &[ModifiedJulianDate],
        ) -> Result<Vec<HorizontalCoordinates>, EphemerisError> {
            Ok(times
                .iter()
                .map(|t| {
                    let hour = t.to_datetime().hour();
                    let alt = if !(5..19).contains(&hour) { -30.0 } else { 10.0 };
                    HorizontalCoordinates {
                        altitude: qtty::Degrees::new(alt),
                        azimuth: qtty::Degrees::new(0.0),
                    }
                })
                .collect())
        }

        fn target_altaz(
            &self,
            _target: &EquatorialCoordinates,
            _location: &ObserverLocation,
            _times: &[ModifiedJulianDate],
        ) -> Result<Vec<HorizontalCoordinates>, EphemerisError> {
            Err(EphemerisError::EmptyTimes)
        }

        fn moon_illumination(&self, _time: ModifiedJulianDate) -> Result<f64, EphemerisError> {
            Ok(0.0)
        }
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_first_night_date() {
        let before_noon = Utc.with_ymd_and_hms(2024, 1, 16, 1, 0, 0).unwrap();
        let after_noon = Utc.with_ymd_and_hms(2024, 1, 16, 13, 0, 0).unwrap();
        let jan15 = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let jan16 = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();

        assert_eq!(first_night_date(before_noon, SearchMode::Now, utc()), jan15);
        assert_eq!(first_night_date(after_noon, SearchMode::Now, utc()), jan16);
        assert_eq!(first_night_date(before_noon, SearchMode::SpecificNight, utc()), jan16);
        // 11:30 UTC is 12:30 in CET, already the afternoon
        let late_morning = Utc.with_ymd_and_hms(2024, 1, 16, 11, 30, 0).unwrap();
        assert_eq!(first_night_date(late_morning, SearchMode::Now, cet()), jan16);
    }

    #[test]
    fn test_now_after_midnight_keeps_night_in_progress() {
        let location = ObserverLocation::default();
        let reference = Utc.with_ymd_and_hms(2024, 1, 16, 2, 0, 0).unwrap();
        let window = solve_darkness_window(&ClockSun, &location, reference, SearchMode::Now, utc());

        assert_eq!(window.status, WindowStatus::StartsNow);
        assert_eq!(window.start, ModifiedJulianDate::from_datetime(reference));
        assert!(window.end_utc() > reference);
        assert!(window.end_utc() <= Utc.with_ymd_and_hms(2024, 1, 16, 5, 0, 0).unwrap());
    }

    #[test]
    fn test_now_after_dawn_moves_to_next_night() {
        let location = ObserverLocation::default();
        // 08:00: last night ended at 05:00, tonight starts at 19:00
        let reference = Utc.with_ymd_and_hms(2024, 1, 16, 8, 0, 0).unwrap();
        let window = solve_darkness_window(&ClockSun, &location, reference, SearchMode::Now, utc());

        assert_eq!(window.status, WindowStatus::Computed);
        assert!(window.start_utc() >= Utc.with_ymd_and_hms(2024, 1, 16, 19, 0, 0).unwrap());
        assert!(window.start_utc() < Utc.with_ymd_and_hms(2024, 1, 16, 19, 20, 0).unwrap());
        assert!(window.end_utc() < Utc.with_ymd_and_hms(2024, 1, 17, 5, 0, 0).unwrap());
    }

    #[test]
    fn test_zone_label() {
        assert_eq!(zone_label(cet()), "UTC+01:00");
        assert_eq!(zone_label(FixedOffset::west_opt(5 * 3600 + 1800).unwrap()), "UTC-05:30");
    }

    #[test]
    fn test_resolve_explicit_offset() {
        assert_eq!(resolve_utc_offset(Some(120)).local_minus_utc(), 7200);
        assert_eq!(resolve_utc_offset(Some(-300)).local_minus_utc(), -18000);
    }

    #[test]
    fn test_resolve_unset_and_unrepresentable_offsets() {
        assert_eq!(resolve_utc_offset(None), host_utc_offset());
        assert!(host_utc_offset().local_minus_utc().abs() < 86_400);
        // ±24 h is outside chrono's range
        assert_eq!(
            resolve_utc_offset(Some(24 * 60)).local_minus_utc(),
            DEFAULT_UTC_OFFSET_SECONDS
        );
    }

    #[test]
    fn test_fallback_window_local_clock() {
        let reference = Utc.with_ymd_and_hms(2024, 6, 21, 10, 0, 0).unwrap();
        let (start, end) = fallback_window(reference, cet());
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 6, 21, 20, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 6, 22, 2, 0, 0).unwrap());
    }

    #[test]
    fn test_fallback_window_shifts_when_elapsed() {
        // 03:30 local (02:30 UTC): today's 21:00 to 03:00 window ends before it
        let reference = Utc.with_ymd_and_hms(2024, 6, 22, 2, 30, 0).unwrap();
        let (start, end) = fallback_window(reference, cet());
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 6, 23, 20, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 6, 24, 2, 0, 0).unwrap());
    }

    #[test]
    fn test_specific_night_winter_mid_latitude() {
        let location = ObserverLocation::default();
        let reference = Utc.with_ymd_and_hms(2024, 1, 15, 11, 0, 0).unwrap();
        let window = solve_darkness_window(
            &Almanac::new(),
            &location,
            reference,
            SearchMode::SpecificNight,
            cet(),
        );

        assert_eq!(window.status, WindowStatus::SpecificNight);
        assert!(window.diagnostic.contains("2024-01-15"));
        // Mid-January at 47°N: roughly 18:30 to 05:45 local
        let hours = window.duration_hours();
        assert!(hours > 9.5 && hours < 12.5, "night length {hours}");
        assert!(window.start_utc() > Utc.with_ymd_and_hms(2024, 1, 15, 16, 0, 0).unwrap());
        assert!(window.end_utc() < Utc.with_ymd_and_hms(2024, 1, 16, 6, 0, 0).unwrap());
    }

    #[test]
    fn test_now_mode_clamps_start_to_reference() {
        let location = ObserverLocation::default();
        // 22:00 local, already astronomically dark
        let reference = Utc.with_ymd_and_hms(2024, 1, 15, 21, 0, 0).unwrap();
        let window =
            solve_darkness_window(&Almanac::new(), &location, reference, SearchMode::Now, cet());

        assert_eq!(window.status, WindowStatus::StartsNow);
        assert_eq!(window.start, ModifiedJulianDate::from_datetime(reference));
        assert!(window.start < window.end);
    }

    #[test]
    fn test_now_mode_before_dusk_reports_full_night() {
        let location = ObserverLocation::default();
        let reference = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let window =
            solve_darkness_window(&Almanac::new(), &location, reference, SearchMode::Now, cet());

        assert_eq!(window.status, WindowStatus::Computed);
        assert!(window.start > ModifiedJulianDate::from_datetime(reference));
    }

    #[test]
    fn test_polar_summer_falls_back() {
        let location = ObserverLocation::new(78.0, 15.0, 0.0).unwrap();
        let reference = Utc.with_ymd_and_hms(2024, 6, 21, 10, 0, 0).unwrap();
        let window = solve_darkness_window(
            &Almanac::new(),
            &location,
            reference,
            SearchMode::SpecificNight,
            cet(),
        );

        assert_eq!(window.status, WindowStatus::FallbackNoDarkness);
        assert!(window.diagnostic.contains("No astronomical darkness"));
        assert!(window.diagnostic.contains("fallback window"));
        assert!(window.start < window.end);
        assert!((window.duration_hours() - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_continuous_darkness_is_noted() {
        let location = ObserverLocation::default();
        let reference = Utc.with_ymd_and_hms(2024, 1, 15, 11, 0, 0).unwrap();
        let window = solve_darkness_window(
            &ConstantSun(Some(-40.0)),
            &location,
            reference,
            SearchMode::SpecificNight,
            cet(),
        );

        assert_eq!(window.status, WindowStatus::SpecificNight);
        assert!(window.diagnostic.contains("continuous darkness"));
        assert!((window.duration_hours() - 24.0).abs() < 1e-6);
    }

    #[test]
    fn test_provider_error_falls_back() {
        let location = ObserverLocation::default();
        let reference = Utc.with_ymd_and_hms(2024, 1, 15, 11, 0, 0).unwrap();
        let window = solve_darkness_window(
            &ConstantSun(None),
            &location,
            reference,
            SearchMode::Now,
            cet(),
        );

        assert_eq!(window.status, WindowStatus::FallbackError);
        assert!(window.diagnostic.starts_with("Error computing astronomical night"));
        assert!(window.start < window.end);
    }
}
