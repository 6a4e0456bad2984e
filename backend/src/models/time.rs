use serde::*;

/// Offset between Julian Date and Modified Julian Date.
pub const MJD_JD_OFFSET: f64 = 2_400_000.5;

/// Modified Julian Date representation.
/// MJD 0 = 1858-11-17 00:00:00 UTC
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct ModifiedJulianDate(qtty::Days);

impl ModifiedJulianDate {
    /// Create a new MJD value.
    pub fn new<V: Into<qtty::Days>>(v: V) -> Self {
        Self(v.into())
    }

    /// Raw MJD value as f64.
    pub fn value(&self) -> f64 {
        self.0.value()
    }

    /// Create from a Julian Date.
    pub fn from_julian_date(jd: f64) -> Self {
        Self::new(jd - MJD_JD_OFFSET)
    }

    /// Julian Date of this instant.
    pub fn julian_date(&self) -> f64 {
        self.value() + MJD_JD_OFFSET
    }

    /// Shift by a (possibly fractional, possibly negative) number of days.
    pub fn add_days(&self, days: f64) -> Self {
        Self::new(self.value() + days)
    }

    /// Convert to Unix timestamp (seconds since 1970-01-01 00:00:00 UTC).
    pub fn to_unix_timestamp(&self) -> f64 {
        (self.value() - 40587.0) * 86400.0
    }

    /// Create from Unix timestamp (seconds since 1970-01-01 00:00:00 UTC).
    pub fn from_unix_timestamp(timestamp: f64) -> Self {
        Self::new(timestamp / 86400.0 + 40587.0)
    }

    /// Convert to chrono DateTime<Utc>, rounded to the millisecond.
    pub fn to_datetime(&self) -> chrono::DateTime<chrono::Utc> {
        let millis = (self.to_unix_timestamp() * 1000.0).round() as i64;
        chrono::DateTime::from_timestamp_millis(millis).unwrap_or(chrono::DateTime::UNIX_EPOCH)
    }

    /// Create from chrono DateTime<Utc>.
    pub fn from_datetime(dt: chrono::DateTime<chrono::Utc>) -> Self {
        Self::from_unix_timestamp(dt.timestamp() as f64 + dt.timestamp_subsec_nanos() as f64 / 1e9)
    }
}

impl From<f64> for ModifiedJulianDate {
    fn from(v: f64) -> Self {
        ModifiedJulianDate::new(v)
    }
}

impl From<chrono::DateTime<chrono::Utc>> for ModifiedJulianDate {
    fn from(dt: chrono::DateTime<chrono::Utc>) -> Self {
        ModifiedJulianDate::from_datetime(dt)
    }
}

/// Evenly spaced, strictly increasing sampling instants covering a window.
///
/// Both endpoints are included. The spacing never exceeds five minutes and a
/// grid always has at least [`TimeGrid::MIN_POINTS`] samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeGrid {
    times: Vec<ModifiedJulianDate>,
}

impl TimeGrid {
    /// Minimum number of samples in any grid.
    pub const MIN_POINTS: usize = 20;
    /// Samples per hour of window (one every five minutes).
    pub const POINTS_PER_HOUR: f64 = 12.0;

    /// Build a grid over `[start, stop]`. Returns `None` unless `start < stop`.
    pub fn spanning(start: ModifiedJulianDate, stop: ModifiedJulianDate) -> Option<Self> {
        let span_days = stop.value() - start.value();
        if !span_days.is_finite() || span_days <= 0.0 {
            return None;
        }

        let hours = span_days * 24.0;
        let count = ((hours * Self::POINTS_PER_HOUR).ceil() as usize + 1).max(Self::MIN_POINTS);
        let step = span_days / (count - 1) as f64;

        let mut times: Vec<ModifiedJulianDate> = (0..count - 1)
            .map(|i| start.add_days(step * i as f64))
            .collect();
        times.push(stop);

        Some(Self { times })
    }

    pub fn times(&self) -> &[ModifiedJulianDate] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn start(&self) -> ModifiedJulianDate {
        self.times[0]
    }

    pub fn stop(&self) -> ModifiedJulianDate {
        self.times[self.times.len() - 1]
    }

    /// Spacing between consecutive samples, in hours.
    pub fn step_hours(&self) -> f64 {
        (self.stop().value() - self.start().value()) * 24.0 / (self.len() - 1) as f64
    }
}
