//! Fixed deep-sky object catalog.
//!
//! The catalog is a static table loaded with the binary and never mutated.
//! Coordinates are J2000 and stored as sexagesimal strings, exactly as they
//! are shown to the user; [`CatalogEntry::coordinates`] parses them on demand.

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::ephemeris::EquatorialCoordinates;
use crate::error::{DsoError, Result};

/// One entry of the fixed catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CatalogEntry {
    /// Unique display name
    pub name: &'static str,
    /// Right ascension, sexagesimal hours (e.g. `05h34m31.9s`)
    pub ra: &'static str,
    /// Declination, sexagesimal degrees (e.g. `+22d00m52s`)
    pub dec: &'static str,
    /// Apparent visual magnitude
    pub magnitude: f64,
    /// Object class
    pub object_type: &'static str,
    /// IAU constellation containing the object
    pub constellation: &'static str,
}

impl CatalogEntry {
    /// Parse the stored RA/Dec strings into degrees.
    pub fn coordinates(&self) -> Result<EquatorialCoordinates> {
        parse_equatorial(self.ra, self.dec)
    }
}

const fn entry(
    name: &'static str,
    ra: &'static str,
    dec: &'static str,
    magnitude: f64,
    object_type: &'static str,
    constellation: &'static str,
) -> CatalogEntry {
    CatalogEntry {
        name,
        ra,
        dec,
        magnitude,
        object_type,
        constellation,
    }
}

pub const GALAXY: &str = "Galaxy";
pub const GLOBULAR_CLUSTER: &str = "Globular Cluster";
pub const OPEN_CLUSTER: &str = "Open Cluster";
pub const NEBULA: &str = "Nebula";
pub const PLANETARY_NEBULA: &str = "Planetary Nebula";
pub const SUPERNOVA_REMNANT: &str = "Supernova Remnant";

static CATALOG: [CatalogEntry; 36] = [
    entry("M1 Crab Nebula", "05h34m31.9s", "+22d00m52s", 8.4, SUPERNOVA_REMNANT, "Taurus"),
    entry("M2", "21h33m27.0s", "-00d49m24s", 6.5, GLOBULAR_CLUSTER, "Aquarius"),
    entry("M3", "13h42m11.6s", "+28d22m38s", 6.2, GLOBULAR_CLUSTER, "Canes Venatici"),
    entry("M4", "16h23m35.2s", "-26d31m32s", 5.6, GLOBULAR_CLUSTER, "Scorpius"),
    entry("M5", "15h18m33.2s", "+02d04m52s", 5.6, GLOBULAR_CLUSTER, "Serpens"),
    entry("M8 Lagoon Nebula", "18h03m37.0s", "-24d23m12s", 6.0, NEBULA, "Sagittarius"),
    entry("M11 Wild Duck Cluster", "18h51m05.0s", "-06d16m12s", 5.8, OPEN_CLUSTER, "Scutum"),
    entry("M13 Hercules Cluster", "16h41m41.2s", "+36d27m35s", 5.8, GLOBULAR_CLUSTER, "Hercules"),
    entry("M15", "21h29m58.3s", "+12d10m01s", 6.2, GLOBULAR_CLUSTER, "Pegasus"),
    entry("M16 Eagle Nebula", "18h18m48.0s", "-13d49m00s", 6.0, NEBULA, "Serpens"),
    entry("M17 Omega Nebula", "18h20m26.0s", "-16d10m36s", 6.0, NEBULA, "Sagittarius"),
    entry("M20 Trifid Nebula", "18h02m23.0s", "-23d01m48s", 6.3, NEBULA, "Sagittarius"),
    entry("M22", "18h36m23.9s", "-23d54m17s", 5.1, GLOBULAR_CLUSTER, "Sagittarius"),
    entry("M27 Dumbbell Nebula", "19h59m36.3s", "+22d43m16s", 7.5, PLANETARY_NEBULA, "Vulpecula"),
    entry("M31 Andromeda Galaxy", "00h42m44.3s", "+41d16m09s", 3.4, GALAXY, "Andromeda"),
    entry("M33 Triangulum Galaxy", "01h33m50.0s", "+30d39m37s", 5.7, GALAXY, "Triangulum"),
    entry("M35", "06h08m54.0s", "+24d20m00s", 5.3, OPEN_CLUSTER, "Gemini"),
    entry("M42 Orion Nebula", "05h35m17.3s", "-05d23m28s", 4.0, NEBULA, "Orion"),
    entry("M44 Beehive Cluster", "08h40m24.0s", "+19d40m00s", 3.7, OPEN_CLUSTER, "Cancer"),
    entry("M45 Pleiades", "03h47m24.0s", "+24d07m00s", 1.6, OPEN_CLUSTER, "Taurus"),
    entry("M51 Whirlpool Galaxy", "13h29m52.7s", "+47d11m43s", 8.4, GALAXY, "Canes Venatici"),
    entry("M57 Ring Nebula", "18h53m35.1s", "+33d01m45s", 8.8, PLANETARY_NEBULA, "Lyra"),
    entry("M63 Sunflower Galaxy", "13h15m49.3s", "+42d01m45s", 8.6, GALAXY, "Canes Venatici"),
    entry("M64 Black Eye Galaxy", "12h56m43.7s", "+21d40m58s", 8.5, GALAXY, "Coma Berenices"),
    entry("M74 Phantom Galaxy", "01h36m41.8s", "+15d47m01s", 9.4, GALAXY, "Pisces"),
    entry("M81 Bode's Galaxy", "09h55m33.2s", "+69d03m55s", 6.9, GALAXY, "Ursa Major"),
    entry("M82 Cigar Galaxy", "09h55m52.2s", "+69d40m47s", 8.4, GALAXY, "Ursa Major"),
    entry("M97 Owl Nebula", "11h14m47.7s", "+55d01m09s", 9.9, PLANETARY_NEBULA, "Ursa Major"),
    entry("M101 Pinwheel Galaxy", "14h03m12.6s", "+54d20m57s", 7.9, GALAXY, "Ursa Major"),
    entry("M104 Sombrero Galaxy", "12h39m59.4s", "-11d37m23s", 8.0, GALAXY, "Virgo"),
    entry("NGC 869 Double Cluster", "02h19m00.0s", "+57d09m00s", 5.3, OPEN_CLUSTER, "Perseus"),
    entry("NGC 7000 North America Nebula", "20h58m47.0s", "+44d19m48s", 4.0, NEBULA, "Cygnus"),
    entry("NGC 6960 Western Veil", "20h45m38.0s", "+30d42m30s", 7.0, SUPERNOVA_REMNANT, "Cygnus"),
    entry("NGC 253 Sculptor Galaxy", "00h47m33.1s", "-25d17m18s", 7.1, GALAXY, "Sculptor"),
    entry("NGC 5139 Omega Centauri", "13h26m47.3s", "-47d28m46s", 3.9, GLOBULAR_CLUSTER, "Centaurus"),
    entry("NGC 7293 Helix Nebula", "22h29m38.5s", "-20d50m14s", 7.6, PLANETARY_NEBULA, "Aquarius"),
];

static OBJECT_TYPES: Lazy<Vec<String>> = Lazy::new(|| {
    let mut types: Vec<String> = CATALOG
        .iter()
        .map(|e| e.object_type.to_string())
        .collect();
    types.sort();
    types.dedup();
    types
});

/// The full catalog, in catalog order.
pub fn catalog() -> &'static [CatalogEntry] {
    &CATALOG
}

/// Distinct object types present in the catalog, sorted.
pub fn object_types() -> &'static [String] {
    &OBJECT_TYPES
}

/// Look up an entry by its exact name.
pub fn find_by_name(name: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|e| e.name == name)
}

/// Parse a sexagesimal RA (hours) and Dec (degrees) pair.
pub fn parse_equatorial(ra: &str, dec: &str) -> Result<EquatorialCoordinates> {
    let ra_hours = parse_sexagesimal(ra)?;
    if !(0.0..24.0).contains(&ra_hours) {
        return Err(DsoError::coordinate(ra, "right ascension must be in [0h, 24h)"));
    }
    let dec_deg = parse_sexagesimal(dec)?;
    if !(-90.0..=90.0).contains(&dec_deg) {
        return Err(DsoError::coordinate(dec, "declination must be in [-90, 90] degrees"));
    }
    Ok(EquatorialCoordinates::new(ra_hours * 15.0, dec_deg))
}

/// Parse `[+-]A[ :hdm°]B[ :m']C[s"]` into a signed decimal value of the
/// leading unit. One to three components are accepted.
pub fn parse_sexagesimal(value: &str) -> Result<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DsoError::coordinate(value, "empty value"));
    }

    let (negative, body) = match trimmed.chars().next() {
        Some('-') => (true, &trimmed[1..]),
        Some('+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let normalized: String = body
        .chars()
        .map(|c| match c {
            'h' | 'H' | 'd' | 'D' | 'm' | 'M' | 's' | 'S' | ':' | '°' | '\'' | '"' | '′' | '″' => ' ',
            other => other,
        })
        .collect();

    let parts = normalized
        .split_whitespace()
        .map(|p| {
            p.parse::<f64>()
                .map_err(|_| DsoError::coordinate(value, format!("'{}' is not a number", p)))
        })
        .collect::<Result<Vec<f64>>>()?;

    if parts.is_empty() || parts.len() > 3 {
        return Err(DsoError::coordinate(value, "expected one to three components"));
    }
    if parts.iter().any(|p| !p.is_finite() || *p < 0.0) {
        return Err(DsoError::coordinate(value, "components must be finite and unsigned"));
    }
    if parts.iter().skip(1).any(|p| *p >= 60.0) {
        return Err(DsoError::coordinate(value, "minutes and seconds must be below 60"));
    }

    let magnitude = parts
        .iter()
        .enumerate()
        .map(|(i, p)| p / 60f64.powi(i as i32))
        .sum::<f64>();

    Ok(if negative { -magnitude } else { magnitude })
}

/// Format a right ascension in degrees as `HHh MMm SS.Ss`.
pub fn format_ra(ra_deg: f64) -> String {
    let tenths = ((ra_deg.rem_euclid(360.0) / 15.0) * 36_000.0).round() as i64 % (24 * 36_000);
    let hours = tenths / 36_000;
    let minutes = (tenths % 36_000) / 600;
    let seconds = (tenths % 600) as f64 / 10.0;
    format!("{:02}h {:02}m {:04.1}s", hours, minutes, seconds)
}

/// Format a declination in degrees as `+DD° MM' SS"`.
pub fn format_dec(dec_deg: f64) -> String {
    let sign = if dec_deg < 0.0 { '-' } else { '+' };
    let total = (dec_deg.abs() * 3600.0).round() as i64;
    let degrees = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{}{:02}° {:02}' {:02}\"", sign, degrees, minutes, seconds)
}
