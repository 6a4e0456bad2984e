#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use dso_finder::{MagnitudeFilter, ObserverLocation, SearchMode, SearchRequest};
use rand::rngs::StdRng;
use rand::SeedableRng;

static CWD_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with the process working directory temporarily set to `dir`.
///
/// This is panic-safe (restores the directory on unwind) and also serializes
/// access to the process-global working directory so parallel tests do not
/// observe each other's changes.
pub fn with_current_dir<F, R>(dir: &Path, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = CWD_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedCwd::new(dir);
    f()
}

struct ScopedCwd {
    previous: PathBuf,
}

impl ScopedCwd {
    fn new(dir: &Path) -> Self {
        let previous = std::env::current_dir().expect("current dir");
        std::env::set_current_dir(dir).expect("enter test dir");
        Self { previous }
    }
}

impl Drop for ScopedCwd {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.previous);
    }
}

/// Local noon (CEST) of 2024-10-01 at the default site.
pub fn autumn_reference() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 1, 10, 0, 0).unwrap()
}

/// Default-site, specific-night request with an explicit +02:00 offset.
pub fn specific_night_request(reference: DateTime<Utc>) -> SearchRequest {
    let mut request = SearchRequest::new(
        ObserverLocation::default(),
        reference,
        SearchMode::SpecificNight,
    );
    request.utc_offset_minutes = Some(120);
    request.magnitude = MagnitudeFilter::SkyClass { bortle: 5 };
    request
}

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(0x0D50)
}
