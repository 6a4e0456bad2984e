//! Display selection over the observable records.
//!
//! - brightness sort: ascending magnitude, truncated to the cap
//! - more records than the cap: uniform sample of `cap` without replacement
//! - otherwise: every record, sorted by name

use log::debug;
use rand::seq::index;
use rand::Rng;

use crate::api::ObservabilityRecord;

/// Order and cap `records` for display.
///
/// The random source is injected so callers (and tests) control determinism.
/// A `cap` of zero yields an empty selection.
pub fn select<R: Rng + ?Sized>(
    mut records: Vec<ObservabilityRecord>,
    cap: usize,
    sort_by_brightness: bool,
    rng: &mut R,
) -> Vec<ObservabilityRecord> {
    if sort_by_brightness {
        records.sort_by(|a, b| a.magnitude.total_cmp(&b.magnitude));
        records.truncate(cap);
        return records;
    }

    if records.len() > cap {
        debug!("Sampling {cap} of {} records", records.len());
        let mut picked = index::sample(rng, records.len(), cap).into_vec();
        picked.sort_unstable();
        let mut slots: Vec<Option<ObservabilityRecord>> = records.into_iter().map(Some).collect();
        return picked
            .into_iter()
            .filter_map(|i| slots.get_mut(i).and_then(Option::take))
            .collect();
    }

    records.sort_by(|a, b| a.name.cmp(&b.name));
    records
}
