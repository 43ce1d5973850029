//! Suppression of imported facilities that duplicate known ones.
//!
//! Proximity is measured in raw degrees on each axis, so the real-world
//! distance covered by the threshold shrinks in longitude away from the
//! equator.

use geo::Coord;

use crate::FacilityRecord;

/// Default proximity threshold in degrees (roughly 5.5 km of latitude).
pub const NEARBY_THRESHOLD_DEGREES: f64 = 0.05;

/// Returns true when `a` and `b` are strictly closer than `threshold`
/// degrees on both axes.
#[must_use]
pub fn is_nearby(a: Coord<f64>, b: Coord<f64>, threshold: f64) -> bool {
    (a.x - b.x).abs() < threshold && (a.y - b.y).abs() < threshold
}

/// Drop records lying near any of the `existing` locations.
///
/// Records are compared against `existing` only, not against each other;
/// input order is preserved.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use courtside_core::{FacilityRecord, NEARBY_THRESHOLD_DEGREES, suppress_nearby_duplicates};
///
/// let records = vec![
///     FacilityRecord::external("Known", Coord { x: 10.01, y: 20.01 }),
///     FacilityRecord::external("New", Coord { x: 11.0, y: 20.0 }),
/// ];
/// let kept = suppress_nearby_duplicates(records, &[Coord { x: 10.0, y: 20.0 }], NEARBY_THRESHOLD_DEGREES);
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0].name, "New");
/// ```
#[must_use]
pub fn suppress_nearby_duplicates(
    records: Vec<FacilityRecord>,
    existing: &[Coord<f64>],
    threshold: f64,
) -> Vec<FacilityRecord> {
    records
        .into_iter()
        .filter(|record| {
            !existing
                .iter()
                .any(|known| is_nearby(record.location, *known, threshold))
        })
        .collect()
}
