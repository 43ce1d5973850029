//! Handing normalised records to a facility store.

use courtside_core::{
    FacilityRecord, FacilityStore, FacilityStoreError, ImportReport, suppress_nearby_duplicates,
};
use log::{info, warn};
use serde::Serialize;

/// Result of [`import_facilities`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    /// What the store did with the records that were submitted.
    pub report: ImportReport,
    /// Records withheld because a stored facility was already nearby.
    pub skipped_duplicates: usize,
}

/// Import `records` into `store`, skipping any within `threshold` degrees of
/// a facility the store already holds.
///
/// Per-record store failures are logged and reported; they do not abort the
/// import.
///
/// # Errors
///
/// Returns an error when the store's existing locations cannot be read.
pub fn import_facilities<S>(
    store: &S,
    records: Vec<FacilityRecord>,
    threshold: f64,
) -> Result<ImportOutcome, FacilityStoreError>
where
    S: FacilityStore + ?Sized,
{
    let existing = store.facility_locations()?;
    let candidates = records.len();
    let fresh = suppress_nearby_duplicates(records, &existing, threshold);
    let skipped_duplicates = candidates - fresh.len();

    let report = store.bulk_import(&fresh);
    for failure in &report.failures {
        warn!(
            "failed to import facility #{} ({}): {}",
            failure.index, failure.name, failure.message
        );
    }
    info!(
        "imported {} facilities ({} failed, {} near existing facilities skipped)",
        report.created.len(),
        report.failures.len(),
        skipped_duplicates
    );
    Ok(ImportOutcome {
        report,
        skipped_duplicates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtside_core::test_support::MemoryFacilityStore;
    use courtside_core::{FacilityId, NEARBY_THRESHOLD_DEGREES};
    use geo::Coord;
    use rstest::rstest;

    fn record(name: &str, x: f64, y: f64) -> FacilityRecord {
        FacilityRecord::external(name, Coord { x, y })
    }

    #[rstest]
    fn skips_records_near_stored_facilities() {
        let store = MemoryFacilityStore::with_records([record("Stored", -86.78, 36.16)]);
        let outcome = import_facilities(
            &store,
            vec![record("Duplicate", -86.77, 36.17), record("Fresh", -86.5, 36.0)],
            NEARBY_THRESHOLD_DEGREES,
        )
        .expect("locations readable");

        assert_eq!(outcome.skipped_duplicates, 1);
        assert_eq!(outcome.report.created, vec![FacilityId(2)]);
        let names: Vec<String> = store.records().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Stored", "Fresh"]);
    }

    #[rstest]
    fn partial_failures_are_reported() {
        let store = MemoryFacilityStore::rejecting(["Broken"]);
        let outcome = import_facilities(
            &store,
            vec![record("Good", 0.0, 0.0), record("Broken", 1.0, 1.0)],
            NEARBY_THRESHOLD_DEGREES,
        )
        .expect("locations readable");

        assert_eq!(outcome.report.created.len(), 1);
        assert_eq!(outcome.report.failures.len(), 1);
        assert_eq!(outcome.report.failures[0].name, "Broken");
    }
}
