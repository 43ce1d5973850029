//! In-memory `FacilityStore` used by unit and behaviour tests.

use std::cell::RefCell;
use std::collections::HashSet;

use geo::Coord;

use crate::{FacilityId, FacilityRecord, FacilityStore, FacilityStoreError, ImportFailure, ImportReport};

/// In-memory `FacilityStore` that can be told to reject records by name.
///
/// Identities are assigned sequentially from one.
#[derive(Debug, Default)]
pub struct MemoryFacilityStore {
    records: RefCell<Vec<FacilityRecord>>,
    rejected_names: HashSet<String>,
}

impl MemoryFacilityStore {
    /// Create a store pre-populated with `records`.
    pub fn with_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = FacilityRecord>,
    {
        Self {
            records: RefCell::new(records.into_iter().collect()),
            rejected_names: HashSet::new(),
        }
    }

    /// Create an empty store that refuses records with any of `names`.
    pub fn rejecting<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            records: RefCell::new(Vec::new()),
            rejected_names: names.into_iter().map(str::to_owned).collect(),
        }
    }

    /// Snapshot of the stored records.
    pub fn records(&self) -> Vec<FacilityRecord> {
        self.records.borrow().clone()
    }
}

impl FacilityStore for MemoryFacilityStore {
    fn bulk_import(&self, records: &[FacilityRecord]) -> ImportReport {
        let mut stored = self.records.borrow_mut();
        let mut report = ImportReport::default();
        for (index, record) in records.iter().enumerate() {
            if self.rejected_names.contains(&record.name) {
                report.failures.push(ImportFailure {
                    index,
                    name: record.name.clone(),
                    message: "rejected by memory store".to_owned(),
                });
                continue;
            }
            stored.push(record.clone());
            let id = i64::try_from(stored.len()).unwrap_or(i64::MAX);
            report.created.push(FacilityId(id));
        }
        report
    }

    fn facility_locations(&self) -> Result<Vec<Coord<f64>>, FacilityStoreError> {
        Ok(self
            .records
            .borrow()
            .iter()
            .map(|record| record.location)
            .collect())
    }
}
