//! Persistence port for imported facilities.
//!
//! The `FacilityStore` trait accepts batches of [`FacilityRecord`] values and
//! assigns identities. Imports are not atomic: a store records per-record
//! failures in the returned [`ImportReport`] and keeps going, and callers
//! are expected to log and continue.

use geo::Coord;
use thiserror::Error;

use crate::FacilityRecord;

#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqliteFacilityStore, SqliteFacilityStoreError};

/// Identity assigned by a store to an imported record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct FacilityId(pub i64);

/// A record the store refused to import.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ImportFailure {
    /// Position of the record within the submitted batch.
    pub index: usize,
    /// Name of the rejected record.
    pub name: String,
    /// Backend-supplied reason.
    pub message: String,
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ImportReport {
    /// Identities of the records that were stored, in batch order.
    pub created: Vec<FacilityId>,
    /// Records that could not be stored.
    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    /// True when every record in the batch was stored.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Errors reading from a facility store.
#[derive(Debug, Error)]
pub enum FacilityStoreError {
    /// The backend failed while answering a query.
    #[error("facility store query failed: {message}")]
    Query {
        /// Backend-supplied reason.
        message: String,
    },
}

/// Storage collaborator for facilities produced by the ingestion pipeline.
///
/// # Examples
///
/// ```rust
/// use std::cell::RefCell;
/// use geo::Coord;
/// use courtside_core::{FacilityId, FacilityRecord, FacilityStore, FacilityStoreError, ImportReport};
///
/// #[derive(Default)]
/// struct VecStore(RefCell<Vec<FacilityRecord>>);
///
/// impl FacilityStore for VecStore {
///     fn bulk_import(&self, records: &[FacilityRecord]) -> ImportReport {
///         let mut stored = self.0.borrow_mut();
///         let mut report = ImportReport::default();
///         for record in records {
///             stored.push(record.clone());
///             report.created.push(FacilityId(stored.len() as i64));
///         }
///         report
///     }
///
///     fn facility_locations(&self) -> Result<Vec<Coord<f64>>, FacilityStoreError> {
///         Ok(self.0.borrow().iter().map(|record| record.location).collect())
///     }
/// }
///
/// let store = VecStore::default();
/// let report = store.bulk_import(&[FacilityRecord::external("Court", Coord { x: 0.0, y: 0.0 })]);
/// assert!(report.is_complete());
/// assert_eq!(store.facility_locations()?.len(), 1);
/// # Ok::<(), FacilityStoreError>(())
/// ```
pub trait FacilityStore {
    /// Store `records`, assigning an identity to each one that succeeds.
    fn bulk_import(&self, records: &[FacilityRecord]) -> ImportReport;

    /// Locations of every stored facility, used for duplicate suppression.
    ///
    /// # Errors
    /// Returns [`FacilityStoreError`] when the backend cannot be read.
    fn facility_locations(&self) -> Result<Vec<Coord<f64>>, FacilityStoreError>;
}
