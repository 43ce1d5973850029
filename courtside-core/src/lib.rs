//! Core domain types for the Courtside ingestion engine.
//!
//! This crate is free of network I/O. It defines:
//! - [`BoundingBox`] and [`calculate_bounds`], which scope a spatial search;
//! - [`FacilityRecord`], the canonical facility produced by ingestion;
//! - the [`FacilityStore`] persistence port, with an optional SQLite
//!   implementation behind the `store-sqlite` feature; and
//! - nearby-duplicate suppression for imported records.
//!
//! Coordinates are WGS84 throughout, with `x = longitude`, `y = latitude`.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod bounds;
pub mod dedupe;
pub mod facility;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use bounds::{BoundingBox, BoundsError, KM_PER_DEGREE, calculate_bounds};
pub use dedupe::{NEARBY_THRESHOLD_DEGREES, is_nearby, suppress_nearby_duplicates};
pub use facility::{
    ADDRESS_NOT_AVAILABLE, Amenities, EXTERNAL_IMPORT_SOURCE, FacilityRecord, UNNAMED_FACILITY,
};
pub use store::{FacilityId, FacilityStore, FacilityStoreError, ImportFailure, ImportReport};

#[cfg(feature = "store-sqlite")]
pub use store::{SqliteFacilityStore, SqliteFacilityStoreError};
