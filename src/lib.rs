//! Facade crate for the Courtside facility engine.
//!
//! This crate re-exports the core domain types and exposes the Overpass
//! ingestion pipeline and SQLite store behind feature flags.

#![forbid(unsafe_code)]

pub use courtside_core::{
    Amenities, BoundingBox, BoundsError, FacilityId, FacilityRecord, FacilityStore,
    FacilityStoreError, ImportReport, NEARBY_THRESHOLD_DEGREES, calculate_bounds,
    suppress_nearby_duplicates,
};

#[cfg(feature = "store-sqlite")]
pub use courtside_core::{SqliteFacilityStore, SqliteFacilityStoreError};

#[cfg(feature = "ingest")]
pub use courtside_data::{
    Geocoder, ImportOutcome, IngestionConfig, IngestionPipeline, QueryError, import_facilities,
};
