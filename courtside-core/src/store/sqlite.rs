//! SQLite-backed facility store.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use geo::Coord;
use rusqlite::{Connection, params};
use thiserror::Error;

use crate::FacilityRecord;

use super::{FacilityId, FacilityStore, FacilityStoreError, ImportFailure, ImportReport};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS facilities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    address TEXT NOT NULL,
    state TEXT NOT NULL,
    zip_code TEXT NOT NULL,
    indoor INTEGER NOT NULL,
    number_of_courts INTEGER NOT NULL CHECK (number_of_courts > 0),
    lights_available INTEGER NOT NULL,
    restrooms_available INTEGER NOT NULL,
    water_fountain INTEGER NOT NULL,
    lon REAL NOT NULL CHECK (lon BETWEEN -180.0 AND 180.0),
    lat REAL NOT NULL CHECK (lat BETWEEN -90.0 AND 90.0),
    verified INTEGER NOT NULL,
    source TEXT NOT NULL
)";

const INSERT_FACILITY: &str = "INSERT INTO facilities (
    name,
    address,
    state,
    zip_code,
    indoor,
    number_of_courts,
    lights_available,
    restrooms_available,
    water_fountain,
    lon,
    lat,
    verified,
    source
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)";

/// Errors raised while opening the SQLite facility store.
#[derive(Debug, Error)]
pub enum SqliteFacilityStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Creating the `facilities` table failed.
    #[error("failed to initialise facilities schema in {path}: {source}")]
    InitialiseSchema {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
}

/// Facility store persisting one row per record in a `facilities` table.
pub struct SqliteFacilityStore {
    connection: Connection,
    location: PathBuf,
}

impl fmt::Debug for SqliteFacilityStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteFacilityStore")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl SqliteFacilityStore {
    /// Open (or create) the store at `path`.
    ///
    /// # Errors
    /// Returns [`SqliteFacilityStoreError`] when the database cannot be
    /// opened or the schema cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SqliteFacilityStoreError> {
        let path = path.as_ref();
        let connection =
            Connection::open(path).map_err(|source| SqliteFacilityStoreError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            })?;
        connection.execute(CREATE_TABLE, []).map_err(|source| {
            SqliteFacilityStoreError::InitialiseSchema {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Ok(Self {
            connection,
            location: path.to_path_buf(),
        })
    }

    /// Location of the underlying SQLite database.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.location
    }

    fn insert(&self, record: &FacilityRecord) -> Result<FacilityId, rusqlite::Error> {
        self.connection.execute(
            INSERT_FACILITY,
            params![
                record.name,
                record.address,
                record.state,
                record.zip_code,
                record.indoor,
                record.number_of_courts,
                record.amenities.lights_available,
                record.amenities.restrooms_available,
                record.amenities.water_fountain,
                record.location.x,
                record.location.y,
                record.verified,
                record.source,
            ],
        )?;
        Ok(FacilityId(self.connection.last_insert_rowid()))
    }
}

impl FacilityStore for SqliteFacilityStore {
    fn bulk_import(&self, records: &[FacilityRecord]) -> ImportReport {
        let mut report = ImportReport::default();
        for (index, record) in records.iter().enumerate() {
            match self.insert(record) {
                Ok(id) => report.created.push(id),
                Err(err) => report.failures.push(ImportFailure {
                    index,
                    name: record.name.clone(),
                    message: err.to_string(),
                }),
            }
        }
        report
    }

    fn facility_locations(&self) -> Result<Vec<Coord<f64>>, FacilityStoreError> {
        let to_query_error = |err: rusqlite::Error| FacilityStoreError::Query {
            message: err.to_string(),
        };
        let mut statement = self
            .connection
            .prepare("SELECT lon, lat FROM facilities ORDER BY id")
            .map_err(to_query_error)?;
        let rows = statement
            .query_map([], |row| {
                Ok(Coord {
                    x: row.get(0)?,
                    y: row.get(1)?,
                })
            })
            .map_err(to_query_error)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(to_query_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn workspace() -> TempDir {
        TempDir::new().expect("create temp dir")
    }

    #[rstest]
    fn imports_records_and_reads_locations(workspace: TempDir) {
        let path = workspace.path().join("facilities.db");
        let store = SqliteFacilityStore::open(&path).expect("store opens");
        let mut lit = FacilityRecord::external("Lit Courts", Coord { x: -86.6, y: 35.9 });
        lit.amenities.lights_available = true;
        let records = vec![
            lit,
            FacilityRecord::external("Plain Courts", Coord { x: -86.7, y: 36.0 }),
        ];

        let report = store.bulk_import(&records);

        assert!(report.is_complete(), "unexpected failures: {report:?}");
        assert_eq!(report.created, vec![FacilityId(1), FacilityId(2)]);
        let locations = store.facility_locations().expect("locations readable");
        assert_eq!(
            locations,
            vec![Coord { x: -86.6, y: 35.9 }, Coord { x: -86.7, y: 36.0 }]
        );
        assert_eq!(store.path(), path.as_path());
    }

    #[rstest]
    fn records_rejected_rows_and_continues(workspace: TempDir) {
        let store =
            SqliteFacilityStore::open(workspace.path().join("facilities.db")).expect("store opens");
        let mut empty_courts = FacilityRecord::external("Zero Courts", Coord { x: 0.0, y: 0.0 });
        empty_courts.number_of_courts = 0;
        let records = vec![
            FacilityRecord::external("Valid", Coord { x: 1.0, y: 1.0 }),
            empty_courts,
            FacilityRecord::external("Off The Map", Coord { x: 500.0, y: 1.0 }),
            FacilityRecord::external("Also Valid", Coord { x: 2.0, y: 2.0 }),
        ];

        let report = store.bulk_import(&records);

        assert_eq!(report.created.len(), 2);
        let failed: Vec<usize> = report.failures.iter().map(|failure| failure.index).collect();
        assert_eq!(failed, vec![1, 2]);
        assert_eq!(report.failures[1].name, "Off The Map");
    }

    #[rstest]
    fn reopening_preserves_rows(workspace: TempDir) {
        let path = workspace.path().join("facilities.db");
        {
            let store = SqliteFacilityStore::open(&path).expect("store opens");
            let _ = store.bulk_import(&[FacilityRecord::external(
                "Persisted",
                Coord { x: 3.0, y: 4.0 },
            )]);
        }
        let reopened = SqliteFacilityStore::open(&path).expect("store reopens");
        let locations = reopened.facility_locations().expect("locations readable");
        assert_eq!(locations, vec![Coord { x: 3.0, y: 4.0 }]);
    }

    #[rstest]
    fn open_reports_unusable_paths(workspace: TempDir) {
        let missing_parent = workspace.path().join("missing").join("facilities.db");
        let err = SqliteFacilityStore::open(&missing_parent).expect_err("open should fail");
        match err {
            SqliteFacilityStoreError::OpenDatabase { path, .. } => assert_eq!(path, missing_parent),
            other => panic!("expected OpenDatabase, got {other:?}"),
        }
    }
}
