//! The `import` subcommand.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use courtside_core::{FacilityStore, NEARBY_THRESHOLD_DEGREES};
use courtside_data::overpass::OverpassTransport;
use courtside_data::{ImportOutcome, IngestionPipeline, import_facilities};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::search::{SearchConfig, run_search};
use crate::{
    ARG_ENDPOINT, ARG_LAT, ARG_LNG, ARG_RADIUS_KM, ARG_RETRIES, ARG_SPORT, ARG_USER_AGENT,
    CliError, OverpassOptions, SearchArea, write_json,
};

pub(crate) const ARG_DATABASE: &str = "database";
pub(crate) const ENV_IMPORT_LAT: &str = "COURTSIDE_CMDS_IMPORT_LAT";
pub(crate) const ENV_IMPORT_LNG: &str = "COURTSIDE_CMDS_IMPORT_LNG";
pub(crate) const ENV_IMPORT_RADIUS_KM: &str = "COURTSIDE_CMDS_IMPORT_RADIUS_KM";
pub(crate) const ENV_IMPORT_DATABASE: &str = "COURTSIDE_CMDS_IMPORT_DATABASE";

/// CLI arguments for the `import` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "import",
    about = "Search Overpass and store new facilities in SQLite",
    long_about = "Search Overpass around a point and import the results into \
                  a SQLite facility database, skipping facilities that lie \
                  near ones already stored."
)]
#[ortho_config(prefix = "COURTSIDE")]
pub(crate) struct ImportArgs {
    /// Latitude of the search centre in degrees.
    #[arg(long = ARG_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of the search centre in degrees.
    #[arg(long = ARG_LNG, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lng: Option<f64>,
    /// Search radius in kilometres.
    #[arg(long = ARG_RADIUS_KM, value_name = "km")]
    #[serde(default)]
    pub(crate) radius_km: Option<f64>,
    /// Path to the SQLite facility database; created when absent.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<PathBuf>,
    /// Overpass interpreter URL; repeat to configure failover endpoints.
    #[arg(long = ARG_ENDPOINT, value_name = "url")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) endpoint: Vec<String>,
    /// User-Agent header sent to Overpass.
    #[arg(long = ARG_USER_AGENT, value_name = "agent")]
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
    /// Retries after the first failed attempt.
    #[arg(long = ARG_RETRIES, value_name = "count")]
    #[serde(default)]
    pub(crate) retries: Option<u32>,
    /// Sport keyword used to match facilities.
    #[arg(long = ARG_SPORT, value_name = "keyword")]
    #[serde(default)]
    pub(crate) sport: Option<String>,
}

impl ImportArgs {
    fn into_config(self) -> Result<ImportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ImportConfig::try_from(merged)
    }
}

#[derive(Debug)]
pub(crate) struct ImportConfig {
    pub(crate) search: SearchConfig,
    pub(crate) database: PathBuf,
}

impl TryFrom<ImportArgs> for ImportConfig {
    type Error = CliError;

    fn try_from(args: ImportArgs) -> Result<Self, Self::Error> {
        let database = args.database.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE,
            env: ENV_IMPORT_DATABASE,
        })?;
        let area = SearchArea::from_parts(
            args.lat,
            args.lng,
            args.radius_km,
            [ENV_IMPORT_LAT, ENV_IMPORT_LNG, ENV_IMPORT_RADIUS_KM],
        )?;
        let ingestion = OverpassOptions {
            endpoints: args.endpoint,
            user_agent: args.user_agent,
            retries: args.retries,
            sport: args.sport,
        }
        .into_config()?;
        Ok(Self {
            search: SearchConfig { area, ingestion },
            database,
        })
    }
}

#[cfg(feature = "store-sqlite")]
pub(crate) async fn execute<W: Write>(args: ImportArgs, out: &mut W) -> Result<(), CliError> {
    use courtside_core::SqliteFacilityStore;

    let config = args.into_config()?;
    let pipeline = IngestionPipeline::from_config(config.search.ingestion)?;
    let store = SqliteFacilityStore::open(&config.database)?;
    let outcome = run_import(&pipeline, config.search.area, &store, &config.database).await?;
    write_json(out, &outcome)
}

#[cfg(not(feature = "store-sqlite"))]
pub(crate) async fn execute<W: Write>(args: ImportArgs, out: &mut W) -> Result<(), CliError> {
    let _ = (args, out);
    Err(CliError::MissingFeature {
        feature: "store-sqlite",
        action: "importing facilities",
    })
}

/// Search `area` and import the results into `store`.
///
/// `location` only labels store errors.
pub(crate) async fn run_import<T, S>(
    pipeline: &IngestionPipeline<T>,
    area: SearchArea,
    store: &S,
    location: &std::path::Path,
) -> Result<ImportOutcome, CliError>
where
    T: OverpassTransport,
    S: FacilityStore + ?Sized,
{
    let records = run_search(pipeline, area).await?;
    import_facilities(store, records, NEARBY_THRESHOLD_DEGREES).map_err(|source| {
        CliError::ReadStore {
            path: location.to_path_buf(),
            source,
        }
    })
}
