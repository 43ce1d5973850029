//! The `search` subcommand.

use std::io::Write;

use clap::Parser;
use courtside_core::FacilityRecord;
use courtside_data::overpass::OverpassTransport;
use courtside_data::{IngestionConfig, IngestionPipeline};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_ENDPOINT, ARG_LAT, ARG_LNG, ARG_RADIUS_KM, ARG_RETRIES, ARG_SPORT, ARG_USER_AGENT,
    CliError, OverpassOptions, SearchArea, write_json,
};

pub(crate) const ENV_SEARCH_LAT: &str = "COURTSIDE_CMDS_SEARCH_LAT";
pub(crate) const ENV_SEARCH_LNG: &str = "COURTSIDE_CMDS_SEARCH_LNG";
pub(crate) const ENV_SEARCH_RADIUS_KM: &str = "COURTSIDE_CMDS_SEARCH_RADIUS_KM";

/// CLI arguments for the `search` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "search",
    about = "Search Overpass for facilities around a point",
    long_about = "Query the configured Overpass endpoints for sports \
                  facilities within a radius of a point and print them as \
                  JSON. Values can come from CLI flags, configuration files, \
                  or environment variables."
)]
#[ortho_config(prefix = "COURTSIDE")]
pub(crate) struct SearchArgs {
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

impl SearchArgs {
    fn into_config(self) -> Result<SearchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SearchConfig::try_from(merged)
    }
}

/// Validated settings for a single search.
#[derive(Debug)]
pub(crate) struct SearchConfig {
    pub(crate) area: SearchArea,
    pub(crate) ingestion: IngestionConfig,
}

impl TryFrom<SearchArgs> for SearchConfig {
    type Error = CliError;

    fn try_from(args: SearchArgs) -> Result<Self, Self::Error> {
        let area = SearchArea::from_parts(
            args.lat,
            args.lng,
            args.radius_km,
            [ENV_SEARCH_LAT, ENV_SEARCH_LNG, ENV_SEARCH_RADIUS_KM],
        )?;
        let ingestion = OverpassOptions {
            endpoints: args.endpoint,
            user_agent: args.user_agent,
            retries: args.retries,
            sport: args.sport,
        }
        .into_config()?;
        Ok(Self { area, ingestion })
    }
}

pub(crate) async fn execute<W: Write>(args: SearchArgs, out: &mut W) -> Result<(), CliError> {
    let config = args.into_config()?;
    let pipeline = IngestionPipeline::from_config(config.ingestion)?;
    let records = run_search(&pipeline, config.area).await?;
    write_json(out, &records)
}

/// Run one search, surfacing failures rather than degrading to no results.
pub(crate) async fn run_search<T: OverpassTransport>(
    pipeline: &IngestionPipeline<T>,
    area: SearchArea,
) -> Result<Vec<FacilityRecord>, CliError> {
    let records = pipeline
        .search_nearby(area.lat, area.lng, area.radius_km)
        .await?;
    info!(
        "found {} facilities within {} km of ({}, {})",
        records.len(),
        area.radius_km,
        area.lat,
        area.lng
    );
    Ok(records)
}
