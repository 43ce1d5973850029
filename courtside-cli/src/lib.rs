//! Command-line interface for searching and importing sports facilities.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use courtside_data::{IngestionConfig, SportProfile};
use serde::Serialize;
use std::io::{self, Write};

mod error;
mod health;
mod import;
mod logging;
mod search;

pub use error::CliError;
pub use logging::init_logging;

use health::HealthArgs;
use import::ImportArgs;
use search::SearchArgs;

const ARG_LAT: &str = "lat";
const ARG_LNG: &str = "lng";
const ARG_RADIUS_KM: &str = "radius-km";
const ARG_ENDPOINT: &str = "endpoint";
const ARG_USER_AGENT: &str = "user-agent";
const ARG_RETRIES: &str = "retries";
const ARG_SPORT: &str = "sport";

/// Run the Courtside CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, the
/// command fails, or its output cannot be written.
pub async fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = io::stdout().lock();
    dispatch(cli.command, &mut stdout).await
}

async fn dispatch<W: Write>(command: Command, out: &mut W) -> Result<(), CliError> {
    match command {
        Command::Search(args) => search::execute(args, out).await,
        Command::Import(args) => import::execute(args, out).await,
        Command::Health(args) => health::execute(args, out).await,
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "courtside",
    about = "Find and import sports facilities from OpenStreetMap",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search Overpass for facilities around a point.
    Search(SearchArgs),
    /// Search Overpass and store the results in a facility database.
    Import(ImportArgs),
    /// Probe every Overpass endpoint once.
    Health(HealthArgs),
}

/// Overpass settings shared by every subcommand, after layering.
#[derive(Debug, Default)]
struct OverpassOptions {
    endpoints: Vec<String>,
    user_agent: Option<String>,
    retries: Option<u32>,
    sport: Option<String>,
}

impl OverpassOptions {
    fn into_config(self) -> Result<IngestionConfig, CliError> {
        let mut config = IngestionConfig::default();
        if !self.endpoints.is_empty() {
            config = config.with_endpoints(&self.endpoints)?;
        }
        if let Some(user_agent) = self.user_agent {
            config = config.with_user_agent(user_agent);
        }
        if let Some(retries) = self.retries {
            config = config.with_retries(retries);
        }
        if let Some(sport) = self.sport {
            config = config.with_sport(SportProfile::new(&sport)?);
        }
        Ok(config)
    }
}

/// Centre and radius of a facility search.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SearchArea {
    lat: f64,
    lng: f64,
    radius_km: f64,
}

impl SearchArea {
    fn from_parts(
        lat: Option<f64>,
        lng: Option<f64>,
        radius_km: Option<f64>,
        env: [&'static str; 3],
    ) -> Result<Self, CliError> {
        let [env_lat, env_lng, env_radius] = env;
        Ok(Self {
            lat: lat.ok_or(CliError::MissingArgument {
                field: ARG_LAT,
                env: env_lat,
            })?,
            lng: lng.ok_or(CliError::MissingArgument {
                field: ARG_LNG,
                env: env_lng,
            })?,
            radius_km: radius_km.ok_or(CliError::MissingArgument {
                field: ARG_RADIUS_KM,
                env: env_radius,
            })?,
        })
    }
}

fn write_json<W, T>(out: &mut W, value: &T) -> Result<(), CliError>
where
    W: Write,
    T: Serialize + ?Sized,
{
    serde_json::to_writer_pretty(&mut *out, value).map_err(CliError::Serialize)?;
    writeln!(out).map_err(CliError::WriteOutput)
}

#[cfg(test)]
mod tests;
