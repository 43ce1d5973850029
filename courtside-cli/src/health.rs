//! The `health` subcommand.

use std::collections::HashMap;
use std::io::Write;
use std::time::UNIX_EPOCH;

use clap::Parser;
use courtside_data::overpass::OverpassTransport;
use courtside_data::{EndpointStatus, IngestionPipeline};
use log::warn;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{ARG_ENDPOINT, ARG_USER_AGENT, CliError, OverpassOptions, write_json};

/// CLI arguments for the `health` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "health",
    about = "Probe each Overpass endpoint and report its status"
)]
#[ortho_config(prefix = "COURTSIDE")]
pub(crate) struct HealthArgs {
    /// Overpass interpreter URL; repeat to probe several endpoints.
    #[arg(long = ARG_ENDPOINT, value_name = "url")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) endpoint: Vec<String>,
    /// User-Agent header sent to Overpass.
    #[arg(long = ARG_USER_AGENT, value_name = "agent")]
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
}

/// One endpoint's state after probing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EndpointReport {
    pub(crate) url: String,
    pub(crate) is_healthy: bool,
    pub(crate) error_count: u32,
    /// Seconds since the Unix epoch.
    pub(crate) last_used_at: Option<u64>,
    pub(crate) probe_error: Option<String>,
}

impl EndpointReport {
    fn new(status: EndpointStatus, probe_error: Option<String>) -> Self {
        let last_used_at = status
            .last_used_at
            .and_then(|at| at.duration_since(UNIX_EPOCH).ok())
            .map(|elapsed| elapsed.as_secs());
        Self {
            url: status.url.as_str().to_owned(),
            is_healthy: status.is_healthy,
            error_count: status.error_count,
            last_used_at,
            probe_error,
        }
    }
}

pub(crate) async fn execute<W: Write>(args: HealthArgs, out: &mut W) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = OverpassOptions {
        endpoints: merged.endpoint,
        user_agent: merged.user_agent,
        ..OverpassOptions::default()
    }
    .into_config()?;
    let pipeline = IngestionPipeline::from_config(config)?;
    let reports = run_health(&pipeline).await;
    write_json(out, &reports)
}

/// Probe every endpoint once and pair the outcome with the registry state.
pub(crate) async fn run_health<T: OverpassTransport>(
    pipeline: &IngestionPipeline<T>,
) -> Vec<EndpointReport> {
    let mut failures: HashMap<String, String> = HashMap::new();
    for outcome in pipeline.client().probe_all().await {
        if let Err(err) = outcome.result {
            warn!("probe of {} failed: {err}", outcome.url);
            failures.insert(outcome.url.as_str().to_owned(), err.to_string());
        }
    }
    pipeline
        .endpoint_status()
        .into_iter()
        .map(|status| {
            let probe_error = failures.remove(status.url.as_str());
            EndpointReport::new(status, probe_error)
        })
        .collect()
}
