//! Error types emitted by the Courtside CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::path::PathBuf;
use std::sync::Arc;

use courtside_core::FacilityStoreError;
#[cfg(feature = "store-sqlite")]
use courtside_core::SqliteFacilityStoreError;
use courtside_data::overpass::TransportBuildError;
use courtside_data::{ConfigError, QueryError};
use thiserror::Error;

/// Errors emitted by the Courtside CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The requested operation requires a missing compile-time feature.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        feature: &'static str,
        action: &'static str,
    },
    /// A merged option failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    /// The HTTP client for Overpass could not be built.
    #[error(transparent)]
    BuildTransport(#[from] TransportBuildError),
    /// The facility search failed.
    #[error("facility search failed: {0}")]
    Query(#[from] QueryError),
    /// Opening the facility database failed.
    #[cfg(feature = "store-sqlite")]
    #[error(transparent)]
    OpenStore(#[from] SqliteFacilityStoreError),
    /// Reading stored facility locations failed.
    #[error("failed to read facilities from {path:?}: {source}")]
    ReadStore {
        path: PathBuf,
        #[source]
        source: FacilityStoreError,
    },
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    Serialize(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
