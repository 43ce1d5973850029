//! Log output for the `courtside` binary.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "courtside_cli=info,courtside_data=info,courtside_core=warn";

/// Install a stderr formatter filtered by `RUST_LOG`.
///
/// Records emitted through the `log` facade by the library crates are
/// bridged into the same subscriber. Calling this twice is harmless; the
/// second call leaves the first subscriber in place.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
