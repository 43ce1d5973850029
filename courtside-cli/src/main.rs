//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

#[tokio::main]
async fn main() {
    courtside_cli::init_logging();
    if let Err(err) = courtside_cli::run().await {
        eprintln!("courtside: {err}");
        std::process::exit(1);
    }
}
