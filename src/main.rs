//! zkexport main entrypoint.

use tracing_subscriber::EnvFilter;
use zkexport::run;

fn main() {
    // diagnostics go to stderr; RUST_LOG=zkexport=debug for details
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run() {
        zkexport::ui::messages::error(format!("Error: {e}"));
        std::process::exit(1);
    }
}
