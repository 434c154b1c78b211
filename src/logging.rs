use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `KANGAROO_LOG=debug`.
pub const LOG_ENV: &str = "KANGAROO_LOG";

/// Installs the global subscriber. Later calls are ignored, so tests and
/// the binary can both call it.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
