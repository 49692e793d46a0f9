use tracing_subscriber::EnvFilter;

use crate::core::config::TrackerConfig;

/// Install a global `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// the configured `log_filter`.
///
/// Returns `false` if a global subscriber was already installed, which is the
/// normal case when several tests or an embedding engine initialise logging.
pub fn init_tracing(config: &TrackerConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
