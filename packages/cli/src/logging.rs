use sprout_config::constants::{DEFAULT_LOG_FILTER, SPROUT_LOG};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `SPROUT_LOG` wins over `RUST_LOG`; `--verbose` raises the default to debug.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { DEFAULT_LOG_FILTER };
    let filter = EnvFilter::try_from_env(SPROUT_LOG)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
