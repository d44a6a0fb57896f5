//! Tracing subscriber setup.
//!
//! Filter comes from `MOLGAS_LOG`, then `RUST_LOG`, else `warn`. Logs go to
//! stderr so stdout stays clean for results.

use tracing_subscriber::EnvFilter;

use crate::config::ENV_LOG;

pub fn init_logging() {
    let filter = EnvFilter::try_from_env(ENV_LOG)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // A second init (e.g. in tests) is not an error worth surfacing.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
