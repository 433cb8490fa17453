//! Log output for the crate's `tracing` events.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

/// Installs a compact `tracing` subscriber writing to the real stderr.
///
/// The filter comes from `RUST_LOG` when set, otherwise from
/// [`Config::LOG_VAR`]. Log lines bypass the ambient sinks, so they are
/// never silenced or captured. Calling this more than once, or after another
/// subscriber was installed, does nothing.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&Config::global().log_filter));
    let installed = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
    if installed.is_ok() {
        tracing::debug!("logging initialised");
    }
}
