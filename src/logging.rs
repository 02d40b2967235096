//! Logging configuration using tracing.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter applied when `RUST_LOG` is unset.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose { "info" } else { "warn" }
}

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over the verbosity flag. Calling this twice
/// is harmless; the second call is ignored.
pub fn init(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let fmt_layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
