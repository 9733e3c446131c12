//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Initialise the global [`tracing`] subscriber.
///
/// Console output goes to stderr so rendered templates and variable
/// dumps on stdout stay machine-readable. The default level is `info`
/// (`debug` with `verbose`); `RUST_LOG` overrides both.
///
/// Must be called once at program startup, before any logging.
pub fn init_subscriber(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("provkit={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
