//! Logging configuration using the tracing ecosystem.
//!
//! Logs go to stderr so that command output on stdout stays parseable.

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Default log level if RUST_LOG is not set.
const DEFAULT_LOG_FILTER: &str = "onlyoffice=info,warn";

/// Default log level with `--verbose`.
const VERBOSE_LOG_FILTER: &str = "onlyoffice=debug,info";

/// Initialize the logging system.
///
/// `RUST_LOG` wins over the defaults, e.g. `RUST_LOG=onlyoffice=trace`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already set.
pub fn init(verbose: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .with_file(verbose)
                .with_line_number(verbose),
        )
        .with(filter);

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "onlyoffice starting up");
    Ok(())
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    }
}
