//! Diagnostic logging setup
//!
//! Library code logs through `tracing`; the binary installs one subscriber
//! writing to stderr so piped stdout stays clean.
//!
//! - default: `warn`
//! - `--verbose`: `baskit=debug`
//! - `BASKIT_LOG`: any `EnvFilter` directive, overrides both

use std::sync::OnceLock;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a filter directive
pub const LOG_ENV: &str = "BASKIT_LOG";

static INIT: OnceLock<()> = OnceLock::new();

/// Build the filter for the given verbosity
pub fn filter(verbose: bool) -> EnvFilter {
    if let Ok(directive) = std::env::var(LOG_ENV) {
        if let Ok(filter) = EnvFilter::try_new(&directive) {
            return filter;
        }
    }
    if verbose {
        EnvFilter::new("warn,baskit=debug")
    } else {
        EnvFilter::new("warn")
    }
}

/// Install the stderr subscriber.
///
/// Safe to call multiple times - only the first call has effect.
pub fn init(verbose: bool) {
    INIT.get_or_init(|| {
        let _ = tracing_subscriber::registry()
            .with(filter(verbose))
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .without_time(),
            )
            .try_init();
    });
}
