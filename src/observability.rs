//! Logging initialization.
//!
//! The binary calls [`init`] once at startup; the library only emits
//! `tracing` events and `metrics` facade calls and never installs
//! subscribers itself.

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber.
///
/// The filter honors `RUST_LOG`; `verbose` raises the default from `warn`
/// to `debug`. Safe to call once per process; later calls are ignored.
pub fn init(verbose: bool) {
    let default_filter = if verbose { "cxt=debug" } else { "cxt=warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
