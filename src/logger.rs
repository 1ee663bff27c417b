//! Logging setup for the `usagegraph` binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left to
//! the binary (or to whichever front-end embeds the crate).

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise `verbose` selects debug output for this
/// crate, `quiet` restricts output to errors, and the default is `info`.
/// Calling it twice is harmless: the second installation is ignored.
pub fn init_logger(verbose: bool, quiet: bool) {
    let default_directive = if verbose {
        "usagegraph=debug"
    } else if quiet {
        "error"
    } else {
        "usagegraph=info"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}
