use std::io::IsTerminal;

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging to stderr so stdout stays free for descriptors.
///
/// Use the `RUST_LOG` environment variable to override the default filter.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "info,em_import=debug" } else { "warn,em_import=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A subscriber may already be installed when embedded; keep that one.
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();
}
