//! Diagnostic logging setup.
//!
//! All pipeline stages report through `tracing`; this module wires the
//! subscriber the CLI uses. `RUST_LOG` takes precedence over the
//! verbosity flag when set.

use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber.
///
/// `verbosity` maps to a default filter level: 0 → `info`, 1 → `debug`,
/// 2+ → `trace`. An explicit `RUST_LOG` environment variable overrides
/// the mapping.
///
/// Calling this more than once is a no-op after the first call, so tests
/// that each initialize logging do not panic.
pub fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tilecheck={}", default_level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
