//! Diagnostic logging on stderr.
//!
//! `RUST_LOG` wins when set; otherwise each `-v` raises the level from
//! `warn` through `info` and `debug` to `trace`.

use tracing_subscriber::EnvFilter;

fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("svc_cli={}", level_for(verbosity))));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
