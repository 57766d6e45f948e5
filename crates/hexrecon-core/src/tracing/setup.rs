//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::DEFAULT_LOG_FILTER;

static INIT: Once = Once::new();

/// Environment variable holding per-module log directives.
pub const LOG_ENV_VAR: &str = "HEXRECON_LOG";

/// Pick the filter directives to install.
///
/// Priority: `cli` (e.g. from `-v`), then `env` (`HEXRECON_LOG`), then
/// `default` (the configured `observability.log_level`). A candidate that
/// does not parse as an `EnvFilter` is skipped; if none parse the result is
/// `hexrecon=info`.
pub fn select_filter(cli: Option<&str>, env: Option<&str>, default: &str) -> String {
    [cli, env, Some(default)]
        .into_iter()
        .flatten()
        .find(|directives| EnvFilter::try_new(directives).is_ok())
        .unwrap_or(DEFAULT_LOG_FILTER)
        .to_string()
}

/// Initialize the hexrecon tracing/logging system.
///
/// Reads the `HEXRECON_LOG` environment variable for per-module log levels.
/// Format: `HEXRECON_LOG=hexrecon_storage=debug,hexrecon_assembly=info`
///
/// Falls back to `hexrecon=info` if `HEXRECON_LOG` is not set or is invalid.
/// Output goes to stderr; stdout is reserved for assembled and binary output.
///
/// This function is idempotent: calling it multiple times is safe.
pub fn init_tracing() {
    init_tracing_with(None, DEFAULT_LOG_FILTER);
}

/// Like [`init_tracing`], with directives chosen by [`select_filter`]:
/// `cli` overrides `HEXRECON_LOG`, which overrides `default_filter`
/// (normally the configured `observability.log_level`).
pub fn init_tracing_with(cli: Option<&str>, default_filter: &str) {
    INIT.call_once(|| {
        let env = std::env::var(LOG_ENV_VAR).ok();
        let directives = select_filter(cli, env.as_deref(), default_filter);
        let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        // A test harness or embedding application may already own the global subscriber.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
