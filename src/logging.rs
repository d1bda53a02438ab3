use std::sync::Once;

/// Environment variable holding the log filter, e.g. `CSSTOKEN_LOG=csstoken=debug`.
pub const LOG_ENV: &str = "CSSTOKEN_LOG";

const DEFAULT_FILTER: &str = "warn";

static TRACING_INIT: Once = Once::new();

/// Install the stderr subscriber used by both binaries.
///
/// Safe to call more than once. Output goes to stderr because stdout carries the
/// language server transport and the CLI's reports.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_ansi(false),
            )
            .with(filter)
            .try_init();
    });
}
