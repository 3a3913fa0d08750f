//! Tracing setup: subscriber initialisation and span names.
//!
//! Reads `ASHWAM_LOG` for per-crate levels, e.g.
//! `ASHWAM_LOG=ashwam_drift=debug,ashwam_storage=warn`.
//! Falls back to `ashwam=info`.

pub mod spans;

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::{DEFAULT_LOG_FILTER, LOG_ENV_VAR};

static INIT: Once = Once::new();

/// Output format for the subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Initialise tracing from `ASHWAM_LOG`. Idempotent.
pub fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    install(filter, format);
}

/// Initialise tracing with an explicit filter string (`--verbose`, tests). Idempotent.
pub fn init_tracing_with_filter(filter: &str, format: LogFormat) {
    install(EnvFilter::new(filter), format);
}

fn install(filter: EnvFilter, format: LogFormat) {
    INIT.call_once(|| {
        let registry = tracing_subscriber::registry().with(filter);
        match format {
            LogFormat::Pretty => registry
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .init(),
            LogFormat::Json => registry
                .with(fmt::layer().with_writer(std::io::stderr).json().with_target(true))
                .init(),
        }
    });
}
