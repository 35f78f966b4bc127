//! Tracing and logging configuration for the application
//!
//! Development builds get pretty, human-readable logs with file locations;
//! production builds get flattened JSON lines for log aggregation.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Environment;

/// Initialize tracing/logging based on the environment
///
/// # Environment Variables
/// - `RUST_LOG`: Override default log level (e.g., `RUST_LOG=debug,tower_http=trace`)
pub fn init_tracing(env: &Environment) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(env)));

    let (pretty, json) = if env.is_development() {
        let layer = fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .pretty();
        (Some(layer), None)
    } else {
        let layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .flatten_event(true)
            .with_target(true);
        (None, Some(layer))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(pretty)
        .with(json)
        .init();

    tracing::info!(environment = ?env, "Tracing initialized");
}

/// Filter used when `RUST_LOG` is not set
pub fn default_directives(env: &Environment) -> &'static str {
    match env {
        Environment::Development => "debug,rps_store=trace,tower_http=debug",
        Environment::Production => "info,tower_http=info",
    }
}
