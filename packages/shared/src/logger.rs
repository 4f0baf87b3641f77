//! Logging setup utilities for the Meetly binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// This function sets up logging for the calling crate and the binary.
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `crate_name` - The library crate to enable (e.g., "meetly_server")
/// * `binary_name` - The name of the binary (e.g., "meetly-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use meetly_shared::logger::setup_logger;
///
/// setup_logger("meetly_server", "meetly-server", "debug");
/// ```
pub fn setup_logger(crate_name: &str, binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(crate_name, binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the default `EnvFilter` directives used when `RUST_LOG` is unset.
///
/// The binary target is omitted when it normalizes to the crate target.
fn default_directives(crate_name: &str, binary_name: &str, default_log_level: &str) -> String {
    let crate_target = crate_name.replace('-', "_");
    let binary_target = binary_name.replace('-', "_");

    let mut directives = vec![format!("{}={}", crate_target, default_log_level)];
    if binary_target != crate_target {
        directives.push(format!("{}={}", binary_target, default_log_level));
    }
    directives.push(format!("tower_http={}", default_log_level));
    directives.join(",")
}
