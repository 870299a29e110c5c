//! Log setup for the provider process.
//!
//! The host captures the plugin's stderr, so logs go there. The level follows
//! Terraform's `TF_LOG`, then `RUST_LOG`, then defaults to `warn`.

use tracing_subscriber::EnvFilter;

/// Environment variable Terraform uses to select a log level.
pub const TF_LOG_ENV: &str = "TF_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Translate a `TF_LOG` value into a filter directive.
///
/// `JSON` is Terraform's alias for trace-level output. Unrecognised values
/// return `None`.
pub fn tf_log_directive(value: &str) -> Option<&'static str> {
    match value.trim().to_ascii_uppercase().as_str() {
        "TRACE" | "JSON" => Some("trace"),
        "DEBUG" => Some("debug"),
        "INFO" => Some("info"),
        "WARN" => Some("warn"),
        "ERROR" => Some("error"),
        "OFF" => Some("off"),
        _ => None,
    }
}

fn filter_from_env() -> EnvFilter {
    if let Some(directive) = std::env::var(TF_LOG_ENV)
        .ok()
        .as_deref()
        .and_then(tf_log_directive)
    {
        return EnvFilter::new(directive);
    }

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install a stderr subscriber.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_logging() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter_from_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}
