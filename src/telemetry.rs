//! Tracing setup and span constructors.
//!
//! `RUST_LOG` sets the filter (default `info`). The output format comes from
//! `[logging] format` unless `EMCOMD_LOG_FORMAT` overrides it.

use crate::config::LogFormat;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable overriding `[logging] format`.
pub const LOG_FORMAT_ENV: &str = "EMCOMD_LOG_FORMAT";

/// Resolve the output format from the config value and the optional
/// environment override. Unknown override values are ignored.
pub fn effective_format(configured: LogFormat, env_override: Option<&str>) -> LogFormat {
    match env_override.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("json") => LogFormat::Json,
        Some("text") => LogFormat::Text,
        _ => configured,
    }
}

/// Install the global subscriber.
pub fn init_tracing(configured: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let env_override = std::env::var(LOG_FORMAT_ENV).ok();

    match effective_format(configured, env_override.as_deref()) {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_current_span(true)
                .init();
        }
        LogFormat::Text => {
            fmt().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Install a text subscriber on stderr for the terminal client, leaving
/// stdout to the session. The filter defaults to `warn`.
pub fn init_client_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Standardized span constructors.
pub mod spans {
    use crate::state::SessionId;
    use tracing::{Level, Span, span};

    /// Span for one dispatched command.
    pub fn command(name: &str, client_id: &str, session: SessionId) -> Span {
        span!(
            Level::DEBUG,
            "command",
            command = %name,
            client_id = %client_id,
            session = %session
        )
    }

    /// Span for one periodic report run.
    pub fn report() -> Span {
        span!(Level::DEBUG, "report")
    }
}
