//! Tracing setup for the scoring service.

use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Request-level chatter from the classifier's HTTP stack would drown the
/// scoring logs at the default level, so it is capped unless the operator
/// overrides the filter via `RUST_LOG`.
const QUIET_DIRECTIVES: [&str; 2] = ["hyper=warn", "reqwest=warn"];

#[derive(Debug)]
pub enum TelemetryError {
    Filter { value: String, source: ParseError },
    Init(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::Filter { value, .. } => {
                write!(f, "APP_LOG_LEVEL '{value}' is not a valid tracing filter")
            }
            TelemetryError::Init(err) => write!(f, "failed to install tracing subscriber: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::Filter { source, .. } => Some(source),
            TelemetryError::Init(err) => Some(&**err),
        }
    }
}

/// Installs the global subscriber: compact single-line format, no ANSI, no
/// targets. `RUST_LOG` wins outright; otherwise the configured level plus
/// the quiet-directive caps apply.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(&config.log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Init)
}

fn build_filter(log_level: &str) -> Result<EnvFilter, TelemetryError> {
    let spec = std::iter::once(log_level)
        .chain(QUIET_DIRECTIVES)
        .collect::<Vec<_>>()
        .join(",");

    EnvFilter::try_new(&spec).map_err(|source| TelemetryError::Filter {
        value: log_level.to_string(),
        source,
    })
}
