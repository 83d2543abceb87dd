//! Tracing subscriber bootstrap

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Error returned when a global subscriber is already installed
pub type TelemetryError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Install the global `tracing` subscriber described by `config`.
///
/// `RUST_LOG` takes precedence over `config.level` when set.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.colored)
        .with_file(config.source_location)
        .with_line_number(config.source_location)
        .with_target(true);

    match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_only_once() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            format: LogFormat::Compact,
            colored: false,
            source_location: false,
        };

        assert!(init_tracing(&config).is_ok());
        tracing::debug!(event = "telemetry_ready", "Tracing initialized");

        // A second global subscriber is refused
        assert!(init_tracing(&config).is_err());
    }
}
