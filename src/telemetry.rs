//! Process-wide tracing subscriber.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{directive}': {message}")]
    InvalidFilter { directive: String, message: String },

    #[error("tracing subscriber already installed: {0}")]
    AlreadyInstalled(String),
}

/// Install a fmt subscriber writing to stderr.
///
/// Returns an error instead of panicking when a global subscriber already
/// exists, so tests and embedding applications can call it freely.
pub fn init_tracing(cfg: &LoggingConfig) -> Result<(), TelemetryError> {
    let directive = cfg.level.trim();
    let filter = EnvFilter::try_new(directive).map_err(|err| TelemetryError::InvalidFilter {
        directive: directive.to_owned(),
        message: err.to_string(),
    })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let installed = if cfg.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|err| TelemetryError::AlreadyInstalled(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_filter_is_rejected() {
        let cfg = LoggingConfig {
            level: "ragscore=loudest".into(),
            json: false,
        };
        assert!(matches!(
            init_tracing(&cfg),
            Err(TelemetryError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn second_install_fails_without_panicking() {
        let cfg = LoggingConfig {
            level: "warn".into(),
            json: true,
        };
        let _ = init_tracing(&cfg);
        assert!(matches!(
            init_tracing(&cfg),
            Err(TelemetryError::AlreadyInstalled(_))
        ));
    }
}
