//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, LogFormat};
use crate::error::AppError;

/// Builds the filter for `config.log_level`. `RUST_LOG`, when set, wins.
///
/// # Errors
///
/// Returns `AppError::Config` if the directive cannot be parsed.
pub fn env_filter(config: &AppConfig) -> Result<EnvFilter, AppError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.log_level)
            .map_err(|e| AppError::Config(format!("invalid LOG_LEVEL '{}': {e}", config.log_level))),
    }
}

/// Installs the global tracing subscriber.
///
/// # Errors
///
/// Returns `AppError::Config` if the filter is invalid or a global subscriber
/// is already installed.
pub fn init_tracing(config: &AppConfig) -> Result<(), AppError> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter(config)?);
    let installed = match config.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    installed.map_err(|e| AppError::Config(format!("failed to install tracing subscriber: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_accepts_directives() {
        let config = AppConfig {
            log_level: "blogcms_core=debug,warn".to_owned(),
            ..AppConfig::default()
        };

        assert!(env_filter(&config).is_ok());
    }
}
