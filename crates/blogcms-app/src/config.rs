//! Environment-driven configuration.

use std::str::FromStr;

use chrono::Duration;

use crate::error::AppError;

/// Default tracing filter directive.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Default publisher source tag.
pub const DEFAULT_EVENT_SOURCE: &str = "blogcms";
/// Default window in which a saved aggregate counts as recently updated.
pub const DEFAULT_RECENTLY_UPDATED_THRESHOLD_SECS: u32 = 86_400;

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Multi-line human-readable output.
    Pretty,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => Err(AppError::Config(format!(
                "LOG_FORMAT must be 'json' or 'pretty', got '{other}'"
            ))),
        }
    }
}

/// Process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `EnvFilter` directive, e.g. `info` or `blogcms_core=debug,info`.
    pub log_level: String,
    /// Log line format.
    pub log_format: LogFormat,
    /// Tag attached to every published event log line.
    pub event_source: String,
    /// Window used to classify aggregates as recently updated.
    pub recently_updated_threshold: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
            log_format: LogFormat::default(),
            event_source: DEFAULT_EVENT_SOURCE.to_owned(),
            recently_updated_threshold: Duration::seconds(i64::from(
                DEFAULT_RECENTLY_UPDATED_THRESHOLD_SECS,
            )),
        }
    }
}

impl AppConfig {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value. Unset variables fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_level = lookup("LOG_LEVEL").unwrap_or(defaults.log_level);
        if log_level.trim().is_empty() {
            return Err(AppError::Config("LOG_LEVEL must not be blank".into()));
        }

        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => defaults.log_format,
        };

        let event_source = lookup("EVENT_SOURCE").unwrap_or(defaults.event_source);
        if event_source.trim().is_empty() {
            return Err(AppError::Config("EVENT_SOURCE must not be blank".into()));
        }

        let recently_updated_threshold = match lookup("RECENTLY_UPDATED_THRESHOLD_SECS") {
            Some(raw) => {
                let secs: u32 = raw.trim().parse().map_err(|e| {
                    AppError::Config(format!(
                        "RECENTLY_UPDATED_THRESHOLD_SECS must be a non-negative integer: {e}"
                    ))
                })?;
                Duration::seconds(i64::from(secs))
            }
            None => defaults.recently_updated_threshold,
        };

        Ok(Self {
            log_level,
            log_format,
            event_source,
            recently_updated_threshold,
        })
    }
}
