//! Application-level error types.
//!
//! Library crates return their own typed errors; this module folds them into
//! one `AppError` for the binary, with a `user_message()` suitable for display.

use citycast_weather::WeatherError;
use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Config(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}

impl From<anyhow::Error> for AppError {
    /// Recovers typed configuration errors that travelled through `anyhow`.
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ConfigError>() {
            Ok(config) => AppError::Config(config),
            Err(other) => AppError::Other(other),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_survives_anyhow() {
        let wrapped = anyhow::Error::new(ConfigError::Invalid("weather.api_base_url".into()));
        let app_err: AppError = wrapped.into();
        assert!(matches!(app_err, AppError::Config(ConfigError::Invalid(_))));
        assert_eq!(
            app_err.user_message(),
            "Invalid configuration. Check your settings."
        );
    }

    #[test]
    fn test_other_errors_stay_generic() {
        let app_err: AppError = anyhow::anyhow!("boom").into();
        assert!(matches!(app_err, AppError::Other(_)));
        assert_eq!(app_err.to_string(), "boom");
    }

    #[test]
    fn test_weather_error_conversion() {
        let app_err: AppError = WeatherError::Validation("Atlantis".into()).into();
        assert!(matches!(app_err, AppError::Weather(WeatherError::Validation(_))));
        assert_eq!(app_err.user_message(), "That location is not supported.");
    }
}
