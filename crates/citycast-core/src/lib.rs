pub mod config;
pub mod error;

pub use config::{Config, LoggingConfig, ValidationResult, WeatherConfig};
pub use error::{AppError, ConfigError};

use anyhow::Result;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Initialize tracing. `RUST_LOG` wins over `default_filter`.
pub fn init(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback_filter(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::info!("Citycast core initialized");
    Ok(())
}

/// Filter used when `RUST_LOG` is unset. A blank or unparsable directive
/// means `info`; an empty `EnvFilter` would silence everything.
fn fallback_filter(directive: &str) -> EnvFilter {
    let directive = directive.trim();
    if directive.is_empty() {
        return EnvFilter::new(DEFAULT_FILTER);
    }
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_blank_filter_falls_back_to_info() {
        assert_eq!(fallback_filter("").max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(fallback_filter("  \t").max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_configured_filter_is_used() {
        assert_eq!(fallback_filter("debug").max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(fallback_filter(" warn ").max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_invalid_filter_falls_back_to_info() {
        assert_eq!(
            fallback_filter("citycast=notalevel").max_level_hint(),
            Some(LevelFilter::INFO)
        );
    }
}
