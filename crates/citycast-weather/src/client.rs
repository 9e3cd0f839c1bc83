//! Open-Meteo forecast client with a per-city freshness cache.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::Client;
use tracing::instrument;

use crate::cache::WeatherCache;
use crate::city::City;
use crate::clock::{Clock, SystemClock};
use crate::error::WeatherError;
use crate::types::{ForecastResponse, WeatherSnapshot};

pub const OPEN_METEO_BASE_URL: &str = "https://api.open-meteo.com";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const FORECAST_PATH: &str = "/v1/forecast";
const CURRENT_FIELDS: &str = "temperature_2m,weather_code";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min";

/// Per-call options for [`WeatherClient::get_weather`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Go to the network even if the cache holds a fresh entry.
    pub skip_cache: bool,
}

impl FetchOptions {
    pub fn fresh() -> Self {
        Self { skip_cache: true }
    }
}

#[derive(Debug)]
pub struct WeatherClient {
    http: Client,
    base_url: String,
    cache: WeatherCache,
    clock: Arc<dyn Clock>,
}

impl WeatherClient {
    /// Create a client against `base_url` (scheme and host, no path).
    pub fn new(base_url: &str, timeout: Duration, cache: WeatherCache) -> Result<Self, WeatherError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the time source used for cache freshness.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn cache(&self) -> &WeatherCache {
        &self.cache
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current conditions and today's range for `city`.
    ///
    /// Served from the cache when an entry younger than the TTL exists and
    /// `options.skip_cache` is false; otherwise fetched and cached.
    #[instrument(skip(self), level = "info")]
    pub async fn get_weather(
        &self,
        city: City,
        options: FetchOptions,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let now = self.clock.now();

        if !options.skip_cache {
            if let Some(snapshot) = self.cache.fresh(city, now) {
                tracing::debug!("Using cached weather for {}", city);
                return Ok(snapshot);
            }
        }

        let snapshot = self.fetch(city).await.map_err(|e| {
            tracing::error!("Error fetching weather data for {}: {}", city, e);
            e
        })?;

        self.cache.store(city, snapshot.clone(), now);
        tracing::info!(
            "Cached weather for {}: {:.1}°C",
            city,
            snapshot.current.temperature_c
        );
        Ok(snapshot)
    }

    async fn fetch(&self, city: City) -> Result<WeatherSnapshot, WeatherError> {
        let url = format!("{}{}", self.base_url, FORECAST_PATH);
        let latitude = format!("{:.4}", city.latitude());
        let longitude = format!("{:.4}", city.longitude());

        let response = self
            .http
            .get(&url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current", CURRENT_FIELDS),
                ("daily", DAILY_FIELDS),
                ("timezone", "auto"),
                ("forecast_days", "1"),
            ])
            // Freshness is ours to decide; keep HTTP caches out of it.
            .header(CACHE_CONTROL, "no-cache, no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(WeatherError::Upstream {
                status_code: status.as_u16(),
                message: format!("Weather API error: {} - {}", status.as_u16(), text),
            });
        }

        let body = response.text().await?;
        let parsed: ForecastResponse = serde_json::from_str(&body)?;
        Ok(WeatherSnapshot::try_from(parsed)?)
    }
}
