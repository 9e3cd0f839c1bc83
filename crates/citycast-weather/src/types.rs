//! Weather snapshot model, WMO code table and the Open-Meteo wire format.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TransportCause;

/// Display information for a WMO weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherInfo {
    pub condition: &'static str,
    pub icon: &'static str,
}

const UNKNOWN_WEATHER: WeatherInfo = WeatherInfo {
    condition: "Unknown",
    icon: "❓",
};

/// WMO weather interpretation code as reported by Open-Meteo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherCode(pub i32);

impl WeatherCode {
    /// Condition text and icon for this code.
    /// See: https://open-meteo.com/en/docs#weathervariables
    pub fn info(self) -> WeatherInfo {
        let (condition, icon) = match self.0 {
            0 => ("Clear sky", "☀️"),
            1 => ("Mainly clear", "🌤️"),
            2 => ("Partly cloudy", "⛅"),
            3 => ("Overcast", "☁️"),
            45 => ("Fog", "🌫️"),
            48 => ("Depositing rime fog", "🌫️"),
            51 => ("Light drizzle", "🌦️"),
            53 => ("Moderate drizzle", "🌧️"),
            55 => ("Dense drizzle", "🌧️"),
            61 => ("Slight rain", "🌦️"),
            63 => ("Moderate rain", "🌧️"),
            65 => ("Heavy rain", "🌧️"),
            71 => ("Slight snow fall", "🌨️"),
            73 => ("Moderate snow fall", "🌨️"),
            75 => ("Heavy snow fall", "❄️"),
            80 => ("Slight rain showers", "🌦️"),
            81 => ("Moderate rain showers", "🌧️"),
            82 => ("Violent rain showers", "⛈️"),
            95 => ("Thunderstorm", "⛈️"),
            96 => ("Thunderstorm with slight hail", "⛈️"),
            99 => ("Thunderstorm with heavy hail", "⛈️"),
            _ => return UNKNOWN_WEATHER,
        };
        WeatherInfo { condition, icon }
    }
}

/// Current conditions at the moment of observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub weather_code: i32,
    /// Local time at the city (the request asks for `timezone=auto`).
    pub observed_at: NaiveDateTime,
}

impl CurrentConditions {
    pub fn code(&self) -> WeatherCode {
        WeatherCode(self.weather_code)
    }
}

/// Daily temperature range. Index 0 of every sequence is today.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyRange {
    pub max_c: Vec<f64>,
    pub min_c: Vec<f64>,
    pub dates: Vec<NaiveDate>,
}

/// Normalized result of one fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
    pub daily: DailyRange,
}

impl WeatherSnapshot {
    pub fn today_high(&self) -> Option<f64> {
        self.daily.max_c.first().copied()
    }

    pub fn today_low(&self) -> Option<f64> {
        self.daily.min_c.first().copied()
    }

    /// True if any day reports a minimum above its maximum. The API is not
    /// supposed to do this but nothing downstream depends on it.
    pub fn has_inverted_range(&self) -> bool {
        self.daily
            .max_c
            .iter()
            .zip(&self.daily.min_c)
            .any(|(max, min)| max < min)
    }
}

/// Last successful fetch for a city.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub snapshot: WeatherSnapshot,
    pub fetched_at: DateTime<Utc>,
}

// Open-Meteo wire format

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    current: ApiCurrent,
    daily: ApiDaily,
}

#[derive(Debug, Deserialize)]
struct ApiCurrent {
    temperature_2m: f64,
    weather_code: i32,
    time: String,
}

#[derive(Debug, Deserialize)]
struct ApiDaily {
    #[serde(default)]
    temperature_2m_max: Vec<f64>,
    #[serde(default)]
    temperature_2m_min: Vec<f64>,
    #[serde(default)]
    time: Vec<String>,
}

/// Open-Meteo reports `current.time` as ISO-8601 local time without an
/// offset, usually to the minute.
fn parse_observed_at(raw: &str) -> Result<NaiveDateTime, TransportCause> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| TransportCause::Shape(format!("current.time {:?}: {}", raw, e)))
}

impl TryFrom<ForecastResponse> for WeatherSnapshot {
    type Error = TransportCause;

    fn try_from(resp: ForecastResponse) -> Result<Self, Self::Error> {
        let observed_at = parse_observed_at(&resp.current.time)?;
        let dates = resp
            .daily
            .time
            .iter()
            .map(|d| {
                NaiveDate::parse_from_str(d, "%Y-%m-%d")
                    .map_err(|e| TransportCause::Shape(format!("daily.time {:?}: {}", d, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            current: CurrentConditions {
                temperature_c: resp.current.temperature_2m,
                weather_code: resp.current.weather_code,
                observed_at,
            },
            daily: DailyRange {
                max_c: resp.daily.temperature_2m_max,
                min_c: resp.daily.temperature_2m_min,
                dates,
            },
        })
    }
}
