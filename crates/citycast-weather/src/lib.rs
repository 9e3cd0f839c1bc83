//! Weather data for Citycast.
//!
//! Fetches current conditions and today's temperature range for a fixed set
//! of cities from the Open-Meteo API, with a short-lived in-memory cache.

pub mod cache;
pub mod city;
pub mod client;
pub mod clock;
pub mod error;
pub mod types;

pub use cache::{WeatherCache, CACHE_TTL};
pub use city::City;
pub use client::{FetchOptions, WeatherClient, DEFAULT_REQUEST_TIMEOUT, OPEN_METEO_BASE_URL};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ErrorKind, TransportCause, WeatherError};
pub use types::*;
