//! The fixed catalogue of supported cities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WeatherError;

/// A supported location. The set is closed; coordinates are literal configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum City {
    #[default]
    Ottawa,
    Bogota,
    #[serde(rename = "Buenos Aires")]
    BuenosAires,
}

impl City {
    /// All cities in display order.
    pub const ALL: [City; 3] = [City::Ottawa, City::Bogota, City::BuenosAires];

    /// Short key, as shown on the selector.
    pub fn name(self) -> &'static str {
        match self {
            Self::Ottawa => "Ottawa",
            Self::Bogota => "Bogota",
            Self::BuenosAires => "Buenos Aires",
        }
    }

    /// Display label including the country.
    pub fn label(self) -> &'static str {
        match self {
            Self::Ottawa => "Ottawa, Canada",
            Self::Bogota => "Bogota, Colombia",
            Self::BuenosAires => "Buenos Aires, Argentina",
        }
    }

    pub fn latitude(self) -> f64 {
        match self {
            Self::Ottawa => 45.4215,
            Self::Bogota => 4.7110,
            Self::BuenosAires => -34.6037,
        }
    }

    pub fn longitude(self) -> f64 {
        match self {
            Self::Ottawa => -75.6972,
            Self::Bogota => -74.0721,
            Self::BuenosAires => -58.3816,
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for City {
    type Err = WeatherError;

    /// Accepts the key in any case; `Buenos Aires` may also be written
    /// `buenos-aires`, `buenos_aires` or `buenosaires`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        City::ALL
            .into_iter()
            .find(|city| city.name().replace(' ', "").to_lowercase() == normalized)
            .ok_or_else(|| WeatherError::Validation(format!("unknown city: {:?}", s)))
    }
}
