//! Weather fetch error taxonomy.

use thiserror::Error;

/// Coarse classification of a [`WeatherError`], carried into the view state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Upstream,
    Transport,
    Validation,
}

/// Why a response could not be turned into a snapshot.
#[derive(Debug, Error)]
pub enum TransportCause {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("malformed response body: {0}")]
    Body(#[from] serde_json::Error),

    #[error("unexpected response shape: {0}")]
    Shape(String),
}

#[derive(Debug, Error)]
pub enum WeatherError {
    /// The API answered with a non-success status.
    #[error("{message}")]
    Upstream { status_code: u16, message: String },

    /// The API could not be reached or its answer could not be read.
    #[error("Failed to fetch weather data: {cause}")]
    Transport {
        #[from]
        cause: TransportCause,
    },

    #[error("Invalid input: {0}")]
    Validation(String),
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Upstream { .. } => ErrorKind::Upstream,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Validation(_) => ErrorKind::Validation,
        }
    }

    /// HTTP status for upstream failures.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Upstream { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// User-friendly message for UI display. Carries no technical detail.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Upstream { status_code, .. } if *status_code >= 500 => {
                "The weather service is having trouble. Please try again later."
            }
            Self::Upstream { status_code: 429, .. } => {
                "Too many requests to the weather service. Please wait and retry."
            }
            Self::Upstream { .. } => "The weather service rejected the request.",
            Self::Transport { cause: TransportCause::Http(e) } if e.is_timeout() => {
                "The weather service took too long to answer. Please try again."
            }
            Self::Transport { cause: TransportCause::Http(_) } => {
                "Unable to reach the weather service. Check your connection."
            }
            Self::Transport { .. } => "Received an unexpected response. Please try again.",
            Self::Validation(_) => "That location is not supported.",
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport {
            cause: TransportCause::Http(e),
        }
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(e: serde_json::Error) -> Self {
        Self::Transport {
            cause: TransportCause::Body(e),
        }
    }
}
