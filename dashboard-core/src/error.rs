//! Error taxonomy for the fetch pipeline.
//!
//! `FetchError` is what the user sees; `ProviderError` is the transport-level
//! cause kept as its source for logging.

use thiserror::Error;

/// Failures talking to the weather provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} request failed with status {status}: {body}")]
    Status { endpoint: &'static str, status: reqwest::StatusCode, body: String },

    #[error("failed to parse {endpoint} response: {source}")]
    Parse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Why a fetch produced no snapshot. Prior state is never touched on any of these.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("current conditions unavailable")]
    ConditionsUnavailable {
        /// City the fetch was started for, if it came from a search.
        city: Option<String>,
        #[source]
        source: ProviderError,
    },

    #[error("forecast unavailable")]
    ForecastUnavailable(#[source] ProviderError),

    #[error("no coordinates found for \"{0}\"")]
    CityNotFound(String),

    #[error("geocoding lookup for \"{city}\" failed")]
    GeocodeUnavailable {
        city: String,
        #[source]
        source: ProviderError,
    },
}

impl FetchError {
    /// Message suitable for a blocking notification.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::ConditionsUnavailable { city: Some(city), .. } => {
                format!("Could not find weather for \"{city}\".")
            }
            FetchError::ConditionsUnavailable { city: None, .. } => {
                "Weather data not found.".to_string()
            }
            FetchError::ForecastUnavailable(_) => {
                "Could not fetch hourly forecast data.".to_string()
            }
            FetchError::CityNotFound(city) => {
                format!("Could not find coordinates for \"{city}\".")
            }
            FetchError::GeocodeUnavailable { city, .. } => {
                format!("Could not look up \"{city}\". Please try again.")
            }
        }
    }
}

/// Device location could not be determined. Never shown to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("location permission denied")]
    Denied,
    #[error("location service unsupported")]
    Unsupported,
    #[error("location unavailable: {0}")]
    Unavailable(String),
}
