use crate::{
    Config,
    error::ProviderError,
    model::{Coordinates, CurrentConditions, ForecastEntry},
    provider::openweather::OpenWeatherProvider,
};
use anyhow::Context;
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc, time::Duration};

pub mod openweather;

/// Remote source of weather data.
///
/// Every method is a single request; sequencing and fallback live in
/// [`crate::fetch::FetchPipeline`].
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Candidate coordinates for a free-text city name, best match first.
    async fn geocode(&self, city: &str) -> Result<Vec<Coordinates>, ProviderError>;

    async fn current_conditions(
        &self,
        coords: Coordinates,
    ) -> Result<CurrentConditions, ProviderError>;

    /// Chronological 3-hour forecast slots as returned by the provider (not truncated).
    async fn forecast(&self, coords: Coordinates) -> Result<Vec<ForecastEntry>, ProviderError>;
}

/// HTTP client honouring the configured request timeout.
pub fn http_client(config: &Config) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs()))
        .build()
        .context("Failed to build HTTP client")
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.api_key()?;

    let http = http_client(config)?;

    let provider = OpenWeatherProvider::new(api_key.to_owned())
        .with_base_url(config.base_url())
        .with_http_client(http);

    Ok(Arc::new(provider))
}
