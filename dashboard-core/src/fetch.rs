//! Resolve a location to a [`WeatherSnapshot`].

use std::sync::Arc;

use crate::{
    config::DEFAULT_CITY,
    error::FetchError,
    geolocation::Geolocator,
    model::{Coordinates, ForecastWindow, Location, WeatherSnapshot},
    provider::WeatherProvider,
};

#[derive(Debug, Clone)]
pub struct FetchPipeline {
    provider: Arc<dyn WeatherProvider>,
    geolocator: Arc<dyn Geolocator>,
    default_city: String,
}

impl FetchPipeline {
    pub fn new(provider: Arc<dyn WeatherProvider>, geolocator: Arc<dyn Geolocator>) -> Self {
        Self { provider, geolocator, default_city: DEFAULT_CITY.to_string() }
    }

    pub fn with_default_city(mut self, city: impl Into<String>) -> Self {
        self.default_city = city.into();
        self
    }

    pub fn default_city(&self) -> &str {
        &self.default_city
    }

    pub async fn fetch(&self, location: &Location) -> Result<WeatherSnapshot, FetchError> {
        match location {
            Location::Coordinates(coords) => self.fetch_by_coordinates(*coords).await,
            Location::City(name) => self.fetch_by_city(name).await,
        }
    }

    pub async fn fetch_by_coordinates(
        &self,
        coords: Coordinates,
    ) -> Result<WeatherSnapshot, FetchError> {
        self.fetch_coordinates_for(coords, None).await
    }

    /// Geocode `name`, then fetch for the first match.
    pub async fn fetch_by_city(&self, name: &str) -> Result<WeatherSnapshot, FetchError> {
        let matches = self.provider.geocode(name).await.map_err(|source| {
            FetchError::GeocodeUnavailable { city: name.to_string(), source }
        })?;

        let coords = matches
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::CityNotFound(name.to_string()))?;

        tracing::debug!(city = name, %coords, "geocoded city");
        self.fetch_coordinates_for(coords, Some(name)).await
    }

    /// Fetch for the device location, or the default city if it can't be had.
    pub async fn fetch_by_current_location(&self) -> Result<WeatherSnapshot, FetchError> {
        match self.geolocator.locate().await {
            Ok(coords) => self.fetch_by_coordinates(coords).await,
            Err(err) => {
                tracing::debug!(
                    error = %err,
                    fallback = %self.default_city,
                    "geolocation failed, using default city"
                );
                self.fetch_by_city(&self.default_city).await
            }
        }
    }

    async fn fetch_coordinates_for(
        &self,
        coords: Coordinates,
        city: Option<&str>,
    ) -> Result<WeatherSnapshot, FetchError> {
        let (current, forecast) = tokio::join!(
            self.provider.current_conditions(coords),
            self.provider.forecast(coords),
        );

        let current = current.map_err(|source| FetchError::ConditionsUnavailable {
            city: city.map(str::to_string),
            source,
        })?;
        let forecast = forecast.map_err(FetchError::ForecastUnavailable)?;

        tracing::info!(
            location = %current.location_name,
            %coords,
            slots = forecast.len(),
            "fetched weather"
        );

        Ok(WeatherSnapshot { current, forecast: ForecastWindow::from_entries(forecast) })
    }
}
