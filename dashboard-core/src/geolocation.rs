//! Device location sources.
//!
//! A failed lookup is never surfaced: the fetch pipeline falls back to the
//! default city whatever the reason.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{error::GeolocationError, model::Coordinates};

pub const IP_API_URL: &str = "http://ip-api.com/json";

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn locate(&self) -> Result<Coordinates, GeolocationError>;
}

/// Coordinates known up front, e.g. from command-line flags.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocator(pub Coordinates);

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        Ok(self.0)
    }
}

/// No location capability at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocator;

#[async_trait]
impl Geolocator for NoGeolocator {
    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::Unsupported)
    }
}

/// Approximate location from the public IP address.
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    http: Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpGeolocator {
    pub fn new(http: Client) -> Self {
        Self { http, url: IP_API_URL.to_string() }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[async_trait]
impl Geolocator for IpGeolocator {
    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        let res = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| GeolocationError::Unavailable(e.to_string()))?;

        if !res.status().is_success() {
            return Err(GeolocationError::Unavailable(format!(
                "lookup returned status {}",
                res.status()
            )));
        }

        let body: IpApiResponse =
            res.json().await.map_err(|e| GeolocationError::Unavailable(e.to_string()))?;

        if body.status != "success" {
            let reason = body.message.unwrap_or_else(|| body.status.clone());
            // ip-api reports reserved/private ranges this way; nothing to retry.
            if reason.contains("private") || reason.contains("reserved") {
                return Err(GeolocationError::Denied);
            }
            return Err(GeolocationError::Unavailable(reason));
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => {
                tracing::debug!(lat, lon, "IP geolocation succeeded");
                Ok(Coordinates::new(lat, lon))
            }
            _ => Err(GeolocationError::Unavailable("lookup returned no coordinates".into())),
        }
    }
}
