//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather provider and device location sources
//! - The fetch pipeline (location -> conditions + forecast)
//! - The render pipeline (state -> display commands)
//! - The input controller tying user actions to both
//!
//! It is used by `weather-dashboard`, but the render pipeline has no I/O and can
//! drive any display surface.

pub mod clock;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod fetch;
pub mod geolocation;
pub mod icon;
pub mod model;
pub mod provider;
pub mod render;
pub mod state;
pub mod units;

pub use config::Config;
pub use controller::{Dashboard, FetchRequest, Key};
pub use display::{DisplayCommand, DisplaySink, HumidityLevel, Region, Surface};
pub use error::{FetchError, GeolocationError, ProviderError};
pub use fetch::FetchPipeline;
pub use icon::{WeatherIcon, resolve_icon};
pub use model::{
    Coordinates, CurrentConditions, ForecastEntry, ForecastTime, ForecastWindow, Location,
    WeatherSnapshot,
};
pub use provider::{WeatherProvider, provider_from_config};
pub use state::{AppState, FetchPhase};
pub use units::{TemperatureUnit, to_fahrenheit};
