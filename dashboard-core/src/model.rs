use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Forecast slots kept from the provider list: 8 x 3h covers the next ~24h.
pub const FORECAST_WINDOW_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Where to fetch weather for.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Coordinates(Coordinates),
    City(String),
}

/// Snapshot of the current weather at one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub country_code: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    /// Rain volume over the last hour, 0.0 when the provider omits it.
    pub precipitation_mm: f64,
    pub condition: String,
    pub sunset: i64,
}

/// Time of a forecast slot; `Now` marks the synthetic entry built from current conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForecastTime {
    Now,
    At(DateTime<Utc>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub time: ForecastTime,
    pub temperature_c: f64,
    pub condition: String,
    /// Probability of precipitation, 0.0..=1.0.
    pub pop: f64,
}

/// The next [`FORECAST_WINDOW_LEN`] forecast slots, nearest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastWindow {
    entries: Vec<ForecastEntry>,
}

impl ForecastWindow {
    /// Keep the first slots of a chronological provider list.
    pub fn from_entries(entries: impl IntoIterator<Item = ForecastEntry>) -> Self {
        Self { entries: entries.into_iter().take(FORECAST_WINDOW_LEN).collect() }
    }

    pub fn entries(&self) -> &[ForecastEntry] {
        &self.entries
    }

    pub fn first(&self) -> Option<&ForecastEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest probability of precipitation in the window, 0.0 when empty.
    pub fn max_pop(&self) -> f64 {
        self.entries.iter().map(|e| e.pop).fold(0.0, f64::max)
    }
}

/// Current conditions and forecast fetched together; always replaced as a pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
    pub forecast: ForecastWindow,
}
