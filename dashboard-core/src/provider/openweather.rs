use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::ProviderError,
    model::{Coordinates, CurrentConditions, ForecastEntry, ForecastTime},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const CURRENT_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/data/2.5/forecast";
const GEOCODE_PATH: &str = "/geo/1.0/direct";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Point the provider at another host, e.g. a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    fn coordinate_query(&self, coords: Coordinates) -> Vec<(&'static str, String)> {
        vec![
            ("lat", coords.latitude.to_string()),
            ("lon", coords.longitude.to_string()),
            ("appid", self.api_key.clone()),
            ("units", "metric".to_string()),
        ]
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(endpoint, %url, "OpenWeather request");

        let res = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| ProviderError::Transport { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| ProviderError::Transport { endpoint, source })?;

        if !status.is_success() {
            return Err(ProviderError::Status { endpoint, status, body: truncate_body(&body) });
        }

        serde_json::from_str(&body).map_err(|source| ProviderError::Parse { endpoint, source })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    #[serde(default)]
    feels_like: Option<f64>,
    #[serde(default)]
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
}

#[derive(Debug, Deserialize, Default)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
struct OwSys {
    #[serde(default)]
    country: String,
    #[serde(default)]
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwWind,
    rain: Option<OwRain>,
    #[serde(default)]
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    pop: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwGeocodeMatch {
    lat: f64,
    lon: f64,
}

fn primary_condition(weather: &[OwWeather]) -> String {
    weather
        .first()
        .map(|w| w.main.clone())
        .unwrap_or_else(|| "Unknown".to_string())
}

impl OwCurrentResponse {
    fn into_conditions(self) -> CurrentConditions {
        let condition = primary_condition(&self.weather);

        CurrentConditions {
            location_name: self.name,
            country_code: self.sys.country,
            temperature_c: self.main.temp,
            feels_like_c: self.main.feels_like.unwrap_or(self.main.temp),
            humidity_pct: self.main.humidity,
            wind_speed: self.wind.speed,
            precipitation_mm: self.rain.and_then(|r| r.one_hour).unwrap_or(0.0),
            condition,
            sunset: self.sys.sunset,
        }
    }
}

impl OwForecastEntry {
    fn into_entry(self) -> Option<ForecastEntry> {
        let time = DateTime::from_timestamp(self.dt, 0)?;

        Some(ForecastEntry {
            time: ForecastTime::At(time),
            temperature_c: self.main.temp,
            condition: primary_condition(&self.weather),
            pop: self.pop.clamp(0.0, 1.0),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn geocode(&self, city: &str) -> Result<Vec<Coordinates>, ProviderError> {
        let query = [
            ("q", city.to_string()),
            ("limit", "1".to_string()),
            ("appid", self.api_key.clone()),
        ];

        let matches: Vec<OwGeocodeMatch> =
            self.get_json("geocoding", GEOCODE_PATH, &query).await?;

        Ok(matches.into_iter().map(|m| Coordinates::new(m.lat, m.lon)).collect())
    }

    async fn current_conditions(
        &self,
        coords: Coordinates,
    ) -> Result<CurrentConditions, ProviderError> {
        let parsed: OwCurrentResponse = self
            .get_json("current weather", CURRENT_PATH, &self.coordinate_query(coords))
            .await?;

        Ok(parsed.into_conditions())
    }

    async fn forecast(&self, coords: Coordinates) -> Result<Vec<ForecastEntry>, ProviderError> {
        let parsed: OwForecastResponse = self
            .get_json("forecast", FORECAST_PATH, &self.coordinate_query(coords))
            .await?;

        Ok(parsed.list.into_iter().filter_map(OwForecastEntry::into_entry).collect())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> OpenWeatherProvider {
        OpenWeatherProvider::new("test_key".to_string()).with_base_url(server.uri())
    }

    #[tokio::test]
    async fn current_conditions_are_parsed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(CURRENT_PATH))
            .and(query_param("lat", "48.85"))
            .and(query_param("lon", "2.35"))
            .and(query_param("appid", "test_key"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Paris",
                "main": {"temp": 15.2, "feels_like": 13.4, "humidity": 55},
                "wind": {"speed": 10.2},
                "rain": {"1h": 0.4},
                "weather": [{"main": "Clouds", "description": "broken clouds"}],
                "sys": {"country": "FR", "sunrise": 1700000000, "sunset": 1700040000},
                "timezone": 3600
            })))
            .mount(&mock_server)
            .await;

        let current = provider(&mock_server)
            .current_conditions(Coordinates::new(48.85, 2.35))
            .await
            .unwrap();

        assert_eq!(current.location_name, "Paris");
        assert_eq!(current.country_code, "FR");
        assert_eq!(current.feels_like_c, 13.4);
        assert_eq!(current.humidity_pct, 55);
        assert_eq!(current.precipitation_mm, 0.4);
        assert_eq!(current.condition, "Clouds");
        assert_eq!(current.sunset, 1700040000);
    }

    #[tokio::test]
    async fn missing_rain_defaults_to_zero() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(CURRENT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Cairo",
                "main": {"temp": 30.0, "feels_like": 29.0, "humidity": 20},
                "wind": {"speed": 3.0},
                "weather": [],
                "sys": {"country": "EG", "sunrise": 0, "sunset": 0}
            })))
            .mount(&mock_server)
            .await;

        let current =
            provider(&mock_server).current_conditions(Coordinates::new(30.0, 31.2)).await.unwrap();

        assert_eq!(current.precipitation_mm, 0.0);
        assert_eq!(current.condition, "Unknown");
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(CURRENT_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
            .mount(&mock_server)
            .await;

        let err = provider(&mock_server)
            .current_conditions(Coordinates::new(0.0, 0.0))
            .await
            .unwrap_err();

        match err {
            ProviderError::Status { status, body, .. } => {
                assert_eq!(status.as_u16(), 401);
                assert_eq!(body, "Invalid API key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn forecast_entries_keep_order_and_pop() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(FORECAST_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "list": [
                    {"dt": 1700010800, "main": {"temp": 14.0}, "weather": [{"main": "Rain"}], "pop": 0.6},
                    {"dt": 1700021600, "main": {"temp": 12.5}, "weather": [{"main": "Clear"}]}
                ]
            })))
            .mount(&mock_server)
            .await;

        let entries =
            provider(&mock_server).forecast(Coordinates::new(48.85, 2.35)).await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].condition, "Rain");
        assert_eq!(entries[0].pop, 0.6);
        assert_eq!(entries[1].pop, 0.0);
        assert_eq!(
            entries[1].time,
            ForecastTime::At(DateTime::from_timestamp(1700021600, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(FORECAST_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let err = provider(&mock_server).forecast(Coordinates::new(0.0, 0.0)).await.unwrap_err();
        assert!(matches!(err, ProviderError::Parse { endpoint: "forecast", .. }));
    }

    #[tokio::test]
    async fn geocode_sends_city_and_limit() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .and(query_param("q", "Paris"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "Paris", "lat": 48.85, "lon": 2.35, "country": "FR"}
            ])))
            .mount(&mock_server)
            .await;

        let matches = provider(&mock_server).geocode("Paris").await.unwrap();
        assert_eq!(matches, vec![Coordinates::new(48.85, 2.35)]);
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
