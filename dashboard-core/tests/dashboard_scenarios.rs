//! End-to-end scenarios against a mocked OpenWeather API.

use std::sync::Arc;

use chrono::Utc;
use dashboard_core::{
    Dashboard, FetchPhase, FetchPipeline, FetchRequest, HumidityLevel, Region, Surface,
    TemperatureUnit,
    geolocation::NoGeolocator,
    icon,
    provider::openweather::OpenWeatherProvider,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn forecast_list(pops: &[f64]) -> serde_json::Value {
    let list: Vec<_> = pops
        .iter()
        .enumerate()
        .map(|(i, pop)| {
            json!({
                "dt": 1_760_605_200 + i as i64 * 10_800,
                "main": {"temp": 12.0 + i as f64},
                "weather": [{"main": "Clouds"}],
                "pop": pop
            })
        })
        .collect();
    json!({ "list": list })
}

async fn mount_paris(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Paris"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"lat": 48.85, "lon": 2.35}])),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "48.85"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Paris",
            "main": {"temp": 15.0, "feels_like": 13.0, "humidity": 55},
            "wind": {"speed": 10.2},
            "weather": [{"main": "Clouds"}],
            "sys": {"country": "FR", "sunrise": 1_760_594_400, "sunset": 1_760_634_300},
            "timezone": 7200
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("lat", "48.85"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_list(&[
            0.0, 0.1, 0.2, 0.6, 0.4, 0.3, 0.0, 0.0, 0.9, 0.9,
        ])))
        .mount(server)
        .await;
}

fn dashboard(server: &MockServer) -> Dashboard<Surface, Utc> {
    let provider = OpenWeatherProvider::new("test_key".into()).with_base_url(server.uri());
    let pipeline = FetchPipeline::new(Arc::new(provider), Arc::new(NoGeolocator));
    Dashboard::with_timezone(pipeline, Surface::new(), TemperatureUnit::Celsius, Utc)
}

#[tokio::test]
async fn paris_search_renders_every_region() {
    let server = MockServer::start().await;
    mount_paris(&server).await;

    let mut dash = dashboard(&server);
    let phase = dash.fetch(FetchRequest::City("Paris".into())).await;
    assert_eq!(phase, FetchPhase::Rendered);

    let surface = dash.sink();
    assert_eq!(surface.text(Region::Location), Some("Paris, FR"));
    assert_eq!(surface.text(Region::SunriseSunset), Some("17:05"));
    assert_eq!(surface.text(Region::Condition), Some("Clouds"));
    assert_eq!(surface.icon(Region::Condition), Some(icon::CLOUD));
    assert_eq!(surface.text(Region::HumidityValue), Some("55%"));
    assert_eq!(surface.humidity_level(), Some(HumidityLevel::Normal));
    assert_eq!(surface.text(Region::Wind), Some("10.2 KM/H"));
    assert_eq!(surface.text(Region::Precipitation), Some("0.0 MM"));
    // Slots past the eighth (0.9) are outside the window.
    assert_eq!(surface.text(Region::ChanceOfRain), Some("60%"));
    assert_eq!(surface.text(Region::Temperature), Some("15°"));
    assert_eq!(surface.text(Region::FeelsLike), Some("13°"));
    assert_eq!(surface.position(Region::FeelsLikePosition), Some(26.0));

    let hourly = surface.hourly();
    assert_eq!(hourly.len(), 8);
    assert_eq!(hourly[0].label, "Now");
    assert_eq!(hourly[0].precipitation, "0%");
    assert_eq!(hourly[1].label, "9:00");
    assert!(surface.notifications().is_empty());
}

#[tokio::test]
async fn unit_toggle_does_not_refetch() {
    let server = MockServer::start().await;
    mount_paris(&server).await;

    let mut dash = dashboard(&server);
    dash.fetch(FetchRequest::City("Paris".into())).await;
    let requests_before = server.received_requests().await.map(|r| r.len());

    dash.toggle_unit();

    let surface = dash.sink();
    assert_eq!(surface.text(Region::Temperature), Some("59°"));
    assert_eq!(surface.text(Region::FeelsLike), Some("55°"));
    assert_eq!(surface.text(Region::HumidityValue), Some("55%"));
    assert_eq!(surface.text(Region::Wind), Some("10.2 KM/H"));
    assert_eq!(surface.text(Region::Location), Some("Paris, FR"));
    assert_eq!(server.received_requests().await.map(|r| r.len()), requests_before);
}

#[tokio::test]
async fn atlantis_surfaces_city_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let mut dash = dashboard(&server);
    let phase = dash.fetch(FetchRequest::City("Atlantis".into())).await;

    assert_eq!(phase, FetchPhase::Failed);
    let surface = dash.sink();
    assert_eq!(surface.notifications().len(), 1);
    assert!(surface.notifications()[0].contains("Atlantis"));
    assert_eq!(surface.writes(), 0);
    assert_eq!(server.received_requests().await.map(|r| r.len()), Some(1));
}

#[tokio::test]
async fn forecast_outage_leaves_display_untouched() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Nowhere",
            "main": {"temp": 1.0, "feels_like": 1.0, "humidity": 10},
            "wind": {"speed": 1.0},
            "weather": [{"main": "Clear"}],
            "sys": {"country": "XX", "sunrise": 0, "sunset": 0}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let mut dash = dashboard(&server);
    let coords = dashboard_core::Coordinates::new(0.0, 0.0);
    let phase = dash.fetch(FetchRequest::Coordinates(coords)).await;

    assert_eq!(phase, FetchPhase::Failed);
    assert_eq!(dash.sink().notifications(), ["Could not fetch hourly forecast data.".to_string()]);
    assert_eq!(dash.sink().writes(), 0);
    assert!(dash.state().snapshot().is_none());
}
