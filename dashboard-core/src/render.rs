//! Projection of weather state onto display regions.
//!
//! Everything here is pure: the same snapshot, unit and timezone always yield
//! the same commands. Applying them is the job of a
//! [`DisplaySink`](crate::display::DisplaySink).

use chrono::{DateTime, TimeZone, Timelike};
use std::fmt::Display;

use crate::{
    display::{DisplayCommand, HourlyItem, HumidityLevel, Region},
    icon::resolve_icon,
    model::{CurrentConditions, ForecastEntry, ForecastTime, ForecastWindow, WeatherSnapshot},
    units::TemperatureUnit,
};

/// Celsius range spanned by the feels-like gauge.
pub const FEELS_LIKE_MIN_C: f64 = 0.0;
pub const FEELS_LIKE_MAX_C: f64 = 50.0;

/// Entries in the hourly strip, including the leading "Now".
pub const HOURLY_STRIP_LEN: usize = 8;

pub const NOW_LABEL: &str = "Now";
pub const WIND_UNIT: &str = "KM/H";
pub const PRECIPITATION_UNIT: &str = "MM";

/// Round half up, so -2.5 becomes -2 and 2.5 becomes 3.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn location_line(current: &CurrentConditions) -> String {
    format!("{}, {}", current.location_name, current.country_code)
}

/// Epoch seconds as zero-padded 24-hour `HH:MM` in `tz`.
pub fn format_clock_time<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    match DateTime::from_timestamp(timestamp, 0) {
        Some(utc) => utc.with_timezone(tz).format("%H:%M").to_string(),
        None => "--:--".to_string(),
    }
}

pub fn humidity_text(humidity: u8) -> String {
    format!("{humidity}%")
}

pub fn wind_text(speed: f64) -> String {
    format!("{speed:.1} {WIND_UNIT}")
}

pub fn precipitation_text(mm: f64) -> String {
    format!("{mm:.1} {PRECIPITATION_UNIT}")
}

/// Highest precipitation probability in the window as a whole percentage.
pub fn chance_of_rain(window: &ForecastWindow) -> i64 {
    round_half_up(window.max_pop() * 100.0)
}

pub fn percent_text(pop: f64) -> String {
    format!("{}%", round_half_up(pop * 100.0))
}

/// A Celsius reading in `unit`, rounded, with a degree mark.
pub fn temperature_text(celsius: f64, unit: TemperatureUnit) -> String {
    format!("{}°", round_half_up(unit.convert(celsius)))
}

/// Position of `value` along `[min, max]` as a percentage clamped to 0..=100.
pub fn scale_position(value: f64, min: f64, max: f64) -> f64 {
    ((value - min) / (max - min) * 100.0).clamp(0.0, 100.0)
}

pub fn feels_like_position(feels_like_c: f64) -> f64 {
    scale_position(feels_like_c, FEELS_LIKE_MIN_C, FEELS_LIKE_MAX_C)
}

/// Slots are labelled with the provider's UTC clock hour, whatever the render timezone.
fn hour_label(time: ForecastTime) -> String {
    match time {
        ForecastTime::Now => NOW_LABEL.to_string(),
        ForecastTime::At(utc) => format!("{}:00", utc.hour()),
    }
}

/// Synthetic first strip entry built from current conditions.
pub fn now_entry(current: &CurrentConditions, window: &ForecastWindow) -> ForecastEntry {
    ForecastEntry {
        time: ForecastTime::Now,
        temperature_c: current.temperature_c,
        condition: current.condition.clone(),
        pop: window.first().map(|e| e.pop).unwrap_or(0.0),
    }
}

/// "Now" followed by the first seven forecast slots.
pub fn hourly_strip(snapshot: &WeatherSnapshot, unit: TemperatureUnit) -> Vec<HourlyItem> {
    let now = now_entry(&snapshot.current, &snapshot.forecast);

    std::iter::once(&now)
        .chain(snapshot.forecast.entries().iter())
        .take(HOURLY_STRIP_LEN)
        .map(|entry| HourlyItem {
            label: hour_label(entry.time),
            icon: resolve_icon(&entry.condition),
            temperature: temperature_text(entry.temperature_c, unit),
            precipitation: percent_text(entry.pop),
        })
        .collect()
}

/// Temperature-dependent regions only; rerun on unit toggle.
pub fn render_temperatures(snapshot: &WeatherSnapshot, unit: TemperatureUnit) -> Vec<DisplayCommand> {
    let current = &snapshot.current;

    vec![
        DisplayCommand::text(Region::Temperature, temperature_text(current.temperature_c, unit)),
        DisplayCommand::text(Region::FeelsLike, temperature_text(current.feels_like_c, unit)),
        DisplayCommand::SetPosition {
            region: Region::FeelsLikePosition,
            percent: feels_like_position(current.feels_like_c),
        },
        DisplayCommand::ReplaceHourly(hourly_strip(snapshot, unit)),
    ]
}

/// Every weather region.
pub fn render_all<Tz: TimeZone>(
    snapshot: &WeatherSnapshot,
    unit: TemperatureUnit,
    tz: &Tz,
) -> Vec<DisplayCommand>
where
    Tz::Offset: Display,
{
    let current = &snapshot.current;

    let mut commands = vec![
        DisplayCommand::text(Region::Location, location_line(current)),
        DisplayCommand::text(Region::SunriseSunset, format_clock_time(current.sunset, tz)),
        DisplayCommand::SetIcon { region: Region::Condition, icon: resolve_icon(&current.condition) },
        DisplayCommand::text(Region::Condition, current.condition.clone()),
        DisplayCommand::text(Region::HumidityValue, humidity_text(current.humidity_pct)),
        DisplayCommand::SetHumidityLevel(HumidityLevel::from_pct(current.humidity_pct)),
        DisplayCommand::text(Region::Wind, wind_text(current.wind_speed)),
        DisplayCommand::text(Region::Precipitation, precipitation_text(current.precipitation_mm)),
        DisplayCommand::text(
            Region::ChanceOfRain,
            format!("{}%", chance_of_rain(&snapshot.forecast)),
        ),
    ];

    commands.extend(render_temperatures(snapshot, unit));
    commands
}
