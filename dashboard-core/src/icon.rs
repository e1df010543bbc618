//! Condition keyword to display icon mapping.

use serde::Serialize;

/// Icon identifier and tint for a weather condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeatherIcon {
    /// Icon font identifier, e.g. `"cloud"`.
    pub icon: &'static str,
    /// CSS-style hex color.
    pub color: &'static str,
    /// Single-cell fallback used by text surfaces.
    pub glyph: &'static str,
}

pub const SUN: WeatherIcon = WeatherIcon { icon: "sun", color: "#f39c12", glyph: "☀" };
pub const CLOUD: WeatherIcon = WeatherIcon { icon: "cloud", color: "#7f8c8d", glyph: "☁" };
pub const HEAVY_RAIN: WeatherIcon =
    WeatherIcon { icon: "cloud-showers-heavy", color: "#3498db", glyph: "☂" };
pub const BOLT: WeatherIcon = WeatherIcon { icon: "bolt", color: "#9b59b6", glyph: "⚡" };
pub const SNOWFLAKE: WeatherIcon = WeatherIcon { icon: "snowflake", color: "#ecf0f1", glyph: "❄" };
pub const HAZE: WeatherIcon = WeatherIcon { icon: "smog", color: "#bdc3c7", glyph: "≋" };
pub const UNKNOWN: WeatherIcon =
    WeatherIcon { icon: "question-circle", color: "#7f8c8d", glyph: "?" };

// Order matters: the first rule with a matching needle wins.
const RULES: &[(&[&str], WeatherIcon)] = &[
    (&["clear"], SUN),
    (&["clouds"], CLOUD),
    (&["rain", "drizzle"], HEAVY_RAIN),
    (&["thunderstorm"], BOLT),
    (&["snow"], SNOWFLAKE),
    (&["mist", "fog"], HAZE),
];

/// Resolve a provider condition keyword ("Clouds", "Rain", ...) to an icon.
///
/// Matching is a case-insensitive substring test; unrecognized input yields
/// [`UNKNOWN`].
pub fn resolve_icon(condition: &str) -> WeatherIcon {
    let lower = condition.to_lowercase();

    RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| lower.contains(n)))
        .map(|(_, icon)| *icon)
        .unwrap_or(UNKNOWN)
}
