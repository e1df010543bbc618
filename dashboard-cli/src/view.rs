use dashboard_core::{
    DisplayCommand, DisplaySink, HumidityLevel, Region, Surface, TemperatureUnit,
};
use std::fmt;

const GAUGE_WIDTH: usize = 30;
const CELL_WIDTH: usize = 7;

/// Terminal adapter: keeps a [`Surface`] and prints it as a text dashboard.
///
/// Notifications stay on screen below the dashboard until [`TerminalView::dismiss_alerts`].
#[derive(Debug, Default)]
pub struct TerminalView {
    surface: Surface,
    alerts: Vec<String>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dashboard text plus any alerts raised since the last dismissal.
    pub fn frame(&mut self, unit: TemperatureUnit) -> String {
        self.alerts.extend(self.surface.take_notifications());
        Frame { surface: &self.surface, alerts: &self.alerts, unit }.to_string()
    }

    pub fn dismiss_alerts(&mut self) {
        self.alerts.clear();
    }

    pub fn draw(&self, unit: TemperatureUnit) -> String {
        Frame { surface: &self.surface, alerts: &[], unit }.to_string()
    }

    /// Drain notifications without drawing.
    pub fn take_alerts(&mut self) -> Vec<String> {
        let mut alerts = std::mem::take(&mut self.alerts);
        alerts.extend(self.surface.take_notifications());
        alerts
    }
}

struct Frame<'a> {
    surface: &'a Surface,
    alerts: &'a [String],
    unit: TemperatureUnit,
}

impl fmt::Display for Frame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.surface;
        let text = |region: Region| s.text(region).unwrap_or("--");

        writeln!(
            f,
            "@ {:<32} {}  {}",
            text(Region::Location),
            text(Region::Date),
            text(Region::Time)
        )?;
        writeln!(f, "  sunset {}", text(Region::SunriseSunset))?;
        writeln!(f)?;

        let glyph = s.icon(Region::Condition).map(|i| i.glyph).unwrap_or(" ");
        writeln!(
            f,
            "  {}{}   {} {}",
            text(Region::Temperature),
            self.unit.symbol(),
            glyph,
            text(Region::Condition)
        )?;
        writeln!(f)?;

        writeln!(
            f,
            "  Humidity       {:<8} {}",
            text(Region::HumidityValue),
            humidity_scale(s.humidity_level())
        )?;
        writeln!(f, "  Wind           {}", text(Region::Wind))?;
        writeln!(f, "  Precipitation  {}", text(Region::Precipitation))?;
        writeln!(f, "  Chance of rain {}", text(Region::ChanceOfRain))?;
        writeln!(
            f,
            "  Feels like     {:<8} {}",
            text(Region::FeelsLike),
            gauge(s.position(Region::FeelsLikePosition))
        )?;
        writeln!(f)?;

        let hourly = s.hourly();
        if !hourly.is_empty() {
            let row = |cell: &dyn Fn(usize) -> String| {
                (0..hourly.len()).map(|i| format!("{:<CELL_WIDTH$}", cell(i))).collect::<String>()
            };
            writeln!(f, "  {}", row(&|i| hourly[i].label.clone()))?;
            writeln!(f, "  {}", row(&|i| hourly[i].icon.glyph.to_string()))?;
            writeln!(f, "  {}", row(&|i| hourly[i].temperature.clone()))?;
            writeln!(f, "  {}", row(&|i| hourly[i].precipitation.clone()))?;
        }

        for alert in self.alerts {
            writeln!(f, "\n! {alert}")?;
        }
        Ok(())
    }
}

fn humidity_scale(active: Option<HumidityLevel>) -> String {
    HumidityLevel::all()
        .iter()
        .map(|level| {
            if Some(*level) == active {
                format!("[{}]", level.as_str().to_uppercase())
            } else {
                level.as_str().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn gauge(percent: Option<f64>) -> String {
    let Some(percent) = percent else {
        return format!("|{}|", "-".repeat(GAUGE_WIDTH));
    };

    let marker = ((percent / 100.0) * (GAUGE_WIDTH - 1) as f64).round() as usize;
    let bar: String = (0..GAUGE_WIDTH).map(|i| if i == marker { '*' } else { '-' }).collect();
    format!("0°C |{bar}| 50°C")
}

impl DisplaySink for TerminalView {
    fn apply(&mut self, command: &DisplayCommand) {
        self.surface.apply(command);
    }

    fn notify(&mut self, message: &str) {
        self.surface.notify(message);
    }
}
