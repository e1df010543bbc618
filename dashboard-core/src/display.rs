//! Display surface abstraction.
//!
//! The render pipeline emits [`DisplayCommand`]s; a [`DisplaySink`] applies them
//! to whatever is on screen. [`Surface`] keeps the current contents of every
//! region in memory and is the sink front ends draw from.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::icon::WeatherIcon;

/// Named regions of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Region {
    Location,
    Date,
    Time,
    SunriseSunset,
    Temperature,
    Condition,
    HumidityValue,
    HumidityStatus,
    Wind,
    Precipitation,
    FeelsLike,
    FeelsLikePosition,
    ChanceOfRain,
    HourlyStrip,
}

/// Comfort bucket for relative humidity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HumidityLevel {
    Good,
    Normal,
    Bad,
}

impl HumidityLevel {
    pub fn from_pct(humidity: u8) -> Self {
        match humidity {
            0..=39 => HumidityLevel::Good,
            40..=70 => HumidityLevel::Normal,
            _ => HumidityLevel::Bad,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HumidityLevel::Good => "good",
            HumidityLevel::Normal => "normal",
            HumidityLevel::Bad => "bad",
        }
    }

    pub const fn all() -> &'static [HumidityLevel] {
        &[HumidityLevel::Good, HumidityLevel::Normal, HumidityLevel::Bad]
    }
}

/// One cell of the hourly strip, fully formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyItem {
    pub label: String,
    pub icon: WeatherIcon,
    pub temperature: String,
    pub precipitation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DisplayCommand {
    SetText { region: Region, text: String },
    SetIcon { region: Region, icon: WeatherIcon },
    /// Activate one humidity bucket and deactivate the others.
    SetHumidityLevel(HumidityLevel),
    /// Place an indicator at `percent` (0..=100) along a region's scale.
    SetPosition { region: Region, percent: f64 },
    /// Replace the whole hourly strip.
    ReplaceHourly(Vec<HourlyItem>),
}

impl DisplayCommand {
    pub fn text(region: Region, text: impl Into<String>) -> Self {
        DisplayCommand::SetText { region, text: text.into() }
    }

    pub fn region(&self) -> Region {
        match self {
            DisplayCommand::SetText { region, .. }
            | DisplayCommand::SetIcon { region, .. }
            | DisplayCommand::SetPosition { region, .. } => *region,
            DisplayCommand::SetHumidityLevel(_) => Region::HumidityStatus,
            DisplayCommand::ReplaceHourly(_) => Region::HourlyStrip,
        }
    }
}

/// Write-only target for display commands.
pub trait DisplaySink {
    fn apply(&mut self, command: &DisplayCommand);

    /// Blocking, user-visible notification (an alert).
    fn notify(&mut self, message: &str);

    fn apply_all(&mut self, commands: &[DisplayCommand]) {
        for command in commands {
            self.apply(command);
        }
    }
}

/// In-memory model of every region.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Surface {
    texts: BTreeMap<Region, String>,
    icons: BTreeMap<Region, WeatherIcon>,
    positions: BTreeMap<Region, f64>,
    humidity_level: Option<HumidityLevel>,
    hourly: Vec<HourlyItem>,
    notifications: Vec<String>,
    writes: usize,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self, region: Region) -> Option<&str> {
        self.texts.get(&region).map(String::as_str)
    }

    pub fn icon(&self, region: Region) -> Option<WeatherIcon> {
        self.icons.get(&region).copied()
    }

    pub fn position(&self, region: Region) -> Option<f64> {
        self.positions.get(&region).copied()
    }

    pub fn humidity_level(&self) -> Option<HumidityLevel> {
        self.humidity_level
    }

    pub fn hourly(&self) -> &[HourlyItem] {
        &self.hourly
    }

    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notifications)
    }

    /// Number of region writes applied so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl DisplaySink for Surface {
    fn apply(&mut self, command: &DisplayCommand) {
        self.writes += 1;

        match command {
            DisplayCommand::SetText { region, text } => {
                self.texts.insert(*region, text.clone());
            }
            DisplayCommand::SetIcon { region, icon } => {
                self.icons.insert(*region, *icon);
            }
            DisplayCommand::SetHumidityLevel(level) => {
                self.humidity_level = Some(*level);
            }
            DisplayCommand::SetPosition { region, percent } => {
                self.positions.insert(*region, *percent);
            }
            DisplayCommand::ReplaceHourly(items) => {
                self.hourly = items.clone();
            }
        }
    }

    fn notify(&mut self, message: &str) {
        self.notifications.push(message.to_string());
    }
}
