use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use dashboard_core::{
    Config, Coordinates, Dashboard, FetchPhase, FetchPipeline, FetchRequest, TemperatureUnit,
    clock::CLOCK_INTERVAL,
    controller::{FinishedFetch, PendingFetch},
    geolocation::{FixedGeolocator, Geolocator, IpGeolocator, NoGeolocator},
    provider::{http_client, provider_from_config},
};
use inquire::{Select, Text};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};

use crate::view::TerminalView;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dashboard", version, about = "Terminal weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the OpenWeather API key, fallback city and default units.
    Configure,

    /// Fetch once and print the dashboard.
    Show {
        /// City to search for; defaults to the current location.
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        city: Option<String>,

        #[command(flatten)]
        opts: LocationOpts,
    },

    /// Interactive dashboard: type a city and press Enter to search,
    /// `:u` to toggle units, `:q` to quit.
    Dashboard {
        #[command(flatten)]
        opts: LocationOpts,
    },
}

#[derive(Debug, Args)]
pub struct LocationOpts {
    /// Latitude of the current location.
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude of the current location.
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Don't try to locate this machine; use the configured default city.
    #[arg(long)]
    no_locate: bool,

    /// Start in Fahrenheit regardless of config.
    #[arg(long)]
    fahrenheit: bool,
}

impl LocationOpts {
    fn geolocator(&self, config: &Config) -> Result<Arc<dyn Geolocator>> {
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            return Ok(Arc::new(FixedGeolocator(Coordinates::new(lat, lon))));
        }
        if self.no_locate {
            return Ok(Arc::new(NoGeolocator));
        }

        Ok(Arc::new(IpGeolocator::new(http_client(config)?)))
    }

    fn unit(&self, config: &Config) -> TemperatureUnit {
        if self.fahrenheit { TemperatureUnit::Fahrenheit } else { config.units }
    }
}

fn build_dashboard(config: &Config, opts: &LocationOpts) -> Result<Dashboard<TerminalView>> {
    let provider = provider_from_config(config)?;
    let pipeline = FetchPipeline::new(provider, opts.geolocator(config)?)
        .with_default_city(config.default_city());

    Ok(Dashboard::new(pipeline, TerminalView::new(), opts.unit(config)))
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, opts } => show(city, opts).await,
            Command::Dashboard { opts } => interactive(opts).await,
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Text::new("OpenWeather API key:")
        .with_initial_value(config.api_key.as_deref().unwrap_or_default())
        .prompt()
        .context("Failed to read API key")?;
    if api_key.trim().is_empty() {
        return Err(anyhow!("API key must not be empty"));
    }
    config.set_api_key(api_key.trim().to_string());

    let city = Text::new("Fallback city when location is unavailable:")
        .with_initial_value(config.default_city())
        .prompt()
        .context("Failed to read default city")?;
    config.default_city = Some(city.trim().to_string()).filter(|c| !c.is_empty());

    let start = TemperatureUnit::all().iter().position(|u| *u == config.units).unwrap_or(0);
    config.units = Select::new("Temperature unit:", TemperatureUnit::all().to_vec())
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read temperature unit")?;

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

async fn show(city: Option<String>, opts: LocationOpts) -> Result<()> {
    let config = Config::load()?;
    let mut dash = build_dashboard(&config, &opts)?;

    dash.tick_clock(&Local::now());
    let request = match city {
        Some(city) => FetchRequest::City(city),
        None => FetchRequest::CurrentLocation,
    };

    match dash.fetch(request).await {
        FetchPhase::Rendered => {
            print!("{}", dash.sink().draw(dash.state().unit()));
            Ok(())
        }
        _ => {
            for alert in dash.sink_mut().take_alerts() {
                eprintln!("! {alert}");
            }
            Err(anyhow!("No weather data to show"))
        }
    }
}

async fn interactive(opts: LocationOpts) -> Result<()> {
    let config = Config::load()?;
    let mut dash = build_dashboard(&config, &opts)?;

    let (tx, mut rx) = mpsc::unbounded_channel::<FinishedFetch>();
    let spawn_fetch = |pending: PendingFetch| {
        let tx = tx.clone();
        tokio::spawn(async move {
            // Receiver only goes away on shutdown.
            let _ = tx.send(pending.run().await);
        });
    };

    spawn_fetch(dash.begin_load(&Local::now()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut clock = tokio::time::interval(CLOCK_INTERVAL);

    loop {
        tokio::select! {
            _ = clock.tick() => {
                dash.tick_clock(&Local::now());
            }
            Some(finished) = rx.recv() => {
                dash.finish(finished);
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else { break };
                dash.sink_mut().dismiss_alerts();
                match line.trim() {
                    ":q" => break,
                    ":u" => {
                        let unit = dash.toggle_unit();
                        tracing::debug!(%unit, "unit toggled");
                    }
                    _ => {
                        dash.set_search_text(line);
                        if let Some(pending) = dash.submit_search() {
                            spawn_fetch(pending);
                        }
                    }
                }
            }
        }

        redraw(&mut dash);
    }

    Ok(())
}

fn redraw(dash: &mut Dashboard<TerminalView>) {
    let unit = dash.state().unit();
    print!("\x1b[2J\x1b[H");
    print!("{}", dash.sink_mut().frame(unit));
    println!("\n  city + Enter: search   :u toggle °C/°F   :q quit");
}
