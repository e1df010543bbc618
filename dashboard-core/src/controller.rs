//! User actions wired onto the fetch and render pipelines.
//!
//! A fetch is split into [`Dashboard::begin`] (takes a ticket), [`PendingFetch::run`]
//! (network only, `Send`, can be spawned) and [`Dashboard::finish`] (applies the
//! result if it is still the latest). The `async` helpers chain all three for
//! callers that don't need overlap.

use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;

use crate::{
    clock::clock_commands,
    display::DisplaySink,
    error::FetchError,
    fetch::FetchPipeline,
    model::{Coordinates, WeatherSnapshot},
    render::{render_all, render_temperatures},
    state::{AppState, Completion, FetchPhase, FetchTicket},
    units::TemperatureUnit,
};

/// What a fetch cycle should resolve.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchRequest {
    Coordinates(Coordinates),
    City(String),
    CurrentLocation,
}

/// Keys the search field reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Char(char),
    Other,
}

/// A fetch that has been issued but not run yet.
#[derive(Debug)]
pub struct PendingFetch {
    ticket: FetchTicket,
    request: FetchRequest,
    pipeline: FetchPipeline,
}

/// Result of [`PendingFetch::run`], to be handed back to [`Dashboard::finish`].
#[derive(Debug)]
pub struct FinishedFetch {
    ticket: FetchTicket,
    result: Result<WeatherSnapshot, FetchError>,
}

impl PendingFetch {
    pub async fn run(self) -> FinishedFetch {
        let result = match &self.request {
            FetchRequest::Coordinates(coords) => self.pipeline.fetch_by_coordinates(*coords).await,
            FetchRequest::City(name) => self.pipeline.fetch_by_city(name).await,
            FetchRequest::CurrentLocation => self.pipeline.fetch_by_current_location().await,
        };

        FinishedFetch { ticket: self.ticket, result }
    }
}

pub struct Dashboard<S, Tz: TimeZone = Local> {
    pipeline: FetchPipeline,
    state: AppState,
    sink: S,
    tz: Tz,
    search_field: String,
}

impl<S: DisplaySink> Dashboard<S, Local> {
    pub fn new(pipeline: FetchPipeline, sink: S, unit: TemperatureUnit) -> Self {
        Self::with_timezone(pipeline, sink, unit, Local)
    }
}

impl<S, Tz> Dashboard<S, Tz>
where
    S: DisplaySink,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    /// Render the sunset time in `tz` instead of the system zone.
    pub fn with_timezone(pipeline: FetchPipeline, sink: S, unit: TemperatureUnit, tz: Tz) -> Self {
        Self { pipeline, state: AppState::new(unit), sink, tz, search_field: String::new() }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn search_text(&self) -> &str {
        &self.search_field
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_field = text.into();
    }

    /// Issue a fetch; any fetch begun earlier becomes stale.
    pub fn begin(&mut self, request: FetchRequest) -> PendingFetch {
        let ticket = self.state.begin_fetch();
        tracing::debug!(?ticket, ?request, "fetch started");
        PendingFetch { ticket, request, pipeline: self.pipeline.clone() }
    }

    /// Apply a finished fetch: render on success, notify on failure, drop if stale.
    pub fn finish(&mut self, finished: FinishedFetch) -> FetchPhase {
        match self.state.complete(finished.ticket, finished.result) {
            Completion::Applied => self.render(),
            Completion::Failed(err) => {
                tracing::warn!(error = %err, cause = ?std::error::Error::source(&err), "fetch failed");
                self.sink.notify(&err.user_message());
            }
            Completion::Stale => {}
        }
        self.state.phase()
    }

    pub async fn fetch(&mut self, request: FetchRequest) -> FetchPhase {
        let pending = self.begin(request);
        let finished = pending.run().await;
        self.finish(finished)
    }

    /// Read and clear the search field; `None` when it held only whitespace.
    pub fn submit_search(&mut self) -> Option<PendingFetch> {
        let city = std::mem::take(&mut self.search_field).trim().to_string();
        if city.is_empty() {
            return None;
        }
        Some(self.begin(FetchRequest::City(city)))
    }

    /// Search for the city in the search field. Returns `None` if nothing was requested.
    pub async fn search(&mut self) -> Option<FetchPhase> {
        let pending = self.submit_search()?;
        let finished = pending.run().await;
        Some(self.finish(finished))
    }

    /// Key released in the search field.
    pub async fn key_up(&mut self, key: Key) -> Option<FetchPhase> {
        match key {
            Key::Enter => self.search().await,
            _ => None,
        }
    }

    /// Flip Celsius/Fahrenheit and redraw temperatures from held state.
    pub fn toggle_unit(&mut self) -> TemperatureUnit {
        let unit = self.state.toggle_unit();
        if let Some(snapshot) = self.state.snapshot() {
            let commands = render_temperatures(snapshot, unit);
            self.sink.apply_all(&commands);
        }
        unit
    }

    pub fn tick_clock<Z: TimeZone>(&mut self, now: &DateTime<Z>)
    where
        Z::Offset: Display,
    {
        self.sink.apply_all(&clock_commands(now));
    }

    /// Startup: draw the clock and issue the current-location fetch.
    pub fn begin_load<Z: TimeZone>(&mut self, now: &DateTime<Z>) -> PendingFetch
    where
        Z::Offset: Display,
    {
        self.tick_clock(now);
        self.begin(FetchRequest::CurrentLocation)
    }

    pub async fn load<Z: TimeZone>(&mut self, now: &DateTime<Z>) -> FetchPhase
    where
        Z::Offset: Display,
    {
        let pending = self.begin_load(now);
        let finished = pending.run().await;
        self.finish(finished)
    }

    fn render(&mut self) {
        if let Some(snapshot) = self.state.snapshot() {
            let commands = render_all(snapshot, self.state.unit(), &self.tz);
            self.sink.apply_all(&commands);
        }
    }
}
