use crate::{error::FetchError, model::WeatherSnapshot, units::TemperatureUnit};

/// Where the most recent fetch cycle stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    #[default]
    Idle,
    Fetching,
    Rendered,
    Failed,
}

/// Identifies one fetch; only the most recently issued ticket may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// What [`AppState::complete`] did with a result.
#[derive(Debug)]
pub enum Completion {
    /// Snapshot replaced; render it.
    Applied,
    /// Latest fetch failed; prior snapshot kept.
    Failed(FetchError),
    /// A newer fetch was issued after this one; result dropped.
    Stale,
}

/// All mutable dashboard state.
#[derive(Debug, Default)]
pub struct AppState {
    snapshot: Option<WeatherSnapshot>,
    unit: TemperatureUnit,
    phase: FetchPhase,
    latest: u64,
}

impl AppState {
    pub fn new(unit: TemperatureUnit) -> Self {
        Self { unit, ..Self::default() }
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    pub fn toggle_unit(&mut self) -> TemperatureUnit {
        self.unit = self.unit.toggle();
        self.unit
    }

    /// Start a fetch cycle. Supersedes any fetch still in flight.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest += 1;
        self.phase = FetchPhase::Fetching;
        FetchTicket(self.latest)
    }

    pub fn is_latest(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Record the outcome of the fetch identified by `ticket`.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<WeatherSnapshot, FetchError>,
    ) -> Completion {
        if !self.is_latest(ticket) {
            tracing::debug!(?ticket, latest = self.latest, "discarding stale fetch result");
            return Completion::Stale;
        }

        match result {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                self.phase = FetchPhase::Rendered;
                Completion::Applied
            }
            Err(err) => {
                self.phase = FetchPhase::Failed;
                Completion::Failed(err)
            }
        }
    }
}
