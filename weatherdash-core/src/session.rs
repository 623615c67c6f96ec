//! Per-user dashboard state.
//!
//! The presentation layer owns one [`DashboardSession`] and routes every
//! fetch through it. Each search is stamped with a [`SearchTicket`]; results
//! for anything but the newest ticket are dropped, so a slow response for an
//! old query can never replace the display of a newer one.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::debug;

use crate::{
    aggregate::daily_summaries,
    error::FetchError,
    format::TemperatureUnit,
    model::{CityQuery, CurrentWeather, DailySummary, ForecastPayload, TrendPoint},
    provider::WeatherProvider,
    trend::trend_series,
};

/// Identifies one search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    city: CityQuery,
}

impl SearchTicket {
    pub fn city(&self) -> &CityQuery {
        &self.city
    }
}

/// Current weather and forecast results for one city. The two are
/// independent: either may fail on its own.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub current: Result<CurrentWeather, FetchError>,
    pub forecast: Result<ForecastPayload, FetchError>,
}

/// Fetches current conditions and the forecast concurrently.
pub async fn fetch_outcome(provider: &dyn WeatherProvider, city: &CityQuery) -> SearchOutcome {
    let (current, forecast) = tokio::join!(provider.current_weather(city), provider.forecast(city));
    SearchOutcome { current, forecast }
}

/// What is on screen after a successful search.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub city: CityQuery,
    pub current: CurrentWeather,
    pub forecast: Result<ForecastPayload, FetchError>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Feedback {
    pub likes: u32,
    pub dislikes: u32,
}

#[derive(Debug, Default)]
pub struct DashboardSession {
    unit: TemperatureUnit,
    feedback: Feedback,
    latest_generation: u64,
    pending: Option<SearchTicket>,
    last_search: Option<CityQuery>,
    last_update: Option<DateTime<Utc>>,
    /// Completion time of the last applied search, successful or not.
    last_attempt: Option<DateTime<Utc>>,
    snapshot: Option<Snapshot>,
    last_error: Option<FetchError>,
}

impl DashboardSession {
    pub fn new(unit: TemperatureUnit) -> Self {
        Self { unit, ..Self::default() }
    }

    /// Starts a search, superseding any search still in flight.
    pub fn begin_search(&mut self, city: CityQuery) -> SearchTicket {
        self.latest_generation += 1;
        let ticket = SearchTicket { generation: self.latest_generation, city };
        self.pending = Some(ticket.clone());
        ticket
    }

    /// Re-runs the last successful search, if there is one.
    pub fn begin_refresh(&mut self) -> Option<SearchTicket> {
        let city = self.last_search.clone()?;
        Some(self.begin_search(city))
    }

    /// Applies a finished search. Returns `false` when the ticket has been
    /// superseded and the outcome was discarded.
    pub fn apply(
        &mut self,
        ticket: SearchTicket,
        outcome: SearchOutcome,
        now: DateTime<Utc>,
    ) -> bool {
        if ticket.generation != self.latest_generation {
            debug!(city = %ticket.city, "Discarding result of superseded search");
            return false;
        }
        self.pending = None;
        self.last_attempt = Some(now);

        match outcome.current {
            Ok(current) => {
                if let Err(e) = &outcome.forecast {
                    debug!(city = %ticket.city, "Forecast unavailable: {e}");
                }
                self.last_search = Some(ticket.city.clone());
                self.last_update = Some(now);
                self.last_error = None;
                self.snapshot =
                    Some(Snapshot { city: ticket.city, current, forecast: outcome.forecast });
            }
            Err(e) => {
                debug!(city = %ticket.city, "Search failed: {e}");
                self.snapshot = None;
                self.last_error = Some(e);
            }
        }
        true
    }

    /// Whether an auto-refresh should fire: there is an active search, no
    /// fetch is in flight, and `interval` has elapsed since the last attempt.
    pub fn refresh_due(&self, now: DateTime<Utc>, interval: Duration) -> bool {
        if self.last_search.is_none() || self.pending.is_some() {
            return false;
        }
        match self.last_attempt {
            None => true,
            Some(at) => (now - at).to_std().is_ok_and(|elapsed| elapsed >= interval),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    pub fn last_search(&self) -> Option<&CityQuery> {
        self.last_search.as_ref()
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    pub fn toggle_unit(&mut self) -> TemperatureUnit {
        self.unit = self.unit.toggled();
        self.unit
    }

    pub fn like(&mut self) -> u32 {
        self.feedback.likes = self.feedback.likes.saturating_add(1);
        self.feedback.likes
    }

    pub fn dislike(&mut self) -> u32 {
        self.feedback.dislikes = self.feedback.dislikes.saturating_add(1);
        self.feedback.dislikes
    }

    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    /// Daily summaries for the displayed forecast, empty when there is none.
    pub fn daily_forecast(&self) -> Vec<DailySummary> {
        match self.displayed_forecast() {
            Some(f) => daily_summaries(&f.samples, f.city.utc_offset_secs),
            None => Vec::new(),
        }
    }

    /// Trend series in the current unit, rebuilt from the Celsius samples.
    pub fn trend(&self) -> Vec<TrendPoint> {
        match self.displayed_forecast() {
            Some(f) => trend_series(&f.samples, self.unit),
            None => Vec::new(),
        }
    }

    fn displayed_forecast(&self) -> Option<&ForecastPayload> {
        self.snapshot.as_ref().and_then(|s| s.forecast.as_ref().ok())
    }
}
