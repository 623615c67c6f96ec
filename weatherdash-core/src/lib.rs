//! Core library for the `weatherdash` weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client with its TTL response cache and error taxonomy
//! - Pure transforms: unit formatting, icon/date mapping, daily aggregation,
//!   trend series
//! - Session state for the presentation layer
//!
//! It is used by `weatherdash-cli`, but holds no rendering of its own.

pub mod advice;
pub mod aggregate;
pub mod cache;
pub mod config;
pub mod error;
pub mod format;
pub mod icons;
pub mod model;
pub mod provider;
pub mod session;
pub mod trend;

pub use aggregate::daily_summaries;
pub use config::Config;
pub use error::FetchError;
pub use format::{TemperatureUnit, compass_direction, format_temperature};
pub use icons::{icon_for, short_date};
pub use model::{
    AirQuality, CityQuery, CurrentWeather, DailySummary, ForecastPayload, RawSample, TrendPoint,
    WeatherAlert,
};
pub use provider::{
    WeatherProvider,
    openweather::{ClientSettings, OpenWeatherClient},
};
pub use session::{DashboardSession, SearchOutcome, SearchTicket, fetch_outcome};
pub use trend::trend_series;
