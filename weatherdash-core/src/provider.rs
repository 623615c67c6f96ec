use crate::{
    Config,
    error::FetchError,
    model::{AirQuality, CityQuery, CurrentWeather, ForecastPayload, WeatherAlert},
    provider::openweather::{ClientSettings, OpenWeatherClient},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Number of geocoding suggestions requested when the caller has no preference.
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Everything the dashboard asks of a weather backend.
///
/// Failures come back as a [`FetchError`] classification rather than a raw
/// transport error. City search is best-effort and yields an empty list on
/// any failure.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, city: &CityQuery) -> Result<CurrentWeather, FetchError>;

    async fn forecast(&self, city: &CityQuery) -> Result<ForecastPayload, FetchError>;

    async fn search_cities(&self, query: &str, limit: usize) -> Vec<String>;

    async fn air_quality(&self, lat: f64, lon: f64) -> Result<AirQuality, FetchError>;

    async fn weather_alerts(&self, lat: f64, lon: f64) -> Result<Vec<WeatherAlert>, FetchError>;
}

/// Construct the OpenWeather-backed provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherClient> {
    if !config.has_api_key() {
        tracing::warn!(
            "No OpenWeatherMap API key configured; requests will be rejected by the provider"
        );
    }
    OpenWeatherClient::new(ClientSettings::from_config(config))
}
