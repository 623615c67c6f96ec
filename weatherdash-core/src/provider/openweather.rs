use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tracing::{debug, instrument, warn};

use crate::{
    Config,
    cache::{CacheKey, Clock, SystemClock, TtlCache},
    error::FetchError,
    model::{
        AirQuality, CityQuery, Coordinates, CurrentWeather, ForecastCity, ForecastPayload,
        PollutantLevels, RawSample, WeatherAlert,
    },
};

use super::WeatherProvider;

const CURRENT_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/data/2.5/forecast";
const ONECALL_PATH: &str = "/data/2.5/onecall";
const AIR_POLLUTION_PATH: &str = "/data/2.5/air_pollution";
const GEOCODING_PATH: &str = "/geo/1.0/direct";

const ALERTS_EXCLUDE: &str = "current,minutely,hourly,daily";
const MIN_SEARCH_LEN: usize = 2;

/// Connection and caching parameters for [`OpenWeatherClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub api_key: String,
    pub request_timeout: Duration,
    pub search_timeout: Duration,
    pub weather_ttl: Duration,
    pub alerts_ttl: Duration,
}

impl ClientSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key().to_string(),
            request_timeout: config.request_timeout(),
            search_timeout: config.search_timeout(),
            weather_ttl: config.weather_ttl(),
            alerts_ttl: config.alerts_ttl(),
        }
    }

    /// Default timeouts and TTLs against a specific base URL.
    pub fn new(base_url: &str, api_key: &str) -> Self {
        let mut cfg = Config::default();
        cfg.base_url = base_url.to_string();
        cfg.set_api_key(api_key.to_string());
        Self::from_config(&cfg)
    }
}

/// OpenWeatherMap REST client with a per-request TTL cache.
///
/// Cloning is cheap and clones share the cache.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    settings: ClientSettings,
    http: Client,
    cache: Arc<Mutex<TtlCache<CacheKey, Value>>>,
    clock: Arc<dyn Clock>,
}

impl OpenWeatherClient {
    pub fn new(settings: ClientSettings) -> Result<Self> {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    pub fn with_clock(settings: ClientSettings, clock: Arc<dyn Clock>) -> Result<Self> {
        let http = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(Self { settings, http, cache: Arc::new(Mutex::new(TtlCache::new())), clock })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Issues one GET and normalizes the outcome. Never touches the cache.
    async fn get_json(
        &self,
        path: &str,
        params: &[(&str, String)],
        timeout: Duration,
    ) -> Result<Value, FetchError> {
        let url = format!("{}{}", self.settings.base_url, path);

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[("appid", self.settings.api_key.as_str())])
            .timeout(timeout)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if status != StatusCode::OK {
            debug!(%status, body = %truncate_body(&body), "OpenWeather request to {path} failed");
            return Err(FetchError::from_status(status.as_u16()));
        }

        serde_json::from_str(&body).map_err(|e| FetchError::InvalidPayload(e.to_string()))
    }

    /// Serves from cache when fresh; otherwise fetches, decodes, and caches
    /// the raw body. Bodies that fail to decode are not cached.
    async fn get_cached<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        params: &[(&str, String)],
        ttl: Duration,
    ) -> Result<T, FetchError> {
        let key = CacheKey::new(endpoint, params);

        let cached = self.cache.lock().get(&key, self.clock.now());
        if let Some(value) = cached {
            debug!(endpoint = endpoint, "cache hit");
            return decode(value);
        }

        let value = self.get_json(path, params, self.settings.request_timeout).await?;
        let parsed = decode(value.clone())?;
        self.cache.lock().insert(key, value, ttl, self.clock.now());
        Ok(parsed)
    }

    fn city_params(city: &CityQuery) -> [(&'static str, String); 2] {
        [("q", city.as_str().to_string()), ("units", "metric".to_string())]
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[instrument(skip(self), level = "debug")]
    async fn current_weather(&self, city: &CityQuery) -> Result<CurrentWeather, FetchError> {
        let parsed: OwCurrentResponse = self
            .get_cached("weather", CURRENT_PATH, &Self::city_params(city), self.settings.weather_ttl)
            .await?;
        parsed.into_model()
    }

    #[instrument(skip(self), level = "debug")]
    async fn forecast(&self, city: &CityQuery) -> Result<ForecastPayload, FetchError> {
        let parsed: OwForecastResponse = self
            .get_cached("forecast", FORECAST_PATH, &Self::city_params(city), self.settings.weather_ttl)
            .await?;
        parsed.into_model()
    }

    #[instrument(skip(self), level = "debug")]
    async fn search_cities(&self, query: &str, limit: usize) -> Vec<String> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_LEN {
            return Vec::new();
        }

        let params = [("q", query.to_string()), ("limit", limit.to_string())];
        let value = match self.get_json(GEOCODING_PATH, &params, self.settings.search_timeout).await
        {
            Ok(v) => v,
            Err(e) => {
                debug!("City search failed: {e}");
                return Vec::new();
            }
        };

        match serde_json::from_value::<Vec<OwGeoMatch>>(value) {
            Ok(matches) => matches.iter().map(OwGeoMatch::label).collect(),
            Err(e) => {
                warn!("Unexpected geocoding payload: {e}");
                Vec::new()
            }
        }
    }

    #[instrument(skip(self), level = "debug")]
    async fn air_quality(&self, lat: f64, lon: f64) -> Result<AirQuality, FetchError> {
        let params = [("lat", lat.to_string()), ("lon", lon.to_string())];
        let value = self.get_json(AIR_POLLUTION_PATH, &params, self.settings.request_timeout).await?;
        let parsed: OwAirResponse = decode(value)?;

        let entry = parsed.list.into_iter().next().ok_or(FetchError::NotFound)?;
        Ok(AirQuality {
            aqi: entry.main.aqi,
            components: entry.components,
            measured_at: unix_to_utc(entry.dt)?,
        })
    }

    #[instrument(skip(self), level = "debug")]
    async fn weather_alerts(&self, lat: f64, lon: f64) -> Result<Vec<WeatherAlert>, FetchError> {
        let params = [
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("exclude", ALERTS_EXCLUDE.to_string()),
            ("units", "metric".to_string()),
        ];
        let parsed: OwOneCallResponse =
            self.get_cached("onecall", ONECALL_PATH, &params, self.settings.alerts_ttl).await?;

        parsed.alerts.into_iter().map(OwAlert::into_model).collect()
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

impl From<OwCoord> for Coordinates {
    fn from(c: OwCoord) -> Self {
        Coordinates { lat: c.lat, lon: c.lon }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    #[serde(default)]
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    coord: OwCoord,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
    #[serde(default)]
    timezone: i32,
}

impl OwCurrentResponse {
    fn into_model(self) -> Result<CurrentWeather, FetchError> {
        let (condition, description, icon) = match self.weather.into_iter().next() {
            Some(w) => (w.main, w.description, w.icon),
            None => ("Unknown".to_string(), "Unknown".to_string(), String::new()),
        };

        Ok(CurrentWeather {
            location_name: self.name,
            country: self.sys.country,
            coordinates: self.coord.into(),
            observation_time: unix_to_utc(self.dt)?,
            temperature_c: self.main.temp,
            feels_like_c: self.main.feels_like,
            humidity_pct: self.main.humidity,
            pressure_hpa: self.main.pressure,
            wind_speed_mps: self.wind.speed,
            wind_deg: self.wind.deg,
            condition,
            description,
            icon,
            sunrise: unix_to_utc(self.sys.sunrise)?,
            sunset: unix_to_utc(self.sys.sunset)?,
            utc_offset_secs: self.timezone,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    country: String,
    coord: OwCoord,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

impl OwForecastResponse {
    fn into_model(self) -> Result<ForecastPayload, FetchError> {
        let samples = self
            .list
            .into_iter()
            .map(|entry| {
                let (condition, icon) = match entry.weather.into_iter().next() {
                    Some(w) => (w.description, w.icon),
                    None => ("Unknown".to_string(), String::new()),
                };
                Ok(RawSample {
                    timestamp: unix_to_utc(entry.dt)?,
                    temperature_c: entry.main.temp,
                    feels_like_c: entry.main.feels_like,
                    humidity_pct: entry.main.humidity,
                    condition,
                    icon,
                })
            })
            .collect::<Result<Vec<_>, FetchError>>()?;

        Ok(ForecastPayload {
            city: ForecastCity {
                name: self.city.name,
                country: self.city.country,
                coordinates: self.city.coord.into(),
                utc_offset_secs: self.city.timezone,
            },
            samples,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoMatch {
    name: String,
    state: Option<String>,
    #[serde(default)]
    country: String,
}

impl OwGeoMatch {
    fn label(&self) -> String {
        [Some(self.name.as_str()), self.state.as_deref(), Some(self.country.as_str())]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Deserialize)]
struct OwAirMain {
    aqi: u8,
}

#[derive(Debug, Deserialize)]
struct OwAirEntry {
    dt: i64,
    main: OwAirMain,
    #[serde(default)]
    components: PollutantLevels,
}

#[derive(Debug, Deserialize)]
struct OwAirResponse {
    list: Vec<OwAirEntry>,
}

#[derive(Debug, Deserialize)]
struct OwAlert {
    #[serde(default)]
    sender_name: String,
    event: String,
    start: i64,
    end: i64,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: Vec<String>,
}

impl OwAlert {
    fn into_model(self) -> Result<WeatherAlert, FetchError> {
        Ok(WeatherAlert {
            sender_name: self.sender_name,
            event: self.event,
            start: unix_to_utc(self.start)?,
            end: unix_to_utc(self.end)?,
            description: self.description,
            tags: self.tags,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwOneCallResponse {
    #[serde(default)]
    alerts: Vec<OwAlert>,
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, FetchError> {
    serde_json::from_value(value).map_err(|e| FetchError::InvalidPayload(e.to_string()))
}

fn unix_to_utc(ts: i64) -> Result<DateTime<Utc>, FetchError> {
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| FetchError::InvalidPayload(format!("timestamp {ts} out of range")))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geocoding_label_skips_missing_state() {
        let with_state = OwGeoMatch {
            name: "Portland".into(),
            state: Some("Oregon".into()),
            country: "US".into(),
        };
        let without_state = OwGeoMatch { name: "Paris".into(), state: None, country: "FR".into() };

        assert_eq!(with_state.label(), "Portland, Oregon, US");
        assert_eq!(without_state.label(), "Paris, FR");
    }

    #[test]
    fn forecast_entry_without_weather_is_unknown() {
        let json = serde_json::json!({
            "city": {"name": "Oslo", "country": "NO", "coord": {"lat": 59.9, "lon": 10.7}},
            "list": [{"dt": 1_709_596_800, "main": {"temp": 1.0, "feels_like": -2.0, "humidity": 80}, "weather": []}]
        });
        let parsed: OwForecastResponse = serde_json::from_value(json).unwrap();
        let payload = parsed.into_model().unwrap();

        assert_eq!(payload.city.utc_offset_secs, 0);
        assert_eq!(payload.samples[0].condition, "Unknown");
        assert_eq!(payload.samples[0].icon, "");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let out = truncate_body(&long);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
