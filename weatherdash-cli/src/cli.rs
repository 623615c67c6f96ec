use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use inquire::{Password, Select};

use weatherdash_core::{
    CityQuery, Config, DashboardSession, TemperatureUnit, WeatherProvider, fetch_outcome,
    provider::{DEFAULT_SEARCH_LIMIT, provider_from_config},
};

use crate::render::{self, ForecastLayout};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdash", version, about = "Weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key and preferred unit.
    Configure,

    /// Show current conditions and the 5-day forecast for a city.
    Show {
        /// City name, e.g. "London" or "Paris,FR".
        city: String,

        /// Temperature unit: celsius (c) or fahrenheit (f).
        #[arg(long, short)]
        unit: Option<TemperatureUnit>,

        /// Render the forecast as a table instead of cards.
        #[arg(long)]
        table: bool,
    },

    /// Live dashboard: refreshes periodically and reads commands from stdin.
    Watch {
        city: String,

        #[arg(long, short)]
        unit: Option<TemperatureUnit>,

        /// Seconds between automatic refreshes.
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Suggest matching city names.
    Search {
        query: String,

        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },

    /// Air quality at a coordinate.
    #[command(allow_negative_numbers = true)]
    Air { lat: f64, lon: f64 },

    /// Active weather alerts at a coordinate.
    #[command(allow_negative_numbers = true)]
    Alerts { lat: f64, lon: f64 },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure()?,
            Command::Show { city, unit, table } => {
                let config = Config::load()?;
                let provider = provider_from_config(&config)?;
                let city = CityQuery::new(&city).context("City name must not be empty")?;

                let mut session = DashboardSession::new(unit.unwrap_or(config.default_unit));
                let ticket = session.begin_search(city);
                let outcome = fetch_outcome(&provider, ticket.city()).await;
                session.apply(ticket, outcome, Utc::now());

                let layout = if table { ForecastLayout::Table } else { ForecastLayout::Cards };
                print!("{}", render::dashboard(&session, layout));
            }
            Command::Watch { city, unit, interval } => {
                let config = Config::load()?;
                let provider = provider_from_config(&config)?;
                let city = CityQuery::new(&city).context("City name must not be empty")?;
                let interval = interval
                    .map(std::time::Duration::from_secs)
                    .unwrap_or_else(|| config.refresh_interval());

                crate::watch::run(provider, city, unit.unwrap_or(config.default_unit), interval)
                    .await?;
            }
            Command::Search { query, limit } => {
                let config = Config::load()?;
                let provider = provider_from_config(&config)?;
                let labels = provider.search_cities(&query, limit).await;
                print!("{}", render::search_results(&labels));
            }
            Command::Air { lat, lon } => {
                let config = Config::load()?;
                let provider = provider_from_config(&config)?;
                match provider.air_quality(lat, lon).await {
                    Ok(aq) => print!("{}", render::air_quality(&aq)),
                    Err(e) => println!("{}", e.user_message()),
                }
            }
            Command::Alerts { lat, lon } => {
                let config = Config::load()?;
                let provider = provider_from_config(&config)?;
                match provider.weather_alerts(lat, lon).await {
                    Ok(alerts) => print!("{}", render::alerts(&alerts)),
                    Err(e) => println!("{}", e.user_message()),
                }
            }
        }

        Ok(())
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load_file()?;

    let api_key = Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    }

    let units = vec![TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit];
    let start = units.iter().position(|u| *u == config.default_unit).unwrap_or(0);
    config.default_unit = Select::new("Default temperature unit:", units)
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read temperature unit")?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
