//! Unit conversion and display formatting.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Display unit for temperatures. Celsius is the canonical internal unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn convert(self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
            TemperatureUnit::Fahrenheit => TemperatureUnit::Celsius,
        }
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemperatureUnit::Celsius => f.write_str("celsius"),
            TemperatureUnit::Fahrenheit => f.write_str("fahrenheit"),
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "c" | "celsius" => Ok(TemperatureUnit::Celsius),
            "f" | "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown temperature unit '{value}'. Supported units: celsius (c), fahrenheit (f)."
            )),
        }
    }
}

/// Formats a Celsius reading in `unit` with one decimal, e.g. `21.5°C`.
pub fn format_temperature(celsius: f64, unit: TemperatureUnit) -> String {
    format!("{:.1}{}", unit.convert(celsius), unit.symbol())
}

/// Maps a wind bearing in degrees to one of the 16 compass points.
pub fn compass_direction(degrees: f64) -> &'static str {
    // `as` saturates and maps NaN to 0, so any input lands on a valid index.
    let sector = ((degrees + 11.25) / 22.5).floor() as i64;
    COMPASS_POINTS[sector.rem_euclid(16) as usize]
}

/// Renders a UTC instant as `HH:MM` wall-clock time at the given offset.
pub fn format_clock_time(instant: DateTime<Utc>, utc_offset_secs: i32) -> String {
    let offset = FixedOffset::east_opt(utc_offset_secs).unwrap_or_else(utc);
    instant.with_timezone(&offset).format("%H:%M").to_string()
}

pub(crate) fn utc() -> FixedOffset {
    Utc.fix()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_celsius_with_one_decimal() {
        assert_eq!(format_temperature(21.0, TemperatureUnit::Celsius), "21.0°C");
        assert_eq!(format_temperature(-3.24, TemperatureUnit::Celsius), "-3.2°C");
    }

    #[test]
    fn formats_fahrenheit() {
        assert_eq!(format_temperature(0.0, TemperatureUnit::Fahrenheit), "32.0°F");
        assert_eq!(format_temperature(100.0, TemperatureUnit::Fahrenheit), "212.0°F");
        assert_eq!(format_temperature(-40.0, TemperatureUnit::Fahrenheit), "-40.0°F");
    }

    #[test]
    fn fahrenheit_matches_linear_formula_within_rounding() {
        for tenth in -500..=500 {
            let c = tenth as f64 / 7.0;
            let shown = format_temperature(c, TemperatureUnit::Fahrenheit);
            let value: f64 = shown.trim_end_matches("°F").parse().expect("numeric prefix");
            assert!((value - (c * 9.0 / 5.0 + 32.0)).abs() <= 0.05 + 1e-9, "c = {c}");
        }
    }

    #[test]
    fn compass_cardinal_points() {
        assert_eq!(compass_direction(0.0), "N");
        assert_eq!(compass_direction(90.0), "E");
        assert_eq!(compass_direction(180.0), "S");
        assert_eq!(compass_direction(270.0), "W");
    }

    #[test]
    fn compass_wraps_around_north() {
        assert_eq!(compass_direction(359.0), "N");
        assert_eq!(compass_direction(360.0), "N");
        assert_eq!(compass_direction(348.75), "N");
        assert_eq!(compass_direction(348.0), "NNW");
        assert_eq!(compass_direction(720.0), "N");
    }

    #[test]
    fn compass_handles_negative_bearings() {
        assert_eq!(compass_direction(-11.0), "N");
        assert_eq!(compass_direction(-30.0), "NNW");
        assert_eq!(compass_direction(-90.0), "W");
    }

    #[test]
    fn compass_survives_non_finite_input() {
        assert_eq!(compass_direction(f64::NAN), "N");
        let _ = compass_direction(f64::INFINITY);
        let _ = compass_direction(f64::NEG_INFINITY);
    }

    #[test]
    fn unit_parsing_and_toggle() {
        assert_eq!("C".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Celsius);
        assert_eq!("fahrenheit".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Fahrenheit);
        assert!("kelvin".parse::<TemperatureUnit>().is_err());
        assert_eq!(TemperatureUnit::Celsius.toggled(), TemperatureUnit::Fahrenheit);
        assert_eq!(TemperatureUnit::Fahrenheit.toggled(), TemperatureUnit::Celsius);
    }

    #[test]
    fn clock_time_uses_city_offset() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 5, 6, 30, 0).unwrap();
        assert_eq!(format_clock_time(instant, 0), "06:30");
        assert_eq!(format_clock_time(instant, 3600), "07:30");
        assert_eq!(format_clock_time(instant, -5 * 3600), "01:30");
        // Out-of-range offsets fall back to UTC.
        assert_eq!(format_clock_time(instant, 100_000), "06:30");
    }
}
