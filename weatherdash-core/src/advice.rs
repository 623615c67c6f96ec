//! Air quality labels, heat index and what-to-wear hints.

use crate::model::CurrentWeather;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirQualityLevel {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
    Unknown,
}

impl AirQualityLevel {
    pub fn from_index(aqi: u8) -> Self {
        match aqi {
            1 => Self::Good,
            2 => Self::Fair,
            3 => Self::Moderate,
            4 => Self::Poor,
            5 => Self::VeryPoor,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
            Self::Unknown => "Unknown",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Good => "green",
            Self::Fair => "yellow",
            Self::Moderate => "orange",
            Self::Poor => "red",
            Self::VeryPoor => "purple",
            Self::Unknown => "gray",
        }
    }
}

/// Apparent temperature in Celsius using the Rothfusz regression.
///
/// Below 80°F the regression is not valid and the air temperature is
/// returned unchanged.
pub fn heat_index(temp_c: f64, humidity_pct: f64) -> f64 {
    let t = temp_c * 9.0 / 5.0 + 32.0;
    if t < 80.0 {
        return temp_c;
    }
    let rh = humidity_pct;

    let hi = -42.379 + 2.049_015_23 * t + 10.143_331_27 * rh
        - 0.224_755_41 * t * rh
        - 6.837_83e-3 * t * t
        - 5.481_717e-2 * rh * rh
        + 1.228_74e-3 * t * t * rh
        + 8.5282e-4 * t * rh * rh
        - 1.99e-6 * t * t * rh * rh;

    (hi - 32.0) * 5.0 / 9.0
}

/// Clothing and activity hints for the current conditions.
pub fn recommendations(weather: &CurrentWeather) -> Vec<&'static str> {
    let mut out = Vec::new();

    out.push(match weather.temperature_c {
        t if t < 0.0 => "🧥 Wear heavy winter clothing",
        t if t < 10.0 => "🧥 Wear warm clothing and a jacket",
        t if t < 20.0 => "👕 Light jacket or sweater recommended",
        t if t < 30.0 => "👕 Comfortable clothing weather",
        _ => "🌡️ Stay hydrated and wear light clothing",
    });

    let condition = weather.condition.to_lowercase();
    if condition.contains("thunderstorm") {
        out.push("⛈️ Stay indoors if possible");
    } else if condition.contains("rain") || condition.contains("drizzle") {
        out.push("☔ Don't forget your umbrella");
    } else if condition.contains("snow") {
        out.push("❄️ Be careful of slippery conditions");
    }

    if weather.wind_speed_mps > 10.0 {
        out.push("💨 Windy conditions - secure loose items");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinates;
    use chrono::{TimeZone, Utc};

    fn weather(temp: f64, condition: &str, wind: f64) -> CurrentWeather {
        let t = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        CurrentWeather {
            location_name: "Paris".into(),
            country: "FR".into(),
            coordinates: Coordinates { lat: 48.85, lon: 2.35 },
            observation_time: t,
            temperature_c: temp,
            feels_like_c: temp,
            humidity_pct: 50,
            pressure_hpa: 1013.0,
            wind_speed_mps: wind,
            wind_deg: Some(90.0),
            condition: condition.into(),
            description: condition.to_lowercase(),
            icon: "01d".into(),
            sunrise: t,
            sunset: t,
            utc_offset_secs: 7200,
        }
    }

    #[test]
    fn aqi_levels() {
        assert_eq!(AirQualityLevel::from_index(1).label(), "Good");
        assert_eq!(AirQualityLevel::from_index(5).label(), "Very Poor");
        assert_eq!(AirQualityLevel::from_index(3).color(), "orange");
        assert_eq!(AirQualityLevel::from_index(0), AirQualityLevel::Unknown);
        assert_eq!(AirQualityLevel::from_index(9).color(), "gray");
    }

    #[test]
    fn heat_index_is_identity_when_cool() {
        assert_eq!(heat_index(20.0, 90.0), 20.0);
    }

    #[test]
    fn heat_index_rises_with_humidity() {
        let dry = heat_index(32.0, 20.0);
        let humid = heat_index(32.0, 80.0);
        assert!(humid > dry);
        assert!(humid > 32.0);
    }

    #[test]
    fn recommendations_cover_temperature_precipitation_and_wind() {
        let hints = recommendations(&weather(-5.0, "Snow", 12.0));
        assert_eq!(hints.len(), 3);
        assert!(hints[0].contains("heavy winter"));
        assert!(hints[1].contains("slippery"));
        assert!(hints[2].contains("Windy"));

        let hints = recommendations(&weather(25.0, "Clear", 2.0));
        assert_eq!(hints, vec!["👕 Comfortable clothing weather"]);

        let hints = recommendations(&weather(15.0, "Rain", 2.0));
        assert!(hints[1].contains("umbrella"));
    }
}
