//! Icon codes to glyphs, and date labels for the forecast table.

use chrono::NaiveDate;

/// Shown for any icon code we don't know.
pub const FALLBACK_ICON: &str = "🌤️";

/// Looks up the emoji for an OpenWeather icon code such as `"10d"`.
pub fn icon_for(code: &str) -> &'static str {
    match code {
        "01d" => "☀️",
        "01n" => "🌙",
        "02d" => "⛅",
        "02n" | "03d" | "03n" | "04d" | "04n" => "☁️",
        "09d" | "09n" | "10n" => "🌧️",
        "10d" => "🌦️",
        "11d" | "11n" => "⛈️",
        "13d" | "13n" => "❄️",
        "50d" | "50n" => "🌫️",
        _ => FALLBACK_ICON,
    }
}

/// `"2024-03-05"` becomes `"Mar 05"`. Anything unparseable is returned as is.
pub fn short_date(iso_date: &str) -> String {
    match NaiveDate::parse_from_str(iso_date, "%Y-%m-%d") {
        Ok(date) => date.format("%b %d").to_string(),
        Err(_) => iso_date.to_string(),
    }
}

pub fn day_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}
