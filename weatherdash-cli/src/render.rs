//! Text rendering of the dashboard.

use chrono::Local;
use std::fmt::Write;

use weatherdash_core::{
    AirQuality, DashboardSession, WeatherAlert, advice, compass_direction,
    format::format_clock_time, format_temperature, icon_for, icons::day_name, short_date,
};

const EXAMPLE_CITIES: [&str; 6] = ["London", "New York", "Tokyo", "Paris", "Sydney", "Mumbai"];
const TREND_BAR_WIDTH: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastLayout {
    Cards,
    Table,
}

pub fn dashboard(session: &DashboardSession, layout: ForecastLayout) -> String {
    let mut out = String::new();
    let unit = session.unit();

    let Some(snapshot) = session.snapshot() else {
        match session.last_error() {
            Some(e) => {
                let _ = writeln!(out, "{}", e.user_message());
                if e.is_retryable() {
                    let _ = writeln!(out, "This looks temporary; try again shortly.");
                }
            }
            None => {
                let _ = writeln!(out, "Enter a city name to get started.");
                let _ = writeln!(out, "Popular cities: {}", EXAMPLE_CITIES.join(", "));
            }
        }
        return out;
    };

    let w = &snapshot.current;
    if let Some(at) = session.last_update() {
        let _ = writeln!(out, "Last updated: {}", at.with_timezone(&Local).format("%H:%M:%S"));
    }
    let _ = writeln!(out, "Current Weather in {}, {}", w.location_name, w.country);
    let _ = writeln!(out, "  {} {}", icon_for(&w.icon), w.description);
    let _ = writeln!(
        out,
        "  Temperature: {} (feels like {})",
        format_temperature(w.temperature_c, unit),
        format_temperature(w.feels_like_c, unit)
    );
    let apparent = advice::heat_index(w.temperature_c, f64::from(w.humidity_pct));
    if (apparent - w.temperature_c).abs() >= 0.5 {
        let _ = writeln!(out, "  Heat index:  {}", format_temperature(apparent, unit));
    }
    let _ = writeln!(out, "  Humidity:    {}%", w.humidity_pct);
    let direction = w.wind_deg.map(|d| format!(" {}", compass_direction(d))).unwrap_or_default();
    let _ = writeln!(out, "  Wind:        {} m/s{}", w.wind_speed_mps, direction);
    let _ = writeln!(out, "  Pressure:    {} hPa", w.pressure_hpa);
    let _ = writeln!(
        out,
        "  Sunrise {}  Sunset {}",
        format_clock_time(w.sunrise, w.utc_offset_secs),
        format_clock_time(w.sunset, w.utc_offset_secs)
    );
    for hint in advice::recommendations(w) {
        let _ = writeln!(out, "  {hint}");
    }

    match &snapshot.forecast {
        Ok(_) => {
            out.push_str(&forecast(session, layout));
            out.push_str(&trend(session));
        }
        Err(e) => {
            let _ = writeln!(out, "\nForecast unavailable: {}", e.user_message());
        }
    }

    let fb = session.feedback();
    let _ = writeln!(out, "\n👍 {}  👎 {}", fb.likes, fb.dislikes);
    out
}

fn forecast(session: &DashboardSession, layout: ForecastLayout) -> String {
    let unit = session.unit();
    let mut out = String::from("\n5-Day Weather Forecast\n");

    for day in session.daily_forecast() {
        let date = short_date(&day.date.format("%Y-%m-%d").to_string());
        let high = format_temperature(day.max_temp_c, unit);
        let low = format_temperature(day.min_temp_c, unit);
        match layout {
            ForecastLayout::Table => {
                let _ = writeln!(
                    out,
                    "  {:<10} {:<7} {} {:<24} {:>8} {:>8}",
                    day_name(day.date),
                    date,
                    icon_for(&day.icon),
                    title_case(&day.condition),
                    high,
                    low
                );
            }
            ForecastLayout::Cards => {
                let _ = writeln!(out, "  {} {} {}", day_name(day.date), date, icon_for(&day.icon));
                let _ = writeln!(out, "    High: {high}  Low: {low}");
                let _ = writeln!(out, "    {}", title_case(&day.condition));
            }
        }
    }
    out
}

fn trend(session: &DashboardSession) -> String {
    let points = session.trend();
    if points.is_empty() {
        return String::new();
    }
    let unit = session.unit();
    let mut out = format!("\nTemperature Trend ({})\n", unit.symbol());

    let lo = points.iter().map(|p| p.temperature).fold(f64::INFINITY, f64::min);
    let hi = points.iter().map(|p| p.temperature).fold(f64::NEG_INFINITY, f64::max);
    let span = (hi - lo).max(f64::EPSILON);

    for p in &points {
        let width = (((p.temperature - lo) / span) * TREND_BAR_WIDTH).round() as usize;
        let _ = writeln!(
            out,
            "  {}  {:>6.1} {:>6.1}  {}",
            p.timestamp.with_timezone(&Local).format("%b %d %H:%M"),
            p.temperature,
            p.feels_like,
            "█".repeat(width.max(1))
        );
    }
    out
}

pub fn search_results(labels: &[String]) -> String {
    if labels.is_empty() {
        return "No matching cities.\n".to_string();
    }
    labels.iter().map(|l| format!("{l}\n")).collect()
}

pub fn air_quality(aq: &AirQuality) -> String {
    let level = advice::AirQualityLevel::from_index(aq.aqi);
    let c = &aq.components;
    format!(
        "Air quality: {} ({}) [{}]\n  PM2.5 {:.1}  PM10 {:.1}  O3 {:.1}  NO2 {:.1}  SO2 {:.1}  CO {:.1} µg/m³\n",
        level.label(),
        aq.aqi,
        level.color(),
        c.pm2_5,
        c.pm10,
        c.o3,
        c.no2,
        c.so2,
        c.co
    )
}

pub fn alerts(alerts: &[WeatherAlert]) -> String {
    if alerts.is_empty() {
        return "No active weather alerts.\n".to_string();
    }
    let mut out = String::new();
    for a in alerts {
        let _ = writeln!(out, "⚠️  {} ({})", a.event, a.sender_name);
        let _ = writeln!(
            out,
            "   {} → {}",
            a.start.with_timezone(&Local).format("%b %d %H:%M"),
            a.end.with_timezone(&Local).format("%b %d %H:%M")
        );
        if !a.description.is_empty() {
            let _ = writeln!(out, "   {}", a.description);
        }
    }
    out
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
