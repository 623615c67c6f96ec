use crate::format::TemperatureUnit;
use crate::model::{RawSample, TrendPoint};

/// Five days at 3-hour resolution.
pub const MAX_TREND_POINTS: usize = 40;

/// Projects the leading samples into a chart series in `unit`.
pub fn trend_series(samples: &[RawSample], unit: TemperatureUnit) -> Vec<TrendPoint> {
    samples
        .iter()
        .take(MAX_TREND_POINTS)
        .map(|s| TrendPoint {
            timestamp: s.timestamp,
            temperature: unit.convert(s.temperature_c),
            feels_like: unit.convert(s.feels_like_c),
            unit,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn samples(n: usize) -> Vec<RawSample> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n)
            .map(|i| RawSample {
                timestamp: start + Duration::hours(3 * i as i64),
                temperature_c: i as f64,
                feels_like_c: i as f64 - 2.0,
                humidity_pct: 50,
                condition: "clear sky".into(),
                icon: "01d".into(),
            })
            .collect()
    }

    #[test]
    fn caps_at_forty_points() {
        assert_eq!(trend_series(&samples(45), TemperatureUnit::Celsius).len(), 40);
    }

    #[test]
    fn never_pads_short_input() {
        assert_eq!(trend_series(&samples(10), TemperatureUnit::Celsius).len(), 10);
        assert!(trend_series(&[], TemperatureUnit::Fahrenheit).is_empty());
    }

    #[test]
    fn converts_both_series_and_keeps_order() {
        let input = samples(3);
        let points = trend_series(&input, TemperatureUnit::Fahrenheit);

        assert!((points[0].temperature - 32.0).abs() < 1e-9);
        assert!((points[0].feels_like - 28.4).abs() < 1e-9);
        assert!((points[2].temperature - 35.6).abs() < 1e-9);
        assert!(points.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert!(points.iter().all(|p| p.unit == TemperatureUnit::Fahrenheit));
        // Source samples stay in Celsius.
        assert_eq!(input[2].temperature_c, 2.0);
    }
}
