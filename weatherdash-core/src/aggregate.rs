//! Folds the 3-hour forecast list into per-day summaries.

use chrono::{FixedOffset, NaiveDate};

use crate::format::utc;
use crate::model::{DailySummary, RawSample};

/// Number of days shown in the forecast strip.
pub const MAX_FORECAST_DAYS: usize = 5;

/// Groups consecutive samples by calendar date in the city's offset.
///
/// Samples are taken in the order given; the provider already returns them
/// chronologically. Each day's condition and icon come from its first sample,
/// not from a mode or average. At most [`MAX_FORECAST_DAYS`] summaries are
/// returned.
pub fn daily_summaries(samples: &[RawSample], utc_offset_secs: i32) -> Vec<DailySummary> {
    let offset = FixedOffset::east_opt(utc_offset_secs).unwrap_or_else(utc);
    let mut days: Vec<DailySummary> = Vec::new();

    for sample in samples {
        let date = local_date(sample, &offset);

        match days.last_mut() {
            Some(day) if day.date == date => {
                day.min_temp_c = day.min_temp_c.min(sample.temperature_c);
                day.max_temp_c = day.max_temp_c.max(sample.temperature_c);
            }
            _ => {
                if days.len() == MAX_FORECAST_DAYS {
                    break;
                }
                days.push(DailySummary {
                    date,
                    min_temp_c: sample.temperature_c,
                    max_temp_c: sample.temperature_c,
                    condition: sample.condition.clone(),
                    icon: sample.icon.clone(),
                });
            }
        }
    }

    days
}

fn local_date(sample: &RawSample, offset: &FixedOffset) -> NaiveDate {
    sample.timestamp.with_timezone(offset).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn sample(hours_from_start: i64, temp: f64, condition: &str, icon: &str) -> RawSample {
        let start = Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap();
        RawSample {
            timestamp: start + Duration::hours(hours_from_start),
            temperature_c: temp,
            feels_like_c: temp - 1.0,
            humidity_pct: 60,
            condition: condition.to_string(),
            icon: icon.to_string(),
        }
    }

    #[test]
    fn single_day_takes_min_max_and_first_condition() {
        let temps = [10.0, 12.0, 9.0, 15.0, 14.0, 11.0, 13.0, 8.0];
        let samples: Vec<RawSample> = temps
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let (cond, icon) = if i == 0 { ("light rain", "10d") } else { ("clear sky", "01d") };
                sample(i as i64 * 3, *t, cond, icon)
            })
            .collect();

        let days = daily_summaries(&samples, 0);

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(days[0].min_temp_c, 8.0);
        assert_eq!(days[0].max_temp_c, 15.0);
        assert_eq!(days[0].condition, "light rain");
        assert_eq!(days[0].icon, "10d");
    }

    #[test]
    fn empty_input_yields_no_days() {
        assert!(daily_summaries(&[], 0).is_empty());
    }

    #[test]
    fn six_days_are_truncated_to_first_five() {
        let samples: Vec<RawSample> =
            (0..48).map(|i| sample(i * 3, i as f64, "clouds", "03d")).collect();

        let days = daily_summaries(&samples, 0);

        assert_eq!(days.len(), 5);
        let first = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        for (i, day) in days.iter().enumerate() {
            assert_eq!(day.date, first + Duration::days(i as i64));
            assert_eq!(day.min_temp_c, (i * 8) as f64);
            assert_eq!(day.max_temp_c, (i * 8 + 7) as f64);
        }
    }

    #[test]
    fn grouping_follows_city_offset() {
        // 21:00 and 00:00 UTC fall on the same local day at UTC-5.
        let samples = vec![sample(21, 5.0, "a", "01n"), sample(24, 3.0, "b", "02n")];

        assert_eq!(daily_summaries(&samples, 0).len(), 2);

        let local = daily_summaries(&samples, -5 * 3600);
        assert_eq!(local.len(), 1);
        assert_eq!(local[0].date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(local[0].min_temp_c, 3.0);
        assert_eq!(local[0].condition, "a");
    }

    #[test]
    fn input_order_is_trusted() {
        let samples = vec![sample(24, 1.0, "x", "01d"), sample(0, 2.0, "y", "02d")];

        let days = daily_summaries(&samples, 0);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());
        assert_eq!(days[1].date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }
}
