//! Daily aggregation of hourly readings
//!
//! Groups readings by `(calendar date, city)` and averages the non-null
//! temperatures. The calendar date is taken from the timestamp in its own
//! reported offset; readings are never moved to another day by a timezone
//! conversion.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use domain::{DailyAverage, HourlyReading};
use tracing::debug;

use crate::error::ApplicationError;

/// Timestamp layouts accepted besides RFC 3339
const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parse a reading timestamp into local wall-clock time
///
/// Naive values are already local to the city. Values carrying an offset keep
/// that offset: `2024-03-01T23:00:00-05:00` stays on March 1st.
pub fn parse_reading_time(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.naive_local())
}

/// Aggregate hourly readings into one daily average per `(date, city)`
///
/// Output is sorted by date, then city. A group whose readings are all absent
/// yields a row with `temperature: None`.
///
/// # Errors
///
/// Returns `ApplicationError::MalformedData` naming the first offending
/// reading if a timestamp cannot be parsed, a city name is blank or a
/// temperature is not finite. No partial result is returned.
pub fn aggregate_daily(readings: &[HourlyReading]) -> Result<Vec<DailyAverage>, ApplicationError> {
    let mut groups: BTreeMap<(NaiveDate, &str), Vec<f64>> = BTreeMap::new();

    for (index, reading) in readings.iter().enumerate() {
        let city = reading.city.trim();
        if city.is_empty() {
            return Err(ApplicationError::malformed(
                format!("reading #{index} ({reading})"),
                "city name is empty",
            ));
        }

        let local = parse_reading_time(&reading.timestamp).ok_or_else(|| {
            ApplicationError::malformed(
                format!("reading #{index} ({reading})"),
                format!("cannot parse timestamp '{}'", reading.timestamp),
            )
        })?;

        let values = groups.entry((local.date(), city)).or_default();
        match reading.temperature {
            Some(t) if !t.is_finite() => {
                return Err(ApplicationError::malformed(
                    format!("reading #{index} ({reading})"),
                    format!("temperature {t} is not a finite number"),
                ));
            },
            Some(t) => values.push(t),
            None => {},
        }
    }

    let daily: Vec<DailyAverage> = groups
        .into_iter()
        .map(|((date, city), values)| DailyAverage::new(date, city, mean(values)))
        .collect();

    debug!(
        readings = readings.len(),
        daily_rows = daily.len(),
        "Aggregated hourly readings"
    );

    Ok(daily)
}

/// Mean of `values`, `None` for an empty slice
///
/// Values are summed in sorted order so every permutation of the same
/// multiset produces the same bits.
#[allow(clippy::cast_precision_loss)]
fn mean(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let sum: f64 = values.iter().sum();
    Some(sum / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(city: &str, ts: &str, t: Option<f64>) -> HourlyReading {
        HourlyReading::new(city, ts, t)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn averages_accra_example() {
        let readings = vec![
            reading("Accra", "2024-03-01T00:00", Some(28.0)),
            reading("Accra", "2024-03-01T12:00", Some(32.0)),
        ];

        let daily = aggregate_daily(&readings).unwrap();

        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0], DailyAverage::new(date(2024, 3, 1), "Accra", Some(30.0)));
    }

    #[test]
    fn ignores_null_readings_in_mean() {
        let readings = vec![
            reading("Accra", "2024-03-01T00:00", Some(27.0)),
            reading("Accra", "2024-03-01T01:00", None),
            reading("Accra", "2024-03-01T02:00", Some(29.0)),
        ];

        let daily = aggregate_daily(&readings).unwrap();

        assert_eq!(daily.len(), 1);
        assert!((daily[0].temperature.unwrap() - 28.0).abs() < 1e-9);
    }

    #[test]
    fn all_null_group_yields_explicit_empty_row() {
        let readings = vec![
            reading("Kumasi", "2024-03-01T00:00", None),
            reading("Kumasi", "2024-03-01T01:00", None),
        ];

        let daily = aggregate_daily(&readings).unwrap();

        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].city, "Kumasi");
        assert_eq!(daily[0].temperature, None);
    }

    #[test]
    fn groups_by_city_and_date() {
        let readings = vec![
            reading("Kumasi", "2024-03-02T00:00", Some(24.0)),
            reading("Accra", "2024-03-01T00:00", Some(28.0)),
            reading("Accra", "2024-03-02T00:00", Some(26.0)),
            reading("Kumasi", "2024-03-01T00:00", Some(22.0)),
            reading("Accra", "2024-03-01T23:00", Some(30.0)),
        ];

        let daily = aggregate_daily(&readings).unwrap();

        assert_eq!(
            daily,
            vec![
                DailyAverage::new(date(2024, 3, 1), "Accra", Some(29.0)),
                DailyAverage::new(date(2024, 3, 1), "Kumasi", Some(22.0)),
                DailyAverage::new(date(2024, 3, 2), "Accra", Some(26.0)),
                DailyAverage::new(date(2024, 3, 2), "Kumasi", Some(24.0)),
            ]
        );
    }

    #[test]
    fn keeps_reported_offset_when_deriving_date() {
        // 23:00 at -05:00 is already March 2nd in UTC but belongs to March 1st locally
        let readings = vec![
            reading("Lima", "2024-03-01T23:00:00-05:00", Some(20.0)),
            reading("Lima", "2024-03-01T01:00:00-05:00", Some(18.0)),
        ];

        let daily = aggregate_daily(&readings).unwrap();

        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].date, date(2024, 3, 1));
        assert!((daily[0].temperature.unwrap() - 19.0).abs() < 1e-9);
    }

    #[test]
    fn malformed_timestamp_aborts_whole_batch() {
        let readings = vec![
            reading("Accra", "2024-03-01T00:00", Some(28.0)),
            reading("Accra", "yesterday-ish", Some(30.0)),
        ];

        let err = aggregate_daily(&readings).unwrap_err();

        match err {
            ApplicationError::MalformedData { record, reason } => {
                assert!(record.contains("#1"));
                assert!(reason.contains("yesterday-ish"));
            },
            other => unreachable!("unexpected error: {other}"),
        }
    }

    #[test]
    fn date_only_timestamp_is_malformed() {
        let readings = vec![reading("Accra", "2024-03-01", Some(28.0))];
        assert!(matches!(
            aggregate_daily(&readings),
            Err(ApplicationError::MalformedData { .. })
        ));
    }

    #[test]
    fn blank_city_is_malformed() {
        let readings = vec![reading("  ", "2024-03-01T00:00", Some(28.0))];
        assert!(matches!(
            aggregate_daily(&readings),
            Err(ApplicationError::MalformedData { .. })
        ));
    }

    #[test]
    fn non_finite_temperature_is_malformed() {
        let readings = vec![reading("Accra", "2024-03-01T00:00", Some(f64::NAN))];
        assert!(matches!(
            aggregate_daily(&readings),
            Err(ApplicationError::MalformedData { .. })
        ));
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(aggregate_daily(&[]).unwrap().is_empty());
    }

    #[test]
    fn parses_supported_formats() {
        assert!(parse_reading_time("2026-02-05T14:00").is_some());
        assert!(parse_reading_time("2026-02-05T14:00:00").is_some());
        assert!(parse_reading_time("2026-02-05 14:00:00").is_some());
        assert!(parse_reading_time("2026-02-05T14:00:00Z").is_some());
        assert!(parse_reading_time("2026-02-05T14:00:00+01:00").is_some());
        assert!(parse_reading_time("invalid").is_none());
    }

    #[test]
    fn result_independent_of_input_order() {
        let mut readings = vec![
            reading("Accra", "2024-03-01T00:00", Some(0.1)),
            reading("Accra", "2024-03-01T01:00", Some(0.2)),
            reading("Accra", "2024-03-01T02:00", Some(0.3)),
            reading("Accra", "2024-03-01T03:00", Some(1e16)),
            reading("Accra", "2024-03-01T04:00", Some(-1e16)),
        ];
        let forward = aggregate_daily(&readings).unwrap();
        readings.reverse();
        let backward = aggregate_daily(&readings).unwrap();

        assert_eq!(
            forward[0].temperature.map(f64::to_bits),
            backward[0].temperature.map(f64::to_bits)
        );
    }
}
