//! Temporal alignment and current-conditions extraction
//!
//! Providers report a "current observation" timestamp that need not land on
//! an hourly boundary, and hourly series sometimes have gaps. These pure
//! functions align the observation to the series and project single current
//! values out of it without ever failing outright.

use crate::models::{CurrentConditions, ForecastPayload, HourlySeries};
use chrono::NaiveDateTime;

/// Find the index into the hourly series that best represents "now".
///
/// Three tiers, first success wins: exact timestamp match, last slot on the
/// same calendar date, then nearest parseable timestamp by absolute
/// millisecond distance. Defaults to 0 when the series is empty, the current
/// time is absent, or nothing parses.
#[must_use]
pub fn align_index(hourly_times: &[String], current_time: Option<&str>) -> usize {
    let Some(current) = current_time else {
        return 0;
    };
    if hourly_times.is_empty() {
        return 0;
    }

    if let Some(pos) = hourly_times.iter().position(|t| t == current) {
        return pos;
    }

    // Same-day match on the date portion before 'T'; a mid-hour observation
    // lands on the latest slot of its calendar date
    let date = current.split('T').next().unwrap_or(current);
    if let Some(pos) = hourly_times.iter().rposition(|t| t.starts_with(date)) {
        return pos;
    }

    let Some(target) = parse_millis(current) else {
        return 0;
    };
    let mut best = 0;
    let mut best_delta = i64::MAX;
    for (i, time) in hourly_times.iter().enumerate() {
        if let Some(millis) = parse_millis(time) {
            let delta = (millis - target).abs();
            if delta < best_delta {
                best = i;
                best_delta = delta;
            }
        }
    }
    best
}

fn parse_millis(value: &str) -> Option<i64> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Project the hourly series down to single current values.
///
/// Per field: the slot at `index`, else the first numeric value anywhere in
/// the series, else null. A stale-but-present value beats null for display.
/// Temperature comes from the provider's top-level current observation only;
/// windspeed additionally falls back to it.
#[must_use]
pub fn extract_current(payload: &ForecastPayload, index: usize) -> CurrentConditions {
    let hourly = payload.hourly.as_ref();
    let current = payload.current_weather.as_ref();

    let windspeed = hourly
        .and_then(|h| series_value(&h.wind_speed, index))
        .or_else(|| current.and_then(|c| c.windspeed));

    CurrentConditions {
        temperature: current.and_then(|c| c.temperature),
        windspeed,
        humidity: hourly.and_then(|h| series_value(&h.relative_humidity, index)),
        visibility: hourly.and_then(|h| series_value(&h.visibility, index)),
        apparent_temperature: hourly.and_then(|h| series_value(&h.apparent_temperature, index)),
    }
}

/// Value at `index`, falling back to the first numeric value in the series
fn series_value(series: &[Option<f64>], index: usize) -> Option<f64> {
    series
        .get(index)
        .copied()
        .flatten()
        .or_else(|| series.iter().flatten().next().copied())
}

/// Hourly timestamps of a payload, empty when the provider omitted hourly data
#[must_use]
pub fn hourly_times(payload: &ForecastPayload) -> &[String] {
    payload
        .hourly
        .as_ref()
        .map(|h: &HourlySeries| h.time.as_slice())
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CurrentWeather;
    use rstest::rstest;

    fn times(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[rstest]
    #[case::exact_match(
        &["2024-01-01T00:00", "2024-01-01T01:00", "2024-01-01T02:00"],
        Some("2024-01-01T01:00"),
        1
    )]
    #[case::same_day_last_slot(
        &["2024-01-01T00:00", "2024-01-01T01:00"],
        Some("2024-01-01T05:30"),
        1
    )]
    #[case::same_day_second_day(
        &["2024-01-01T23:00", "2024-01-02T00:00", "2024-01-02T01:00"],
        Some("2024-01-02T05:30"),
        2
    )]
    #[case::nearest_neighbor(
        &["2023-12-31T22:00", "2023-12-31T23:00"],
        Some("2024-01-01T00:10"),
        1
    )]
    #[case::empty_series(&[], Some("2024-01-01T00:00"), 0)]
    #[case::unparseable_current(&["2024-01-02T00:00"], Some("not-a-time"), 0)]
    fn test_align_index(
        #[case] hourly: &[&str],
        #[case] current: Option<&str>,
        #[case] expected: usize,
    ) {
        assert_eq!(align_index(&times(hourly), current), expected);
    }

    #[test]
    fn test_align_index_without_current_time() {
        assert_eq!(align_index(&times(&["2024-01-01T00:00"]), None), 0);
    }

    #[test]
    fn test_align_index_skips_unparseable_entries() {
        let hourly = times(&["garbage", "2024-01-02T01:00"]);
        // Different day, so only the nearest-neighbor tier applies
        assert_eq!(align_index(&hourly, Some("2024-01-01T23:45")), 1);
    }

    #[test]
    fn test_extract_first_numeric_fallback() {
        let payload = ForecastPayload {
            hourly: Some(HourlySeries {
                time: times(&["a", "b", "c"]),
                relative_humidity: vec![None, None, Some(55.0)],
                ..Default::default()
            }),
            ..Default::default()
        };
        let conditions = extract_current(&payload, 0);
        assert_eq!(conditions.humidity, Some(55.0));
    }

    #[test]
    fn test_extract_prefers_exact_index() {
        let payload = ForecastPayload {
            hourly: Some(HourlySeries {
                time: times(&["a", "b"]),
                relative_humidity: vec![Some(40.0), Some(60.0)],
                visibility: vec![Some(10_000.0), None],
                ..Default::default()
            }),
            ..Default::default()
        };
        let conditions = extract_current(&payload, 1);
        assert_eq!(conditions.humidity, Some(60.0));
        // Slot at index is null, so the first numeric value wins
        assert_eq!(conditions.visibility, Some(10_000.0));
    }

    #[test]
    fn test_temperature_taken_from_current_weather() {
        let payload = ForecastPayload {
            current_weather: Some(CurrentWeather {
                temperature: Some(23.4),
                windspeed: Some(11.0),
                time: None,
            }),
            ..Default::default()
        };
        let conditions = extract_current(&payload, 0);
        assert_eq!(conditions.temperature, Some(23.4));
        // No hourly series at all: windspeed falls back to current_weather
        assert_eq!(conditions.windspeed, Some(11.0));
        assert_eq!(conditions.humidity, None);
    }

    #[test]
    fn test_all_null_without_data() {
        let conditions = extract_current(&ForecastPayload::default(), 0);
        assert_eq!(conditions, CurrentConditions::default());
    }
}
