//! Forecast feed (`plzDetail`) normalization
//!
//! The envelope carries a `currentWeather` block, a `forecast` list of days,
//! a `graph` block of hourly series and a `warnings` list.

use std::iter;

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use super::warnings::map_warnings;
use crate::condition::WeatherCondition;
use crate::models::{CurrentState, Forecast, TaggedValue, Unit, WeatherForecast};
use crate::parse::{epoch_millis, json_f64, json_i64, json_icon, utc_day};

const CURRENT_WEATHER: &str = "currentWeather";
const FORECAST: &str = "forecast";
const GRAPH: &str = "graph";

/// Hours covered by one element of a 3-hour series
const COARSE_STEP: usize = 3;

/// Map the whole forecast envelope
///
/// Returns `None` only when the document is not a JSON object.
pub fn map_forecast_envelope(envelope: &Value) -> Option<WeatherForecast> {
    if !envelope.is_object() {
        debug!("Forecast document is not an object");
        return None;
    }

    let (sunrise, sunset) = map_sun_times(envelope);
    let batch = map_warnings(envelope);

    Some(WeatherForecast {
        current: map_current_state(envelope),
        daily: map_daily_forecast(envelope),
        hourly: map_hourly_forecast(envelope),
        sunrise,
        sunset,
        warnings: batch.warnings,
        skipped_warnings: batch.skipped,
    })
}

/// Map the `currentWeather` block
pub fn map_current_state(envelope: &Value) -> Option<CurrentState> {
    let current = envelope.get(CURRENT_WEATHER)?;
    let icon = json_icon(current.get("icon"));

    Some(CurrentState {
        temperature: TaggedValue::new(json_f64(current.get("temperature")), Unit::Celsius),
        icon,
        condition: WeatherCondition::from_icon(icon),
    })
}

/// Map the `forecast` list of days
///
/// A missing list yields an empty forecast.
pub fn map_daily_forecast(envelope: &Value) -> Vec<Forecast> {
    envelope
        .get(FORECAST)
        .and_then(Value::as_array)
        .map(|days| days.iter().map(map_day).collect())
        .unwrap_or_default()
}

fn map_day(day: &Value) -> Forecast {
    let icon = json_icon(day.get("iconDay"));

    Forecast {
        timestamp: utc_day(day.get("dayDate").and_then(Value::as_str)),
        icon,
        condition: WeatherCondition::from_icon(icon),
        temperature_max: TaggedValue::new(json_f64(day.get("temperatureMax")), Unit::Celsius),
        temperature_min: TaggedValue::new(json_f64(day.get("temperatureMin")), Unit::Celsius),
        precipitation: TaggedValue::new(json_f64(day.get("precipitation")), Unit::Millimeter),
        temperature_mean: None,
        wind_speed: None,
        wind_direction: None,
        wind_gust_speed: None,
    }
}

/// Map the `graph` block into hourly entries
///
/// Icons and wind direction are published every three hours and are
/// repeated to hourly resolution. The forecast is as long as the shortest
/// of the temperature, precipitation and icon series, and is further cut to
/// the wind series if those run out first.
///
/// Returns `None` when there is no graph or no valid `start` anchor.
pub fn map_hourly_forecast(envelope: &Value) -> Option<Vec<Forecast>> {
    let graph = envelope.get(GRAPH)?;
    let Some(anchor) = epoch_millis(json_i64(graph.get("start"))) else {
        debug!("Graph has no usable start anchor");
        return None;
    };

    let temperature_max = series(graph, "temperatureMax1h", Unit::Celsius);
    let temperature_mean = series(graph, "temperatureMean1h", Unit::Celsius);
    let temperature_min = series(graph, "temperatureMin1h", Unit::Celsius);
    let precipitation = series(graph, "precipitation1h", Unit::Millimeter);
    let wind_speed = series(graph, "windSpeed1h", Unit::KilometerPerHour);
    let gust_speed = series(graph, "gustSpeed1h", Unit::KilometerPerHour);

    let coarse_icons: Vec<Option<i32>> = array(graph, "weatherIcon3h")
        .iter()
        .map(|v| json_icon(Some(v)))
        .collect();
    let coarse_directions = series(graph, "windDirection3h", Unit::Degree);
    check_alignment(temperature_max.len(), coarse_icons.len());

    let icons = expand(coarse_icons);
    let wind_direction = expand(coarse_directions);

    let hours = [
        temperature_max.len(),
        temperature_mean.len(),
        temperature_min.len(),
        precipitation.len(),
        icons.len(),
    ]
    .into_iter()
    .min()
    .unwrap_or(0);

    let forecast: Vec<Forecast> = hourly_timestamps(anchor)
        .take(hours)
        .zip(icons)
        .zip(temperature_max)
        .zip(temperature_mean)
        .zip(temperature_min)
        .zip(precipitation)
        .zip(wind_direction)
        .zip(wind_speed)
        .zip(gust_speed)
        .map(
            |((((((((ts, icon), t_max), t_mean), t_min), precip), direction), speed), gust)| {
                Forecast {
                    timestamp: Some(ts),
                    icon,
                    condition: WeatherCondition::from_icon(icon),
                    temperature_max: t_max,
                    temperature_min: t_min,
                    precipitation: precip,
                    temperature_mean: Some(t_mean),
                    wind_speed: Some(speed),
                    wind_direction: Some(direction),
                    wind_gust_speed: Some(gust),
                }
            },
        )
        .collect();

    if forecast.len() < hours {
        debug!(
            hours,
            kept = forecast.len(),
            "Hourly forecast truncated by wind series"
        );
    }

    Some(forecast)
}

/// Map the `graph.sunrise` and `graph.sunset` epoch lists
pub fn map_sun_times(envelope: &Value) -> (Vec<DateTime<Utc>>, Vec<DateTime<Utc>>) {
    let Some(graph) = envelope.get(GRAPH) else {
        return (Vec::new(), Vec::new());
    };
    let times = |key: &str| -> Vec<DateTime<Utc>> {
        array(graph, key)
            .iter()
            .filter_map(|v| epoch_millis(json_i64(Some(v))))
            .collect()
    };
    (times("sunrise"), times("sunset"))
}

fn array<'a>(graph: &'a Value, key: &str) -> &'a [Value] {
    graph
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn series(graph: &Value, key: &str, unit: Unit) -> Vec<TaggedValue> {
    array(graph, key)
        .iter()
        .map(|v| TaggedValue::new(json_f64(Some(v)), unit))
        .collect()
}

fn expand<T: Clone>(coarse: Vec<T>) -> Vec<T> {
    coarse
        .into_iter()
        .flat_map(|v| iter::repeat_n(v, COARSE_STEP))
        .collect()
}

fn hourly_timestamps(anchor: DateTime<Utc>) -> impl Iterator<Item = DateTime<Utc>> {
    iter::successors(Some(anchor), |ts| ts.checked_add_signed(TimeDelta::hours(1)))
}

fn check_alignment(hourly_len: usize, coarse_len: usize) {
    if hourly_len != coarse_len * COARSE_STEP {
        warn!(
            hourly_len,
            coarse_len, "Hourly and 3-hourly series are not aligned 3:1"
        );
    }
}
