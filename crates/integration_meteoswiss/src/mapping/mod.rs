//! Feed normalization
//!
//! Pure functions turning decoded CSV rows and JSON documents into the typed
//! records of [`crate::models`]. Nothing in here performs I/O, and nothing
//! fails: malformed fields become absent values, malformed records become
//! `None`, malformed warning entries are reported as skipped.

use std::collections::HashMap;

use crate::models::{TaggedValue, Unit};
use crate::parse::parse_float;

mod current;
mod forecast;
mod pollen;
mod stations;
mod warnings;

pub use current::{find_station_conditions, map_current_conditions, map_current_row};
pub use forecast::{
    map_current_state, map_daily_forecast, map_forecast_envelope, map_hourly_forecast,
    map_sun_times,
};
pub use pollen::{map_pollen_row, map_pollen_rows};
pub use stations::{map_pollen_stations, map_weather_stations};
pub use warnings::{WarningBatch, map_warnings, parse_warning};

/// One decoded CSV row, keyed by column header
pub type CsvRow = HashMap<String, String>;

fn column<'a>(row: &'a CsvRow, key: &str) -> Option<&'a str> {
    row.get(key).map(String::as_str)
}

fn tagged_column(row: &CsvRow, key: &str, unit: Unit) -> TaggedValue {
    TaggedValue::new(parse_float(column(row, key)), unit)
}

#[cfg(test)]
pub(crate) fn row(pairs: &[(&str, &str)]) -> CsvRow {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}
