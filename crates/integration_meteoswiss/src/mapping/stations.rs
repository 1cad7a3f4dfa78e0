//! Station metadata feeds

use std::collections::HashMap;

use tracing::debug;

use super::{CsvRow, column};
use crate::models::StationInfo;
use crate::parse::parse_float;

/// Trailer rows of the automatic network list that carry file metadata
const TRAILER_NAMES: [&str; 3] = ["creation_time", "map_short_name", "license"];

/// Map the pollen station list (`ogd-pollen_meta_stations.csv`)
///
/// Rows without an abbreviation are dropped. Returns `None` for an empty
/// list, since the feed always lists at least one station.
pub fn map_pollen_stations(rows: &[CsvRow]) -> Option<Vec<StationInfo>> {
    let stations: Vec<StationInfo> = rows
        .iter()
        .filter_map(|row| {
            Some(StationInfo {
                name: column(row, "station_name").unwrap_or_default().to_string(),
                abbreviation: column(row, "station_abbr")?.to_string(),
                station_type: column(row, "station_type_en").map(str::to_string),
                altitude: parse_float(column(row, "station_height_masl")),
                latitude: parse_float(column(row, "station_coordinates_wgs84_lat")),
                longitude: parse_float(column(row, "station_coordinates_wgs84_lon")),
                canton: column(row, "station_canton").map(str::to_string),
            })
        })
        .collect();

    debug!(count = stations.len(), "Mapped pollen stations");
    (!stations.is_empty()).then_some(stations)
}

/// Map the automatic weather station list
///
/// Trailer rows (`creation_time`, `map_short_name`, `license`) and rows
/// without an abbreviation are dropped. The list is keyed by abbreviation:
/// a repeated abbreviation replaces the earlier entry in place.
pub fn map_weather_stations(rows: &[CsvRow]) -> Vec<StationInfo> {
    let mut stations: Vec<StationInfo> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for station in weather_station_rows(rows) {
        match positions.get(&station.abbreviation) {
            Some(&at) => {
                debug!(abbreviation = %station.abbreviation, "Duplicate weather station row");
                stations[at] = station;
            },
            None => {
                positions.insert(station.abbreviation.clone(), stations.len());
                stations.push(station);
            },
        }
    }

    stations
}

fn weather_station_rows(rows: &[CsvRow]) -> impl Iterator<Item = StationInfo> + '_ {
    rows.iter()
        .filter(|row| {
            column(row, "Station").is_none_or(|name| !TRAILER_NAMES.contains(&name))
        })
        .filter_map(|row| {
            Some(StationInfo {
                name: column(row, "Station").unwrap_or_default().to_string(),
                abbreviation: column(row, "Abbr.")?.to_string(),
                station_type: column(row, "Station type").map(str::to_string),
                altitude: parse_float(column(row, "Station height m a. sea level")),
                latitude: parse_float(column(row, "Latitude")),
                longitude: parse_float(column(row, "Longitude")),
                canton: column(row, "Canton").map(str::to_string),
            })
        })
}
