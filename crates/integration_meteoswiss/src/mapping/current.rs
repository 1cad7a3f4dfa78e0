//! Current conditions from the automatic station network (`VQHA80.csv`)

use tracing::debug;

use super::{CsvRow, column, tagged_column};
use crate::models::{CurrentWeather, Unit};
use crate::parse::utc_datetime;

const STATION: &str = "Station/Location";
const DATE: &str = "Date";
const DATE_FORMAT: &str = "%Y%m%d%H%M";

const AIR_TEMPERATURE: &str = "tre200s0";
const PRECIPITATION: &str = "rre150z0";
const SUNSHINE: &str = "sre000z0";
const GLOBAL_RADIATION: &str = "gre000z0";
const RELATIVE_HUMIDITY: &str = "ure200s0";
const DEW_POINT: &str = "tde200s0";
const WIND_DIRECTION: &str = "dkl010z0";
const WIND_SPEED: &str = "fu3010z0";
const GUST_PEAK: &str = "fu3010z1";
const PRESSURE_STATION: &str = "prestas0";
const PRESSURE_SEA_LEVEL: &str = "pp0qffs0";
const PRESSURE_STANDARD_ATMOSPHERE: &str = "pp0qnhs0";

/// Map one station row
pub fn map_current_row(row: &CsvRow) -> CurrentWeather {
    let raw_date = column(row, DATE);
    let time = utc_datetime(raw_date, DATE_FORMAT);
    if time.is_none() && raw_date.is_some() {
        debug!(date = ?raw_date, "Unparsable observation date");
    }

    CurrentWeather {
        station: column(row, STATION).map(str::to_string),
        time,
        air_temperature: tagged_column(row, AIR_TEMPERATURE, Unit::Celsius),
        precipitation: tagged_column(row, PRECIPITATION, Unit::Millimeter),
        sunshine: tagged_column(row, SUNSHINE, Unit::Minute),
        global_radiation: tagged_column(row, GLOBAL_RADIATION, Unit::WattPerSquareMeter),
        relative_humidity: tagged_column(row, RELATIVE_HUMIDITY, Unit::Percent),
        dew_point: tagged_column(row, DEW_POINT, Unit::Celsius),
        wind_direction: tagged_column(row, WIND_DIRECTION, Unit::Degree),
        wind_speed: tagged_column(row, WIND_SPEED, Unit::KilometerPerHour),
        gust_peak: tagged_column(row, GUST_PEAK, Unit::KilometerPerHour),
        pressure_station_level: tagged_column(row, PRESSURE_STATION, Unit::Hectopascal),
        pressure_sea_level: tagged_column(row, PRESSURE_SEA_LEVEL, Unit::Hectopascal),
        pressure_sea_level_at_standard_atmosphere: tagged_column(
            row,
            PRESSURE_STANDARD_ATMOSPHERE,
            Unit::Hectopascal,
        ),
    }
}

/// Map every station row
pub fn map_current_conditions(rows: &[CsvRow]) -> Vec<CurrentWeather> {
    rows.iter().map(map_current_row).collect()
}

/// Map the row of a single station
///
/// The station name is compared case-insensitively. Returns `None` if no
/// row matches.
pub fn find_station_conditions(rows: &[CsvRow], station: &str) -> Option<CurrentWeather> {
    // Station codes are ASCII, where lowercasing equals full case folding
    let wanted = station.to_lowercase();
    rows.iter()
        .find(|row| column(row, STATION).is_some_and(|s| s.to_lowercase() == wanted))
        .map(map_current_row)
}
