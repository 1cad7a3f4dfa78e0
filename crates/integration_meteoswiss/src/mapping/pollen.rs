//! Pollen measurements (`ogd-pollen_<station>_d_recent.csv`)

use tracing::{debug, warn};

use super::{CsvRow, column, tagged_column};
use crate::models::{CurrentPollen, Unit};
use crate::parse::utc_datetime;

const STATION_ABBR: &str = "station_abbr";
const REFERENCE_TIMESTAMP: &str = "reference_timestamp";
const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M";

const BIRCH: &str = "kabetuh0";
const GRASSES: &str = "khpoach0";
const ALDER: &str = "kaalnuh0";
const HAZEL: &str = "kacoryh0";
const BEECH: &str = "kafaguh0";
const ASH: &str = "kafraxh0";
const OAK: &str = "kaquerh0";

/// Map one measurement row
///
/// Returns `None` if the row lacks a station abbreviation or a parsable
/// reference timestamp.
pub fn map_pollen_row(row: &CsvRow) -> Option<CurrentPollen> {
    let station_abbr = column(row, STATION_ABBR)?.to_string();
    let timestamp = utc_datetime(column(row, REFERENCE_TIMESTAMP), TIMESTAMP_FORMAT)?;
    let unit = Unit::PollenPerCubicMeter;

    Some(CurrentPollen {
        station_abbr,
        timestamp,
        birch: tagged_column(row, BIRCH, unit),
        grasses: tagged_column(row, GRASSES, unit),
        alder: tagged_column(row, ALDER, unit),
        hazel: tagged_column(row, HAZEL, unit),
        beech: tagged_column(row, BEECH, unit),
        ash: tagged_column(row, ASH, unit),
        oak: tagged_column(row, OAK, unit),
    })
}

/// Select the most recent measurement
///
/// Rows that cannot be mapped are skipped. Returns `None` if no row could be
/// mapped.
pub fn map_pollen_rows(rows: &[CsvRow]) -> Option<CurrentPollen> {
    let mut measurements: Vec<CurrentPollen> = rows
        .iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let mapped = map_pollen_row(row);
            if mapped.is_none() {
                warn!(index, "Skipping pollen row without station or timestamp");
            }
            mapped
        })
        .collect();

    measurements.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    debug!(rows = measurements.len(), "Mapped pollen measurements");
    measurements.into_iter().next()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::mapping::row;

    fn measurement(timestamp: &str, birch: &str) -> CsvRow {
        row(&[
            ("station_abbr", "PBE"),
            ("reference_timestamp", timestamp),
            ("kabetuh0", birch),
            ("khpoach0", "6"),
            ("kaalnuh0", "33"),
            ("kacoryh0", "21"),
            ("kafaguh0", "4"),
            ("kafraxh0", "5"),
            ("kaquerh0", "4"),
        ])
    }

    #[test]
    fn test_map_row() {
        let pollen = map_pollen_row(&measurement("28.05.2025 23:00", "43")).unwrap();

        assert_eq!(pollen.station_abbr, "PBE");
        assert_eq!(
            pollen.timestamp,
            Utc.with_ymd_and_hms(2025, 5, 28, 23, 0, 0).unwrap()
        );
        assert_eq!(pollen.birch.value, Some(43.0));
        assert_eq!(pollen.grasses.value, Some(6.0));
        assert_eq!(pollen.alder.value, Some(33.0));
        assert_eq!(pollen.hazel.value, Some(21.0));
        assert_eq!(pollen.beech.value, Some(4.0));
        assert_eq!(pollen.ash.value, Some(5.0));
        assert_eq!(pollen.oak.value, Some(4.0));
        assert!(
            pollen
                .species()
                .iter()
                .all(|(_, v)| v.unit == Unit::PollenPerCubicMeter)
        );
    }

    #[test]
    fn test_latest_row_wins() {
        let rows = vec![
            measurement("27.05.2025 23:00", "10"),
            measurement("28.05.2025 23:00", "43"),
            measurement("26.05.2025 23:00", "99"),
        ];

        let latest = map_pollen_rows(&rows).unwrap();
        assert_eq!(
            latest.timestamp,
            Utc.with_ymd_and_hms(2025, 5, 28, 23, 0, 0).unwrap()
        );
        assert_eq!(latest.birch.value, Some(43.0));
    }

    #[test]
    fn test_no_rows() {
        assert!(map_pollen_rows(&[]).is_none());
    }

    #[test]
    fn test_unparsable_rows_are_skipped() {
        let mut no_station = measurement("29.05.2025 23:00", "1");
        no_station.remove("station_abbr");
        let rows = vec![
            measurement("2025-05-30 23:00", "2"),
            no_station,
            measurement("27.05.2025 23:00", "10"),
        ];

        let latest = map_pollen_rows(&rows).unwrap();
        assert_eq!(latest.birch.value, Some(10.0));

        assert!(map_pollen_rows(&[measurement("garbage", "1")]).is_none());
    }

    #[test]
    fn test_missing_species_is_absent() {
        let mut r = measurement("28.05.2025 23:00", "");
        r.remove("kaquerh0");

        let pollen = map_pollen_row(&r).unwrap();
        assert_eq!(pollen.birch.value, None);
        assert_eq!(pollen.oak.value, None);
        assert_eq!(pollen.oak.unit, Unit::PollenPerCubicMeter);
    }
}
