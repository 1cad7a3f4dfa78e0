//! MeteoSwiss data models
//!
//! Typed records produced from the MeteoSwiss CSV and JSON feeds. Every
//! physical quantity is a [`TaggedValue`]: an optional magnitude paired with
//! the unit the upstream service reports it in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::condition::WeatherCondition;

/// Units used by the MeteoSwiss feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Degrees Celsius
    #[serde(rename = "°C")]
    Celsius,
    /// Millimetres of precipitation
    #[serde(rename = "mm")]
    Millimeter,
    /// Minutes
    #[serde(rename = "min")]
    Minute,
    /// Watts per square metre
    #[serde(rename = "W/m²")]
    WattPerSquareMeter,
    /// Percent
    #[serde(rename = "%")]
    Percent,
    /// Compass degrees
    #[serde(rename = "°")]
    Degree,
    /// Kilometres per hour
    #[serde(rename = "km/h")]
    KilometerPerHour,
    /// Hectopascal
    #[serde(rename = "hPa")]
    Hectopascal,
    /// Pollen grains per cubic metre
    #[serde(rename = "No/m3")]
    PollenPerCubicMeter,
}

impl Unit {
    /// Unit symbol as published by MeteoSwiss
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Millimeter => "mm",
            Self::Minute => "min",
            Self::WattPerSquareMeter => "W/m²",
            Self::Percent => "%",
            Self::Degree => "°",
            Self::KilometerPerHour => "km/h",
            Self::Hectopascal => "hPa",
            Self::PollenPerCubicMeter => "No/m3",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A measurement with a fixed unit and a possibly missing magnitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaggedValue {
    /// Magnitude, `None` when the source field was missing or unparsable
    pub value: Option<f64>,
    /// Unit of the magnitude
    pub unit: Unit,
}

impl TaggedValue {
    /// Create a tagged value
    #[must_use]
    pub const fn new(value: Option<f64>, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Check whether a magnitude is present
    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.value.is_some()
    }
}

impl std::fmt::Display for TaggedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.value {
            Some(value) => write!(f, "{value} {}", self.unit),
            None => write!(f, "n/a {}", self.unit),
        }
    }
}

/// Station metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationInfo {
    /// Station name
    pub name: String,
    /// Short abbreviation, unique per feed (e.g. `KLO`, `PBE`)
    pub abbreviation: String,
    /// Station type as described by the feed
    pub station_type: Option<String>,
    /// Altitude in metres above sea level
    pub altitude: Option<f64>,
    /// WGS84 latitude
    pub latitude: Option<f64>,
    /// WGS84 longitude
    pub longitude: Option<f64>,
    /// Canton code
    pub canton: Option<String>,
}

impl std::fmt::Display for StationInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Station {} - [Name: {}, Lat: {}, Lng: {}, Canton: {}]",
            self.abbreviation,
            self.name,
            display_opt(self.latitude.as_ref()),
            display_opt(self.longitude.as_ref()),
            display_opt(self.canton.as_ref()),
        )
    }
}

fn display_opt<T: std::fmt::Display>(value: Option<&T>) -> String {
    value.map_or_else(|| "-".to_string(), ToString::to_string)
}

/// Current conditions measured at an automatic station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Station abbreviation the row belongs to
    pub station: Option<String>,
    /// Observation time
    pub time: Option<DateTime<Utc>>,
    /// Air temperature 2 m above ground
    pub air_temperature: TaggedValue,
    /// Precipitation over the last 10 minutes
    pub precipitation: TaggedValue,
    /// Sunshine duration over the last 10 minutes
    pub sunshine: TaggedValue,
    /// Global radiation, 10 minute mean
    pub global_radiation: TaggedValue,
    /// Relative humidity 2 m above ground
    pub relative_humidity: TaggedValue,
    /// Dew point 2 m above ground
    pub dew_point: TaggedValue,
    /// Wind direction, 10 minute mean
    pub wind_direction: TaggedValue,
    /// Wind speed, 10 minute mean
    pub wind_speed: TaggedValue,
    /// Gust peak (one second)
    pub gust_peak: TaggedValue,
    /// Pressure at station level (QFE)
    pub pressure_station_level: TaggedValue,
    /// Pressure reduced to sea level (QFF)
    pub pressure_sea_level: TaggedValue,
    /// Pressure reduced to sea level with standard atmosphere (QNH)
    pub pressure_sea_level_at_standard_atmosphere: TaggedValue,
}

impl CurrentWeather {
    /// Get a formatted summary of current conditions
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}: {}, humidity {}, wind {}",
            self.station.as_deref().unwrap_or("unknown station"),
            self.air_temperature,
            self.relative_humidity,
            self.wind_speed
        )
    }
}

/// Condensed live snapshot from the forecast feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentState {
    /// Current temperature
    pub temperature: TaggedValue,
    /// Raw icon code
    pub icon: Option<i32>,
    /// Classified condition, `None` if the icon is unrecognized
    pub condition: Option<WeatherCondition>,
}

/// A single daily or hourly forecast entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Start of the forecast bucket (midnight UTC for daily entries)
    pub timestamp: Option<DateTime<Utc>>,
    /// Raw icon code
    pub icon: Option<i32>,
    /// Classified condition, `None` if the icon is unrecognized
    pub condition: Option<WeatherCondition>,
    /// Maximum temperature
    pub temperature_max: TaggedValue,
    /// Minimum temperature
    pub temperature_min: TaggedValue,
    /// Precipitation
    pub precipitation: TaggedValue,
    /// Mean temperature (hourly entries only)
    pub temperature_mean: Option<TaggedValue>,
    /// Wind speed (hourly entries only)
    pub wind_speed: Option<TaggedValue>,
    /// Wind direction (hourly entries only)
    pub wind_direction: Option<TaggedValue>,
    /// Wind gust speed (hourly entries only)
    pub wind_gust_speed: Option<TaggedValue>,
}

impl Forecast {
    /// Whether this entry carries hourly-only fields
    #[must_use]
    pub const fn is_hourly(&self) -> bool {
        self.temperature_mean.is_some()
    }

    /// Get a formatted summary of the forecast entry
    #[must_use]
    pub fn summary(&self) -> String {
        let condition = self
            .condition
            .map_or_else(|| "Unknown".to_string(), |c| format!("{} {}", c.emoji(), c.description()));
        format!(
            "{condition} {}/{}, precip {}",
            self.temperature_max, self.temperature_min, self.precipitation
        )
    }
}

/// Warning severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum WarningLevel {
    /// Level 0
    NoDanger,
    /// Level 1
    NoOrMinimalHazard,
    /// Level 2
    ModerateHazard,
    /// Level 3
    SignificantHazard,
    /// Level 4
    SevereHazard,
    /// Level 5
    VerySevereHazard,
    /// Code not known to this client, kept verbatim
    Unrecognized(i64),
}

impl WarningLevel {
    /// Numeric code as used upstream
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::NoDanger => 0,
            Self::NoOrMinimalHazard => 1,
            Self::ModerateHazard => 2,
            Self::SignificantHazard => 3,
            Self::SevereHazard => 4,
            Self::VerySevereHazard => 5,
            Self::Unrecognized(code) => code,
        }
    }
}

impl From<i64> for WarningLevel {
    fn from(code: i64) -> Self {
        match code {
            0 => Self::NoDanger,
            1 => Self::NoOrMinimalHazard,
            2 => Self::ModerateHazard,
            3 => Self::SignificantHazard,
            4 => Self::SevereHazard,
            5 => Self::VerySevereHazard,
            other => Self::Unrecognized(other),
        }
    }
}

impl From<WarningLevel> for i64 {
    fn from(level: WarningLevel) -> Self {
        level.code()
    }
}

/// Hazard category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum WarningType {
    /// Wind
    Wind,
    /// Thunderstorms
    Thunderstorms,
    /// Rain
    Rain,
    /// Snow
    Snow,
    /// Slippery roads
    SlipperyRoads,
    /// Frost
    Frost,
    /// Thaw
    Thaw,
    /// Heat waves
    HeatWaves,
    /// Avalanches
    Avalanches,
    /// Earthquakes
    Earthquakes,
    /// Forest fires
    ForestFires,
    /// Flood
    Flood,
    /// Drought
    Drought,
    /// Upstream "unknown" category (code 99)
    Unknown,
    /// Code not known to this client, kept verbatim
    Unrecognized(i64),
}

impl WarningType {
    /// Numeric code as used upstream
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Wind => 0,
            Self::Thunderstorms => 1,
            Self::Rain => 2,
            Self::Snow => 3,
            Self::SlipperyRoads => 4,
            Self::Frost => 5,
            Self::Thaw => 6,
            Self::HeatWaves => 7,
            Self::Avalanches => 8,
            Self::Earthquakes => 9,
            Self::ForestFires => 10,
            Self::Flood => 11,
            Self::Drought => 12,
            Self::Unknown => 99,
            Self::Unrecognized(code) => code,
        }
    }
}

impl From<i64> for WarningType {
    fn from(code: i64) -> Self {
        match code {
            0 => Self::Wind,
            1 => Self::Thunderstorms,
            2 => Self::Rain,
            3 => Self::Snow,
            4 => Self::SlipperyRoads,
            5 => Self::Frost,
            6 => Self::Thaw,
            7 => Self::HeatWaves,
            8 => Self::Avalanches,
            9 => Self::Earthquakes,
            10 => Self::ForestFires,
            11 => Self::Flood,
            12 => Self::Drought,
            99 => Self::Unknown,
            other => Self::Unrecognized(other),
        }
    }
}

impl From<WarningType> for i64 {
    fn from(warning_type: WarningType) -> Self {
        warning_type.code()
    }
}

/// Reference link attached to a warning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningLink {
    /// Link label
    pub text: Option<String>,
    /// Target URL
    pub url: Option<String>,
}

/// Hazard advisory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    /// Hazard category
    pub warning_type: WarningType,
    /// Severity
    pub warning_level: WarningLevel,
    /// Plain text body
    pub text: Option<String>,
    /// HTML body
    pub html_text: Option<String>,
    /// `true` for a forecast advisory, `false` for an active one
    pub outlook: bool,
    /// Start of validity
    pub valid_from: Option<DateTime<Utc>>,
    /// End of validity
    pub valid_to: Option<DateTime<Utc>>,
    /// Reference links in upstream order
    pub links: Vec<WarningLink>,
}

impl Warning {
    /// Check whether the warning is valid at `at`
    ///
    /// Open-ended bounds are treated as unbounded.
    #[must_use]
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        !self.outlook
            && self.valid_from.is_none_or(|from| from <= at)
            && self.valid_to.is_none_or(|to| at < to)
    }
}

/// Why a warning entry was dropped
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum WarningSkipReason {
    /// Entry is not a JSON object
    #[error("entry is not an object")]
    NotAnObject,
    /// `warnType` missing or not an integer
    #[error("missing or non-numeric warnType")]
    InvalidType,
    /// `warnLevel` missing or not an integer
    #[error("missing or non-numeric warnLevel")]
    InvalidLevel,
    /// `links` missing or not an array
    #[error("missing or malformed links")]
    InvalidLinks,
    /// A link is not a JSON object
    #[error("link {0} is not an object")]
    InvalidLink(usize),
}

/// A warning entry that could not be mapped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedWarning {
    /// Position of the entry in the upstream list
    pub index: usize,
    /// Why it was dropped
    pub reason: WarningSkipReason,
}

/// Everything the forecast feed reports for one post code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherForecast {
    /// Current state, `None` if the feed had no `currentWeather` block
    pub current: Option<CurrentState>,
    /// Daily forecasts in upstream order
    pub daily: Vec<Forecast>,
    /// Hourly forecasts, `None` if the feed had no usable graph anchor
    pub hourly: Option<Vec<Forecast>>,
    /// Sunrise times
    pub sunrise: Vec<DateTime<Utc>>,
    /// Sunset times
    pub sunset: Vec<DateTime<Utc>>,
    /// Warnings in upstream order
    pub warnings: Vec<Warning>,
    /// Warning entries that were dropped
    pub skipped_warnings: Vec<SkippedWarning>,
}

impl WeatherForecast {
    /// Get today's forecast
    #[must_use]
    pub fn today(&self) -> Option<&Forecast> {
        self.daily.first()
    }

    /// Get tomorrow's forecast
    #[must_use]
    pub fn tomorrow(&self) -> Option<&Forecast> {
        self.daily.get(1)
    }

    /// Get the next N days of forecasts
    #[must_use]
    pub fn next_days(&self, n: usize) -> &[Forecast] {
        let end = n.min(self.daily.len());
        &self.daily[..end]
    }

    /// Get the hourly entries starting at or after `from`
    #[must_use]
    pub fn hours_from(&self, from: DateTime<Utc>) -> Vec<&Forecast> {
        self.hourly
            .iter()
            .flatten()
            .filter(|f| f.timestamp.is_some_and(|ts| ts >= from))
            .collect()
    }
}

/// Most recent pollen measurement at a station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentPollen {
    /// Station abbreviation
    pub station_abbr: String,
    /// Measurement time
    pub timestamp: DateTime<Utc>,
    /// Birch (Betula)
    pub birch: TaggedValue,
    /// Grasses (Poaceae)
    pub grasses: TaggedValue,
    /// Alder (Alnus)
    pub alder: TaggedValue,
    /// Hazel (Corylus)
    pub hazel: TaggedValue,
    /// Beech (Fagus)
    pub beech: TaggedValue,
    /// Ash (Fraxinus)
    pub ash: TaggedValue,
    /// Oak (Quercus)
    pub oak: TaggedValue,
}

impl CurrentPollen {
    /// All species with their English name
    #[must_use]
    pub const fn species(&self) -> [(&'static str, TaggedValue); 7] {
        [
            ("birch", self.birch),
            ("grasses", self.grasses),
            ("alder", self.alder),
            ("hazel", self.hazel),
            ("beech", self.beech),
            ("ash", self.ash),
            ("oak", self.oak),
        ]
    }

    /// Species with the highest measured concentration
    #[must_use]
    pub fn dominant(&self) -> Option<(&'static str, f64)> {
        self.species()
            .into_iter()
            .filter_map(|(name, tagged)| tagged.value.map(|v| (name, v)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}
