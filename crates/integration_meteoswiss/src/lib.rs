//! MeteoSwiss weather integration
//!
//! Turns the public MeteoSwiss feeds into typed records:
//!
//! - current conditions of the automatic station network (`VQHA80.csv`)
//! - daily and hourly forecasts, sunrise/sunset and active warnings for a
//!   Swiss post code (app forecast API)
//! - pollen measurements and the pollen and weather station lists
//!   (open-data CSV feeds)
//!
//! # Architecture
//!
//! The pure mapping layer in [`mapping`] never fails: a field that cannot be
//! parsed becomes an absent [`TaggedValue`] magnitude, a record that cannot be
//! built becomes `None`, and malformed warning entries are reported in
//! [`WarningBatch::skipped`]. Units are fixed per field and never read from
//! the data.
//!
//! [`MeteoClient`] is the transport interface, implemented over HTTP by
//! [`MeteoSwissClient`]. Station lists can be kept in a [`StationCache`]
//! handed to the client explicitly.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_meteoswiss::{MeteoClient, MeteoConfig, MeteoSwissClient};
//!
//! let client = MeteoSwissClient::new(MeteoConfig::load()?)?;
//!
//! if let Some(kloten) = client.get_current_weather_for_station("KLO").await? {
//!     println!("{}", kloten.summary());
//! }
//!
//! let forecast = client.get_forecast(8001).await?;
//! for day in forecast.next_days(3) {
//!     println!("{}", day.summary());
//! }
//! ```

mod cache;
mod client;
mod condition;
mod config;
mod error;
pub mod mapping;
mod models;
pub mod parse;
mod source;

pub use cache::{StationCache, StationFeed};
pub use client::{MeteoClient, MeteoSwissClient};
pub use condition::WeatherCondition;
pub use crate::config::{Language, MeteoConfig};
pub use error::MeteoError;
pub use mapping::{CsvRow, WarningBatch};
pub use models::{
    CurrentPollen, CurrentState, CurrentWeather, Forecast, SkippedWarning, StationInfo,
    TaggedValue, Unit, Warning, WarningLevel, WarningLink, WarningSkipReason, WarningType,
    WeatherForecast,
};
pub use source::{TextEncoding, decode_csv, decode_json};
