//! MeteoSwiss HTTP client
//!
//! Fetches the open-data CSV feeds and the app forecast API, then hands the
//! decoded bodies to [`crate::mapping`].

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, header};
use tracing::{debug, instrument, warn};

use crate::cache::{StationCache, StationFeed};
use crate::config::MeteoConfig;
use crate::error::MeteoError;
use crate::mapping::{
    self, find_station_conditions, map_current_conditions, map_forecast_envelope,
    map_pollen_rows, map_pollen_stations, map_weather_stations,
};
use crate::models::{CurrentPollen, CurrentWeather, StationInfo, WeatherForecast};
use crate::source::{TextEncoding, decode_csv, decode_json};

const CURRENT_CONDITIONS_PATH: &str = "ch.meteoschweiz.messwerte-aktuell/VQHA80.csv";
const POLLEN_PATH: &str = "ch.meteoschweiz.ogd-pollen";
const POLLEN_STATIONS_FILE: &str = "ogd-pollen_meta_stations.csv";
const WEATHER_STATIONS_PATH: &str =
    "ch.meteoschweiz.messnetz-automatisch/ch.meteoschweiz.messnetz-automatisch_en.csv";
const FORECAST_PATH: &str = "plzDetail";

/// Swiss post codes are four digits
const POST_CODES: std::ops::RangeInclusive<u32> = 1000..=9999;

/// MeteoSwiss client trait
#[async_trait]
pub trait MeteoClient: Send + Sync {
    /// Get the latest observation of every automatic station
    async fn get_current_weather_for_all_stations(
        &self,
    ) -> Result<Vec<CurrentWeather>, MeteoError>;

    /// Get the latest observation of one station (case-insensitive)
    ///
    /// Returns `Ok(None)` if the feed has no row for the station.
    async fn get_current_weather_for_station(
        &self,
        station: &str,
    ) -> Result<Option<CurrentWeather>, MeteoError>;

    /// Get the forecast, sun times and warnings for a Swiss post code
    async fn get_forecast(&self, post_code: u32) -> Result<WeatherForecast, MeteoError>;

    /// List the pollen measurement stations
    ///
    /// Returns `Ok(None)` if the feed lists no station.
    async fn get_pollen_stations(&self) -> Result<Option<Arc<Vec<StationInfo>>>, MeteoError>;

    /// List the automatic weather stations
    async fn get_weather_stations(&self) -> Result<Arc<Vec<StationInfo>>, MeteoError>;

    /// Get the most recent pollen measurement of a station
    ///
    /// Returns `Ok(None)` if the station has no usable measurement.
    async fn get_current_pollen_for_station(
        &self,
        station_abbr: &str,
    ) -> Result<Option<CurrentPollen>, MeteoError>;

    /// Check if the feeds are reachable
    async fn is_healthy(&self) -> bool;
}

/// reqwest-based MeteoSwiss client
#[derive(Debug)]
pub struct MeteoSwissClient {
    client: Client,
    config: MeteoConfig,
    station_cache: Option<Arc<StationCache>>,
}

impl MeteoSwissClient {
    /// Create a new client with the given configuration
    ///
    /// No station cache is attached; see [`Self::with_station_cache`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: MeteoConfig) -> Result<Self, MeteoError> {
        config.validate().map_err(MeteoError::ConfigurationError)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MeteoError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config,
            station_cache: None,
        })
    }

    /// Create a new client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults() -> Result<Self, MeteoError> {
        Self::new(MeteoConfig::default())
    }

    /// Serve station lists through `cache`
    #[must_use]
    pub fn with_station_cache(mut self, cache: Arc<StationCache>) -> Self {
        self.station_cache = Some(cache);
        self
    }

    /// The active configuration
    #[must_use]
    pub const fn config(&self) -> &MeteoConfig {
        &self.config
    }

    fn validate_post_code(post_code: u32) -> Result<(), MeteoError> {
        if !POST_CODES.contains(&post_code) {
            return Err(MeteoError::InvalidPostCode(post_code));
        }
        Ok(())
    }

    fn validate_station(station: &str) -> Result<(), MeteoError> {
        if station.is_empty() || !station.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(MeteoError::InvalidStation(station.to_string()));
        }
        Ok(())
    }

    /// Post codes are sent right-padded with zeros to six digits
    fn forecast_query(post_code: u32) -> String {
        format!("{post_code:0<6}")
    }

    fn data_url(&self, path: &str) -> String {
        format!("{}/{}", self.config.data_base_url.trim_end_matches('/'), path)
    }

    fn pollen_data_url(&self, station_abbr: &str) -> String {
        let abbr = station_abbr.to_lowercase();
        self.data_url(&format!(
            "{POLLEN_PATH}/{abbr}/ogd-pollen_{abbr}_d_recent.csv"
        ))
    }

    fn forecast_url(&self) -> String {
        format!(
            "{}/{FORECAST_PATH}",
            self.config.forecast_base_url.trim_end_matches('/')
        )
    }

    fn map_send_error(&self, err: &reqwest::Error) -> MeteoError {
        if err.is_timeout() {
            MeteoError::Timeout {
                timeout_secs: self.config.timeout_secs,
            }
        } else if err.is_connect() {
            MeteoError::ConnectionFailed(err.to_string())
        } else {
            MeteoError::RequestFailed(err.to_string())
        }
    }

    /// Send a request and return the body of a successful response
    async fn fetch(&self, request: RequestBuilder) -> Result<Vec<u8>, MeteoError> {
        let response = request.send().await.map_err(|e| self.map_send_error(&e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MeteoError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(MeteoError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(MeteoError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_send_error(&e))?;
        Ok(body.to_vec())
    }

    async fn fetch_csv(
        &self,
        url: &str,
        encoding: TextEncoding,
    ) -> Result<Vec<mapping::CsvRow>, MeteoError> {
        debug!(url = %url, ?encoding, "Fetching CSV feed");
        let body = self.fetch(self.client.get(url)).await?;
        let rows = decode_csv(&body, encoding)?;
        debug!(rows = rows.len(), "Decoded CSV feed");
        Ok(rows)
    }

    async fn cached_stations(&self, feed: StationFeed) -> Option<Arc<Vec<StationInfo>>> {
        match &self.station_cache {
            Some(cache) => cache.get(feed).await,
            None => None,
        }
    }

    async fn cache_stations(&self, feed: StationFeed, stations: &Arc<Vec<StationInfo>>) {
        if let Some(cache) = &self.station_cache {
            cache.insert(feed, Arc::clone(stations)).await;
        }
    }
}

#[async_trait]
impl MeteoClient for MeteoSwissClient {
    #[instrument(skip(self))]
    async fn get_current_weather_for_all_stations(
        &self,
    ) -> Result<Vec<CurrentWeather>, MeteoError> {
        let rows = self
            .fetch_csv(&self.data_url(CURRENT_CONDITIONS_PATH), TextEncoding::Utf8)
            .await?;
        Ok(map_current_conditions(&rows))
    }

    #[instrument(skip(self))]
    async fn get_current_weather_for_station(
        &self,
        station: &str,
    ) -> Result<Option<CurrentWeather>, MeteoError> {
        Self::validate_station(station)?;

        let rows = self
            .fetch_csv(&self.data_url(CURRENT_CONDITIONS_PATH), TextEncoding::Utf8)
            .await?;

        let found = find_station_conditions(&rows, station);
        if found.is_none() {
            warn!(station = %station, "Station not found in current conditions");
        }
        Ok(found)
    }

    #[instrument(skip(self), fields(language = %self.config.language))]
    async fn get_forecast(&self, post_code: u32) -> Result<WeatherForecast, MeteoError> {
        Self::validate_post_code(post_code)?;

        let url = self.forecast_url();
        let plz = Self::forecast_query(post_code);
        debug!(url = %url, plz = %plz, "Fetching forecast");

        let request = self
            .client
            .get(&url)
            .query(&[("plz", plz.as_str())])
            .header(header::USER_AGENT, &self.config.user_agent)
            .header(header::ACCEPT_LANGUAGE, self.config.language.code())
            .header(header::ACCEPT, "application/json");

        let body = self.fetch(request).await?;
        let envelope = decode_json(&body)?;

        map_forecast_envelope(&envelope).ok_or_else(|| {
            MeteoError::ParseError("Forecast response is not a JSON object".to_string())
        })
    }

    #[instrument(skip(self))]
    async fn get_pollen_stations(&self) -> Result<Option<Arc<Vec<StationInfo>>>, MeteoError> {
        if let Some(stations) = self.cached_stations(StationFeed::Pollen).await {
            return Ok(Some(stations));
        }

        let url = self.data_url(&format!("{POLLEN_PATH}/{POLLEN_STATIONS_FILE}"));
        let rows = self.fetch_csv(&url, TextEncoding::Latin1).await?;

        let Some(stations) = map_pollen_stations(&rows) else {
            warn!("Pollen station list is empty");
            return Ok(None);
        };

        let stations = Arc::new(stations);
        self.cache_stations(StationFeed::Pollen, &stations).await;
        Ok(Some(stations))
    }

    #[instrument(skip(self))]
    async fn get_weather_stations(&self) -> Result<Arc<Vec<StationInfo>>, MeteoError> {
        if let Some(stations) = self.cached_stations(StationFeed::Weather).await {
            return Ok(stations);
        }

        let rows = self
            .fetch_csv(&self.data_url(WEATHER_STATIONS_PATH), TextEncoding::Latin1)
            .await?;

        let stations = Arc::new(map_weather_stations(&rows));
        debug!(count = stations.len(), "Mapped weather stations");
        self.cache_stations(StationFeed::Weather, &stations).await;
        Ok(stations)
    }

    #[instrument(skip(self))]
    async fn get_current_pollen_for_station(
        &self,
        station_abbr: &str,
    ) -> Result<Option<CurrentPollen>, MeteoError> {
        Self::validate_station(station_abbr)?;

        let rows = self
            .fetch_csv(&self.pollen_data_url(station_abbr), TextEncoding::Latin1)
            .await?;

        let latest = map_pollen_rows(&rows);
        if latest.is_none() {
            warn!(station = %station_abbr, "No pollen measurement available");
        }
        Ok(latest)
    }

    async fn is_healthy(&self) -> bool {
        let url = self.data_url(CURRENT_CONDITIONS_PATH);
        match self.fetch(self.client.head(&url)).await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "MeteoSwiss health check failed");
                false
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> MeteoSwissClient {
        MeteoSwissClient::new(MeteoConfig::for_testing("http://localhost:1234/")).unwrap()
    }

    #[test]
    fn test_validate_post_code() {
        assert!(MeteoSwissClient::validate_post_code(1000).is_ok());
        assert!(MeteoSwissClient::validate_post_code(8001).is_ok());
        assert!(MeteoSwissClient::validate_post_code(9999).is_ok());
        assert!(matches!(
            MeteoSwissClient::validate_post_code(999),
            Err(MeteoError::InvalidPostCode(999))
        ));
        assert!(MeteoSwissClient::validate_post_code(10000).is_err());
    }

    #[test]
    fn test_forecast_query_padding() {
        assert_eq!(MeteoSwissClient::forecast_query(8001), "800100");
        assert_eq!(MeteoSwissClient::forecast_query(3000), "300000");
    }

    #[test]
    fn test_validate_station() {
        assert!(MeteoSwissClient::validate_station("KLO").is_ok());
        assert!(MeteoSwissClient::validate_station("pbe").is_ok());
        assert!(MeteoSwissClient::validate_station("").is_err());
        assert!(MeteoSwissClient::validate_station("../etc").is_err());
        assert!(MeteoSwissClient::validate_station("K LO").is_err());
        assert!(MeteoSwissClient::validate_station("STRAß").is_err());
    }

    #[test]
    fn test_urls() {
        let client = client();
        assert_eq!(
            client.data_url(CURRENT_CONDITIONS_PATH),
            "http://localhost:1234/ch.meteoschweiz.messwerte-aktuell/VQHA80.csv"
        );
        assert_eq!(
            client.pollen_data_url("PBE"),
            "http://localhost:1234/ch.meteoschweiz.ogd-pollen/pbe/ogd-pollen_pbe_d_recent.csv"
        );
        assert_eq!(client.forecast_url(), "http://localhost:1234/plzDetail");
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = MeteoConfig::default();
        config.timeout_secs = 0;
        assert!(matches!(
            MeteoSwissClient::new(config),
            Err(MeteoError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_defaults() {
        let client = MeteoSwissClient::with_defaults().unwrap();
        assert_eq!(client.config().data_base_url, "https://data.geo.admin.ch");
        assert!(client.station_cache.is_none());
    }
}
