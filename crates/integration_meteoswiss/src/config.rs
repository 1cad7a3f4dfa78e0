//! MeteoSwiss client configuration

use serde::{Deserialize, Serialize};

use crate::error::MeteoError;

/// Language of forecast and warning texts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English
    #[default]
    En,
    /// German
    De,
    /// French
    Fr,
    /// Italian
    It,
}

impl Language {
    /// Two-letter code sent as `Accept-Language`
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::De => "de",
            Self::Fr => "fr",
            Self::It => "it",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Configuration for the MeteoSwiss client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeteoConfig {
    /// Base URL of the open-data CSV feeds
    #[serde(default = "default_data_base_url")]
    pub data_base_url: String,

    /// Base URL of the app forecast API
    #[serde(default = "default_forecast_base_url")]
    pub forecast_base_url: String,

    /// Forecast text language
    #[serde(default)]
    pub language: Language,

    /// User agent sent to the forecast API
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Station list cache TTL in minutes (0 to disable caching)
    #[serde(default = "default_station_cache_ttl_minutes")]
    pub station_cache_ttl_minutes: u32,
}

fn default_data_base_url() -> String {
    "https://data.geo.admin.ch".to_string()
}

fn default_forecast_base_url() -> String {
    "https://app-prod-ws.meteoswiss-app.ch/v1".to_string()
}

fn default_user_agent() -> String {
    "android-31 ch.admin.meteoswiss-2160000".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_station_cache_ttl_minutes() -> u32 {
    60
}

impl Default for MeteoConfig {
    fn default() -> Self {
        Self {
            data_base_url: default_data_base_url(),
            forecast_base_url: default_forecast_base_url(),
            language: Language::default(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            station_cache_ttl_minutes: default_station_cache_ttl_minutes(),
        }
    }
}

impl MeteoConfig {
    /// Create a configuration pointing both feeds at `base_url`
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            data_base_url: base_url.to_string(),
            forecast_base_url: base_url.to_string(),
            timeout_secs: 5,
            station_cache_ttl_minutes: 0,
            ..Default::default()
        }
    }

    /// Load configuration from an optional `meteoswiss` config file and
    /// `METEOSWISS_*` environment variables (e.g. `METEOSWISS_LANGUAGE=de`)
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or a value has the wrong
    /// type.
    pub fn load() -> Result<Self, MeteoError> {
        Self::load_from(config::File::with_name("meteoswiss").required(false))
    }

    fn load_from<S>(file: S) -> Result<Self, MeteoError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix("METEOSWISS").try_parsing(true))
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        loaded.validate().map_err(MeteoError::ConfigurationError)?;
        Ok(loaded)
    }

    /// Check if the station list cache is enabled
    #[must_use]
    pub const fn caching_enabled(&self) -> bool {
        self.station_cache_ttl_minutes > 0
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.data_base_url.is_empty() {
            return Err("data_base_url must not be empty".to_string());
        }

        if self.forecast_base_url.is_empty() {
            return Err("forecast_base_url must not be empty".to_string());
        }

        if self.user_agent.trim().is_empty() {
            return Err("user_agent must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}
