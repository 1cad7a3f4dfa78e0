//! MeteoSwiss error types

use thiserror::Error;

/// Errors that can occur while talking to the MeteoSwiss feeds
#[derive(Debug, Error)]
pub enum MeteoError {
    /// Connection to the service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Post code outside the Swiss range
    #[error("Invalid post code: {0} (must be 1000-9999)")]
    InvalidPostCode(u32),

    /// Station abbreviation is empty or not alphanumeric
    #[error("Invalid station: {0:?}")]
    InvalidStation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl MeteoError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::RequestFailed(_)
                | Self::ServiceUnavailable(_)
                | Self::Timeout { .. }
                | Self::RateLimitExceeded
        )
    }
}

impl From<config::ConfigError> for MeteoError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigurationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(MeteoError::ConnectionFailed("test".to_string()).is_retryable());
        assert!(MeteoError::RequestFailed("test".to_string()).is_retryable());
        assert!(MeteoError::ServiceUnavailable("test".to_string()).is_retryable());
        assert!(MeteoError::Timeout { timeout_secs: 30 }.is_retryable());
        assert!(MeteoError::RateLimitExceeded.is_retryable());
    }

    #[test]
    fn test_non_retryable_errors() {
        assert!(!MeteoError::ParseError("test".to_string()).is_retryable());
        assert!(!MeteoError::InvalidPostCode(42).is_retryable());
        assert!(!MeteoError::InvalidStation(String::new()).is_retryable());
        assert!(!MeteoError::ConfigurationError("test".to_string()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = MeteoError::InvalidPostCode(123);
        assert!(err.to_string().contains("123"));

        let err = MeteoError::Timeout { timeout_secs: 10 };
        assert!(err.to_string().contains("10"));

        let err = MeteoError::InvalidStation("K L O".to_string());
        assert!(err.to_string().contains("K L O"));
    }
}
