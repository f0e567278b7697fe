//! Error types for series operations.
//!
//! This module defines [`SeriesError`] which covers all error cases that can occur
//! when fetching, parsing, or caching monthly series data.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during series operations.
///
/// The type is `Clone` so one fetch result can be handed to every caller
/// waiting on the same in-flight request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    /// Network-related errors (connection failures, transport timeouts, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    Http {
        /// Numeric HTTP status code.
        status: u16,
        /// The URL that was requested.
        url: String,
    },

    /// Rate limit exceeded by the server.
    #[error("Rate limited: retry after {retry_after:?}")]
    RateLimited {
        /// Suggested time to wait before retrying.
        retry_after: Option<Duration>,
    },

    /// The response could not be decoded into a monthly series.
    #[error("Parse error: {0}")]
    Parse(String),

    /// No fetcher is registered for the requested series.
    #[error("Unknown series: {0}")]
    UnknownSeries(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The fetch did not complete within the allotted time.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl SeriesError {
    /// Returns true if the error came from the data source rather than from
    /// caller misuse (unknown series, invalid parameters).
    #[must_use]
    pub const fn is_fetch_failure(&self) -> bool {
        !matches!(self, Self::UnknownSeries(_) | Self::InvalidParameter(_))
    }
}

/// Result type alias using [`SeriesError`].
pub type Result<T> = std::result::Result<T, SeriesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failure_classification() {
        assert!(SeriesError::Network("reset".into()).is_fetch_failure());
        assert!(
            SeriesError::Http {
                status: 500,
                url: "http://localhost/api".into()
            }
            .is_fetch_failure()
        );
        assert!(SeriesError::Timeout(Duration::from_secs(1)).is_fetch_failure());
        assert!(!SeriesError::UnknownSeries("faq".into()).is_fetch_failure());
        assert!(!SeriesError::InvalidParameter("max_size".into()).is_fetch_failure());
    }

    #[test]
    fn test_display() {
        let err = SeriesError::Http {
            status: 503,
            url: "http://localhost/api/blogs/count/2024".into(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP 503 for http://localhost/api/blogs/count/2024"
        );
    }
}
