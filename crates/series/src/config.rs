//! Cache configuration.

use serde::{Deserialize, Serialize};

use series_cache::DEFAULT_MAX_SIZE;
use series_core::{DEFAULT_LOOKBACK_YEARS, Result, SeriesError, Year, YearWindow};

/// Settings for a [`YearlySeriesCache`](crate::YearlySeriesCache).
///
/// Every field has a default, so a host can embed this in its own config
/// file and set only what it needs:
///
/// ```
/// use series::CacheConfig;
///
/// let config: CacheConfig = serde_json::from_str(r#"{ "max_size": 8 }"#).unwrap();
/// assert_eq!(config.max_size, 8);
/// assert!(config.prefetch);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Years held per series before the earliest-inserted one is evicted.
    pub max_size: usize,
    /// How many years before the current one are selectable and pre-fetchable.
    pub lookback_years: u16,
    /// Whether a successful miss-fetch pre-fetches the neighbouring years.
    pub prefetch: bool,
    /// Whether concurrent misses for the same series and year share one fetch.
    pub dedupe_in_flight: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            lookback_years: DEFAULT_LOOKBACK_YEARS,
            prefetch: true,
            dedupe_in_flight: true,
        }
    }
}

impl CacheConfig {
    /// Create a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of years held per series.
    #[must_use]
    pub const fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the number of past years in the valid window.
    #[must_use]
    pub const fn with_lookback_years(mut self, lookback_years: u16) -> Self {
        self.lookback_years = lookback_years;
        self
    }

    /// Enable or disable adjacent-year pre-fetching.
    #[must_use]
    pub const fn with_prefetch(mut self, prefetch: bool) -> Self {
        self.prefetch = prefetch;
        self
    }

    /// Enable or disable sharing of in-flight fetches.
    #[must_use]
    pub const fn with_dedupe_in_flight(mut self, dedupe_in_flight: bool) -> Self {
        self.dedupe_in_flight = dedupe_in_flight;
        self
    }

    /// Check that the settings are usable.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::InvalidParameter`] if `max_size` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(SeriesError::InvalidParameter(
                "max_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Valid year window for the given current year.
    #[must_use]
    pub const fn window(&self, current: Year) -> YearWindow {
        YearWindow::ending_at(current, self.lookback_years)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.max_size, 5);
        assert_eq!(config.lookback_years, 10);
        assert!(config.prefetch);
        assert!(config.dedupe_in_flight);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: CacheConfig =
            serde_json::from_str(r#"{ "prefetch": false, "lookback_years": 3 }"#).unwrap();
        assert!(!config.prefetch);
        assert_eq!(config.lookback_years, 3);
        assert_eq!(config.max_size, 5);
        assert_eq!(config.window(2025).earliest(), 2022);
    }

    #[test]
    fn test_zero_max_size_rejected() {
        let config = CacheConfig::new().with_max_size(0);
        assert!(matches!(
            config.validate(),
            Err(SeriesError::InvalidParameter(_))
        ));
    }
}
