//! Timeout wrapper for fetchers.

use std::time::Duration;

use async_trait::async_trait;
use series_core::{MonthlySeries, Result, SeriesError, SeriesName, Year, YearFetcher};
use tracing::warn;

/// Fails a fetch with [`SeriesError::Timeout`] once it runs longer than a
/// fixed duration.
///
/// The cache itself never times out a request: a fetch that never settles
/// leaves its caller waiting. Wrap the fetcher before registering it when a
/// bound is needed.
#[derive(Debug)]
pub struct TimeoutFetcher<F> {
    inner: F,
    timeout: Duration,
}

impl<F> TimeoutFetcher<F> {
    /// Wrap `inner`, bounding each fetch to `timeout`.
    #[must_use]
    pub const fn new(inner: F, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// Returns the configured timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl<F: YearFetcher> YearFetcher for TimeoutFetcher<F> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn fetch_year(&self, series: &SeriesName, year: Year) -> Result<MonthlySeries> {
        match tokio::time::timeout(self.timeout, self.inner.fetch_year(series, year)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    fetcher = self.inner.name(),
                    series = %series,
                    year,
                    "Fetch timed out after {:?}",
                    self.timeout
                );
                Err(SeriesError::Timeout(self.timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use series_core::{MonthlyDataPoint, fetcher_fn};

    #[tokio::test]
    async fn test_slow_fetch_times_out() {
        let slow = fetcher_fn("slow", |_series, _year| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, SeriesError>(MonthlySeries::empty())
        });
        let fetcher = TimeoutFetcher::new(slow, Duration::from_millis(20));

        let err = fetcher
            .fetch_year(&SeriesName::new("blogs"), 2024)
            .await
            .unwrap_err();
        assert_eq!(err, SeriesError::Timeout(Duration::from_millis(20)));
    }

    #[tokio::test]
    async fn test_fast_fetch_passes_through() {
        let fast = fetcher_fn("fast", |_series, _year| async {
            MonthlySeries::new(vec![MonthlyDataPoint::new(6, 2)])
        });
        let fetcher = TimeoutFetcher::new(fast, Duration::from_secs(1));

        let series = fetcher
            .fetch_year(&SeriesName::new("blogs"), 2024)
            .await
            .unwrap();
        assert_eq!(series.count_for(6), Some(2));
        assert_eq!(fetcher.name(), "fast");
    }
}
