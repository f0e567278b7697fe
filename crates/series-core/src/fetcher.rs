//! Fetcher trait for loading one year of a monthly series.
//!
//! A [`YearFetcher`] is the data source behind the cache: typically an HTTP
//! endpoint returning the monthly counts for a year. [`FnFetcher`] adapts a
//! plain async closure so hosts and tests can inject any source.

use async_trait::async_trait;
use std::fmt::{self, Debug};
use std::future::Future;

use crate::{
    error::Result,
    types::{MonthlySeries, SeriesName, Year},
};

/// Source of monthly series data, one calendar year at a time.
///
/// Implementations report every failure (transport, non-success status,
/// undecodable body) as an `Err`. Retries and timeouts, if wanted, belong
/// here or in a wrapper; the cache never retries.
#[async_trait]
pub trait YearFetcher: Send + Sync + Debug {
    /// Returns a short name for this fetcher, used in log fields.
    fn name(&self) -> &str;

    /// Fetches the monthly counts of `series` for `year`.
    async fn fetch_year(&self, series: &SeriesName, year: Year) -> Result<MonthlySeries>;
}

/// [`YearFetcher`] backed by an async closure.
pub struct FnFetcher<F> {
    name: String,
    f: F,
}

impl<F> Debug for FnFetcher<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFetcher")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<F, Fut> YearFetcher for FnFetcher<F>
where
    F: Fn(SeriesName, Year) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<MonthlySeries>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_year(&self, series: &SeriesName, year: Year) -> Result<MonthlySeries> {
        (self.f)(series.clone(), year).await
    }
}

/// Wraps an async closure as a named [`YearFetcher`].
///
/// ```
/// use series_core::{MonthlyDataPoint, MonthlySeries, YearFetcher, fetcher_fn};
///
/// let fetcher = fetcher_fn("static", |_series, _year| async {
///     MonthlySeries::new(vec![MonthlyDataPoint::new(1, 3)])
/// });
/// assert_eq!(fetcher.name(), "static");
/// ```
pub fn fetcher_fn<F, Fut>(name: impl Into<String>, f: F) -> FnFetcher<F>
where
    F: Fn(SeriesName, Year) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<MonthlySeries>> + Send + 'static,
{
    FnFetcher {
        name: name.into(),
        f,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SeriesError;
    use crate::types::MonthlyDataPoint;

    #[tokio::test]
    async fn test_fn_fetcher_passes_arguments() {
        let fetcher = fetcher_fn("echo", |series: SeriesName, year: Year| async move {
            if series.as_str() != "blogs" {
                return Err(SeriesError::UnknownSeries(series.to_string()));
            }
            MonthlySeries::new(vec![MonthlyDataPoint::new(1, year as u64)])
        });

        let series = fetcher
            .fetch_year(&SeriesName::new("blogs"), 2024)
            .await
            .unwrap();
        assert_eq!(series.count_for(1), Some(2024));

        let err = fetcher
            .fetch_year(&SeriesName::new("faq"), 2024)
            .await
            .unwrap_err();
        assert_eq!(err, SeriesError::UnknownSeries("faq".into()));
    }
}
