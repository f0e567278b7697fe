#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/series/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! HTTP fetcher for monthly count series.
//!
//! This crate provides [`HttpYearFetcher`], a [`YearFetcher`] that loads one
//! year of a series from a REST endpoint returning a JSON array of
//! `{"month": m, "count": n}` records.
//!
//! # Example
//!
//! ```no_run
//! use series_core::{SeriesName, YearFetcher};
//! use series_http::HttpYearFetcher;
//!
//! # async fn example() -> series_core::Result<()> {
//! let fetcher = HttpYearFetcher::blogs("https://admin.example.com")?;
//! let series = fetcher.fetch_year(&SeriesName::new("blogs"), 2024).await?;
//! println!("{} posts in 2024", series.total());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, header};
use series_core::{MonthlySeries, Result, SeriesError, SeriesName, Year, YearFetcher};
use tracing::{debug, instrument};

/// Path of the blog post counts endpoint.
pub const BLOGS_PATH: &str = "/api/blogs/count/{year}";

/// Path of the newsletter counts endpoint.
pub const NEWSLETTERS_PATH: &str = "/api/newsletters/counts/monthly/{year}";

/// Placeholder replaced by the requested year in path templates.
const YEAR_PLACEHOLDER: &str = "{year}";

/// Default HTTP request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fetches monthly counts from `<base_url><path_template>`, with `{year}`
/// substituted by the requested year.
///
/// Any non-success status is an error; `429 Too Many Requests` maps to
/// [`SeriesError::RateLimited`], honouring a numeric `Retry-After` header.
#[derive(Debug, Clone)]
pub struct HttpYearFetcher {
    client: reqwest::Client,
    base_url: String,
    path_template: String,
}

impl HttpYearFetcher {
    /// Create a fetcher with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the template
    /// lacks the `{year}` placeholder.
    pub fn new(base_url: impl Into<String>, path_template: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| SeriesError::Other(format!("Failed to create HTTP client: {e}")))?;

        Self::with_client(client, base_url, path_template)
    }

    /// Create a fetcher that shares an existing HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::InvalidParameter`] if the template lacks the
    /// `{year}` placeholder.
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        path_template: impl Into<String>,
    ) -> Result<Self> {
        let path_template = path_template.into();
        if !path_template.contains(YEAR_PLACEHOLDER) {
            return Err(SeriesError::InvalidParameter(format!(
                "path template {path_template:?} has no {YEAR_PLACEHOLDER} placeholder"
            )));
        }

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            path_template,
        })
    }

    /// Create a fetcher for the blog post counts endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn blogs(base_url: impl Into<String>) -> Result<Self> {
        Self::new(base_url, BLOGS_PATH)
    }

    /// Create a fetcher for the newsletter counts endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn newsletters(base_url: impl Into<String>) -> Result<Self> {
        Self::new(base_url, NEWSLETTERS_PATH)
    }

    /// Build the request URL for a year.
    #[must_use]
    pub fn build_url(&self, year: Year) -> String {
        format!(
            "{}{}",
            self.base_url,
            self.path_template
                .replace(YEAR_PLACEHOLDER, &year.to_string())
        )
    }
}

#[async_trait]
impl YearFetcher for HttpYearFetcher {
    fn name(&self) -> &str {
        &self.path_template
    }

    #[instrument(skip(self), fields(series = %series))]
    async fn fetch_year(&self, series: &SeriesName, year: Year) -> Result<MonthlySeries> {
        let url = self.build_url(year);
        debug!("Fetching monthly counts: {}", url);

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| SeriesError::Network(e.to_string()))?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(SeriesError::RateLimited { retry_after });
        }

        if !status.is_success() {
            return Err(SeriesError::Http {
                status: status.as_u16(),
                url,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SeriesError::Network(e.to_string()))?;

        let series: MonthlySeries =
            serde_json::from_slice(&body).map_err(|e| SeriesError::Parse(e.to_string()))?;

        debug!(months = series.len(), "Fetched monthly counts");
        Ok(series)
    }
}
