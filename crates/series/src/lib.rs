#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/series/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Year-keyed monthly series cache for dashboard charts.
//!
//! This crate re-exports the core types and store implementations, and
//! provides [`YearlySeriesCache`]: a bounded per-series cache that fetches on
//! a miss and pre-fetches the neighbouring years in the background.
//!
//! # Features
//!
//! - `http` - reqwest-backed [`HttpYearFetcher`] and the dashboard endpoint presets
//!
//! # Example
//!
//! ```rust,ignore
//! use series::{CacheConfig, SeriesName, YearlySeriesCache};
//!
//! #[tokio::main]
//! async fn main() -> series::Result<()> {
//!     let cache = YearlySeriesCache::builder()
//!         .with_config(CacheConfig::default().with_max_size(8))
//!         .with_dashboard_endpoints("https://admin.example.com")?
//!         .build()?;
//!
//!     let newsletters = SeriesName::new("newsletters");
//!     let series = cache.get(&newsletters, 2024).await?;
//!     println!("{:?}", series.dense());
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use series_core::*;

// Store implementations
pub use series_cache::{DEFAULT_MAX_SIZE, FifoStore, NoopStore};

// Fetchers
#[cfg(feature = "http")]
pub use series_http::{BLOGS_PATH, HttpYearFetcher, NEWSLETTERS_PATH};

mod config;
mod spawn;
mod stats;
mod timeout;
mod yearly;

pub use config::CacheConfig;
pub use spawn::TokioSpawner;
pub use stats::CacheStats;
pub use timeout::TimeoutFetcher;
pub use yearly::{BLOGS_SERIES, Lookup, NEWSLETTERS_SERIES, YearlySeriesCache, YearlySeriesCacheBuilder};
