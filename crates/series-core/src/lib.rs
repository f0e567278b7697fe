#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/series/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for year-keyed monthly series.
//!
//! This crate provides the foundational abstractions behind the yearly cache:
//!
//! - [`YearFetcher`](fetcher::YearFetcher) - Loads one year of a series
//! - [`SeriesStore`](store::SeriesStore) - Holds fetched series
//! - [`YearClock`](clock::YearClock) - Supplies the current calendar year
//! - [`TaskSpawner`](spawn::TaskSpawner) - Runs detached background work
//! - [`YearWindow`](window::YearWindow) - Range of valid years

/// Calendar-year clocks.
pub mod clock;
/// Error types for series operations.
pub mod error;
/// Fetcher trait for loading series data.
pub mod fetcher;
/// Detached task spawning.
pub mod spawn;
/// Store trait for fetched series.
pub mod store;
/// Core data types (SeriesName, MonthlySeries, etc.).
pub mod types;
/// Year range definitions.
pub mod window;

// Re-export commonly used items at crate root
pub use clock::{FixedClock, SystemClock, YearClock};
pub use error::{Result, SeriesError};
pub use fetcher::{FnFetcher, YearFetcher, fetcher_fn};
pub use spawn::TaskSpawner;
pub use store::SeriesStore;
pub use types::{MONTHS_PER_YEAR, MonthlyDataPoint, MonthlySeries, SeriesName, Year};
pub use window::{DEFAULT_LOOKBACK_YEARS, YearWindow};
