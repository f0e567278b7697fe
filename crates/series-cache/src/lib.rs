#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/series/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Store implementations for year-keyed monthly series.
//!
//! This crate provides implementations of the [`SeriesStore`] trait from `series-core`:
//!
//! - [`FifoStore`] - Bounded in-memory store with per-series FIFO eviction (default)
//! - [`NoopStore`] - No-op store that doesn't keep anything

/// In-memory bounded store implementation.
pub mod memory;
/// No-op store implementation.
pub mod noop;

// Re-export the trait for convenience
pub use series_core::SeriesStore;

// Re-export implementations
pub use memory::{DEFAULT_MAX_SIZE, FifoStore};
pub use noop::NoopStore;
