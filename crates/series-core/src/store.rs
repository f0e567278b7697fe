//! Store trait for holding fetched monthly series.
//!
//! This module defines the [`SeriesStore`] trait that the yearly cache uses to
//! keep fetched series, keyed by series name and year.

use std::fmt::Debug;
use std::sync::Arc;

use crate::types::{MonthlySeries, SeriesName, Year};

/// Storage for fetched monthly series.
///
/// All operations are synchronous and run to completion without suspending,
/// so a lookup and the insert that may follow it never interleave with a
/// fetch. Implementations decide how many years each series may hold and
/// which entry to drop when that bound is reached.
pub trait SeriesStore: Send + Sync + Debug {
    /// Returns the stored series for `(series, year)`, if present.
    fn get(&self, series: &SeriesName, year: Year) -> Option<Arc<MonthlySeries>>;

    /// Returns true if `(series, year)` is stored.
    fn contains(&self, series: &SeriesName, year: Year) -> bool {
        self.get(series, year).is_some()
    }

    /// Stores `data` under `(series, year)`, replacing any previous value.
    ///
    /// Returns the year evicted from `series` to make room, if any.
    fn insert(&self, series: &SeriesName, year: Year, data: Arc<MonthlySeries>) -> Option<Year>;

    /// Returns the years held for `series`, oldest insertion first.
    fn years(&self, series: &SeriesName) -> Vec<Year>;

    /// Returns the number of years held for `series`.
    fn len(&self, series: &SeriesName) -> usize {
        self.years(series).len()
    }
}
