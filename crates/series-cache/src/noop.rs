//! No-op store implementation.

use series_core::{MonthlySeries, SeriesName, SeriesStore, Year};
use std::sync::Arc;
use tracing::trace;

/// A no-op store that doesn't keep anything.
///
/// `get` always returns `None` and `insert` discards its input, so every
/// request is a miss. Useful for disabling caching or exercising fetch paths
/// without cache hits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

impl NoopStore {
    /// Create a new no-op store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SeriesStore for NoopStore {
    fn get(&self, _series: &SeriesName, _year: Year) -> Option<Arc<MonthlySeries>> {
        trace!("NoopStore: get called, returning None");
        None
    }

    fn insert(&self, _series: &SeriesName, _year: Year, _data: Arc<MonthlySeries>) -> Option<Year> {
        trace!("NoopStore: insert called, doing nothing");
        None
    }

    fn years(&self, _series: &SeriesName) -> Vec<Year> {
        Vec::new()
    }
}
