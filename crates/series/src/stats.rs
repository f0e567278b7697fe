//! Cache counters.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time snapshot of cache activity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Requests served from the store.
    pub hits: u64,
    /// Requests that had to fetch.
    pub misses: u64,
    /// Foreground fetches that failed.
    pub fetch_failures: u64,
    /// Years stored by background pre-fetching. A pre-fetch that joins a
    /// fetch already in flight is counted by that fetch's owner instead.
    pub prefetched: u64,
    /// Background pre-fetches that failed and were discarded.
    pub prefetch_failures: u64,
    /// Years evicted to make room for newer ones.
    pub evictions: u64,
    /// Requests that joined a fetch already in flight.
    pub joined_in_flight: u64,
}

impl CacheStats {
    /// Fraction of requests served from the store, or 0.0 before any request.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    fetch_failures: AtomicU64,
    prefetched: AtomicU64,
    prefetch_failures: AtomicU64,
    evictions: AtomicU64,
    joined_in_flight: AtomicU64,
}

impl StatsRecorder {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_fetch_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_prefetched(&self) {
        self.prefetched.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_prefetch_failure(&self) {
        self.prefetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_joined(&self) {
        self.joined_in_flight.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            prefetched: self.prefetched.load(Ordering::Relaxed),
            prefetch_failures: self.prefetch_failures.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            joined_in_flight: self.joined_in_flight.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);

        let recorder = StatsRecorder::default();
        recorder.record_miss();
        recorder.record_hit();
        recorder.record_hit();
        recorder.record_hit();

        let stats = recorder.snapshot();
        assert_eq!(stats.hits, 3);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
    }
}
