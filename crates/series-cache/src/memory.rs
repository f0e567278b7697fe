//! In-memory bounded store implementation.

use series_core::{MonthlySeries, Result, SeriesError, SeriesName, SeriesStore, Year};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, instrument};

/// Default number of years held per series.
pub const DEFAULT_MAX_SIZE: usize = 5;

/// Years held for one series, with their insertion order.
#[derive(Debug, Default)]
struct YearSlots {
    order: VecDeque<Year>,
    entries: HashMap<Year, Arc<MonthlySeries>>,
}

/// Bounded in-memory store with first-in, first-out eviction per series.
///
/// Each series holds at most `max_size` years. Inserting a new year into a
/// full series evicts the year that was inserted earliest, regardless of how
/// often or how recently it was read. Replacing an existing year keeps its
/// original position and evicts nothing. Series never share capacity.
///
/// Data is lost when the store is dropped.
#[derive(Debug)]
pub struct FifoStore {
    max_size: usize,
    series: RwLock<HashMap<SeriesName, YearSlots>>,
}

impl FifoStore {
    /// Create a store holding up to `max_size` years per series.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::InvalidParameter`] if `max_size` is zero.
    pub fn new(max_size: usize) -> Result<Self> {
        if max_size == 0 {
            return Err(SeriesError::InvalidParameter(
                "max_size must be at least 1".to_string(),
            ));
        }

        Ok(Self::with_capacity(max_size))
    }

    fn with_capacity(max_size: usize) -> Self {
        Self {
            max_size,
            series: RwLock::new(HashMap::new()),
        }
    }

    /// Maximum number of years held per series.
    #[must_use]
    pub const fn max_size(&self) -> usize {
        self.max_size
    }

    // A panic while holding the lock cannot leave the maps half-updated in a
    // way later readers care about, so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<SeriesName, YearSlots>> {
        self.series.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<SeriesName, YearSlots>> {
        self.series.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for FifoStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_SIZE)
    }
}

impl SeriesStore for FifoStore {
    fn get(&self, series: &SeriesName, year: Year) -> Option<Arc<MonthlySeries>> {
        self.read()
            .get(series)
            .and_then(|slots| slots.entries.get(&year))
            .cloned()
    }

    fn contains(&self, series: &SeriesName, year: Year) -> bool {
        self.read()
            .get(series)
            .is_some_and(|slots| slots.entries.contains_key(&year))
    }

    #[instrument(skip(self, data), fields(series = %series, months = data.len()))]
    fn insert(&self, series: &SeriesName, year: Year, data: Arc<MonthlySeries>) -> Option<Year> {
        let mut map = self.write();
        let slots = map.entry(series.clone()).or_default();

        if let Some(existing) = slots.entries.get_mut(&year) {
            *existing = data;
            debug!("Replaced cached series");
            return None;
        }

        let mut evicted = None;
        if slots.order.len() >= self.max_size {
            if let Some(oldest) = slots.order.pop_front() {
                slots.entries.remove(&oldest);
                debug!(evicted = oldest, "Evicted oldest cached year");
                evicted = Some(oldest);
            }
        }

        slots.order.push_back(year);
        slots.entries.insert(year, data);
        debug!(held = slots.order.len(), "Cached series");
        evicted
    }

    fn years(&self, series: &SeriesName) -> Vec<Year> {
        self.read()
            .get(series)
            .map(|slots| slots.order.iter().copied().collect())
            .unwrap_or_default()
    }

    fn len(&self, series: &SeriesName) -> usize {
        self.read().get(series).map_or(0, |slots| slots.order.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use series_core::MonthlyDataPoint;

    fn series_with(count: u64) -> Arc<MonthlySeries> {
        Arc::new(MonthlySeries::new(vec![MonthlyDataPoint::new(1, count)]).unwrap())
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            FifoStore::new(0),
            Err(SeriesError::InvalidParameter(_))
        ));
        assert_eq!(FifoStore::default().max_size(), DEFAULT_MAX_SIZE);
    }

    #[test]
    fn test_default_matches_default_capacity() {
        let store = FifoStore::default();
        let blogs = SeriesName::new("blogs");

        for year in 2020..2020 + DEFAULT_MAX_SIZE as i32 {
            assert_eq!(store.insert(&blogs, year, series_with(year as u64)), None);
        }
        assert_eq!(store.insert(&blogs, 2030, series_with(2030)), Some(2020));
        assert_eq!(store.len(&blogs), DEFAULT_MAX_SIZE);
    }

    #[test]
    fn test_evicts_earliest_inserted_year() {
        let store = FifoStore::new(5).unwrap();
        let blogs = SeriesName::new("blogs");

        for year in 2020..=2024 {
            assert_eq!(store.insert(&blogs, year, series_with(year as u64)), None);
        }
        assert_eq!(store.insert(&blogs, 2025, series_with(2025)), Some(2020));

        assert_eq!(store.len(&blogs), 5);
        assert!(!store.contains(&blogs, 2020));
        assert_eq!(store.years(&blogs), vec![2021, 2022, 2023, 2024, 2025]);
    }

    #[test]
    fn test_reads_do_not_affect_eviction_order() {
        let store = FifoStore::new(2).unwrap();
        let blogs = SeriesName::new("blogs");

        store.insert(&blogs, 2020, series_with(1));
        store.insert(&blogs, 2021, series_with(2));
        for _ in 0..10 {
            assert!(store.get(&blogs, 2020).is_some());
        }

        assert_eq!(store.insert(&blogs, 2022, series_with(3)), Some(2020));
        assert_eq!(store.years(&blogs), vec![2021, 2022]);
    }

    #[test]
    fn test_replace_keeps_position_and_evicts_nothing() {
        let store = FifoStore::new(2).unwrap();
        let blogs = SeriesName::new("blogs");

        store.insert(&blogs, 2020, series_with(1));
        store.insert(&blogs, 2021, series_with(2));
        assert_eq!(store.insert(&blogs, 2020, series_with(9)), None);

        assert_eq!(store.years(&blogs), vec![2020, 2021]);
        assert_eq!(store.get(&blogs, 2020).unwrap().count_for(1), Some(9));
    }

    #[test]
    fn test_series_do_not_share_capacity() {
        let store = FifoStore::new(2).unwrap();
        let blogs = SeriesName::new("blogs");
        let newsletters = SeriesName::new("newsletters");

        store.insert(&newsletters, 2024, series_with(7));
        for year in 2018..=2024 {
            store.insert(&blogs, year, series_with(1));
        }

        assert_eq!(store.len(&blogs), 2);
        assert_eq!(store.years(&newsletters), vec![2024]);
        assert_eq!(store.get(&newsletters, 2024).unwrap().count_for(1), Some(7));
    }

    #[test]
    fn test_unknown_series_is_empty() {
        let store = FifoStore::default();
        let faq = SeriesName::new("faq");
        assert!(store.get(&faq, 2024).is_none());
        assert!(store.years(&faq).is_empty());
        assert_eq!(store.len(&faq), 0);
    }
}
