//! Year-keyed series cache with adjacent-year pre-fetching.

use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{self, BoxFuture, FutureExt, Shared};
use tracing::{debug, error, instrument, warn};

use series_cache::FifoStore;
use series_core::{
    MonthlySeries, Result, SeriesError, SeriesName, SeriesStore, SystemClock, TaskSpawner, Year,
    YearClock, YearFetcher,
};

use crate::config::CacheConfig;
use crate::spawn::TokioSpawner;
use crate::stats::{CacheStats, StatsRecorder};

/// Series name of the blog post counts.
pub const BLOGS_SERIES: &str = "blogs";

/// Series name of the newsletter counts.
pub const NEWSLETTERS_SERIES: &str = "newsletters";

type SeriesKey = (SeriesName, Year);
type SharedFetch = Shared<BoxFuture<'static, Result<Arc<MonthlySeries>>>>;

/// A fetch handed out by [`Inner::load`].
struct Load {
    result: BoxFuture<'static, Result<Arc<MonthlySeries>>>,
    /// True if the fetch was already in flight for another caller.
    joined: bool,
}

/// Outcome of [`YearlySeriesCache::request`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    /// The series was cached and is returned immediately.
    Ready(Arc<MonthlySeries>),
    /// The series is being fetched; the callback receives the result.
    Pending,
}

/// Cache of monthly series keyed by series name and year.
///
/// Serves stored series without touching the data source, fetches on a miss
/// and stores only successful results. After a successful miss-fetch it
/// schedules a background pre-fetch of the previous and next year, limited to
/// the valid window `[current - lookback, current]`. Pre-fetched years never
/// trigger further pre-fetching, and pre-fetch failures are logged and
/// discarded.
///
/// Clones share the same underlying cache.
///
/// # Example
///
/// ```rust,ignore
/// use series::{SeriesName, YearlySeriesCache};
///
/// let cache = YearlySeriesCache::builder()
///     .with_dashboard_endpoints("https://admin.example.com")?
///     .build()?;
///
/// let blogs = SeriesName::new("blogs");
/// let series = cache.get(&blogs, cache.current_year()).await?;
/// println!("{} posts this year", series.total());
/// ```
#[derive(Clone)]
pub struct YearlySeriesCache {
    inner: Arc<Inner>,
}

struct Inner {
    config: CacheConfig,
    fetchers: HashMap<SeriesName, Arc<dyn YearFetcher>>,
    store: Arc<dyn SeriesStore>,
    clock: Arc<dyn YearClock>,
    spawner: Arc<dyn TaskSpawner>,
    in_flight: Mutex<HashMap<SeriesKey, SharedFetch>>,
    stats: StatsRecorder,
}

impl std::fmt::Debug for YearlySeriesCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut series = self.inner.fetchers.keys().collect::<Vec<_>>();
        series.sort();
        f.debug_struct("YearlySeriesCache")
            .field("config", &self.inner.config)
            .field("series", &series)
            .field("store", &self.inner.store)
            .field("clock", &self.inner.clock)
            .field("spawner", &self.inner.spawner)
            .finish()
    }
}

impl YearlySeriesCache {
    /// Start building a cache.
    #[must_use]
    pub fn builder() -> YearlySeriesCacheBuilder {
        YearlySeriesCacheBuilder::default()
    }

    /// Return the monthly series of `series` for `year`.
    ///
    /// A cached series is returned without fetching. Otherwise the series'
    /// fetcher is called; a successful result is stored and triggers a
    /// background pre-fetch of the adjacent years. A failed fetch stores
    /// nothing and any previously cached years stay as they were.
    ///
    /// The year itself is not range-checked.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::UnknownSeries`] if no fetcher is registered for
    /// `series`, or the fetcher's error on a failed miss-fetch.
    #[instrument(skip(self), fields(series = %series))]
    pub async fn get(&self, series: &SeriesName, year: Year) -> Result<Arc<MonthlySeries>> {
        let fetcher = self.inner.fetcher(series)?;

        if let Some(hit) = self.inner.store.get(series, year) {
            self.inner.stats.record_hit();
            debug!("Cache hit");
            return Ok(hit);
        }

        self.inner.stats.record_miss();
        debug!(fetcher = fetcher.name(), "Cache miss, fetching");

        match self.inner.load(series, year, fetcher).result.await {
            Ok(data) => {
                self.schedule_prefetch(series, year);
                Ok(data)
            }
            Err(e) => {
                self.inner.stats.record_fetch_failure();
                warn!(error = %e, "Fetch failed, nothing cached");
                Err(e)
            }
        }
    }

    /// Return the cached series for `(series, year)` without fetching.
    #[must_use]
    pub fn peek(&self, series: &SeriesName, year: Year) -> Option<Arc<MonthlySeries>> {
        self.inner.store.get(series, year)
    }

    /// Request a series for rendering.
    ///
    /// On a hit the data is returned as [`Lookup::Ready`] and `on_ready` is
    /// not called. On a miss a background task performs [`get`](Self::get)
    /// and hands its result to `on_ready`; the caller gets
    /// [`Lookup::Pending`] and should keep showing whatever it displayed
    /// before, including when the result turns out to be an error.
    pub fn request<F>(&self, series: &SeriesName, year: Year, on_ready: F) -> Lookup
    where
        F: FnOnce(Result<Arc<MonthlySeries>>) + Send + 'static,
    {
        if let Some(hit) = self.inner.store.get(series, year) {
            self.inner.stats.record_hit();
            return Lookup::Ready(hit);
        }

        let cache = self.clone();
        let series = series.clone();
        self.inner.spawner.spawn(
            async move {
                let result = cache.get(&series, year).await;
                on_ready(result);
            }
            .boxed(),
        );
        Lookup::Pending
    }

    /// The current calendar year according to the cache's clock.
    #[must_use]
    pub fn current_year(&self) -> Year {
        self.inner.clock.current_year()
    }

    /// Years a year-picker should offer, newest first.
    #[must_use]
    pub fn selectable_years(&self) -> Vec<Year> {
        self.inner.config.window(self.current_year()).years().collect()
    }

    /// Years currently cached for `series`, oldest insertion first.
    #[must_use]
    pub fn cached_years(&self, series: &SeriesName) -> Vec<Year> {
        self.inner.store.years(series)
    }

    /// Registered series names, sorted.
    #[must_use]
    pub fn series(&self) -> Vec<SeriesName> {
        let mut names: Vec<SeriesName> = self.inner.fetchers.keys().cloned().collect();
        names.sort();
        names
    }

    /// The configuration the cache was built with.
    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    /// Snapshot of the cache counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.inner.stats.snapshot()
    }

    fn schedule_prefetch(&self, series: &SeriesName, year: Year) {
        if !self.inner.config.prefetch {
            return;
        }

        debug!(series = %series, year, "Scheduling adjacent-year prefetch");
        let inner = Arc::clone(&self.inner);
        let series = series.clone();
        self.inner.spawner.spawn(
            async move {
                inner.prefetch_adjacent(&series, year).await;
            }
            .boxed(),
        );
    }
}

impl Inner {
    fn fetcher(&self, series: &SeriesName) -> Result<Arc<dyn YearFetcher>> {
        self.fetchers
            .get(series)
            .cloned()
            .ok_or_else(|| SeriesError::UnknownSeries(series.to_string()))
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, HashMap<SeriesKey, SharedFetch>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch and store `(series, year)`, joining a fetch already in flight
    /// for the same key when deduplication is enabled.
    fn load(
        self: &Arc<Self>,
        series: &SeriesName,
        year: Year,
        fetcher: Arc<dyn YearFetcher>,
    ) -> Load {
        if !self.config.dedupe_in_flight {
            let inner = Arc::clone(self);
            let series = series.clone();
            return Load {
                result: async move {
                    inner
                        .fetch_and_store(&series, year, fetcher.as_ref())
                        .await
                }
                .boxed(),
                joined: false,
            };
        }

        let key = (series.clone(), year);
        let mut in_flight = self.lock_in_flight();

        if let Some(pending) = in_flight.get(&key) {
            self.stats.record_joined();
            debug!(series = %series, year, "Joining in-flight fetch");
            return Load {
                result: pending.clone().boxed(),
                joined: true,
            };
        }

        let inner = Arc::clone(self);
        let fetch_key = key.clone();
        let shared = async move {
            let (series, year) = &fetch_key;
            let result = inner.fetch_and_store(series, *year, fetcher.as_ref()).await;
            inner.lock_in_flight().remove(&fetch_key);
            result
        }
        .boxed()
        .shared();

        in_flight.insert(key, shared.clone());
        Load {
            result: shared.boxed(),
            joined: false,
        }
    }

    async fn fetch_and_store(
        &self,
        series: &SeriesName,
        year: Year,
        fetcher: &dyn YearFetcher,
    ) -> Result<Arc<MonthlySeries>> {
        // A panic fails this fetch like any other error
        let fetched = AssertUnwindSafe(fetcher.fetch_year(series, year))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| {
                let reason = panic_message(payload.as_ref());
                error!(
                    fetcher = fetcher.name(),
                    series = %series,
                    year,
                    reason,
                    "Fetcher panicked"
                );
                Err(SeriesError::Other(format!(
                    "fetcher `{}` panicked: {reason}",
                    fetcher.name()
                )))
            });
        let data = Arc::new(fetched?);

        if let Some(evicted) = self.store.insert(series, year, Arc::clone(&data)) {
            self.stats.record_eviction();
            debug!(series = %series, year, evicted, "Evicted year to make room");
        }

        Ok(data)
    }

    /// Fetch the years either side of `year` that fall inside the valid
    /// window and are not cached yet. Runs detached; errors stop here.
    ///
    /// A neighbour already being fetched by someone else is joined but not
    /// counted, since its owner records the outcome.
    async fn prefetch_adjacent(self: &Arc<Self>, series: &SeriesName, year: Year) {
        let Ok(fetcher) = self.fetcher(series) else {
            return;
        };

        // Window is taken when the task runs, not when it was scheduled
        let window = self.config.window(self.clock.current_year());

        let loads = [year.checked_add(1), year.checked_sub(1)]
            .into_iter()
            .flatten()
            .filter(|&candidate| window.contains(candidate))
            .filter(|&candidate| !self.store.contains(series, candidate))
            .map(|candidate| {
                let load = self.load(series, candidate, Arc::clone(&fetcher));
                async move { (candidate, load.joined, load.result.await) }
            });

        for (candidate, joined, result) in future::join_all(loads).await {
            match result {
                _ if joined => {
                    debug!(
                        series = %series,
                        year = candidate,
                        "Prefetch joined an in-flight fetch"
                    );
                }
                Ok(_) => {
                    self.stats.record_prefetched();
                    debug!(series = %series, year = candidate, "Prefetched year");
                }
                Err(e) => {
                    self.stats.record_prefetch_failure();
                    warn!(
                        series = %series,
                        year = candidate,
                        error = %e,
                        "Prefetch failed, discarding"
                    );
                }
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

/// Builder for [`YearlySeriesCache`].
///
/// Defaults: [`CacheConfig::default`], a [`FifoStore`] sized by the config,
/// the [`SystemClock`] and a [`TokioSpawner`].
#[derive(Debug, Default)]
pub struct YearlySeriesCacheBuilder {
    config: CacheConfig,
    fetchers: HashMap<SeriesName, Arc<dyn YearFetcher>>,
    store: Option<Arc<dyn SeriesStore>>,
    clock: Option<Arc<dyn YearClock>>,
    spawner: Option<Arc<dyn TaskSpawner>>,
}

impl YearlySeriesCacheBuilder {
    /// Set the cache configuration.
    #[must_use]
    pub fn with_config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    /// Register the fetcher for a series, replacing any previous one.
    pub fn register(&mut self, series: impl Into<SeriesName>, fetcher: Arc<dyn YearFetcher>) {
        let series = series.into();
        debug!(series = %series, fetcher = fetcher.name(), "Registering series fetcher");
        self.fetchers.insert(series, fetcher);
    }

    /// Register the fetcher for a series.
    #[must_use]
    pub fn with_fetcher<F>(mut self, series: impl Into<SeriesName>, fetcher: F) -> Self
    where
        F: YearFetcher + 'static,
    {
        self.register(series, Arc::new(fetcher));
        self
    }

    /// Register a shared fetcher for a series.
    #[must_use]
    pub fn with_shared_fetcher(
        mut self,
        series: impl Into<SeriesName>,
        fetcher: Arc<dyn YearFetcher>,
    ) -> Self {
        self.register(series, fetcher);
        self
    }

    /// Use a custom store. `max_size` from the config is then not applied.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn SeriesStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Use a custom clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn YearClock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Use a custom spawner for background tasks.
    #[must_use]
    pub fn with_spawner(mut self, spawner: Arc<dyn TaskSpawner>) -> Self {
        self.spawner = Some(spawner);
        self
    }

    /// Register HTTP fetchers for the dashboard's blog and newsletter
    /// count endpoints under `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    #[cfg(feature = "http")]
    pub fn with_dashboard_endpoints(mut self, base_url: &str) -> Result<Self> {
        self.register(
            BLOGS_SERIES,
            Arc::new(series_http::HttpYearFetcher::blogs(base_url)?),
        );
        self.register(
            NEWSLETTERS_SERIES,
            Arc::new(series_http::HttpYearFetcher::newsletters(base_url)?),
        );
        Ok(self)
    }

    /// Build the cache.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::InvalidParameter`] if the configuration is
    /// invalid or no series is registered.
    pub fn build(self) -> Result<YearlySeriesCache> {
        self.config.validate()?;

        if self.fetchers.is_empty() {
            return Err(SeriesError::InvalidParameter(
                "at least one series fetcher must be registered".to_string(),
            ));
        }

        let store = match self.store {
            Some(store) => store,
            None => Arc::new(FifoStore::new(self.config.max_size)?),
        };

        Ok(YearlySeriesCache {
            inner: Arc::new(Inner {
                config: self.config,
                fetchers: self.fetchers,
                store,
                clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
                spawner: self
                    .spawner
                    .unwrap_or_else(|| Arc::new(TokioSpawner::new())),
                in_flight: Mutex::new(HashMap::new()),
                stats: StatsRecorder::default(),
            }),
        })
    }
}
