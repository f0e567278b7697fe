//! Calendar-year clocks.
//!
//! The cache never reads wall-clock time directly; it asks a [`YearClock`].
//! [`SystemClock`] reads the local calendar, [`FixedClock`] is set by hand.

use chrono::{Datelike, Local};
use std::fmt::Debug;
use std::sync::atomic::{AtomicI32, Ordering};

use crate::types::Year;

/// Source of the current calendar year.
pub trait YearClock: Send + Sync + Debug {
    /// Returns the current calendar year.
    fn current_year(&self) -> Year;
}

/// Clock reading the year from the local system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl YearClock for SystemClock {
    fn current_year(&self) -> Year {
        Local::now().year()
    }
}

/// Clock returning a manually controlled year.
///
/// The year can be changed through a shared reference, which lets tests move
/// across a year boundary while the cache holds the clock.
#[derive(Debug)]
pub struct FixedClock {
    year: AtomicI32,
}

impl FixedClock {
    /// Creates a clock fixed at `year`.
    #[must_use]
    pub const fn new(year: Year) -> Self {
        Self {
            year: AtomicI32::new(year),
        }
    }

    /// Moves the clock to `year`.
    pub fn set_year(&self, year: Year) {
        self.year.store(year, Ordering::Relaxed);
    }
}

impl YearClock for FixedClock {
    fn current_year(&self) -> Year {
        self.year.load(Ordering::Relaxed)
    }
}
