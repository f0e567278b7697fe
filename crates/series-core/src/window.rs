//! Range of years a dashboard offers and pre-fetches.
//!
//! This module defines [`YearWindow`], the inclusive span
//! `[current - lookback, current]`.

use serde::{Deserialize, Serialize};

use crate::types::Year;

/// Default number of past years kept selectable.
pub const DEFAULT_LOOKBACK_YEARS: u16 = 10;

/// Inclusive range of valid years ending at the current year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearWindow {
    earliest: Year,
    latest: Year,
}

impl YearWindow {
    /// Creates the window `[current - lookback, current]`.
    #[must_use]
    pub const fn ending_at(current: Year, lookback: u16) -> Self {
        Self {
            earliest: current.saturating_sub(lookback as Year),
            latest: current,
        }
    }

    /// Oldest year in the window.
    #[must_use]
    pub const fn earliest(&self) -> Year {
        self.earliest
    }

    /// Newest year in the window (the current year).
    #[must_use]
    pub const fn latest(&self) -> Year {
        self.latest
    }

    /// Returns true if `year` lies within the window.
    #[must_use]
    pub const fn contains(&self, year: Year) -> bool {
        year >= self.earliest && year <= self.latest
    }

    /// Years in the window, newest first.
    pub fn years(&self) -> impl Iterator<Item = Year> + use<> {
        (self.earliest..=self.latest).rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_bounds() {
        let window = YearWindow::ending_at(2025, DEFAULT_LOOKBACK_YEARS);
        assert_eq!(window.earliest(), 2015);
        assert_eq!(window.latest(), 2025);
        assert!(window.contains(2015));
        assert!(window.contains(2025));
        assert!(!window.contains(2014));
        assert!(!window.contains(2026));
    }

    #[test]
    fn test_window_years_newest_first() {
        let years: Vec<Year> = YearWindow::ending_at(2025, 2).years().collect();
        assert_eq!(years, vec![2025, 2024, 2023]);
    }
}
