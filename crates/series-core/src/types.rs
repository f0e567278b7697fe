//! Core data types for monthly count series.
//!
//! This module defines the fundamental data structures:
//!
//! - [`SeriesName`] - Identifier of an independent series ("blogs", "newsletters")
//! - [`Year`] - Calendar year used as the cache key within a series
//! - [`MonthlyDataPoint`] - Count reported for a single month
//! - [`MonthlySeries`] - Validated collection of monthly points for one year

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use crate::error::SeriesError;

/// A calendar year.
pub type Year = i32;

/// Number of months in a year.
pub const MONTHS_PER_YEAR: usize = 12;

/// Identifier of a series (e.g. `"blogs"`, `"newsletters"`).
///
/// Surrounding whitespace is trimmed on creation; case is preserved.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct SeriesName(String);

impl SeriesName {
    /// Creates a new series name, trimming surrounding whitespace.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        let s = s.into();
        let trimmed = s.trim();
        if trimmed.len() == s.len() {
            Self(s)
        } else {
            Self(trimmed.to_string())
        }
    }

    /// Returns the series name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SeriesName {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for SeriesName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SeriesName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl Borrow<str> for SeriesName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Count reported by the server for a single month.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthlyDataPoint {
    /// Month of the year, 1 (January) through 12 (December).
    pub month: u8,
    /// Number of items recorded in that month.
    pub count: u64,
}

impl MonthlyDataPoint {
    /// Creates a new data point. Month validity is checked when the point
    /// becomes part of a [`MonthlySeries`].
    #[must_use]
    pub const fn new(month: u8, count: u64) -> Self {
        Self { month, count }
    }

    /// Returns true if `month` lies in `1..=12`.
    #[must_use]
    pub const fn has_valid_month(&self) -> bool {
        self.month >= 1 && self.month as usize <= MONTHS_PER_YEAR
    }
}

/// Monthly counts for one year of one series.
///
/// Holds at most twelve points, one per month the server reported, in the
/// order they were reported. Months without activity may be absent; the
/// series never fills them in. Use [`MonthlySeries::dense`] for a
/// zero-filled rendering view.
///
/// Deserializes directly from the wire format, a JSON array of
/// `{"month": m, "count": n}` objects, rejecting invalid months and
/// duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<MonthlyDataPoint>", into = "Vec<MonthlyDataPoint>")]
pub struct MonthlySeries(Vec<MonthlyDataPoint>);

impl MonthlySeries {
    /// Creates a validated series from data points.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::Parse`] if a month lies outside `1..=12`, a
    /// month appears twice, or more than twelve points are supplied.
    pub fn new(points: Vec<MonthlyDataPoint>) -> Result<Self, SeriesError> {
        if points.len() > MONTHS_PER_YEAR {
            return Err(SeriesError::Parse(format!(
                "expected at most {MONTHS_PER_YEAR} monthly points, got {}",
                points.len()
            )));
        }

        let mut seen = [false; MONTHS_PER_YEAR];
        for point in &points {
            if !point.has_valid_month() {
                return Err(SeriesError::Parse(format!(
                    "month {} is outside 1..=12",
                    point.month
                )));
            }
            let slot = &mut seen[usize::from(point.month) - 1];
            if *slot {
                return Err(SeriesError::Parse(format!(
                    "month {} reported more than once",
                    point.month
                )));
            }
            *slot = true;
        }

        Ok(Self(points))
    }

    /// Creates an empty series.
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Returns the points in reported order.
    #[must_use]
    pub fn points(&self) -> &[MonthlyDataPoint] {
        &self.0
    }

    /// Returns the number of reported months.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no months were reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the points.
    pub fn iter(&self) -> impl Iterator<Item = &MonthlyDataPoint> {
        self.0.iter()
    }

    /// Returns the count reported for `month`, if any.
    #[must_use]
    pub fn count_for(&self, month: u8) -> Option<u64> {
        self.0.iter().find(|p| p.month == month).map(|p| p.count)
    }

    /// Sum of all reported counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.iter().map(|p| p.count).sum()
    }

    /// Zero-filled counts indexed by month (`[0]` is January).
    #[must_use]
    pub fn dense(&self) -> [u64; MONTHS_PER_YEAR] {
        let mut counts = [0u64; MONTHS_PER_YEAR];
        for point in &self.0 {
            counts[usize::from(point.month) - 1] = point.count;
        }
        counts
    }

    /// Consumes the series and returns the underlying points.
    #[must_use]
    pub fn into_inner(self) -> Vec<MonthlyDataPoint> {
        self.0
    }
}

impl TryFrom<Vec<MonthlyDataPoint>> for MonthlySeries {
    type Error = SeriesError;

    fn try_from(points: Vec<MonthlyDataPoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<MonthlySeries> for Vec<MonthlyDataPoint> {
    fn from(series: MonthlySeries) -> Self {
        series.0
    }
}

impl<'a> IntoIterator for &'a MonthlySeries {
    type Item = &'a MonthlyDataPoint;
    type IntoIter = std::slice::Iter<'a, MonthlyDataPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(pairs: &[(u8, u64)]) -> Vec<MonthlyDataPoint> {
        pairs
            .iter()
            .map(|&(m, c)| MonthlyDataPoint::new(m, c))
            .collect()
    }

    #[test]
    fn test_series_name_trims() {
        let name = SeriesName::new("  blogs ");
        assert_eq!(name.as_str(), "blogs");
        assert_eq!(name, SeriesName::from("blogs"));
        assert_eq!(name.to_string(), "blogs");
    }

    #[test]
    fn test_series_rejects_bad_months() {
        assert!(MonthlySeries::new(points(&[(0, 1)])).is_err());
        assert!(MonthlySeries::new(points(&[(13, 1)])).is_err());
        assert!(MonthlySeries::new(points(&[(3, 1), (3, 2)])).is_err());
        assert!(MonthlySeries::new(points(&[(1, 1), (12, 2)])).is_ok());
    }

    #[test]
    fn test_series_preserves_reported_order_and_gaps() {
        let series = MonthlySeries::new(points(&[(5, 7), (2, 3)])).unwrap();
        let months: Vec<u8> = series.iter().map(|p| p.month).collect();
        assert_eq!(months, vec![5, 2]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.count_for(2), Some(3));
        assert_eq!(series.count_for(1), None);
        assert_eq!(series.total(), 10);

        let dense = series.dense();
        assert_eq!(dense[1], 3);
        assert_eq!(dense[4], 7);
        assert_eq!(dense.iter().sum::<u64>(), 10);
        // The dense view does not alter the stored points
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_series_from_wire_json() {
        let json = r#"[{"month":1,"count":4},{"month":2,"count":0},{"month":11,"count":9}]"#;
        let series: MonthlySeries = serde_json::from_str(json).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.count_for(11), Some(9));

        let bad = r#"[{"month":14,"count":4}]"#;
        assert!(serde_json::from_str::<MonthlySeries>(bad).is_err());

        let negative = r#"[{"month":1,"count":-4}]"#;
        assert!(serde_json::from_str::<MonthlySeries>(negative).is_err());
    }
}
