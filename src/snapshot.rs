//! Owned view of a counter's recent history.
//!
//! A [`History`] captures the result of
//! [`CelledCounter::snapshot`](crate::counters::CelledCounter::snapshot): the
//! archived cells (most recent first) along with the counter name and slice
//! width needed to turn them into a rate.
//!
//! # Feature Flag
//!
//! With the `serde` feature, `History` implements `Serialize` and
//! `Deserialize`:
//!
//! ```toml
//! [dependencies]
//! celled-counter = { version = "0.1", features = ["serde"] }
//! ```
//!
//! ```rust,ignore
//! let history = counter.snapshot(6);
//! let json = serde_json::to_string(&history)?;
//! // {"name":"requests","slice_nanos":10000000000,"cells":[12,9,0,3,7,4]}
//! ```

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The last few archived slices of a counter, most recent first.
///
/// # Examples
///
/// ```rust
/// use celled_counter::snapshot::History;
/// use std::time::Duration;
///
/// let history = History::new("requests", Duration::from_secs(10), vec![30, 10, 20]);
///
/// assert_eq!(history.total(), 60);
/// assert_eq!(history.rate_per_second(), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct History {
    name: String,
    slice_nanos: u64,
    cells: Vec<i64>,
}

impl History {
    /// Creates a history from cells ordered most recent first.
    ///
    /// Slice widths beyond `u64::MAX` nanoseconds are clamped.
    pub fn new(name: impl Into<String>, slice_duration: Duration, cells: Vec<i64>) -> Self {
        Self {
            name: name.into(),
            slice_nanos: u64::try_from(slice_duration.as_nanos()).unwrap_or(u64::MAX),
            cells,
        }
    }

    /// Returns the name of the counter this history came from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the width of one cell.
    pub fn slice_duration(&self) -> Duration {
        Duration::from_nanos(self.slice_nanos)
    }

    /// Returns the cells, most recent first.
    pub fn cells(&self) -> &[i64] {
        &self.cells
    }

    /// Returns the time span covered by all cells.
    pub fn window(&self) -> Duration {
        self.slice_duration()
            .saturating_mul(u32::try_from(self.cells.len()).unwrap_or(u32::MAX))
    }

    /// Returns the sum of all cells, saturating at `i64::MAX`.
    pub fn total(&self) -> i64 {
        self.cells.iter().fold(0i64, |acc, v| acc.saturating_add(*v))
    }

    /// Returns the average events per second over the whole window.
    ///
    /// An empty history has a rate of `0.0`.
    pub fn rate_per_second(&self) -> f64 {
        let secs = self.window().as_secs_f64();
        if secs > 0.0 {
            self.total() as f64 / secs
        } else {
            0.0
        }
    }

    /// Returns the events per second of each cell, most recent first.
    pub fn rates_per_second(&self) -> Vec<f64> {
        let secs = self.slice_duration().as_secs_f64();
        self.cells
            .iter()
            .map(|v| if secs > 0.0 { *v as f64 / secs } else { 0.0 })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let history = History::new("test", Duration::from_millis(500), vec![1, 2]);
        assert_eq!(history.name(), "test");
        assert_eq!(history.slice_duration(), Duration::from_millis(500));
        assert_eq!(history.cells(), &[1, 2]);
        assert_eq!(history.window(), Duration::from_secs(1));
    }

    #[test]
    fn test_empty() {
        let history = History::new("", Duration::from_secs(1), vec![]);
        assert_eq!(history.total(), 0);
        assert_eq!(history.rate_per_second(), 0.0);
        assert!(history.rates_per_second().is_empty());
    }

    #[test]
    fn test_total_saturates() {
        let history = History::new("big", Duration::from_secs(1), vec![i64::MAX, 1]);
        assert_eq!(history.total(), i64::MAX);
    }

    #[test]
    fn test_rates_per_second() {
        let history = History::new("r", Duration::from_millis(250), vec![5, 0, 1]);
        assert_eq!(history.rates_per_second(), vec![20.0, 0.0, 4.0]);
        assert_eq!(history.rate_per_second(), 8.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize() {
        let history = History::new("requests", Duration::from_secs(10), vec![3, 1]);
        let json = serde_json::to_string(&history).unwrap();
        assert_eq!(
            json,
            r#"{"name":"requests","slice_nanos":10000000000,"cells":[3,1]}"#
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize() {
        let json = r#"{"name":"a","slice_nanos":1000,"cells":[7,0,2]}"#;
        let history: History = serde_json::from_str(json).unwrap();
        assert_eq!(history.name(), "a");
        assert_eq!(history.slice_duration(), Duration::from_micros(1));
        assert_eq!(history.total(), 9);
    }
}
