//! Construction-time configuration for [`CelledCounter`].
//!
//! A [`Config`] holds the two knobs of a counter: how many cells of history
//! are retained and how wide each cell is. The clock is passed separately to
//! [`CelledCounter::with_clock`] because it is a capability, not a value.
//!
//! # Examples
//!
//! ```rust
//! use celled_counter::config::Config;
//! use std::time::Duration;
//!
//! // Sixty one-second cells: a minute of per-second history.
//! const PER_SECOND: Config = Config::new()
//!     .with_cell_count(60)
//!     .with_slice_duration(Duration::from_secs(1));
//!
//! assert_eq!(PER_SECOND.cell_count, 60);
//! assert!(PER_SECOND.validate().is_ok());
//! ```
//!
//! [`CelledCounter`]: crate::counters::CelledCounter
//! [`CelledCounter::with_clock`]: crate::counters::CelledCounter::with_clock

use std::time::Duration;

use crate::counters::{DEFAULT_CELL_COUNT, DEFAULT_SLICE_DURATION};
use crate::error::{ConfigIssue, Result};

/// Cell count and slice width of a counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Number of archived slices retained in the ring buffer.
    pub cell_count: usize,
    /// Width of each slice.
    pub slice_duration: Duration,
}

impl Config {
    /// Creates the default configuration: 10 cells of 10 seconds each.
    pub const fn new() -> Self {
        Config {
            cell_count: DEFAULT_CELL_COUNT,
            slice_duration: DEFAULT_SLICE_DURATION,
        }
    }

    /// Sets the number of retained cells, returning `self` for chaining.
    pub const fn with_cell_count(self, cell_count: usize) -> Self {
        Self { cell_count, ..self }
    }

    /// Sets the slice width, returning `self` for chaining.
    pub const fn with_slice_duration(self, slice_duration: Duration) -> Self {
        Self {
            slice_duration,
            ..self
        }
    }

    /// Checks the configuration and returns the slice width in nanoseconds.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::InvalidConfiguration`] if the cell count is
    /// zero, the slice duration is zero, or the slice duration does not fit
    /// in a `u64` of nanoseconds.
    ///
    /// [`CounterError::InvalidConfiguration`]: crate::error::CounterError::InvalidConfiguration
    pub fn validate(&self) -> Result<u64> {
        if self.cell_count == 0 {
            return Err(ConfigIssue::ZeroCellCount.into());
        }
        if self.slice_duration.is_zero() {
            return Err(ConfigIssue::ZeroSliceDuration.into());
        }
        u64::try_from(self.slice_duration.as_nanos())
            .map_err(|_| ConfigIssue::SliceDurationTooLarge(self.slice_duration).into())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CounterError;

    #[test]
    fn test_default() {
        let config = Config::default();
        assert_eq!(config.cell_count, 10);
        assert_eq!(config.slice_duration, Duration::from_secs(10));
        assert_eq!(config.validate(), Ok(10_000_000_000));
    }

    #[test]
    fn test_builders() {
        let config = Config::new()
            .with_cell_count(3)
            .with_slice_duration(Duration::from_millis(250));
        assert_eq!(config.cell_count, 3);
        assert_eq!(config.validate(), Ok(250_000_000));
    }

    #[test]
    fn test_zero_cells_rejected() {
        let config = Config::new().with_cell_count(0);
        assert_eq!(
            config.validate(),
            Err(CounterError::InvalidConfiguration(ConfigIssue::ZeroCellCount))
        );
    }

    #[test]
    fn test_zero_duration_rejected() {
        let config = Config::new().with_slice_duration(Duration::ZERO);
        assert_eq!(
            config.validate(),
            Err(CounterError::InvalidConfiguration(
                ConfigIssue::ZeroSliceDuration
            ))
        );
    }

    #[test]
    fn test_oversized_duration_rejected() {
        let config = Config::new().with_slice_duration(Duration::MAX);
        assert_eq!(
            config.validate(),
            Err(CounterError::InvalidConfiguration(
                ConfigIssue::SliceDurationTooLarge(Duration::MAX)
            ))
        );
    }

    #[test]
    fn test_one_nanosecond_is_valid() {
        let config = Config::new().with_slice_duration(Duration::from_nanos(1));
        assert_eq!(config.validate(), Ok(1));
    }
}
