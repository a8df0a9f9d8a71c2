//! Error types for counter construction.
//!
//! Counting itself never fails: [`mark`](crate::counters::CelledCounter::mark)
//! and [`get_last`](crate::counters::CelledCounter::get_last) return plain
//! values. The only fallible step is building a counter from a [`Config`],
//! which is rejected up front when the ring buffer or slice width would make
//! the advance arithmetic meaningless.
//!
//! # Example
//!
//! ```rust
//! use celled_counter::config::Config;
//! use celled_counter::counters::CelledCounter;
//! use celled_counter::error::{ConfigIssue, CounterError};
//!
//! let err = CelledCounter::with_config(Config::new().with_cell_count(0)).unwrap_err();
//! assert_eq!(err, CounterError::InvalidConfiguration(ConfigIssue::ZeroCellCount));
//! ```
//!
//! [`Config`]: crate::config::Config

use std::time::Duration;
use thiserror::Error;

/// Crate-level error type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CounterError {
    /// The configuration cannot describe a working counter.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigIssue),
}

/// The specific reason a [`Config`](crate::config::Config) was rejected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssue {
    /// A ring buffer needs at least one cell.
    #[error("cell count must be greater than zero")]
    ZeroCellCount,

    /// Slices must have a non-zero width.
    #[error("slice duration must be greater than zero")]
    ZeroSliceDuration,

    /// The slice width in nanoseconds does not fit in a `u64`.
    #[error("slice duration {0:?} does not fit in 64-bit nanoseconds")]
    SliceDurationTooLarge(Duration),
}

/// Result type for counter construction.
pub type Result<T> = std::result::Result<T, CounterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_wraps_issue() {
        let err = CounterError::from(ConfigIssue::ZeroCellCount);
        assert_eq!(
            err.to_string(),
            "invalid configuration: cell count must be greater than zero"
        );
    }

    #[test]
    fn test_display_too_large() {
        let err = CounterError::from(ConfigIssue::SliceDurationTooLarge(Duration::MAX));
        assert!(err.to_string().starts_with("invalid configuration: slice duration"));
    }
}
