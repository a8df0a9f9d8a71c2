//! # Celled Counter - Lock-Free Sliding Window Event Counts
//!
//! A Rust library for counting events per fixed-width time slice from many
//! threads at once, while keeping the last N slices around as a rate history.
//!
//! ## The Problem
//!
//! "How many requests did we serve in each of the last ten intervals?" is a
//! question most services want to answer cheaply. The hot path (recording an
//! event) runs on every request thread; the cold path (reading the trend)
//! runs occasionally from a reporter. A mutex around a ring buffer makes
//! every request thread queue behind the reporter and behind each other.
//!
//! ## The Solution: Lazily Rotated Cells
//!
//! [`CelledCounter`](counters::CelledCounter) keeps:
//!
//! 1. **An in-flight accumulator** that `mark()` increments with a single
//!    atomic add.
//! 2. **A ring of cells** holding the totals of closed slices.
//! 3. **The start timestamp of the open slice.**
//!
//! There is no timer thread. Every call first compares the clock with the
//! slice start. When one or more slices have elapsed, callers race a single
//! compare-and-set on the start timestamp; the winner drains the
//! accumulator into the ring and steps the cursor once per elapsed slice,
//! and the losers carry on without waiting.
//!
//! ```text
//!  time ──────────────────────────────────────────────────────────────►
//!        │  slice 0   │  slice 1   │  slice 2   │  slice 3 (open)
//!        │ mark mark  │ mark       │            │ mark
//!        ▼            ▼            ▼            ▼
//!  cells [    2     ][     1     ][     0     ]   in_flight = 1
//!                                                ▲
//!                                             cursor
//!
//!  get_last(3) == [0, 1, 2]   (most recent first)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use celled_counter::config::Config;
//! use celled_counter::counters::CelledCounter;
//! use std::time::Duration;
//!
//! // Six cells of ten seconds: one minute of history.
//! let config = Config::new()
//!     .with_cell_count(6)
//!     .with_slice_duration(Duration::from_secs(10));
//! let requests = CelledCounter::with_config(config)?.with_name("requests");
//!
//! // From any thread - a clock read and an atomic add
//! requests.mark();
//!
//! // Later, from a reporter
//! let trend = requests.get_last(6);
//! assert_eq!(trend.len(), 6);
//! # Ok::<(), celled_counter::error::CounterError>(())
//! ```
//!
//! ## Deterministic Time
//!
//! The clock is a capability passed in at construction. Tests and
//! simulations use [`ManualClock`](clock::ManualClock) to move time by hand:
//!
//! ```rust
//! use celled_counter::clock::ManualClock;
//! use celled_counter::config::Config;
//! use celled_counter::counters::CelledCounter;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let clock = Arc::new(ManualClock::new());
//! let counter = CelledCounter::with_clock(Config::new(), Arc::clone(&clock)).unwrap();
//!
//! counter.mark();
//! clock.advance(Duration::from_secs(30));
//!
//! // The marked slice, then two idle ones.
//! assert_eq!(counter.get_last(3), vec![0, 0, 1]);
//! assert_eq!(counter.archived_slices(), 3);
//! ```
//!
//! ## Consistency
//!
//! Marks are never lost or double counted, and every elapsed slice is
//! archived exactly once. A `get_last()` racing an archive on another thread
//! may observe the ring half-updated; see
//! [`counters::celled`](counters::celled#weak-consistency).
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | `Serialize`/`Deserialize` for [`snapshot::History`] |
//! | `demo` | Builds the `demo` example (`clap`, `env_logger`) |
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade: construction at `debug`,
//! every archive at `trace`, and catch-ups that overwrite the whole ring at
//! `debug`. No logger is installed by the library.

pub mod clock;
pub mod config;
pub mod counters;
pub mod error;
pub mod snapshot;
