//! Time-windowed event counter with a ring of archived slices.
//!
//! This module provides [`CelledCounter`], a lock-free counter that records
//! how many `mark()` events happened in each of the last N fixed-width time
//! slices. It is built for many concurrent producers and an occasional
//! consumer that wants to see the recent rate trend.
//!
//! # Design
//!
//! The counter keeps four pieces of shared state:
//!
//! - `cells`: a fixed ring of `AtomicI64`, one per archived slice
//! - `cursor`: the next ring slot to be written
//! - `in_flight`: marks of the open slice that have not been archived yet
//! - `slice_start`: the timestamp at which the open slice began
//!
//! Both `mark()` and `get_last()` first check whether the open slice has
//! expired. If it has, every caller that noticed races a single
//! compare-and-set on `slice_start`; the winner archives exactly
//! `elapsed / slice` slices and everybody else returns immediately.
//!
//! # Weak consistency
//!
//! Cells are stored and loaded one at a time. A `get_last()` that races an
//! archive in progress on another thread may see the cursor already moved
//! while some of the claimed cells still hold their previous values. No
//! mark is ever lost or counted twice; the reader merely sees a transient
//! mix of old and new cells.
//!
//! # Examples
//!
//! ```rust
//! use celled_counter::clock::ManualClock;
//! use celled_counter::config::Config;
//! use celled_counter::counters::CelledCounter;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let clock = Arc::new(ManualClock::new());
//! let config = Config::new()
//!     .with_cell_count(3)
//!     .with_slice_duration(Duration::from_secs(1));
//! let counter = CelledCounter::with_clock(config, Arc::clone(&clock)).unwrap();
//!
//! counter.mark();
//! counter.mark();
//! clock.advance(Duration::from_secs(1));
//! counter.mark();
//! clock.advance(Duration::from_secs(1));
//!
//! // Most recent slice first.
//! assert_eq!(counter.get_last(3), vec![1, 2, 0]);
//! ```

use crossbeam_utils::CachePadded;
use std::fmt::Debug;
use std::sync::atomic::{AtomicI64, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use crate::clock::{Clock, MonotonicClock};
use crate::config::Config;
use crate::counters::{DEFAULT_CELL_COUNT, DEFAULT_SLICE_DURATION};
use crate::error::Result;
use crate::snapshot::History;

/// A lock-free counter of events per time slice.
///
/// `CelledCounter` accumulates [`mark`](Self::mark) calls for the currently
/// open slice and, once the slice has elapsed, archives the total into a
/// ring of `cell_count` cells. [`get_last`](Self::get_last) returns the most
/// recent archived cells, newest first.
///
/// Time only moves when somebody calls into the counter: a slice that
/// expired while nobody was looking is archived by the next caller.
///
/// # Defaults
///
/// [`CelledCounter::new`] uses 10 cells of 10 seconds and the system
/// monotonic clock. Use [`with_config`](Self::with_config) or
/// [`with_clock`](Self::with_clock) for anything else.
///
/// # Examples
///
/// Multi-threaded usage:
///
/// ```rust
/// use celled_counter::counters::CelledCounter;
/// use std::sync::Arc;
/// use std::thread;
///
/// let counter = Arc::new(CelledCounter::new().with_name("requests"));
/// let mut handles = vec![];
///
/// for _ in 0..4 {
///     let c = Arc::clone(&counter);
///     handles.push(thread::spawn(move || {
///         for _ in 0..1000 {
///             c.mark();
///         }
///     }));
/// }
///
/// for h in handles {
///     h.join().unwrap();
/// }
///
/// // Nothing has been archived yet: the first 10 second slice is still open.
/// assert_eq!(counter.in_flight(), 4000);
/// ```
pub struct CelledCounter<C = MonotonicClock> {
    name: &'static str,
    /// Archived slices, oldest overwritten first.
    cells: Box<[AtomicI64]>,
    /// Next slot to write, always in `[0, cells.len())`.
    cursor: AtomicUsize,
    /// Marks of the open slice.
    in_flight: CachePadded<AtomicI64>,
    /// Start of the open slice, in clock nanoseconds.
    slice_start: CachePadded<AtomicU64>,
    slice_nanos: u64,
    /// Total slices archived since construction.
    archived: AtomicU64,
    clock: C,
}

impl CelledCounter<MonotonicClock> {
    /// Creates a counter with 10 cells of 10 seconds on the system clock.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use celled_counter::counters::CelledCounter;
    /// use std::time::Duration;
    ///
    /// let counter = CelledCounter::new();
    /// assert_eq!(counter.cell_count(), 10);
    /// assert_eq!(counter.slice_duration(), Duration::from_secs(10));
    /// assert_eq!(counter.get_last(3), vec![0, 0, 0]);
    /// ```
    pub fn new() -> Self {
        Self::build(
            DEFAULT_CELL_COUNT,
            DEFAULT_SLICE_DURATION.as_nanos() as u64,
            MonotonicClock::new(),
        )
    }

    /// Creates a counter from `config` on the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::InvalidConfiguration`] when `config` does not
    /// pass [`Config::validate`].
    ///
    /// [`CounterError::InvalidConfiguration`]: crate::error::CounterError::InvalidConfiguration
    pub fn with_config(config: Config) -> Result<Self> {
        Self::with_clock(config, MonotonicClock::new())
    }
}

impl<C: Clock> CelledCounter<C> {
    /// Creates a counter from `config` reading time from `clock`.
    ///
    /// The first slice opens at the clock's current reading.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::InvalidConfiguration`] when `config` does not
    /// pass [`Config::validate`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use celled_counter::clock::ManualClock;
    /// use celled_counter::config::Config;
    /// use celled_counter::counters::CelledCounter;
    ///
    /// let counter = CelledCounter::with_clock(Config::new(), ManualClock::new()).unwrap();
    /// assert_eq!(counter.cell_count(), 10);
    ///
    /// let invalid = Config::new().with_cell_count(0);
    /// assert!(CelledCounter::with_clock(invalid, ManualClock::new()).is_err());
    /// ```
    ///
    /// [`CounterError::InvalidConfiguration`]: crate::error::CounterError::InvalidConfiguration
    pub fn with_clock(config: Config, clock: C) -> Result<Self> {
        let slice_nanos = config.validate()?;
        Ok(Self::build(config.cell_count, slice_nanos, clock))
    }

    fn build(cell_count: usize, slice_nanos: u64, clock: C) -> Self {
        log::debug!(
            "creating celled counter with {} cells of {:?}",
            cell_count,
            Duration::from_nanos(slice_nanos)
        );
        let start = clock.now_nanos();
        CelledCounter {
            name: "",
            cells: (0..cell_count).map(|_| AtomicI64::new(0)).collect(),
            cursor: AtomicUsize::new(0),
            in_flight: CachePadded::new(AtomicI64::new(0)),
            slice_start: CachePadded::new(AtomicU64::new(start)),
            slice_nanos,
            archived: AtomicU64::new(0),
            clock,
        }
    }

    /// Sets the name of this counter, returning `self` for method chaining.
    ///
    /// The name shows up in `Debug` output, log lines and snapshots.
    pub fn with_name(self, name: &'static str) -> Self {
        Self { name, ..self }
    }

    /// Returns the name of this counter, or an empty string if unnamed.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the number of cells in the ring.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns the width of one slice.
    #[inline]
    pub fn slice_duration(&self) -> Duration {
        Duration::from_nanos(self.slice_nanos)
    }

    /// Records one event in the open slice.
    ///
    /// Archives any slices that have elapsed first, so the event is always
    /// attributed to the slice that is current when this call observes the
    /// clock. Lock-free: a caller that loses the race to archive returns
    /// without waiting for the winner.
    #[inline]
    pub fn mark(&self) {
        self.tick_if_necessary();
        self.in_flight.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the last `count` archived slices, most recent first.
    ///
    /// Elapsed slices are archived before reading, so the result reflects
    /// every slice that closed before this call observed the clock. The
    /// open slice is never included.
    ///
    /// `count` may exceed [`cell_count`](Self::cell_count): the read keeps
    /// walking backwards around the ring and repeats older cells rather than
    /// failing. `count == 0` returns an empty vector.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use celled_counter::clock::ManualClock;
    /// use celled_counter::config::Config;
    /// use celled_counter::counters::CelledCounter;
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// let clock = Arc::new(ManualClock::new());
    /// let config = Config::new()
    ///     .with_cell_count(2)
    ///     .with_slice_duration(Duration::from_millis(100));
    /// let counter = CelledCounter::with_clock(config, Arc::clone(&clock)).unwrap();
    ///
    /// counter.mark();
    /// clock.advance(Duration::from_millis(100));
    ///
    /// // Two cells, four requested: the ring is walked twice.
    /// assert_eq!(counter.get_last(4), vec![1, 0, 1, 0]);
    /// assert!(counter.get_last(0).is_empty());
    /// ```
    pub fn get_last(&self, count: usize) -> Vec<i64> {
        self.tick_if_necessary();

        let len = self.cells.len();
        let mut index = self.cursor.load(Ordering::Acquire);
        (0..count)
            .map(|_| {
                index = if index == 0 { len - 1 } else { index - 1 };
                self.cells[index].load(Ordering::Acquire)
            })
            .collect()
    }

    /// Returns the number of marks in the open slice.
    ///
    /// Like [`get_last`](Self::get_last), archives elapsed slices first.
    pub fn in_flight(&self) -> i64 {
        self.tick_if_necessary();
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Returns how many slices have been archived since construction.
    ///
    /// Every elapsed slice is counted exactly once, including slices skipped
    /// over during a long pause and slices whose cell has since been
    /// overwritten. Does not advance the counter.
    #[inline]
    pub fn archived_slices(&self) -> u64 {
        self.archived.load(Ordering::Relaxed)
    }

    /// Returns the last `count` archived slices together with the counter's
    /// name and slice width.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use celled_counter::clock::ManualClock;
    /// use celled_counter::config::Config;
    /// use celled_counter::counters::CelledCounter;
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// let clock = Arc::new(ManualClock::new());
    /// let config = Config::new().with_slice_duration(Duration::from_secs(2));
    /// let counter = CelledCounter::with_clock(config, Arc::clone(&clock))
    ///     .unwrap()
    ///     .with_name("logins");
    ///
    /// for _ in 0..10 {
    ///     counter.mark();
    /// }
    /// clock.advance(Duration::from_secs(2));
    ///
    /// let history = counter.snapshot(1);
    /// assert_eq!(history.name(), "logins");
    /// assert_eq!(history.total(), 10);
    /// assert_eq!(history.rate_per_second(), 5.0);
    /// ```
    pub fn snapshot(&self, count: usize) -> History {
        History::new(self.name, self.slice_duration(), self.get_last(count))
    }

    /// Archives every slice that has fully elapsed since `slice_start`.
    #[inline]
    fn tick_if_necessary(&self) {
        let old_tick = self.slice_start.load(Ordering::Acquire);
        let new_tick = self.clock.now_nanos();
        // a clock reading behind the slice start counts as no time elapsed
        let age = new_tick.saturating_sub(old_tick);
        if age >= self.slice_nanos {
            self.advance(old_tick, new_tick, age);
        }
    }

    #[cold]
    fn advance(&self, old_tick: u64, new_tick: u64, age: u64) {
        let new_start = new_tick - age % self.slice_nanos;
        if self
            .slice_start
            .compare_exchange(old_tick, new_start, Ordering::AcqRel, Ordering::Relaxed)
            .is_err()
        {
            // another caller already moved the slice start and owns this gap
            return;
        }
        self.archive(age / self.slice_nanos);
    }

    /// Archives `elapsed` slices: the drained in-flight count goes into the
    /// first one and zeros into the rest.
    ///
    /// Only the compare-and-set winner for a gap calls this. The whole range
    /// of slots is claimed with one cursor update, so two winners whose
    /// archives overlap in time still write disjoint slots. At most
    /// `cell_count` slots are written, which leaves the ring exactly as
    /// archiving the slices one by one would.
    fn archive(&self, elapsed: u64) {
        let len = self.cells.len();
        let step = (elapsed % len as u64) as usize;
        let first = match self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |cursor| {
                Some((cursor + step) % len)
            }) {
            Ok(cursor) | Err(cursor) => cursor,
        };

        log::trace!(
            "{}: archiving {} slice(s) starting at slot {}",
            self.name,
            elapsed,
            first
        );
        if elapsed > len as u64 {
            log::debug!(
                "{}: {} slices elapsed at once, the whole history of {} cells was overwritten",
                self.name,
                elapsed,
                len
            );
        }

        let drained = self.in_flight.swap(0, Ordering::AcqRel);
        self.cells[first].store(drained, Ordering::Release);

        let zeros = (elapsed - 1).min(len as u64) as usize;
        for offset in 1..=zeros {
            self.cells[(first + offset) % len].store(0, Ordering::Release);
        }

        self.archived.fetch_add(elapsed, Ordering::Relaxed);
    }
}

impl Default for CelledCounter<MonotonicClock> {
    /// Creates a counter with the default configuration and no name.
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Debug for CelledCounter<C> {
    /// Formats the counter showing non-zero cells and the open slice.
    ///
    /// Output format: `name{ [slot]:value ... | in_flight:n }`
    ///
    /// Does not advance the counter, so expired slices may still show up as
    /// in flight.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{{", self.name)?;
        for (i, cell) in self.cells.iter().enumerate() {
            let val = cell.load(Ordering::Relaxed);
            if val != 0 {
                write!(f, " [{i}]:{val}")?;
            }
        }
        write!(
            f,
            " | in_flight:{} }}",
            self.in_flight.load(Ordering::Relaxed)
        )
    }
}
