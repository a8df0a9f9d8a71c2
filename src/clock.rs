//! Monotonic time sources.
//!
//! The counter consumes exactly one capability from its environment: the
//! current monotonic time in nanoseconds. [`Clock`] is that capability.
//!
//! Two implementations are provided:
//!
//! | Type | Description | Use Case |
//! |------|-------------|----------|
//! | [`MonotonicClock`] | Nanoseconds since an [`Instant`] anchor | Production (the default) |
//! | [`ManualClock`] | Atomic value moved only by explicit calls | Tests, simulations, replay |
//!
//! `Clock` is also implemented for `&C`, `Arc<C>` and `Box<C>`, so a caller
//! can hand a shared [`ManualClock`] to a counter and keep driving it:
//!
//! ```rust
//! use celled_counter::clock::{Clock, ManualClock};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let clock = Arc::new(ManualClock::new());
//! let handle = Arc::clone(&clock);
//!
//! handle.advance(Duration::from_millis(3));
//! assert_eq!(clock.now_nanos(), 3_000_000);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A monotonic, non-decreasing source of nanosecond timestamps.
///
/// The origin is arbitrary; only differences between readings matter.
pub trait Clock: Send + Sync {
    /// Returns the current time in nanoseconds.
    fn now_nanos(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline]
    fn now_nanos(&self) -> u64 {
        (**self).now_nanos()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    #[inline]
    fn now_nanos(&self) -> u64 {
        (**self).now_nanos()
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    #[inline]
    fn now_nanos(&self) -> u64 {
        (**self).now_nanos()
    }
}

/// The system monotonic clock.
///
/// Readings are nanoseconds elapsed since the clock was created, so they
/// start near zero and fit in a `u64` for about 584 years.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    anchor: Instant,
}

impl MonotonicClock {
    /// Creates a clock anchored at the current instant.
    pub fn new() -> Self {
        MonotonicClock {
            anchor: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now_nanos(&self) -> u64 {
        // saturates after ~584 years of uptime
        u64::try_from(self.anchor.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}

/// A clock that only moves when told to.
///
/// All operations are atomic, so one thread can drive time forward while
/// others read it.
///
/// # Examples
///
/// ```rust
/// use celled_counter::clock::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// assert_eq!(clock.now_nanos(), 0);
///
/// clock.advance(Duration::from_secs(1));
/// clock.advance_nanos(5);
/// assert_eq!(clock.now_nanos(), 1_000_000_005);
///
/// clock.set_nanos(42);
/// assert_eq!(clock.now_nanos(), 42);
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicU64,
}

impl ManualClock {
    /// Creates a clock reading zero.
    pub const fn new() -> Self {
        ManualClock {
            nanos: AtomicU64::new(0),
        }
    }

    /// Creates a clock reading `nanos`.
    pub const fn starting_at(nanos: u64) -> Self {
        ManualClock {
            nanos: AtomicU64::new(nanos),
        }
    }

    /// Moves the clock forward by `duration`, saturating at `u64::MAX`.
    pub fn advance(&self, duration: Duration) {
        let delta = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.advance_nanos(delta);
    }

    /// Moves the clock forward by `delta` nanoseconds, saturating at `u64::MAX`.
    pub fn advance_nanos(&self, delta: u64) {
        let _ = self
            .nanos
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |now| {
                Some(now.saturating_add(delta))
            });
    }

    /// Sets the clock to an absolute reading.
    ///
    /// Callers are responsible for keeping time non-decreasing; a counter
    /// treats a backwards step as "no time elapsed".
    pub fn set_nanos(&self, nanos: u64) {
        self.nanos.store(nanos, Ordering::Release);
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now_nanos(&self) -> u64 {
        self.nanos.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_monotonic_non_decreasing() {
        let clock = MonotonicClock::new();
        let mut last = clock.now_nanos();
        for _ in 0..1000 {
            let now = clock.now_nanos();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn test_monotonic_tracks_sleep() {
        let clock = MonotonicClock::new();
        let before = clock.now_nanos();
        thread::sleep(Duration::from_millis(5));
        assert!(clock.now_nanos() - before >= 5_000_000);
    }

    #[test]
    fn test_manual_starts_at() {
        let clock = ManualClock::starting_at(100);
        assert_eq!(clock.now_nanos(), 100);
    }

    #[test]
    fn test_manual_advance_saturates() {
        let clock = ManualClock::starting_at(u64::MAX - 1);
        clock.advance_nanos(10);
        assert_eq!(clock.now_nanos(), u64::MAX);
        clock.advance(Duration::MAX);
        assert_eq!(clock.now_nanos(), u64::MAX);
    }

    #[test]
    fn test_manual_shared_across_threads() {
        let clock = Arc::new(ManualClock::new());
        let mut handles = vec![];

        for _ in 0..4 {
            let c = Arc::clone(&clock);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    c.advance_nanos(1);
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(clock.now_nanos(), 400);
    }

    #[test]
    fn test_blanket_impls() {
        fn read(clock: impl Clock) -> u64 {
            clock.now_nanos()
        }

        let clock = ManualClock::starting_at(7);
        assert_eq!(read(&clock), 7);
        assert_eq!(read(Arc::new(ManualClock::starting_at(8))), 8);
        assert_eq!(read(Box::new(ManualClock::starting_at(9))), 9);

        let dynamic: Box<dyn Clock> = Box::new(ManualClock::starting_at(10));
        assert_eq!(read(dynamic), 10);
    }
}
