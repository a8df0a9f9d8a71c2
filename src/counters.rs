//! Counter implementations.
//!
//! Currently this module hosts a single counter type, [`CelledCounter`],
//! which buckets `mark()` events into fixed-width time slices ("cells") and
//! keeps the most recent cells as a sliding history.
//!
//! # Architecture
//!
//! ```text
//!   mark() ──┐                      ┌── get_last(n)
//!            ▼                      ▼
//!     ┌─────────────────────────────────────┐
//!     │ tick_if_necessary()                 │  CAS on slice_start elects
//!     │   age >= slice? ── CAS ── winner ───┼─► one archiver per elapsed gap
//!     └─────────────────────────────────────┘
//!            │                      │
//!            ▼                      ▼
//!   in_flight += 1           read cells backwards
//!   (CachePadded)            from the cursor
//!
//!   cells: [ c0 | c1 | c2 | ... | cN-1 ]   ring of archived slices
//!                  ▲
//!                cursor (next slot to write)
//! ```
//!
//! There is no background thread: whichever caller first observes that the
//! open slice has expired closes it, and every other caller proceeds
//! without waiting.

pub mod celled;

pub use celled::CelledCounter;

use std::time::Duration;

/// Number of cells retained when none is configured.
pub const DEFAULT_CELL_COUNT: usize = 10;

/// Slice width used when none is configured.
pub const DEFAULT_SLICE_DURATION: Duration = Duration::from_secs(10);
