//! Fault event history
//!
//! Fixed-capacity ring of fault transitions for post-mortem diagnostics.
//! Uses heapless `HistoryBuf` for no-allocation storage: when full, the
//! oldest event is evicted. Trips and resets are both recorded so an
//! operator can reconstruct the fault/recovery sequence.

use heapless::HistoryBuf;

use crate::safety::FaultFlags;

/// Number of fault events retained
pub const FAULT_HISTORY_SIZE: usize = 16;

/// Kind of recorded fault transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultEventKind {
    /// Safety violation latched the drive into `Fault`
    Trip,
    /// External fault reset re-armed the drive
    Cleared,
}

/// One fault transition
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaultEvent {
    /// Time of the transition in microseconds since system start
    pub timestamp_us: u64,
    /// Sticky flag set at the time of the transition
    pub flags: FaultFlags,
    /// Trip or reset
    pub kind: FaultEventKind,
}

/// Ring buffer of fault transitions
///
/// Stores up to [`FAULT_HISTORY_SIZE`] events, evicting the oldest when
/// full. The total trip count survives eviction.
#[derive(Default)]
pub struct FaultHistory {
    buffer: HistoryBuf<FaultEvent, FAULT_HISTORY_SIZE>,
    total_trips: u32,
}

impl FaultHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self {
            buffer: HistoryBuf::new(),
            total_trips: 0,
        }
    }

    /// Record a fault transition.
    pub fn record(&mut self, event: FaultEvent) {
        if event.kind == FaultEventKind::Trip {
            self.total_trips = self.total_trips.saturating_add(1);
        }
        self.buffer.write(event);
    }

    /// Number of events currently retained.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True when no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    /// Most recent event, if any.
    pub fn latest(&self) -> Option<&FaultEvent> {
        self.buffer.recent()
    }

    /// Iterate events oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &FaultEvent> {
        self.buffer.oldest_ordered()
    }

    /// Total trips recorded, including evicted ones.
    pub fn total_trips(&self) -> u32 {
        self.total_trips
    }
}
