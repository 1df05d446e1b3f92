//! Operation counters for the shared region

use std::sync::atomic::{AtomicU64, Ordering};

/// Counts of region operations since creation.
///
/// Retain/release traffic is the dominant cost of reference-counted
/// copies — a copy of a record embedding two handles pays two retains,
/// where a handle copy of one shared record pays one. The counters make
/// that overhead visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionStats {
    /// Slots allocated
    pub allocations: u64,

    /// Successful retains
    pub retains: u64,

    /// Successful releases
    pub releases: u64,

    /// Slots reclaimed (always at most `allocations`)
    pub reclaims: u64,
}

/// Internal atomic counters backing [`RegionStats`].
pub(crate) struct StatCounters {
    allocations: AtomicU64,
    retains: AtomicU64,
    releases: AtomicU64,
    reclaims: AtomicU64,
}

impl StatCounters {
    pub(crate) fn new() -> Self {
        Self {
            allocations: AtomicU64::new(0),
            retains: AtomicU64::new(0),
            releases: AtomicU64::new(0),
            reclaims: AtomicU64::new(0),
        }
    }

    pub(crate) fn allocation(&self) {
        self.allocations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn retain(&self) {
        self.retains.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn release(&self) {
        self.releases.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn reclaim(&self) {
        self.reclaims.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> RegionStats {
        RegionStats {
            allocations: self.allocations.load(Ordering::Relaxed),
            retains: self.retains.load(Ordering::Relaxed),
            releases: self.releases.load(Ordering::Relaxed),
            reclaims: self.reclaims.load(Ordering::Relaxed),
        }
    }
}
