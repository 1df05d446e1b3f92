//! Shared region: owner-counted storage behind opaque handles

mod guard;
mod stats;

pub use guard::HandleGuard;
pub use stats::RegionStats;

use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use dashmap::DashMap;
use tracing::trace;

use crate::error::RegionError;
use crate::value::{Record, Value};

use stats::StatCounters;

/// The opaque name of a shared-region slot.
///
/// A handle is pointer-equivalent: copying one copies the name, not an
/// ownership. Owner counts change only through [`Region`] operations.
/// Slot ids are never reused, so a stale handle keeps reporting
/// [`RegionError::UseAfterFree`] instead of aliasing a recycled slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u64);

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One resident allocation: the atomic owner count plus the record.
struct Slot {
    /// Owner count. Zero only transiently, between the releasing
    /// compare-exchange and slot removal; any operation observing zero
    /// treats the slot as freed.
    strong: AtomicU32,

    /// The resident record. The lock satisfies Rust's aliasing rules for
    /// field access; the owner count protects lifetime, not field
    /// mutation.
    record: RwLock<Record>,
}

/// The shared region: allocates owner-counted slots and tracks every
/// retain and release.
///
/// All operations take `&self`; a region may be shared freely across
/// threads. Counts are mutated only by compare-exchange loops, so the
/// freed-slot precondition check and the increment/decrement are a single
/// indivisible step.
///
/// # Example
///
/// ```
/// use quickbeam::{Record, Region, Value};
///
/// let region = Region::new();
/// let size = region.alloc(
///     Record::new("Size")
///         .with_field("width", Value::F64(100.0))
///         .with_field("height", Value::F64(100.0)),
/// );
///
/// // A second owner of the same slot
/// region.retain(size)?;
/// assert_eq!(region.strong_count(size)?, 2);
///
/// // Mutation through any alias is visible through all
/// region.write(size, "width", Value::F64(150.0))?;
/// assert_eq!(region.read(size, "width")?, Value::F64(150.0));
///
/// region.release(size)?;
/// region.release(size)?; // count reaches zero: slot reclaimed
/// assert!(region.release(size).is_err());
/// # Ok::<(), quickbeam::RegionError>(())
/// ```
pub struct Region {
    /// Live slots by handle
    slots: DashMap<Handle, Slot>,

    /// Next slot id (monotonic, never reused)
    next: AtomicU64,

    /// Monotonic operation counters
    counters: StatCounters,
}

impl Default for Region {
    fn default() -> Self {
        Self::new()
    }
}

impl Region {
    /// Create a new empty region.
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
            next: AtomicU64::new(1),
            counters: StatCounters::new(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Allocation
    // ═══════════════════════════════════════════════════════════════════

    /// Allocate a slot for `record` with an owner count of 1.
    ///
    /// The caller holds the initial ownership and is responsible for the
    /// matching [`release`](Region::release).
    pub fn alloc(&self, record: Record) -> Handle {
        let handle = Handle(self.next.fetch_add(1, Ordering::Relaxed));
        trace!(%handle, type_name = %record.type_name, "alloc");
        self.slots.insert(
            handle,
            Slot {
                strong: AtomicU32::new(1),
                record: RwLock::new(record),
            },
        );
        self.counters.allocation();
        handle
    }

    // ═══════════════════════════════════════════════════════════════════
    // Ownership (retain / release / assign)
    // ═══════════════════════════════════════════════════════════════════

    /// Atomically increment the owner count of `handle`'s slot.
    ///
    /// # Errors
    ///
    /// [`RegionError::UseAfterFree`] if the slot was already reclaimed.
    pub fn retain(&self, handle: Handle) -> Result<(), RegionError> {
        {
            let slot = self
                .slots
                .get(&handle)
                .ok_or(RegionError::UseAfterFree { handle })?;

            let mut count = slot.strong.load(Ordering::Relaxed);
            loop {
                if count == 0 {
                    // Lost the race against the final release
                    return Err(RegionError::UseAfterFree { handle });
                }
                match slot.strong.compare_exchange_weak(
                    count,
                    count + 1,
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => break,
                    Err(observed) => count = observed,
                }
            }
        }
        self.counters.retain();
        trace!(%handle, "retain");
        Ok(())
    }

    /// Atomically decrement the owner count; reclaim the slot if the
    /// count reaches zero.
    ///
    /// Reclaim is synchronous and exactly-once: only one caller can win
    /// the 1 → 0 transition, and that caller removes the slot before
    /// returning.
    ///
    /// # Errors
    ///
    /// [`RegionError::UseAfterFree`] if the slot was already reclaimed.
    pub fn release(&self, handle: Handle) -> Result<(), RegionError> {
        // The map guard must drop before `remove`: holding a shard read
        // guard across removal would deadlock.
        let reclaim = {
            let slot = self
                .slots
                .get(&handle)
                .ok_or(RegionError::UseAfterFree { handle })?;

            let mut count = slot.strong.load(Ordering::Relaxed);
            loop {
                if count == 0 {
                    return Err(RegionError::UseAfterFree { handle });
                }
                match slot.strong.compare_exchange_weak(
                    count,
                    count - 1,
                    Ordering::AcqRel,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => break count == 1,
                    Err(observed) => count = observed,
                }
            }
        };
        self.counters.release();

        if reclaim {
            self.slots.remove(&handle);
            self.counters.reclaim();
            trace!(%handle, "reclaim");
        } else {
            trace!(%handle, "release");
        }
        Ok(())
    }

    /// Rebind `dst` to `src`'s slot: retain `src`, release the old `dst`,
    /// then overwrite.
    ///
    /// Retain-before-release keeps the count away from a transient zero
    /// when `src` and `dst` already name the same slot.
    ///
    /// # Errors
    ///
    /// [`RegionError::UseAfterFree`] if either slot was already
    /// reclaimed. A failed release leaves the fresh retain in place; the
    /// failure already signals a fatal contract violation.
    pub fn assign(&self, dst: &mut Handle, src: Handle) -> Result<(), RegionError> {
        self.retain(src)?;
        self.release(*dst)?;
        *dst = src;
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Field Access
    // ═══════════════════════════════════════════════════════════════════

    /// Read a field of the resident record.
    ///
    /// # Errors
    ///
    /// [`RegionError::UseAfterFree`] if the slot was reclaimed,
    /// [`RegionError::UnknownField`] if the record has no such field.
    pub fn read(&self, handle: Handle, field: &str) -> Result<Value, RegionError> {
        let slot = self
            .slots
            .get(&handle)
            .ok_or(RegionError::UseAfterFree { handle })?;
        let record = slot.record.read().unwrap_or_else(PoisonError::into_inner);
        record
            .get(field)
            .cloned()
            .ok_or_else(|| RegionError::UnknownField {
                type_name: record.type_name.clone(),
                field: field.to_string(),
            })
    }

    /// Write a field of the resident record.
    ///
    /// The write is visible through every alias of the slot. Note that
    /// the owner count does not serialize field access; the slot's lock
    /// only upholds Rust's aliasing rules.
    ///
    /// # Errors
    ///
    /// [`RegionError::UseAfterFree`] if the slot was reclaimed,
    /// [`RegionError::UnknownField`] if the record has no such field.
    pub fn write(&self, handle: Handle, field: &str, value: Value) -> Result<(), RegionError> {
        let slot = self
            .slots
            .get(&handle)
            .ok_or(RegionError::UseAfterFree { handle })?;
        let mut record = slot.record.write().unwrap_or_else(PoisonError::into_inner);
        match record.get_mut(field) {
            Some(existing) => {
                *existing = value;
                Ok(())
            }
            None => Err(RegionError::UnknownField {
                type_name: record.type_name.clone(),
                field: field.to_string(),
            }),
        }
    }

    /// Clone the resident record out of the region (a snapshot, not an
    /// alias).
    ///
    /// # Errors
    ///
    /// [`RegionError::UseAfterFree`] if the slot was reclaimed.
    pub fn snapshot(&self, handle: Handle) -> Result<Record, RegionError> {
        let slot = self
            .slots
            .get(&handle)
            .ok_or(RegionError::UseAfterFree { handle })?;
        let record = slot.record.read().unwrap_or_else(PoisonError::into_inner);
        Ok(record.clone())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Record Copy Semantics
    // ═══════════════════════════════════════════════════════════════════

    /// Deep-copy a record: inline fields are copied by value, embedded
    /// handles are retained.
    ///
    /// A bare `Record::clone` copies handle names without the matching
    /// retains, understating the owner counts; every copy that is meant
    /// to own what it embeds must come through here.
    ///
    /// # Errors
    ///
    /// [`RegionError::UseAfterFree`] if any embedded handle is stale.
    pub fn clone_record(&self, record: &Record) -> Result<Record, RegionError> {
        for handle in record.handles() {
            self.retain(handle)?;
        }
        Ok(record.clone())
    }

    /// Destroy a record copy: release every embedded handle.
    ///
    /// # Errors
    ///
    /// [`RegionError::UseAfterFree`] if any embedded handle is stale.
    pub fn dispose_record(&self, record: Record) -> Result<(), RegionError> {
        for handle in record.handles() {
            self.release(handle)?;
        }
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Inspection
    // ═══════════════════════════════════════════════════════════════════

    /// Current owner count of `handle`'s slot.
    ///
    /// # Errors
    ///
    /// [`RegionError::UseAfterFree`] if the slot was reclaimed.
    pub fn strong_count(&self, handle: Handle) -> Result<u32, RegionError> {
        let slot = self
            .slots
            .get(&handle)
            .ok_or(RegionError::UseAfterFree { handle })?;
        let count = slot.strong.load(Ordering::Acquire);
        if count == 0 {
            return Err(RegionError::UseAfterFree { handle });
        }
        Ok(count)
    }

    /// Check if `handle` names a live slot.
    pub fn contains(&self, handle: Handle) -> bool {
        self.slots.contains_key(&handle)
    }

    /// Number of live slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the region holds no live slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Snapshot of the operation counters.
    pub fn stats(&self) -> RegionStats {
        self.counters.snapshot()
    }
}
