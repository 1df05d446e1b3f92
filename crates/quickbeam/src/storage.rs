//! Storage declaration: inline records vs. shared-region slots

use crate::error::RegionError;
use crate::region::{Handle, Region};
use crate::value::{Record, Value};

/// Where a declared record lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// Scope-local storage; copies are deep and independent
    Inline,

    /// Shared-region storage; copies alias one resident record
    Shared,
}

/// A declared record: either held inline or named by a handle.
///
/// The two variants carry the two copy disciplines:
/// [`Region::duplicate`] copies an inline record field by field (retaining
/// any embedded handles) and copies a shared record by handle (retaining
/// the slot).
#[derive(Debug, Clone, PartialEq)]
pub enum Storage {
    /// The record itself, owned by the declaring scope
    Inline(Record),

    /// A handle naming a shared-region slot
    Shared(Handle),
}

impl Storage {
    /// The storage kind of this declaration.
    pub fn kind(&self) -> StorageKind {
        match self {
            Storage::Inline(_) => StorageKind::Inline,
            Storage::Shared(_) => StorageKind::Shared,
        }
    }

    /// The inline record, if this is inline storage.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Storage::Inline(record) => Some(record),
            Storage::Shared(_) => None,
        }
    }

    /// The handle, if this is shared storage.
    pub fn as_handle(&self) -> Option<Handle> {
        match self {
            Storage::Inline(_) => None,
            Storage::Shared(handle) => Some(*handle),
        }
    }

    /// Read a field, wherever the record lives.
    ///
    /// # Errors
    ///
    /// [`RegionError::UnknownField`] on a field miss;
    /// [`RegionError::UseAfterFree`] if shared storage was reclaimed.
    pub fn read(&self, region: &Region, field: &str) -> Result<Value, RegionError> {
        match self {
            Storage::Inline(record) => {
                record
                    .get(field)
                    .cloned()
                    .ok_or_else(|| RegionError::UnknownField {
                        type_name: record.type_name.clone(),
                        field: field.to_string(),
                    })
            }
            Storage::Shared(handle) => region.read(*handle, field),
        }
    }

    /// Write a field. An inline write touches this copy alone; a shared
    /// write is visible through every alias of the slot.
    ///
    /// # Errors
    ///
    /// [`RegionError::UnknownField`] on a field miss;
    /// [`RegionError::UseAfterFree`] if shared storage was reclaimed.
    pub fn write(&mut self, region: &Region, field: &str, value: Value) -> Result<(), RegionError> {
        match self {
            Storage::Inline(record) => match record.get_mut(field) {
                Some(existing) => {
                    *existing = value;
                    Ok(())
                }
                None => Err(RegionError::UnknownField {
                    type_name: record.type_name.clone(),
                    field: field.to_string(),
                }),
            },
            Storage::Shared(handle) => region.write(*handle, field, value),
        }
    }
}

impl Region {
    /// Declare a record with the given storage kind.
    ///
    /// Inline declarations stay scope-local; shared declarations allocate
    /// a region slot with an owner count of 1.
    pub fn declare(&self, kind: StorageKind, record: Record) -> Storage {
        match kind {
            StorageKind::Inline => Storage::Inline(record),
            StorageKind::Shared => Storage::Shared(self.alloc(record)),
        }
    }

    /// Copy a declared storage with the semantics its kind implies.
    ///
    /// - Inline: a deep field-by-field copy. Primitive fields are copied
    ///   by value; each embedded handle is retained so the copy owns what
    ///   it names. No aliasing of inline fields is introduced.
    /// - Shared: a handle copy. The slot is retained; the original and
    ///   the copy alias the same resident record afterwards.
    ///
    /// # Errors
    ///
    /// [`RegionError::UseAfterFree`] if a handle involved is stale.
    pub fn duplicate(&self, storage: &Storage) -> Result<Storage, RegionError> {
        match storage {
            Storage::Inline(record) => Ok(Storage::Inline(self.clone_record(record)?)),
            Storage::Shared(handle) => {
                self.retain(*handle)?;
                Ok(Storage::Shared(*handle))
            }
        }
    }

    /// Destroy a declared storage, releasing whatever it owns.
    ///
    /// Inline: releases every embedded handle (the record itself needs no
    /// reclamation — it dies with its scope). Shared: releases the slot.
    ///
    /// # Errors
    ///
    /// [`RegionError::UseAfterFree`] if a handle involved is stale.
    pub fn discard(&self, storage: Storage) -> Result<(), RegionError> {
        match storage {
            Storage::Inline(record) => self.dispose_record(record),
            Storage::Shared(handle) => self.release(handle),
        }
    }
}
