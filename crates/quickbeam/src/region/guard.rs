//! RAII guard releasing a handle's ownership on drop

use tracing::debug;

use super::{Handle, Region};
use crate::error::RegionError;
use crate::value::Value;

/// RAII guard that releases one ownership of a handle when dropped.
///
/// The guard adopts an ownership the caller already holds (the initial
/// count from [`Region::alloc`], or one added by
/// [`Region::retain`]) — it does not retain on creation.
///
/// # Example
///
/// ```
/// use quickbeam::{Record, Region, Value};
///
/// let region = Region::new();
/// let size = region.alloc(Record::new("Size").with_field("width", Value::F64(100.0)));
///
/// {
///     let guard = region.guard(size);
///     assert_eq!(guard.read("width")?, Value::F64(100.0));
/// }
/// // guard dropped, the only ownership released, slot reclaimed
/// assert!(!region.contains(size));
/// # Ok::<(), quickbeam::RegionError>(())
/// ```
pub struct HandleGuard<'a> {
    region: &'a Region,
    handle: Handle,
}

impl Region {
    /// Adopt one ownership of `handle`, to be released when the guard
    /// drops.
    pub fn guard(&self, handle: Handle) -> HandleGuard<'_> {
        HandleGuard {
            region: self,
            handle,
        }
    }
}

impl HandleGuard<'_> {
    /// The guarded handle.
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Read a field of the guarded slot's record.
    ///
    /// # Errors
    ///
    /// See [`Region::read`].
    pub fn read(&self, field: &str) -> Result<Value, RegionError> {
        self.region.read(self.handle, field)
    }

    /// Write a field of the guarded slot's record.
    ///
    /// # Errors
    ///
    /// See [`Region::write`].
    pub fn write(&self, field: &str, value: Value) -> Result<(), RegionError> {
        self.region.write(self.handle, field, value)
    }
}

impl Drop for HandleGuard<'_> {
    fn drop(&mut self) {
        // A release elsewhere already invalidated the handle; nothing
        // left to do but note it.
        if self.region.release(self.handle).is_err() {
            debug!(handle = %self.handle, "guard dropped a stale handle");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Record, Region, Value};

    #[test]
    fn test_guard_releases_on_drop() {
        let region = Region::new();
        let handle = region.alloc(Record::new("Size").with_field("width", Value::F64(1.0)));

        {
            let _guard = region.guard(handle);
            assert!(region.contains(handle));
        }

        // After drop, the only ownership is gone
        assert!(!region.contains(handle));
    }

    #[test]
    fn test_guard_adopts_a_retain() {
        let region = Region::new();
        let handle = region.alloc(Record::new("Size").with_field("width", Value::F64(1.0)));

        region.retain(handle).unwrap();
        {
            let _guard = region.guard(handle);
            assert_eq!(region.strong_count(handle).unwrap(), 2);
        }

        // Guard released its adopted ownership; the original survives
        assert_eq!(region.strong_count(handle).unwrap(), 1);
        region.release(handle).unwrap();
    }

    #[test]
    fn test_guard_read_write_passthrough() {
        let region = Region::new();
        let handle = region.alloc(Record::new("Size").with_field("width", Value::F64(1.0)));

        {
            let guard = region.guard(handle);
            guard.write("width", Value::F64(2.0)).unwrap();
            assert_eq!(guard.read("width").unwrap(), Value::F64(2.0));
        }
    }

    #[test]
    fn test_guard_on_stale_handle_is_quiet() {
        let region = Region::new();
        let handle = region.alloc(Record::new("Size"));
        region.release(handle).unwrap();

        // Dropping a guard over an already-reclaimed slot must not panic
        let _guard = region.guard(handle);
    }
}
