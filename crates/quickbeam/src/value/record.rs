//! Record container: a named type with ordered fields

use indexmap::IndexMap;

use super::Value;
use crate::region::Handle;

/// A record instance with named fields.
///
/// Uses IndexMap to preserve field order (predictable iteration and
/// display).
///
/// A record whose fields are all inline values copies freely and
/// independently. A record embedding [`Value::Handle`] fields is a mixed
/// record: copying it must go through
/// [`Region::clone_record`](crate::Region::clone_record) so the embedded
/// handles are retained, and destroying it through
/// [`Region::dispose_record`](crate::Region::dispose_record) so they are
/// released.
#[derive(Clone, PartialEq)]
pub struct Record {
    /// The record's type name (e.g., "Size", "Message")
    pub type_name: String,

    /// The record's fields in declaration order
    pub fields: IndexMap<String, Value>,
}

impl Record {
    /// Create a new empty record
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Add a field (builder pattern)
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Get a field by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Get a mutable reference to a field by name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields.get_mut(name)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over the embedded shared-region handles, in field order.
    pub fn handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.fields.values().filter_map(Value::as_handle)
    }

    /// Check if every field is an inline value (no embedded handles).
    pub fn is_inline(&self) -> bool {
        self.handles().next().is_none()
    }
}
