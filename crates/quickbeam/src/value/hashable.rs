//! Hashable wrapper for Value to enable use as map keys

use std::hash::{Hash, Hasher};

use super::Value;

/// A wrapper for Value that implements Hash and Eq.
///
/// Only inline values with stable equality can be used as keys: floats
/// have no total equality, and a handle key would tie the map's validity
/// to a shared-region lifetime. Keeping keys inline also keeps lookups
/// off the shared region entirely.
///
/// Attempting to hash a non-hashable value will panic.
#[derive(Debug, Clone)]
pub struct KeyValue(pub Value);

impl KeyValue {
    /// Check if a value can be used as a key
    pub fn is_hashable(value: &Value) -> bool {
        matches!(
            value,
            Value::Unit | Value::Bool(_) | Value::I64(_) | Value::Str(_)
        )
    }
}

impl Hash for KeyValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Hash the discriminant first
        std::mem::discriminant(&self.0).hash(state);

        match &self.0 {
            Value::Unit => {}
            Value::Bool(b) => b.hash(state),
            Value::I64(n) => n.hash(state),
            Value::Str(s) => s.hash(state),
            // Floats and handles panic - should check is_hashable first
            _ => panic!("Attempted to hash non-hashable Value: {:?}", self.0),
        }
    }
}

impl PartialEq for KeyValue {
    fn eq(&self, other: &Self) -> bool {
        // Delegate to Value's PartialEq
        self.0 == other.0
    }
}

impl Eq for KeyValue {}
