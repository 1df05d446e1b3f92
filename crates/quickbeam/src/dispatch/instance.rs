//! Polymorphic instances: a record tagged with its variant's descriptor

use std::sync::Arc;

use super::TypeDescriptor;
use crate::error::DispatchError;
use crate::value::{Record, Value};

/// A record tagged with the descriptor of its concrete variant.
///
/// The descriptor reference is assigned once, here, and never changes
/// for the instance's lifetime. Instances of different variants sharing
/// a capability can sit behind the same variable type (e.g. in one
/// `Vec<Instance>`) and still invoke their own implementations.
#[derive(Debug, Clone)]
pub struct Instance {
    descriptor: Arc<TypeDescriptor>,

    /// The instance's payload record
    pub record: Record,
}

impl Instance {
    /// Create an instance of the variant `descriptor` describes.
    pub fn new(descriptor: Arc<TypeDescriptor>, record: Record) -> Self {
        Self { descriptor, record }
    }

    /// The descriptor of this instance's concrete variant.
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// Resolve `operation` through this instance's descriptor and apply
    /// it to the instance's record.
    ///
    /// # Errors
    ///
    /// [`DispatchError::UndeclaredOperation`] if the capability never
    /// declared `operation`.
    pub fn invoke(&self, operation: &str) -> Result<Value, DispatchError> {
        let resolution = self.descriptor.resolve(operation)?;
        Ok(resolution.implementation()(&self.record))
    }
}
