//! Method dispatch: capabilities, type descriptors, and resolution

mod builder;
mod instance;

pub use builder::{CapabilityBuilder, DescriptorBuilder};
pub use instance::Instance;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::DispatchError;
use crate::value::{Record, Value};

/// The implementation of one operation, applied to the receiver's record.
pub type Implementation = fn(&Record) -> Value;

/// A named operation set shared by a family of variants.
///
/// Each declared operation may carry a default implementation. A variant
/// overrides by replacing the table entry for that operation; the table
/// never holds a second entry for the same name.
#[derive(Clone)]
pub struct Capability {
    /// Capability name (e.g., "Widget")
    pub name: String,

    /// Declared operations in declaration order, each optionally with a
    /// default implementation
    operations: IndexMap<String, Option<Implementation>>,
}

impl Capability {
    /// Start building a capability.
    pub fn builder(name: impl Into<String>) -> CapabilityBuilder {
        CapabilityBuilder::new(name)
    }

    /// Check if `operation` is part of the declared set.
    pub fn declares(&self, operation: &str) -> bool {
        self.operations.contains_key(operation)
    }

    /// Iterate over the declared operation names, in declaration order.
    pub fn operations(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    /// The default implementation of `operation`, if one was declared.
    pub(crate) fn default_of(&self, operation: &str) -> Option<Implementation> {
        self.operations.get(operation).copied().flatten()
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Capability({}", self.name)?;
        for (i, op) in self.operations().enumerate() {
            write!(f, "{}{}", if i == 0 { ": " } else { ", " }, op)?;
        }
        write!(f, ")")
    }
}

/// How a call site reached an implementation.
#[derive(Debug, Clone, Copy)]
pub enum Resolution {
    /// The single known implementation of a sealed variant. No table was
    /// consulted; a caller may substitute the call with its effect.
    Direct(Implementation),

    /// Found by table lookup through the receiver's descriptor.
    Table(Implementation),
}

impl Resolution {
    /// The resolved implementation, however it was found.
    pub fn implementation(self) -> Implementation {
        match self {
            Resolution::Direct(implementation) | Resolution::Table(implementation) => {
                implementation
            }
        }
    }

    /// Check if resolution skipped the table.
    pub fn is_direct(self) -> bool {
        matches!(self, Resolution::Direct(_))
    }
}

/// Immutable per-variant dispatch information.
///
/// A descriptor is assigned to an instance once, at construction, and
/// never mutated afterwards. Its table is complete over the capability by
/// construction: [`DescriptorBuilder::build`] refuses to produce a
/// descriptor with a declared-but-unimplemented operation.
pub struct TypeDescriptor {
    /// Variant name (e.g., "Badge")
    pub variant: String,

    /// The capability this variant implements
    capability: Arc<Capability>,

    /// operation name → implementation, complete over the capability
    table: IndexMap<String, Implementation>,

    /// No further specialization of this variant exists; calls resolve
    /// direct
    sealed: bool,
}

impl TypeDescriptor {
    /// Start building a descriptor for `variant` implementing
    /// `capability`.
    pub fn builder(variant: impl Into<String>, capability: Arc<Capability>) -> DescriptorBuilder {
        DescriptorBuilder::new(variant, capability)
    }

    /// The capability this variant implements.
    pub fn capability(&self) -> &Capability {
        &self.capability
    }

    /// Check if this variant is sealed (no further specialization).
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Resolve `operation` for this variant.
    ///
    /// Sealed variants resolve direct — the single implementation is
    /// returned without a table lookup, which is behaviorally
    /// indistinguishable from the table result for that variant. Others
    /// resolve through the table, an O(1) lookup the builder cannot see
    /// through ahead of time.
    ///
    /// # Errors
    ///
    /// [`DispatchError::UndeclaredOperation`] if the capability never
    /// declared `operation`. A declared operation always resolves: table
    /// completeness was enforced when the descriptor was built.
    pub fn resolve(&self, operation: &str) -> Result<Resolution, DispatchError> {
        let implementation =
            self.table
                .get(operation)
                .copied()
                .ok_or_else(|| DispatchError::UndeclaredOperation {
                    capability: self.capability.name.clone(),
                    operation: operation.to_string(),
                })?;

        Ok(if self.sealed {
            Resolution::Direct(implementation)
        } else {
            Resolution::Table(implementation)
        })
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TypeDescriptor({} as {}{})",
            self.variant,
            self.capability.name,
            if self.sealed { ", sealed" } else { "" }
        )
    }
}
