//! Builders for capabilities and type descriptors

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use super::{Capability, Implementation, TypeDescriptor};
use crate::error::DispatchError;

/// Builder for a [`Capability`].
pub struct CapabilityBuilder {
    name: String,
    operations: IndexMap<String, Option<Implementation>>,
}

impl CapabilityBuilder {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operations: IndexMap::new(),
        }
    }

    /// Declare an operation with no default; every variant must provide
    /// its own implementation.
    pub fn operation(mut self, name: impl Into<String>) -> Self {
        self.operations.insert(name.into(), None);
        self
    }

    /// Declare an operation with a default implementation; variants may
    /// override it.
    pub fn operation_with_default(
        mut self,
        name: impl Into<String>,
        implementation: Implementation,
    ) -> Self {
        self.operations.insert(name.into(), Some(implementation));
        self
    }

    /// Finish the capability.
    pub fn build(self) -> Arc<Capability> {
        Arc::new(Capability {
            name: self.name,
            operations: self.operations,
        })
    }
}

/// Builder for a [`TypeDescriptor`]; validates table completeness.
pub struct DescriptorBuilder {
    variant: String,
    capability: Arc<Capability>,
    provided: IndexMap<String, Implementation>,
    sealed: bool,
}

impl DescriptorBuilder {
    pub(crate) fn new(variant: impl Into<String>, capability: Arc<Capability>) -> Self {
        Self {
            variant: variant.into(),
            capability,
            provided: IndexMap::new(),
            sealed: false,
        }
    }

    /// Provide (or override) the implementation of a declared operation.
    ///
    /// An override replaces the capability's default entry; the table
    /// never grows a second entry for the same name.
    pub fn operation(mut self, name: impl Into<String>, implementation: Implementation) -> Self {
        self.provided.insert(name.into(), implementation);
        self
    }

    /// Mark this variant as sealed: no further specialization exists, so
    /// call sites may resolve it directly.
    pub fn sealed(mut self, sealed: bool) -> Self {
        self.sealed = sealed;
        self
    }

    /// Validate and finish the descriptor.
    ///
    /// # Errors
    ///
    /// [`DispatchError::UnimplementedCapability`] if a declared operation
    /// ends up with neither a default nor a provided implementation;
    /// [`DispatchError::UndeclaredOperation`] if an implementation was
    /// provided for an operation the capability never declared.
    pub fn build(self) -> Result<Arc<TypeDescriptor>, DispatchError> {
        for name in self.provided.keys() {
            if !self.capability.declares(name) {
                return Err(DispatchError::UndeclaredOperation {
                    capability: self.capability.name.clone(),
                    operation: name.clone(),
                });
            }
        }

        let mut table = IndexMap::new();
        for operation in self.capability.operations() {
            let implementation = self
                .provided
                .get(operation)
                .copied()
                .or_else(|| self.capability.default_of(operation))
                .ok_or_else(|| DispatchError::UnimplementedCapability {
                    variant: self.variant.clone(),
                    capability: self.capability.name.clone(),
                    operation: operation.to_string(),
                })?;
            table.insert(operation.to_string(), implementation);
        }

        debug!(
            variant = %self.variant,
            capability = %self.capability.name,
            sealed = self.sealed,
            "descriptor built"
        );

        Ok(Arc::new(TypeDescriptor {
            variant: self.variant,
            capability: self.capability,
            table,
            sealed: self.sealed,
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Capability, Record, TypeDescriptor, Value};

    #[test]
    fn test_capability_declares() {
        let capability = Capability::builder("Widget")
            .operation("draw")
            .operation_with_default("describe", |r| Value::string(r.type_name.clone()))
            .build();

        assert!(capability.declares("draw"));
        assert!(capability.declares("describe"));
        assert!(!capability.declares("resize"));
        assert_eq!(capability.operations().count(), 2);
    }

    #[test]
    fn test_build_fills_table_from_defaults() {
        let capability = Capability::builder("Widget")
            .operation_with_default("describe", |r| Value::string(r.type_name.clone()))
            .build();

        let descriptor = TypeDescriptor::builder("Label", capability).build().unwrap();
        let record = Record::new("Label");
        let resolution = descriptor.resolve("describe").unwrap();
        assert_eq!(
            resolution.implementation()(&record),
            Value::string("Label")
        );
    }

    #[test]
    fn test_build_rejects_missing_operation() {
        let capability = Capability::builder("Widget").operation("draw").build();

        let err = TypeDescriptor::builder("Label", capability)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            crate::DispatchError::UnimplementedCapability { .. }
        ));
    }

    #[test]
    fn test_build_rejects_undeclared_operation() {
        let capability = Capability::builder("Widget").operation("draw").build();

        let err = TypeDescriptor::builder("Label", capability)
            .operation("draw", |_| Value::Unit)
            .operation("resize", |_| Value::Unit)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            crate::DispatchError::UndeclaredOperation { .. }
        ));
    }
}
