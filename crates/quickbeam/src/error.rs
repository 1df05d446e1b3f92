//! Error types for region and dispatch operations

use thiserror::Error;

use crate::region::Handle;

/// Errors from shared-region operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegionError {
    /// The handle's slot has already been reclaimed.
    ///
    /// This is a contract violation, not a recoverable condition: the
    /// storage behind the handle is gone, and a caller that continues
    /// past this error is operating on memory it no longer owns.
    #[error("use after free: handle {handle} was reclaimed (owner count reached zero)")]
    UseAfterFree {
        /// The stale handle
        handle: Handle,
    },

    /// Field lookup miss on a record.
    #[error("unknown field `{field}` on `{type_name}`")]
    UnknownField {
        /// Type name of the record
        type_name: String,
        /// The missing field name
        field: String,
    },
}

/// Errors from building type descriptors or resolving operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// A variant failed to populate its table for a declared operation.
    ///
    /// Raised when the descriptor is built, never at call time: a
    /// descriptor with a hole in its table cannot be constructed.
    #[error(
        "variant `{variant}` implements capability `{capability}` \
         but provides no entry for `{operation}`"
    )]
    UnimplementedCapability {
        /// The offending variant
        variant: String,
        /// The capability it claims to implement
        capability: String,
        /// The declared operation with no implementation
        operation: String,
    },

    /// The operation is not part of the capability's declared set.
    #[error("capability `{capability}` declares no operation `{operation}`")]
    UndeclaredOperation {
        /// The capability consulted
        capability: String,
        /// The unknown operation name
        operation: String,
    },
}

/// Main error type for Quickbeam operations
#[derive(Error, Debug)]
pub enum QuickbeamError {
    /// Region/ownership error
    #[error(transparent)]
    Region(#[from] RegionError),

    /// Dispatch error
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Result type alias for Quickbeam operations
pub type Result<T> = std::result::Result<T, QuickbeamError>;
