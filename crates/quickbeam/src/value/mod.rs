//! Value representation for record fields

mod display;
mod hashable;
mod impls;
mod record;

pub use hashable::KeyValue;
pub use record::Record;

use crate::region::Handle;

/// A single field value.
///
/// Values are organized into two tiers:
/// - Tier 1: Inline primitives (value semantics — a copy is independent)
/// - Tier 2: Shared-region handles (reference semantics — a copy names
///   the same resident record)
#[derive(Clone, PartialEq)]
pub enum Value {
    // ═══════════════════════════════════════════════════════════════════
    // Tier 1: Inline Primitives
    // ═══════════════════════════════════════════════════════════════════
    /// The unit value `()`
    Unit,

    /// Boolean: `true` or `false`
    Bool(bool),

    /// 64-bit signed integer (default integer type)
    I64(i64),

    /// 64-bit floating point (default float type)
    F64(f64),

    /// Owned text, copied along with the record that holds it
    Str(String),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 2: Shared-Region Handles
    // ═══════════════════════════════════════════════════════════════════
    /// The name of a shared-region slot.
    ///
    /// Cloning a `Handle` value clones the name only — it does not create
    /// an ownership. Ownership moves through [`Region`](crate::Region)
    /// operations (`retain`, `release`, `clone_record`), never through
    /// `Clone`.
    Handle(Handle),
}
