//! Error types for the runtime store.

use arb_schema::SchemaError;
use thiserror::Error;

/// Errors raised by instance operations and the class registry.
///
/// Instance operations that return one of these leave the instance
/// unchanged.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Property is neither explicit nor covered by a wildcard.
    #[error("{class}: unknown property \"{property}\"")]
    UnknownProperty {
        /// Qualified name of the instance's class.
        class: String,
        /// The rejected property name.
        property: String,
    },

    /// Value does not fit the property's declared type.
    #[error("{class}.{property}: expected {expected}, got {found}")]
    TypeMismatch {
        /// Qualified name of the instance's class.
        class: String,
        /// The property being written.
        property: String,
        /// Declared type, in document rendering.
        expected: String,
        /// Kind of the value that was offered.
        found: &'static str,
    },

    /// `add` targeted a property whose type is not an array.
    #[error("{class}.{property}: cannot add to non-array type {declared}")]
    NotArray {
        /// Qualified name of the instance's class.
        class: String,
        /// The targeted property, or the wildcard's element name.
        property: String,
        /// Declared type of the slot, in document rendering.
        declared: String,
    },

    /// Accessor name does not match any accessor on the class.
    #[error("{class}: no accessor named \"{accessor}\"")]
    InvalidAccessor {
        /// Qualified name of the instance's class.
        class: String,
        /// The accessor name that failed to dispatch.
        accessor: String,
    },

    /// Wildcard append on a class without `_any`.
    #[error("{class} is not open: it declares no wildcard type")]
    NotOpen {
        /// Qualified name of the instance's class.
        class: String,
    },

    /// Unkeyed append after the sequential index reached `u64::MAX`.
    #[error("{class}: no sequential index left in {slot}")]
    IndexExhausted {
        /// Qualified name of the instance's class.
        class: String,
        /// The property collection, or `instance bag` for wildcard appends.
        slot: String,
    },

    /// Registry lookup for an unregistered class.
    #[error("unknown class \"{name}\"")]
    UnknownClass {
        /// The requested schema name.
        name: String,
    },

    /// A descriptor names a parent that was not registered with it.
    #[error("{class}: parent \"{parent}\" is not registered")]
    MissingParent {
        /// Schema name of the class being linked.
        class: String,
        /// Schema name of its missing parent.
        parent: String,
    },

    /// Building a registry from a schema failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
