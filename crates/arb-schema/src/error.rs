//! # Schema Errors
//!
//! Every failure of loading, parsing, or compiling a schema. All compile
//! errors are deterministic functions of the schema document: retrying the
//! same compile yields the same error.

use arb_core::IdentifierError;
use thiserror::Error;

/// Error raised while loading or compiling a schema.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A type token names neither a primitive nor a declared type.
    #[error("unknown type '{token}' in type '{type_name}'")]
    UnknownType {
        /// The token that failed to resolve.
        token: String,
        /// The type whose definition contains the token.
        type_name: String,
    },

    /// A type or property name is not a valid snake_case identifier.
    #[error("invalid identifier '{name}' in type '{type_name}': {source}")]
    InvalidIdentifier {
        /// The type being read when the identifier was rejected.
        type_name: String,
        /// The rejected name.
        name: String,
        /// What is wrong with it.
        #[source]
        source: IdentifierError,
    },

    /// The document does not have the expected structure.
    #[error("malformed schema at '{path}': {reason}")]
    Malformed {
        /// Slash-separated location within the document.
        path: String,
        /// What was expected there.
        reason: String,
    },

    /// A `_parent` chain loops back on itself.
    #[error("inheritance cycle: {}", chain.join(" -> "))]
    InheritanceCycle {
        /// The chain of type names, starting and ending with the same name.
        chain: Vec<String>,
    },

    /// A schema or options file could not be read or decoded.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoad {
        /// Path of the file.
        path: String,
        /// Reason the file could not be loaded.
        reason: String,
    },
}

impl SchemaError {
    pub(crate) fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown_type(token: &str, type_name: &str) -> Self {
        Self::UnknownType {
            token: token.to_string(),
            type_name: type_name.to_string(),
        }
    }
}
