//! # Error Types: Identifier Validation
//!
//! Errors raised while validating schema identifiers. Every variant carries
//! the offending identifier so callers can report it without re-deriving it.

use thiserror::Error;

/// A schema name that is not a valid snake_case identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// The identifier is the empty string.
    #[error("identifier must not be empty")]
    Empty,

    /// The identifier contains a character outside `[a-z0-9_]`.
    #[error("identifier '{ident}' contains invalid character {ch:?}")]
    InvalidCharacter {
        /// The rejected identifier.
        ident: String,
        /// The first offending character.
        ch: char,
    },

    /// The identifier has a leading, trailing, or doubled underscore.
    #[error("identifier '{ident}' has an empty segment")]
    EmptySegment {
        /// The rejected identifier.
        ident: String,
    },

    /// A segment starts with a digit, which camel casing cannot round-trip.
    #[error("identifier '{ident}' has a segment starting with a digit")]
    LeadingDigit {
        /// The rejected identifier.
        ident: String,
    },
}
