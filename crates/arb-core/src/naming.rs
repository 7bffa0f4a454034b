//! # Naming: snake_case ⇄ camelCase Transforms
//!
//! Schemas name types and properties in snake_case. Generated classes use
//! PascalCase class names and camelCase accessors (`setZeroTermsQuery`).
//! The runtime store maps accessor suffixes back to schema names with
//! [`decamelize`].
//!
//! ## Round-Trip Invariant
//!
//! For every [`SnakeIdent`] `x`, `decamelize(&pascal_case(x)) == x` and
//! `decamelize(&camel_case(x)) == x`. This holds because a valid identifier
//! has no upper-case letters and every segment starts with a lower-case
//! letter, so every upper-case letter in the camelized form marks exactly
//! one segment boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::IdentifierError;

/// Split `scored` on underscores, lower-case each segment, upper-case the
/// first letter of each segment, and join the segments with `glue`.
///
/// `join_words("zero_terms_query", "")` is `"ZeroTermsQuery"`;
/// `join_words("example_type", "\\")` is `"Example\\Type"`.
pub fn join_words(scored: &str, glue: &str) -> String {
    scored
        .split('_')
        .map(|segment| upper_first(&segment.to_lowercase()))
        .collect::<Vec<_>>()
        .join(glue)
}

/// PascalCase form used for class names: `example_type` → `ExampleType`.
pub fn pascal_case(scored: &str) -> String {
    join_words(scored, "")
}

/// camelCase form used for member names: `example_type` → `exampleType`.
pub fn camel_case(scored: &str) -> String {
    lower_first(&pascal_case(scored))
}

/// Inverse of [`pascal_case`] / [`camel_case`]: `ZeroTermsQuery` and
/// `zeroTermsQuery` both become `zero_terms_query`.
pub fn decamelize(camel: &str) -> String {
    let mut out = String::with_capacity(camel.len() + 4);
    for (i, ch) in camel.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A validated snake_case schema identifier.
///
/// Grammar: one or more segments of `[a-z][a-z0-9]*`, joined by single
/// underscores. The inner string is private; [`SnakeIdent::parse`] is the
/// only constructor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SnakeIdent(String);

impl SnakeIdent {
    /// Validate and wrap a schema identifier.
    ///
    /// # Errors
    ///
    /// Returns an [`IdentifierError`] describing the first violation found.
    pub fn parse(s: &str) -> Result<Self, IdentifierError> {
        if s.is_empty() {
            return Err(IdentifierError::Empty);
        }
        if let Some(ch) = s
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_'))
        {
            return Err(IdentifierError::InvalidCharacter {
                ident: s.to_string(),
                ch,
            });
        }
        for segment in s.split('_') {
            match segment.chars().next() {
                None => {
                    return Err(IdentifierError::EmptySegment {
                        ident: s.to_string(),
                    })
                }
                Some(c) if c.is_ascii_digit() => {
                    return Err(IdentifierError::LeadingDigit {
                        ident: s.to_string(),
                    })
                }
                Some(_) => {}
            }
        }
        Ok(Self(s.to_string()))
    }

    /// The identifier as written in the schema.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// PascalCase class-name form.
    pub fn to_pascal_case(&self) -> String {
        pascal_case(&self.0)
    }

    /// camelCase member-name form.
    pub fn to_camel_case(&self) -> String {
        camel_case(&self.0)
    }
}

impl TryFrom<String> for SnakeIdent {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SnakeIdent> for String {
    fn from(ident: SnakeIdent) -> Self {
        ident.0
    }
}

impl AsRef<str> for SnakeIdent {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnakeIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
