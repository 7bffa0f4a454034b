//! # Type Resolver
//!
//! Turns a type token into a [`ResolvedType`].
//!
//! ## Token Grammar
//!
//! ```text
//! token     := internal | typed | reference
//! internal  := marker ( primitive | typed )
//! marker    := "internal:" | "_"
//! primitive := "string" | "int" | "float" | "boolean" | "array"
//! typed     := "array[" token "]"
//! reference := <declared type name>
//! ```
//!
//! The `_` marker is the legacy spelling (`_string`, `_array[field]`).
//! A typed array is accepted with or without a marker.
//!
//! Anything else fails with [`SchemaError::UnknownType`] naming the
//! innermost token that failed and the type that contains it.

use std::collections::HashSet;

use arb_core::{PrimitiveKind, ResolvedType, SnakeIdent, TypeRef};

use crate::error::SchemaError;

const INTERNAL_MARKER: &str = "internal:";
const LEGACY_MARKER: char = '_';

/// Resolves tokens against the set of types declared in one schema.
#[derive(Debug, Clone)]
pub struct TypeResolver<'a> {
    known: HashSet<&'a str>,
    namespace: Option<&'a str>,
    separator: &'a str,
}

impl<'a> TypeResolver<'a> {
    /// Build a resolver for the given declared type names.
    pub fn new(
        known: impl IntoIterator<Item = &'a SnakeIdent>,
        namespace: Option<&'a str>,
        separator: &'a str,
    ) -> Self {
        Self {
            known: known.into_iter().map(|n| n.as_str()).collect(),
            namespace,
            separator,
        }
    }

    /// Whether `name` is a declared type.
    pub fn is_known(&self, name: &str) -> bool {
        self.known.contains(name)
    }

    /// Resolve `token`, found in the definition of `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownType`] if the token (or an inner token
    /// of a typed array) is neither internal nor a declared type.
    pub fn resolve(&self, token: &str, owner: &str) -> Result<ResolvedType, SchemaError> {
        let token = token.trim();

        if let Some(rest) = strip_marker(token) {
            if let Some(inner) = typed_array_inner(rest) {
                return Ok(ResolvedType::ArrayOf(Box::new(self.resolve(inner, owner)?)));
            }
            return PrimitiveKind::parse(rest)
                .map(ResolvedType::Primitive)
                .ok_or_else(|| SchemaError::unknown_type(token, owner));
        }

        if let Some(inner) = typed_array_inner(token) {
            return Ok(ResolvedType::ArrayOf(Box::new(self.resolve(inner, owner)?)));
        }

        self.resolve_reference(token, owner).map(ResolvedType::Reference)
    }

    /// Resolve `token` and render it in document mode (`field[]` style).
    pub fn resolve_for_docs(&self, token: &str, owner: &str) -> Result<String, SchemaError> {
        Ok(self.resolve(token, owner)?.doc_name())
    }

    /// Resolve a bare type name, as used by `_parent`.
    pub fn resolve_reference(&self, name: &str, owner: &str) -> Result<TypeRef, SchemaError> {
        if !self.is_known(name) {
            return Err(SchemaError::unknown_type(name, owner));
        }
        let ident = SnakeIdent::parse(name).map_err(|_| SchemaError::unknown_type(name, owner))?;
        Ok(TypeRef::new(ident, self.namespace, self.separator))
    }
}

fn strip_marker(token: &str) -> Option<&str> {
    token
        .strip_prefix(INTERNAL_MARKER)
        .or_else(|| token.strip_prefix(LEGACY_MARKER))
}

fn typed_array_inner(s: &str) -> Option<&str> {
    let inner = s.strip_prefix("array[")?.strip_suffix(']')?;
    if inner.trim().is_empty() {
        None
    } else {
        Some(inner)
    }
}
