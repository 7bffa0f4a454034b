//! # Resolved Types
//!
//! The canonical form of a schema type token after resolution. Tokens such
//! as `internal:string`, `internal:array[field]` or `field` resolve into a
//! [`ResolvedType`], which is what descriptors store and what the runtime
//! store validates against.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::naming::{pascal_case, SnakeIdent};

/// Built-in kinds reachable through the internal marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    /// `internal:string`.
    String,
    /// `internal:int`.
    Int,
    /// `internal:float`.
    Float,
    /// `internal:boolean`.
    Boolean,
    /// `internal:array`, an array with no declared element type.
    Array,
}

impl PrimitiveKind {
    /// Parse the part of a token after the internal marker.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "string" => Some(Self::String),
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "boolean" => Some(Self::Boolean),
            "array" => Some(Self::Array),
            _ => None,
        }
    }

    /// The token spelling of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Array => "array",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference to another declared type of the same schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    name: SnakeIdent,
    qualified: String,
}

impl TypeRef {
    /// Build a reference to `name`, qualified by `namespace` when present.
    ///
    /// `TypeRef::new(field, Some("search.query"), ".")` qualifies to
    /// `search.query.Field`.
    pub fn new(name: SnakeIdent, namespace: Option<&str>, separator: &str) -> Self {
        let class = name.to_pascal_case();
        let qualified = match namespace {
            Some(ns) if !ns.is_empty() => format!("{ns}{separator}{class}"),
            _ => class,
        };
        Self { name, qualified }
    }

    /// The schema name of the referenced type (`example_type`).
    pub fn name(&self) -> &SnakeIdent {
        &self.name
    }

    /// The fully qualified class name (`search.query.ExampleType`).
    pub fn qualified(&self) -> &str {
        &self.qualified
    }

    /// The unqualified class name (`ExampleType`).
    pub fn class_name(&self) -> String {
        self.name.to_pascal_case()
    }
}

/// What a property (or wildcard slot) may hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum ResolvedType {
    /// A built-in kind, including the opaque `array`.
    Primitive(PrimitiveKind),
    /// A typed array, `array[<inner>]`.
    ArrayOf(Box<ResolvedType>),
    /// Another declared type.
    Reference(TypeRef),
}

impl ResolvedType {
    /// Whether values of this type are collections (opaque or typed arrays).
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Primitive(PrimitiveKind::Array) | Self::ArrayOf(_))
    }

    /// The declared element type of a typed array.
    ///
    /// Opaque arrays and non-array types have no element type.
    pub fn element_type(&self) -> Option<&ResolvedType> {
        match self {
            Self::ArrayOf(inner) => Some(&**inner),
            _ => None,
        }
    }

    /// The snake_case name used to derive `append<Name>` accessors.
    ///
    /// References use the referenced type's schema name, primitives their
    /// token spelling, nested typed arrays `array`.
    pub fn element_name(&self) -> String {
        match self {
            Self::Primitive(kind) => kind.as_str().to_string(),
            Self::ArrayOf(_) => PrimitiveKind::Array.as_str().to_string(),
            Self::Reference(r) => r.name().as_str().to_string(),
        }
    }

    /// Rendering for generated signatures: typed arrays collapse to `array`.
    pub fn code_name(&self) -> String {
        match self {
            Self::Primitive(kind) => kind.as_str().to_string(),
            Self::ArrayOf(_) => PrimitiveKind::Array.as_str().to_string(),
            Self::Reference(r) => r.qualified().to_string(),
        }
    }

    /// Rendering for documentation: typed arrays become `T[]`.
    pub fn doc_name(&self) -> String {
        match self {
            Self::ArrayOf(inner) => format!("{}[]", inner.doc_name()),
            other => other.code_name(),
        }
    }

    /// PascalCase accessor suffix for the element name.
    pub fn accessor_suffix(&self) -> String {
        pascal_case(&self.element_name())
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code_name())
    }
}
