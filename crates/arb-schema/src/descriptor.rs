//! # Class Descriptors
//!
//! The compiled, immutable form of one schema type. A descriptor lists the
//! type's own properties, its parent link, its wildcard type, and the
//! accessor intents an emitter or the runtime dispatch table must provide.
//!
//! Inherited properties and accessors are not repeated on the child: the
//! runtime registry walks the parent chain to build the effective set.

use arb_core::{ResolvedType, SnakeIdent, TypeRef};
use indexmap::IndexMap;
use serde::Serialize;

/// Which store primitive an accessor maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessorKind {
    /// `get<Prop>()`.
    Get,
    /// `set<Prop>(value)`.
    Set,
    /// `add<Prop>(value, key?)`, for typed-array properties.
    Add,
    /// `append<Type>(value, key?)`, for wildcard-open types.
    Append,
}

impl AccessorKind {
    /// The accessor-name prefix.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Set => "set",
            Self::Add => "add",
            Self::Append => "append",
        }
    }
}

/// One accessor a generated class exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessorIntent {
    /// Full accessor name, e.g. `setZeroTermsQuery` or `appendField`.
    pub name: String,
    /// The store primitive behind it.
    pub kind: AccessorKind,
    /// Property name for get/set/add, element type name for append.
    pub target: String,
    /// Return type for get, parameter type for set, element type for
    /// add/append.
    pub value_type: ResolvedType,
}

impl AccessorIntent {
    pub(crate) fn new(kind: AccessorKind, target: &str, value_type: ResolvedType) -> Self {
        Self {
            name: format!("{}{}", kind.prefix(), arb_core::pascal_case(target)),
            kind,
            target: target.to_string(),
            value_type,
        }
    }

    /// Whether the accessor takes an optional key argument.
    pub fn is_keyed(&self) -> bool {
        matches!(self.kind, AccessorKind::Add | AccessorKind::Append)
    }
}

/// The compiled contract of one schema type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDescriptor {
    name: SnakeIdent,
    namespace: Option<String>,
    qualified_name: String,
    parent: Option<TypeRef>,
    properties: IndexMap<SnakeIdent, ResolvedType>,
    wildcard: Option<ResolvedType>,
    accessors: Vec<AccessorIntent>,
}

impl ClassDescriptor {
    pub(crate) fn new(
        this: TypeRef,
        namespace: Option<String>,
        parent: Option<TypeRef>,
        properties: IndexMap<SnakeIdent, ResolvedType>,
        wildcard: Option<ResolvedType>,
        accessors: Vec<AccessorIntent>,
    ) -> Self {
        Self {
            qualified_name: this.qualified().to_string(),
            name: this.name().clone(),
            namespace,
            parent,
            properties,
            wildcard,
            accessors,
        }
    }

    /// Schema name of the type (`example_type`).
    pub fn name(&self) -> &SnakeIdent {
        &self.name
    }

    /// Class name (`ExampleType`).
    pub fn class_name(&self) -> String {
        self.name.to_pascal_case()
    }

    /// Output namespace, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Namespace-qualified class name.
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// The `_parent` type, if any.
    pub fn parent(&self) -> Option<&TypeRef> {
        self.parent.as_ref()
    }

    /// Own explicit properties, in schema order.
    pub fn properties(&self) -> &IndexMap<SnakeIdent, ResolvedType> {
        &self.properties
    }

    /// Own `_any` type. Inherited wildcards are not reflected here.
    pub fn wildcard(&self) -> Option<&ResolvedType> {
        self.wildcard.as_ref()
    }

    /// Whether this type itself declares `_any`.
    pub fn is_open(&self) -> bool {
        self.wildcard.is_some()
    }

    /// Own accessor intents, in declaration order.
    pub fn accessors(&self) -> &[AccessorIntent] {
        &self.accessors
    }
}
