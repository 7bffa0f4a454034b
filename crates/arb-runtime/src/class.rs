//! # Runtime Classes and the Class Registry
//!
//! A [`Class`] is a [`ClassDescriptor`] linked to its ancestors. Linking
//! flattens the parent chain once, up front:
//!
//! - **Properties**: ancestor properties first, own properties after. A
//!   child redeclaring an inherited property overrides its type and keeps
//!   its position.
//! - **Wildcard**: own `_any`, or the nearest ancestor's.
//! - **Dispatch table**: accessor name to store primitive, ancestors first,
//!   so a child's accessor shadows an inherited one of the same name.
//!
//! A [`ClassRegistry`] owns every class of one compiled schema and is the
//! factory entry point: `registry.create("field")` returns an empty
//! [`Instance`] of `Field`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use arb_core::{decamelize, ResolvedType, SnakeIdent};
use arb_schema::{AccessorKind, ClassDescriptor, SchemaCompiler, SchemaError};
use indexmap::IndexMap;
use serde_json::Value as Json;

use crate::error::StoreError;
use crate::instance::Instance;

/// The store primitive an accessor name dispatches to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessor {
    /// Read a property.
    Get(String),
    /// Write a property.
    Set(String),
    /// Add to an array-typed property.
    Add(String),
    /// Append to the wildcard bag. Carries the element type name.
    Append(String),
}

impl Accessor {
    fn from_intent(kind: AccessorKind, target: &str) -> Self {
        let target = target.to_string();
        match kind {
            AccessorKind::Get => Self::Get(target),
            AccessorKind::Set => Self::Set(target),
            AccessorKind::Add => Self::Add(target),
            AccessorKind::Append => Self::Append(target),
        }
    }

    /// Derive an accessor from its name alone: `getZeroTermsQuery` becomes
    /// `Get("zero_terms_query")`. Only `get`, `set` and `add` prefixes are
    /// recognised, and the remainder must start with an uppercase letter.
    pub fn parse_name(name: &str) -> Option<Self> {
        let (ctor, rest): (fn(String) -> Self, &str) = if let Some(rest) = name.strip_prefix("get")
        {
            (Self::Get, rest)
        } else if let Some(rest) = name.strip_prefix("set") {
            (Self::Set, rest)
        } else if let Some(rest) = name.strip_prefix("add") {
            (Self::Add, rest)
        } else {
            return None;
        };
        if !rest.starts_with(|c: char| c.is_ascii_uppercase()) {
            return None;
        }
        let property = decamelize(rest);
        SnakeIdent::parse(&property).ok()?;
        Some(ctor(property))
    }
}

/// A linked, immutable runtime class.
#[derive(Debug)]
pub struct Class {
    descriptor: ClassDescriptor,
    lineage: Vec<SnakeIdent>,
    properties: IndexMap<String, ResolvedType>,
    wildcard: Option<ResolvedType>,
    dispatch: HashMap<String, Accessor>,
}

impl Class {
    fn link(descriptor: ClassDescriptor, parent: Option<&Class>) -> Self {
        let mut lineage = vec![descriptor.name().clone()];
        let mut properties = IndexMap::new();
        let mut wildcard = None;
        let mut dispatch = HashMap::new();

        if let Some(parent) = parent {
            lineage.extend(parent.lineage.iter().cloned());
            properties = parent.properties.clone();
            wildcard = parent.wildcard.clone();
            dispatch = parent.dispatch.clone();
        }

        for (name, ty) in descriptor.properties() {
            properties.insert(name.as_str().to_string(), ty.clone());
        }
        if let Some(own) = descriptor.wildcard() {
            wildcard = Some(own.clone());
        }
        for intent in descriptor.accessors() {
            dispatch.insert(
                intent.name.clone(),
                Accessor::from_intent(intent.kind, &intent.target),
            );
        }

        Self {
            descriptor,
            lineage,
            properties,
            wildcard,
            dispatch,
        }
    }

    /// Schema name (`example_type`).
    pub fn name(&self) -> &SnakeIdent {
        self.descriptor.name()
    }

    /// Namespace-qualified class name (`search.query.ExampleType`).
    pub fn qualified_name(&self) -> &str {
        self.descriptor.qualified_name()
    }

    /// The descriptor this class was linked from.
    pub fn descriptor(&self) -> &ClassDescriptor {
        &self.descriptor
    }

    /// Own and inherited explicit properties.
    pub fn properties(&self) -> &IndexMap<String, ResolvedType> {
        &self.properties
    }

    /// Type of an explicit (own or inherited) property.
    pub fn property_type(&self, name: &str) -> Option<&ResolvedType> {
        self.properties.get(name)
    }

    /// Effective wildcard type, own or inherited.
    pub fn wildcard(&self) -> Option<&ResolvedType> {
        self.wildcard.as_ref()
    }

    /// Whether arbitrary property names are accepted.
    pub fn is_open(&self) -> bool {
        self.wildcard.is_some()
    }

    /// Validity predicate: the type `name` may hold, or `None` if the class
    /// does not accept it. Explicit properties win over the wildcard.
    pub fn has_property(&self, name: &str) -> Option<&ResolvedType> {
        self.property_type(name).or(self.wildcard.as_ref())
    }

    /// Whether this class is `name` or inherits from it.
    pub fn is_a(&self, name: &str) -> bool {
        self.lineage.iter().any(|n| n.as_str() == name)
    }

    /// Accessor names in the dispatch table.
    pub fn accessor_names(&self) -> impl Iterator<Item = &str> {
        self.dispatch.keys().map(String::as_str)
    }

    /// Look up an accessor. Open classes fall back to deriving `get`, `set`
    /// and `add` accessors from the name.
    pub fn resolve_accessor(&self, name: &str) -> Result<Accessor, StoreError> {
        if let Some(accessor) = self.dispatch.get(name) {
            return Ok(accessor.clone());
        }
        if self.is_open() {
            if let Some(accessor) = Accessor::parse_name(name) {
                return Ok(accessor);
            }
        }
        Err(StoreError::InvalidAccessor {
            class: self.qualified_name().to_string(),
            accessor: name.to_string(),
        })
    }

    /// Factory: an empty instance of this class.
    pub fn create(self: &Arc<Self>) -> Instance {
        Instance::new(Arc::clone(self))
    }
}

/// Every linked class of one schema, keyed by schema name.
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    classes: IndexMap<String, Arc<Class>>,
}

impl ClassRegistry {
    /// Link a set of descriptors. Each descriptor's parent must be among
    /// them. Classes keep the order they were given in.
    pub fn new(descriptors: Vec<ClassDescriptor>) -> Result<Self, StoreError> {
        let order: Vec<String> = descriptors
            .iter()
            .map(|d| d.name().as_str().to_string())
            .collect();
        let mut pending: HashMap<String, ClassDescriptor> = descriptors
            .into_iter()
            .map(|d| (d.name().as_str().to_string(), d))
            .collect();

        let mut linked: HashMap<String, Arc<Class>> = HashMap::new();
        for name in &order {
            let mut visiting = HashSet::new();
            link_class(name, &mut pending, &mut linked, &mut visiting, &mut Vec::new())?;
        }

        let mut classes = IndexMap::with_capacity(order.len());
        for name in order {
            if let Some(class) = linked.remove(&name) {
                classes.insert(name, class);
            }
        }

        tracing::debug!(classes = classes.len(), "class registry linked");
        Ok(Self { classes })
    }

    /// Compile a schema and link the result.
    pub fn from_schema(compiler: &SchemaCompiler, schema: &Json) -> Result<Self, StoreError> {
        Self::new(compiler.compile_value(schema)?)
    }

    /// Look up a class by schema name.
    pub fn class(&self, name: &str) -> Option<&Arc<Class>> {
        self.classes.get(name)
    }

    /// Create an empty instance of the class named `name`.
    pub fn create(&self, name: &str) -> Result<Instance, StoreError> {
        self.class(name)
            .map(Class::create)
            .ok_or_else(|| StoreError::UnknownClass {
                name: name.to_string(),
            })
    }

    /// Classes in registration order.
    pub fn classes(&self) -> impl Iterator<Item = &Arc<Class>> {
        self.classes.values()
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the registry holds no classes.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

fn link_class(
    name: &str,
    pending: &mut HashMap<String, ClassDescriptor>,
    linked: &mut HashMap<String, Arc<Class>>,
    visiting: &mut HashSet<String>,
    chain: &mut Vec<String>,
) -> Result<Arc<Class>, StoreError> {
    if let Some(class) = linked.get(name) {
        return Ok(Arc::clone(class));
    }
    chain.push(name.to_string());
    if !visiting.insert(name.to_string()) {
        return Err(SchemaError::InheritanceCycle {
            chain: chain.clone(),
        }
        .into());
    }

    let parent_name = pending
        .get(name)
        .and_then(|d| d.parent())
        .map(|p| p.name().as_str().to_string());
    let parent = match parent_name {
        Some(parent) => {
            if !pending.contains_key(&parent) && !linked.contains_key(&parent) {
                return Err(StoreError::MissingParent {
                    class: name.to_string(),
                    parent,
                });
            }
            Some(link_class(&parent, pending, linked, visiting, chain)?)
        }
        None => None,
    };

    let descriptor = pending
        .remove(name)
        .ok_or_else(|| StoreError::UnknownClass {
            name: name.to_string(),
        })?;
    let class = Arc::new(Class::link(descriptor, parent.as_deref()));
    linked.insert(name.to_string(), Arc::clone(&class));
    Ok(class)
}
