//! # Instances
//!
//! An [`Instance`] is one object of a runtime [`Class`]: a reference to the
//! class plus a private data bag. Every write passes the class's validity
//! predicate first and either fully applies or leaves the bag untouched.
//!
//! ## Dual-mode `add`
//!
//! `add(key, property, value)` covers two accessor families:
//!
//! - `property` names an explicit array property: the value goes into that
//!   property's collection, under `key` or appended.
//! - `property` is not explicit but the class is open: the value goes into
//!   the instance's own top-level bag, under `key` or appended. This is
//!   what `append<Type>` does.
//! - No `property`: `key` is treated as a property name and the call is a
//!   plain `set`.
//!
//! ## Rendering
//!
//! [`Instance::to_array`] renders the bag recursively into plain JSON.
//! The [`serde::Serialize`] impl produces the same structure, so
//! `serde_json::to_value(&instance)` and `instance.to_array()` agree.

use std::sync::Arc;

use arb_core::{PrimitiveKind, ResolvedType};
use serde::{Serialize, Serializer};
use serde_json::Value as Json;

use crate::class::{Accessor, Class};
use crate::error::StoreError;
use crate::value::{Collection, Key, Value};

/// Arguments to a dynamically dispatched accessor call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    value: Option<Value>,
    key: Option<String>,
}

impl Args {
    /// No arguments, as for `get<Prop>()`.
    pub fn none() -> Self {
        Self::default()
    }

    /// A single value argument.
    pub fn value(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            key: None,
        }
    }

    /// A value and a key, as for `add<Prop>(value, key)`.
    pub fn keyed(value: impl Into<Value>, key: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            key: Some(key.into()),
        }
    }
}

/// One object of a runtime class.
#[derive(Debug, Clone)]
pub struct Instance {
    class: Arc<Class>,
    data: Collection,
}

impl Instance {
    pub(crate) fn new(class: Arc<Class>) -> Self {
        Self {
            class,
            data: Collection::new(),
        }
    }

    /// The class of this instance.
    pub fn class(&self) -> &Arc<Class> {
        &self.class
    }

    /// Whether this instance's class is `name` or inherits from it.
    pub fn is_a(&self, name: &str) -> bool {
        self.class.is_a(name)
    }

    /// The raw data bag.
    pub fn data(&self) -> &Collection {
        &self.data
    }

    /// See [`Class::has_property`].
    pub fn has_property(&self, name: &str) -> Option<&ResolvedType> {
        self.class.has_property(name)
    }

    /// Store `value` under `name`, replacing any previous value.
    ///
    /// Array-typed slots accept only collections or `Null`.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self, StoreError> {
        let value = value.into();
        let ty = self.require(name)?;
        if ty.is_array() && !(value.is_list() || value.is_null()) {
            return Err(StoreError::TypeMismatch {
                class: self.class_name(),
                property: name.to_string(),
                expected: ty.doc_name(),
                found: value.kind_name(),
            });
        }
        tracing::trace!(class = %self.class.qualified_name(), property = name, "set");
        self.data.insert(Key::parse(name), value);
        Ok(self)
    }

    /// By-value form of [`set`](Self::set) for building nested values
    /// inline.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self, StoreError> {
        self.set(name, value)?;
        Ok(self)
    }

    /// The stored value, or `None` if nothing was stored under `name`.
    pub fn get(&self, name: &str) -> Result<Option<&Value>, StoreError> {
        self.require(name)?;
        Ok(self.data.get(&Key::parse(name)))
    }

    /// Dual-mode add. See the module docs.
    pub fn add(
        &mut self,
        key: Option<&str>,
        property: Option<&str>,
        value: impl Into<Value>,
    ) -> Result<&mut Self, StoreError> {
        let value = value.into();
        let Some(property) = property else {
            let name = key.ok_or_else(|| StoreError::UnknownProperty {
                class: self.class_name(),
                property: String::new(),
            })?;
            return self.set(name, value);
        };

        let class = Arc::clone(&self.class);
        match class.property_type(property) {
            Some(ty) if ty.is_array() => {
                self.add_to_property(property, key, value)?;
                Ok(self)
            }
            Some(ty) => Err(StoreError::NotArray {
                class: self.class_name(),
                property: property.to_string(),
                declared: ty.doc_name(),
            }),
            None if class.is_open() => self.append(value, key),
            None => Err(StoreError::UnknownProperty {
                class: self.class_name(),
                property: property.to_string(),
            }),
        }
    }

    /// Append to the top-level bag of an open class, under `key` or at the
    /// next sequential index.
    pub fn append(
        &mut self,
        value: impl Into<Value>,
        key: Option<&str>,
    ) -> Result<&mut Self, StoreError> {
        let Some(wildcard) = self.class.wildcard() else {
            return Err(StoreError::NotOpen {
                class: self.class_name(),
            });
        };
        if !wildcard.is_array() {
            return Err(StoreError::NotArray {
                class: self.class_name(),
                property: wildcard.element_name(),
                declared: wildcard.doc_name(),
            });
        }

        let value = value.into();
        match key {
            Some(k) => {
                tracing::trace!(class = %self.class.qualified_name(), key = k, "append keyed");
                self.data.insert(Key::parse(k), value);
            }
            None => {
                let index = self.data.push(value).ok_or_else(|| StoreError::IndexExhausted {
                    class: self.class_name(),
                    slot: "instance bag".to_string(),
                })?;
                tracing::trace!(class = %self.class.qualified_name(), index, "append");
            }
        }
        Ok(self)
    }

    /// Invoke an accessor by name.
    ///
    /// Getters return `Some`, with [`Value::Null`] for an unset property.
    /// Mutators return `None`. A missing value argument is passed as
    /// [`Value::Null`].
    pub fn call(&mut self, accessor: &str, args: Args) -> Result<Option<Value>, StoreError> {
        let Args { value, key } = args;
        let value = value.unwrap_or_default();
        match self.class.resolve_accessor(accessor)? {
            Accessor::Get(p) => Ok(Some(self.get(&p)?.cloned().unwrap_or_default())),
            Accessor::Set(p) => self.set(&p, value).map(|_| None),
            Accessor::Add(p) => self.add(key.as_deref(), Some(&p), value).map(|_| None),
            Accessor::Append(_) => self.append(value, key.as_deref()).map(|_| None),
        }
    }

    /// Render the data bag recursively into plain JSON.
    pub fn to_array(&self) -> Json {
        self.data.to_array()
    }

    fn require(&self, name: &str) -> Result<&ResolvedType, StoreError> {
        self.class
            .has_property(name)
            .ok_or_else(|| StoreError::UnknownProperty {
                class: self.class_name(),
                property: name.to_string(),
            })
    }

    fn add_to_property(
        &mut self,
        property: &str,
        key: Option<&str>,
        value: Value,
    ) -> Result<(), StoreError> {
        let list = self
            .data
            .collection_mut(Key::parse(property))
            .map_err(|found| StoreError::TypeMismatch {
                class: self.class.qualified_name().to_string(),
                property: property.to_string(),
                expected: PrimitiveKind::Array.as_str().to_string(),
                found,
            })?;
        match key {
            Some(k) => {
                list.insert(Key::parse(k), value);
            }
            None => {
                list.push(value).ok_or_else(|| StoreError::IndexExhausted {
                    class: self.class.qualified_name().to_string(),
                    slot: property.to_string(),
                })?;
            }
        }
        tracing::trace!(class = %self.class.qualified_name(), property, "add");
        Ok(())
    }

    fn class_name(&self) -> String {
        self.class.qualified_name().to_string()
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.class.qualified_name() == other.class.qualified_name() && self.data == other.data
    }
}

impl Serialize for Instance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_array().serialize(serializer)
    }
}
