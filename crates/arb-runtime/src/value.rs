//! # Values and Collections
//!
//! [`Value`] is what an instance stores: a primitive, a nested
//! [`Instance`], or a [`Collection`].
//!
//! A [`Collection`] is an ordered associative array. Its keys are either
//! sequential indexes or names, and both kinds may be mixed in one
//! collection:
//!
//! ```text
//! push(a)        → { 0: a }
//! push(b)        → { 0: a, 1: b }
//! insert("hey")  → { 0: a, 1: b, "hey": c }
//! push(d)        → { 0: a, 1: b, "hey": c, 2: d }
//! ```
//!
//! Iteration and rendering follow insertion order. Overwriting an existing
//! key keeps its original position. A collection whose keys are exactly
//! `0..n` in order renders as a JSON array; anything else renders as an
//! object with stringified keys.
//!
//! Once index `u64::MAX` is used, the sequential portion is exhausted:
//! [`Collection::push`] returns `None` and stores nothing.

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value as Json;

use crate::instance::Instance;

/// Key of a collection entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// Sequential position.
    Index(u64),
    /// Associative name.
    Name(String),
}

impl Key {
    /// Interpret a textual key. Canonical non-negative integers (`"0"`,
    /// `"42"`, not `"042"`) address the sequential portion.
    pub fn parse(s: &str) -> Self {
        let canonical = !s.is_empty()
            && s.bytes().all(|b| b.is_ascii_digit())
            && (s == "0" || !s.starts_with('0'));
        match s.parse::<u64>() {
            Ok(i) if canonical => Self::Index(i),
            _ => Self::Name(s.to_string()),
        }
    }
}

impl From<u64> for Key {
    fn from(i: u64) -> Self {
        Self::Index(i)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Name(s) => f.write_str(s),
        }
    }
}

/// Ordered collection with mixed sequential and named keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    entries: IndexMap<Key, Value>,
    /// `None` once `u64::MAX` has been used.
    next_index: Option<u64>,
}

impl Default for Collection {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
            next_index: Some(0),
        }
    }
}

impl Collection {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry.
    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Look up an entry by textual key (see [`Key::parse`]).
    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.entries.get(&Key::parse(key))
    }

    /// The collection stored at `key`, starting a fresh one when the slot is
    /// absent or `Null`. Any other occupant is left alone and its kind name
    /// returned.
    pub(crate) fn collection_mut(&mut self, key: Key) -> Result<&mut Collection, &'static str> {
        match self.entries.get(&key) {
            Some(Value::List(_)) => {}
            Some(Value::Null) | None => {
                self.insert(key.clone(), Collection::new());
            }
            Some(other) => return Err(other.kind_name()),
        }
        match self.entries.get_mut(&key) {
            Some(Value::List(list)) => Ok(list),
            Some(other) => Err(other.kind_name()),
            None => Err(Value::Null.kind_name()),
        }
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    /// Append to the sequential portion, one past the highest index used so
    /// far. Returns the index assigned, or `None` without storing anything
    /// when the index space is exhausted.
    pub fn push(&mut self, value: impl Into<Value>) -> Option<u64> {
        let index = self.next_index?;
        self.entries.insert(Key::Index(index), value.into());
        self.next_index = index.checked_add(1);
        Some(index)
    }

    /// Insert or overwrite at `key`. Returns the previous value, if any.
    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        if let (Key::Index(i), Some(next)) = (&key, self.next_index) {
            if *i >= next {
                self.next_index = i.checked_add(1);
            }
        }
        self.entries.insert(key, value.into())
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.entries.iter()
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }

    /// Whether the keys are exactly `0..len` in order.
    pub fn is_sequential(&self) -> bool {
        self.entries
            .keys()
            .enumerate()
            .all(|(i, k)| matches!(k, Key::Index(n) if *n == i as u64))
    }

    /// Render as plain JSON: an array when sequential, otherwise an object.
    ///
    /// Nested instances must not contain this collection; cyclic graphs
    /// recurse without bound.
    pub fn to_array(&self) -> Json {
        if self.is_sequential() {
            Json::Array(self.entries.values().map(Value::to_json).collect())
        } else {
            Json::Object(
                self.entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect(),
            )
        }
    }
}

impl<V: Into<Value>> FromIterator<V> for Collection {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut c = Collection::new();
        for v in iter {
            c.push(v);
        }
        c
    }
}

/// A value held by an instance property or collection entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent / explicitly cleared.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Float.
    Float(f64),
    /// String.
    String(String),
    /// Ordered collection.
    List(Collection),
    /// Nested instance, owned by its container.
    Instance(Instance),
}

impl Value {
    /// Whether this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether this is a collection.
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Coarse kind name used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "array",
            Self::Instance(_) => "instance",
        }
    }

    /// The string, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The instance, if this is one.
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Self::Instance(i) => Some(i),
            _ => None,
        }
    }

    /// The collection, if this is one.
    pub fn as_list(&self) -> Option<&Collection> {
        match self {
            Self::List(c) => Some(c),
            _ => None,
        }
    }

    /// Render as plain JSON. Non-finite floats render as `null`.
    pub fn to_json(&self) -> Json {
        match self {
            Self::Null => Json::Null,
            Self::Bool(b) => Json::Bool(*b),
            Self::Int(i) => Json::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Self::String(s) => Json::String(s.clone()),
            Self::List(c) => c.to_array(),
            Self::Instance(i) => i.to_array(),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Collection> for Value {
    fn from(c: Collection) -> Self {
        Self::List(c)
    }
}

impl From<Instance> for Value {
    fn from(i: Instance) -> Self {
        Self::Instance(i)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Null)
    }
}

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Self::String(s),
            Json::Array(items) => Self::List(items.into_iter().collect()),
            Json::Object(map) => {
                let mut c = Collection::new();
                for (k, v) in map {
                    c.insert(k, v);
                }
                Self::List(c)
            }
        }
    }
}
