//! # Schema Documents
//!
//! Reads the raw JSON value tree of a schema into a [`SchemaDocument`]:
//! an ordered list of type definitions plus the namespace from `_meta`.
//! Type tokens are kept as strings here; resolving them is the job of
//! [`crate::resolve::TypeResolver`].
//!
//! Top-level keys and type-definition keys that start with `_` are
//! metadata. The recognized ones are `_meta` (top level), `_parent` and
//! `_any` (per type). Other metadata keys are ignored with a warning.
//!
//! Schema files may be JSON or YAML. YAML documents are converted into the
//! same `serde_json::Value` tree, preserving mapping order.

use std::path::Path;

use arb_core::SnakeIdent;
use serde_json::{Map, Value};

use crate::error::SchemaError;

/// Prefix marking metadata keys.
pub const METADATA_MARKER: char = '_';

const META_KEY: &str = "_meta";
const PARENT_KEY: &str = "_parent";
const ANY_KEY: &str = "_any";

/// One declared type: its properties and optional parent and wildcard.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    /// Schema name of the type.
    pub name: SnakeIdent,
    /// Raw `_parent` value.
    pub parent: Option<String>,
    /// Raw `_any` token.
    pub any: Option<String>,
    /// Explicit properties and their raw tokens, in document order.
    pub properties: Vec<(SnakeIdent, String)>,
}

/// A parsed schema document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaDocument {
    /// `_meta.namespace`, if declared.
    pub namespace: Option<String>,
    /// Declared types, in document order.
    pub types: Vec<TypeDefinition>,
}

impl SchemaDocument {
    /// Read a schema from its JSON value tree.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::Malformed`] when the top level or a type definition
    ///   is not an object, or a token is not a string.
    /// - [`SchemaError::InvalidIdentifier`] when a type or property name is
    ///   not snake_case.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        let root = value
            .as_object()
            .ok_or_else(|| SchemaError::malformed("/", "schema must be a JSON object"))?;

        let mut doc = SchemaDocument::default();
        for (key, body) in root {
            if key.starts_with(METADATA_MARKER) {
                if key == META_KEY {
                    doc.namespace = read_namespace(body)?;
                } else {
                    tracing::warn!(key = %key, "ignoring unknown top-level metadata key");
                }
                continue;
            }
            doc.types.push(read_type(key, body)?);
        }
        Ok(doc)
    }

    /// Load and parse a schema file (see [`load_schema_file`]).
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        Self::from_value(&load_schema_file(path)?)
    }

    /// Names of all declared types, in document order.
    pub fn type_names(&self) -> impl Iterator<Item = &SnakeIdent> {
        self.types.iter().map(|t| &t.name)
    }
}

fn read_namespace(meta: &Value) -> Result<Option<String>, SchemaError> {
    let meta = meta
        .as_object()
        .ok_or_else(|| SchemaError::malformed("/_meta", "metadata must be an object"))?;
    match meta.get("namespace") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(ns)) => Ok(Some(ns.clone())),
        Some(_) => Err(SchemaError::malformed(
            "/_meta/namespace",
            "namespace must be a string",
        )),
    }
}

fn read_type(key: &str, body: &Value) -> Result<TypeDefinition, SchemaError> {
    let name = SnakeIdent::parse(key).map_err(|source| SchemaError::InvalidIdentifier {
        type_name: key.to_string(),
        name: key.to_string(),
        source,
    })?;
    let body: &Map<String, Value> = body.as_object().ok_or_else(|| {
        SchemaError::malformed(format!("/{key}"), "type definition must be an object")
    })?;

    let mut def = TypeDefinition {
        name,
        parent: None,
        any: None,
        properties: Vec::with_capacity(body.len()),
    };

    for (prop, token) in body {
        let token = token.as_str().ok_or_else(|| {
            SchemaError::malformed(format!("/{key}/{prop}"), "type token must be a string")
        })?;
        match prop.as_str() {
            PARENT_KEY => def.parent = Some(token.to_string()),
            ANY_KEY => def.any = Some(token.to_string()),
            other if other.starts_with(METADATA_MARKER) => {
                tracing::warn!(type_name = %key, key = %other, "ignoring unknown metadata key");
            }
            other => {
                let ident =
                    SnakeIdent::parse(other).map_err(|source| SchemaError::InvalidIdentifier {
                        type_name: key.to_string(),
                        name: other.to_string(),
                        source,
                    })?;
                def.properties.push((ident, token.to_string()));
            }
        }
    }
    Ok(def)
}

/// Load a schema file as a JSON value tree.
///
/// The format is chosen by extension: `.yaml`/`.yml` are YAML, anything
/// else is JSON.
///
/// # Errors
///
/// Returns [`SchemaError::DocumentLoad`] if the file cannot be read or
/// decoded.
pub fn load_schema_file(path: &Path) -> Result<Value, SchemaError> {
    let load_err = |reason: String| SchemaError::DocumentLoad {
        path: path.display().to_string(),
        reason,
    };

    let content =
        std::fs::read_to_string(path).map_err(|e| load_err(format!("cannot read file: {e}")))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "yaml" | "yml" => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(&content)
                .map_err(|e| load_err(format!("invalid YAML: {e}")))?;
            yaml_to_json_value(&yaml)
                .map_err(|e| load_err(format!("YAML-to-JSON conversion failed: {e}")))
        }
        _ => serde_json::from_str(&content).map_err(|e| load_err(format!("invalid JSON: {e}"))),
    }
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`, keeping mapping
/// order. Tags are dropped.
pub(crate) fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, String> = seq.iter().map(yaml_to_json_value).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key type: {other:?}")),
                };
                json_map.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}
