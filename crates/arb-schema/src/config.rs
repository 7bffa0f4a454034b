//! # Compile Options
//!
//! Settings that shape descriptors without changing schema semantics.
//! Options deserialize from YAML (the CLI's `--config` file); every field
//! has a default, so an empty file is valid.
//!
//! ```yaml
//! default_namespace: search.query
//! namespace_separator: "::"
//! docs: true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Options for [`crate::SchemaCompiler`] and the manifest emitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileOptions {
    /// Namespace used when the schema has no `_meta.namespace`.
    pub default_namespace: Option<String>,
    /// Glue between the namespace and a class name in qualified references.
    pub namespace_separator: String,
    /// Render accessor types in document mode (`Field[]` instead of `array`).
    pub docs: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            default_namespace: None,
            namespace_separator: ".".to_string(),
            docs: false,
        }
    }
}

impl CompileOptions {
    /// Parse options from a YAML string.
    pub fn from_yaml_str(content: &str) -> Result<Self, SchemaError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| SchemaError::DocumentLoad {
            path: "<options>".to_string(),
            reason: format!("invalid options: {e}"),
        })
    }

    /// Load options from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DocumentLoad`] if the file cannot be read or
    /// contains unknown keys.
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let content = std::fs::read_to_string(path).map_err(|e| SchemaError::DocumentLoad {
            path: path.display().to_string(),
            reason: format!("cannot read file: {e}"),
        })?;
        Self::from_yaml_str(&content).map_err(|e| match e {
            SchemaError::DocumentLoad { reason, .. } => SchemaError::DocumentLoad {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }
}
