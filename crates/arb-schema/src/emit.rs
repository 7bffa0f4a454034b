//! # Descriptor Emission
//!
//! A [`ClassEmitter`] consumes one [`ClassDescriptor`] at a time and turns
//! it into some output: source text for a target language, a manifest, a
//! registration call. Emitters must preserve the descriptor's namespace and
//! parent linkage, and expose a `create()` factory plus the descriptor's
//! accessor set.
//!
//! [`ManifestEmitter`] is the in-tree emitter. It renders each descriptor
//! as a JSON manifest; it does not produce source code.

use serde_json::{json, Map, Value};

use crate::descriptor::ClassDescriptor;
use crate::error::SchemaError;

/// Name of the factory every emitted class exposes.
pub const FACTORY_NAME: &str = "create";

/// Consumer of class descriptors.
pub trait ClassEmitter {
    /// What one descriptor becomes.
    type Output;

    /// Emit a single descriptor.
    fn emit(&mut self, descriptor: &ClassDescriptor) -> Result<Self::Output, SchemaError>;
}

/// Emit every descriptor in order, stopping at the first failure.
pub fn emit_all<E: ClassEmitter>(
    emitter: &mut E,
    descriptors: &[ClassDescriptor],
) -> Result<Vec<E::Output>, SchemaError> {
    descriptors.iter().map(|d| emitter.emit(d)).collect()
}

/// Renders descriptors as JSON manifests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestEmitter {
    docs: bool,
}

impl ManifestEmitter {
    /// Create an emitter. With `docs`, types render in document mode.
    pub fn new(docs: bool) -> Self {
        Self { docs }
    }

    fn render(&self, ty: &arb_core::ResolvedType) -> String {
        if self.docs {
            ty.doc_name()
        } else {
            ty.code_name()
        }
    }
}

impl ClassEmitter for ManifestEmitter {
    type Output = Value;

    fn emit(&mut self, d: &ClassDescriptor) -> Result<Value, SchemaError> {
        let properties: Map<String, Value> = d
            .properties()
            .iter()
            .map(|(name, ty)| (name.as_str().to_string(), Value::String(self.render(ty))))
            .collect();

        let accessors: Vec<Value> = d
            .accessors()
            .iter()
            .map(|a| {
                json!({
                    "name": a.name,
                    "kind": a.kind,
                    "target": a.target,
                    "type": self.render(&a.value_type),
                    "keyed": a.is_keyed(),
                })
            })
            .collect();

        tracing::trace!(class = %d.qualified_name(), "emitting manifest");

        Ok(json!({
            "class": d.class_name(),
            "qualified_name": d.qualified_name(),
            "namespace": d.namespace(),
            "parent": d.parent().map(|p| p.qualified()),
            "factory": FACTORY_NAME,
            "open": d.is_open(),
            "wildcard": d.wildcard().map(|w| self.render(w)),
            "properties": properties,
            "accessors": accessors,
        }))
    }
}
