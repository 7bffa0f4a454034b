//! # Schema Compiler
//!
//! Walks a [`SchemaDocument`] and produces one [`ClassDescriptor`] per
//! declared type, in document order.
//!
//! ## Per-Type Steps
//!
//! 1. `_parent`, if present, must name a declared type.
//! 2. `_any`, if present, is resolved and marks the class open. Explicit
//!    properties keep their own types and win over the wildcard.
//! 3. Each explicit property yields `get<Name>` and `set<Name>`, plus
//!    `add<Name>` when its type is a typed array. The adder takes the
//!    element type.
//! 4. An open class yields `append<Element>`, named after the wildcard's
//!    element type.
//!
//! After all types compile, parent chains are checked for cycles.
//!
//! Compilation fails atomically on the first error.

use std::collections::HashMap;

use arb_core::{ResolvedType, SnakeIdent, TypeRef};
use indexmap::IndexMap;
use serde_json::Value;

use crate::config::CompileOptions;
use crate::descriptor::{AccessorIntent, AccessorKind, ClassDescriptor};
use crate::document::{SchemaDocument, TypeDefinition};
use crate::error::SchemaError;
use crate::resolve::TypeResolver;

/// Compile a schema value with default options.
///
/// # Errors
///
/// See [`SchemaCompiler::compile`].
pub fn compile(schema: &Value) -> Result<Vec<ClassDescriptor>, SchemaError> {
    SchemaCompiler::default().compile_value(schema)
}

/// Compiles schema documents into class descriptors.
#[derive(Debug, Clone, Default)]
pub struct SchemaCompiler {
    options: CompileOptions,
}

impl SchemaCompiler {
    /// Create a compiler with the given options.
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    /// The options this compiler was built with.
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Parse and compile a raw schema value.
    pub fn compile_value(&self, schema: &Value) -> Result<Vec<ClassDescriptor>, SchemaError> {
        self.compile(&SchemaDocument::from_value(schema)?)
    }

    /// Compile a parsed schema document.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::UnknownType`] for any token or `_parent` that names
    ///   an undeclared type.
    /// - [`SchemaError::InheritanceCycle`] when `_parent` links loop.
    pub fn compile(&self, doc: &SchemaDocument) -> Result<Vec<ClassDescriptor>, SchemaError> {
        let namespace = doc
            .namespace
            .clone()
            .or_else(|| self.options.default_namespace.clone());
        let separator = self.options.namespace_separator.as_str();
        let resolver = TypeResolver::new(doc.type_names(), namespace.as_deref(), separator);

        let descriptors = doc
            .types
            .iter()
            .map(|def| compile_type(def, &resolver, namespace.as_deref(), separator))
            .collect::<Result<Vec<_>, _>>()?;

        check_inheritance(&descriptors)?;

        tracing::debug!(
            classes = descriptors.len(),
            namespace = namespace.as_deref().unwrap_or(""),
            "schema compiled"
        );
        Ok(descriptors)
    }
}

fn compile_type(
    def: &TypeDefinition,
    resolver: &TypeResolver<'_>,
    namespace: Option<&str>,
    separator: &str,
) -> Result<ClassDescriptor, SchemaError> {
    let owner = def.name.as_str();

    let parent = def
        .parent
        .as_deref()
        .map(|p| resolver.resolve_reference(p.trim(), owner))
        .transpose()?;

    let wildcard = def
        .any
        .as_deref()
        .map(|token| resolver.resolve(token, owner))
        .transpose()?;

    let mut properties: IndexMap<SnakeIdent, ResolvedType> = IndexMap::new();
    let mut accessors = Vec::new();
    for (prop, token) in &def.properties {
        let ty = resolver.resolve(token, owner)?;
        accessors.push(AccessorIntent::new(AccessorKind::Get, prop.as_str(), ty.clone()));
        accessors.push(AccessorIntent::new(AccessorKind::Set, prop.as_str(), ty.clone()));
        if let Some(element) = ty.element_type() {
            accessors.push(AccessorIntent::new(
                AccessorKind::Add,
                prop.as_str(),
                element.clone(),
            ));
        }
        properties.insert(prop.clone(), ty);
    }

    if let Some(any) = &wildcard {
        let element = any.element_type().unwrap_or(any).clone();
        let target = element.element_name();
        accessors.push(AccessorIntent::new(AccessorKind::Append, &target, element));
    }

    tracing::debug!(
        type_name = owner,
        properties = properties.len(),
        accessors = accessors.len(),
        parent = parent.as_ref().map(|p| p.name().as_str()).unwrap_or(""),
        open = wildcard.is_some(),
        "compiled class descriptor"
    );

    let this = TypeRef::new(def.name.clone(), namespace, separator);
    Ok(ClassDescriptor::new(
        this,
        namespace.map(str::to_string),
        parent,
        properties,
        wildcard,
        accessors,
    ))
}

fn check_inheritance(descriptors: &[ClassDescriptor]) -> Result<(), SchemaError> {
    let parents: HashMap<&str, &str> = descriptors
        .iter()
        .filter_map(|d| d.parent().map(|p| (d.name().as_str(), p.name().as_str())))
        .collect();

    for d in descriptors {
        let start = d.name().as_str();
        let mut chain = vec![start];
        let mut current = start;
        while let Some(&next) = parents.get(current) {
            if let Some(pos) = chain.iter().position(|n| *n == next) {
                let mut cycle: Vec<String> = chain[pos..].iter().map(|s| s.to_string()).collect();
                cycle.push(next.to_string());
                return Err(SchemaError::InheritanceCycle { chain: cycle });
            }
            chain.push(next);
            current = next;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arb_core::PrimitiveKind;
    use serde_json::json;

    fn names(d: &ClassDescriptor) -> Vec<&str> {
        d.accessors().iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn accessors_for_plain_properties() {
        let out = compile(&json!({
            "field": { "operator": "internal:string", "zero_terms_query": "internal:string" }
        }))
        .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(
            names(&out[0]),
            ["getOperator", "setOperator", "getZeroTermsQuery", "setZeroTermsQuery"]
        );
        assert!(!out[0].is_open());
        assert!(out[0].parent().is_none());
    }

    #[test]
    fn adder_takes_element_type() {
        let out = compile(&json!({
            "field": {},
            "exam": { "value": "internal:array[field]", "raw": "internal:array" }
        }))
        .unwrap();
        let exam = &out[1];
        let add = exam
            .accessors()
            .iter()
            .find(|a| a.name == "addValue")
            .expect("addValue emitted");
        assert_eq!(add.kind, AccessorKind::Add);
        assert!(matches!(add.value_type, ResolvedType::Reference(_)));
        assert!(add.is_keyed());
        assert!(!names(exam).contains(&"addRaw"), "opaque arrays get no adder");
    }

    #[test]
    fn wildcard_emits_append_named_after_element() {
        let out = compile(&json!({
            "field": { "operator": "internal:string" },
            "match": { "_any": "array[field]" }
        }))
        .unwrap();
        let m = &out[1];
        assert!(m.is_open());
        assert_eq!(names(m), ["appendField"]);
        assert_eq!(m.accessors()[0].target, "field");
    }

    #[test]
    fn explicit_property_kept_alongside_wildcard() {
        let out = compile(&json!({
            "field": {},
            "match": { "var": "field", "_any": "array[field]" }
        }))
        .unwrap();
        let m = &out[1];
        assert_eq!(m.properties().len(), 1);
        assert!(matches!(
            m.properties().get_index(0),
            Some((name, ResolvedType::Reference(_))) if name.as_str() == "var"
        ));
        assert_eq!(names(m), ["getVar", "setVar", "appendField"]);
    }

    #[test]
    fn primitive_wildcard_append_name() {
        let out = compile(&json!({ "bag": { "_any": "internal:array[internal:string]" } })).unwrap();
        assert_eq!(names(&out[0]), ["appendString"]);
        assert_eq!(
            out[0].accessors()[0].value_type,
            ResolvedType::Primitive(PrimitiveKind::String)
        );
    }

    #[test]
    fn parent_links_without_redeclaring() {
        let out = compile(&json!({
            "_meta": { "namespace": "search" },
            "field": {},
            "match": { "_any": "array[field]" },
            "example_type": { "_parent": "match", "text": "internal:string" }
        }))
        .unwrap();
        let ex = &out[2];
        assert_eq!(ex.parent().map(|p| p.qualified()), Some("search.Match"));
        assert_eq!(names(ex), ["getText", "setText"]);
        assert!(!ex.is_open());
        assert_eq!(ex.qualified_name(), "search.ExampleType");
        assert_eq!(ex.namespace(), Some("search"));
    }

    #[test]
    fn unknown_type_fails_whole_compile() {
        let err = compile(&json!({
            "ok": { "a": "internal:string" },
            "t": { "f": "nonexistent_type" }
        }))
        .unwrap_err();
        match err {
            SchemaError::UnknownType { token, type_name } => {
                assert_eq!(token, "nonexistent_type");
                assert_eq!(type_name, "t");
            }
            other => panic!("expected UnknownType, got: {other}"),
        }
    }

    #[test]
    fn unknown_parent_fails() {
        let err = compile(&json!({ "t": { "_parent": "ghost" } })).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownType { ref token, .. } if token == "ghost"));
    }

    #[test]
    fn unknown_wildcard_fails() {
        let err = compile(&json!({ "t": { "_any": "array[ghost]" } })).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownType { ref token, .. } if token == "ghost"));
    }

    #[test]
    fn inheritance_cycle_detected() {
        let err = compile(&json!({
            "a": { "_parent": "b" },
            "b": { "_parent": "c" },
            "c": { "_parent": "a" }
        }))
        .unwrap_err();
        match err {
            SchemaError::InheritanceCycle { chain } => {
                assert_eq!(chain, ["a", "b", "c", "a"]);
            }
            other => panic!("expected InheritanceCycle, got: {other}"),
        }
    }

    #[test]
    fn self_parent_is_cycle() {
        let err = compile(&json!({ "a": { "_parent": "a" } })).unwrap_err();
        assert!(matches!(err, SchemaError::InheritanceCycle { .. }));
    }

    #[test]
    fn default_namespace_and_separator_from_options() {
        let compiler = SchemaCompiler::new(CompileOptions {
            default_namespace: Some("app".to_string()),
            namespace_separator: "::".to_string(),
            docs: false,
        });
        let out = compiler
            .compile_value(&json!({ "field": {}, "holder": { "f": "field" } }))
            .unwrap();
        assert_eq!(out[1].qualified_name(), "app::Holder");
        match &out[1].properties()[0] {
            ResolvedType::Reference(r) => assert_eq!(r.qualified(), "app::Field"),
            other => panic!("expected reference, got {other:?}"),
        }
    }

    #[test]
    fn compile_is_deterministic() {
        let schema = json!({
            "field": { "b": "internal:int", "a": "internal:float" },
            "match": { "_any": "array[field]" }
        });
        assert_eq!(compile(&schema).unwrap(), compile(&schema).unwrap());
    }
}
