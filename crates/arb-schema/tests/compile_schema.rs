//! Integration test: compile the reference query-builder schema end to end,
//! from a file on disk through to emitted manifests.

use arb_core::{PrimitiveKind, ResolvedType};
use arb_schema::{
    emit_all, load_schema_file, AccessorKind, CompileOptions, ManifestEmitter, SchemaCompiler,
    SchemaDocument, SchemaError,
};
use serde_json::json;

const QUERY_SCHEMA: &str = r#"{
    "_meta" : {
        "namespace" : "search.query"
    },
    "field" : {
        "query": "_string",
        "operator": "_string",
        "zero_terms_query": "_string",
        "cutoff_frequency": "_float",
        "analyzer": "_string",
        "max_expansions": "_int",
        "lenient": "_boolean",
        "type": "_string"
    },
    "match": {
        "var" : "field",
        "_any": "_array[field]"
    },
    "exam": {
        "value": "_array[field]"
    },
    "example_type": {
        "_parent" : "match",
        "text" : "_string",
        "example_field": "_array[_string]",
        "texts" : "_array[_string]"
    }
}"#;

fn write_schema(name: &str, content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    (dir, path)
}

#[test]
fn test_compile_query_schema_from_file() {
    let (_dir, path) = write_schema("query.json", QUERY_SCHEMA);
    let doc = SchemaDocument::load(&path).unwrap();
    let descriptors = SchemaCompiler::default().compile(&doc).unwrap();

    let names: Vec<&str> = descriptors.iter().map(|d| d.name().as_str()).collect();
    assert_eq!(names, ["field", "match", "exam", "example_type"]);

    let field = &descriptors[0];
    assert_eq!(field.properties().len(), 8);
    assert_eq!(
        field.properties().get_index_of(&arb_core::SnakeIdent::parse("lenient").unwrap()),
        Some(6)
    );
    assert!(field
        .accessors()
        .iter()
        .any(|a| a.name == "setCutoffFrequency"
            && a.value_type == ResolvedType::Primitive(PrimitiveKind::Float)));

    let example = &descriptors[3];
    assert_eq!(example.parent().unwrap().name().as_str(), "match");
    let adders: Vec<&str> = example
        .accessors()
        .iter()
        .filter(|a| a.kind == AccessorKind::Add)
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(adders, ["addExampleField", "addTexts"]);
}

#[test]
fn test_compile_yaml_schema_matches_json() {
    let yaml = r#"
_meta:
  namespace: search.query
field:
  operator: internal:string
match:
  _any: array[field]
"#;
    let json_schema = json!({
        "_meta": { "namespace": "search.query" },
        "field": { "operator": "internal:string" },
        "match": { "_any": "array[field]" }
    });

    let (_dir, path) = write_schema("query.yaml", yaml);
    let from_yaml = SchemaCompiler::default()
        .compile_value(&load_schema_file(&path).unwrap())
        .unwrap();
    let from_json = arb_schema::compile(&json_schema).unwrap();
    assert_eq!(from_yaml, from_json);
}

#[test]
fn test_unknown_type_rejected() {
    let err = arb_schema::compile(&json!({ "t": { "f": "nonexistent_type" } })).unwrap_err();
    assert!(
        matches!(&err, SchemaError::UnknownType { token, .. } if token == "nonexistent_type"),
        "expected UnknownType for nonexistent_type, got: {err}"
    );
    assert!(err.to_string().contains("nonexistent_type"));
}

#[test]
fn test_manifest_round_trips_through_json_text() {
    let compiler = SchemaCompiler::new(CompileOptions {
        docs: true,
        ..CompileOptions::default()
    });
    let descriptors = compiler
        .compile_value(&serde_json::from_str(QUERY_SCHEMA).unwrap())
        .unwrap();
    let manifests = emit_all(&mut ManifestEmitter::new(compiler.options().docs), &descriptors)
        .unwrap();

    let text = serde_json::to_string(&manifests).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed[2]["properties"]["value"], "search.query.Field[]");
    assert_eq!(parsed[3]["parent"], "search.query.Match");
}
