//! End-to-end behaviour of the runtime store against the reference query
//! schema: set/get, ordered appends, keyed adds, serialization, and
//! inheritance.

use arb_runtime::{Args, ClassRegistry, Instance, StoreError, Value};
use arb_schema::SchemaCompiler;
use proptest::prelude::*;
use serde_json::json;

fn query_schema() -> serde_json::Value {
    json!({
        "_meta": { "namespace": "search.query" },
        "field": {
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
            "var": "field",
            "_any": "_array[field]"
        },
        "exam": {
            "value": "_array[field]"
        },
        "example_type": {
            "_parent": "match",
            "text": "_string",
            "example_field": "_array[_string]",
            "texts": "_array[_string]"
        }
    })
}

fn registry() -> ClassRegistry {
    ClassRegistry::from_schema(&SchemaCompiler::default(), &query_schema()).unwrap()
}

fn field_with_operator(reg: &ClassRegistry, op: &str) -> Instance {
    reg.create("field").unwrap().with("operator", op).unwrap()
}

#[test]
fn test_factories_and_inheritance() {
    let reg = registry();
    for name in ["field", "match", "exam", "example_type"] {
        let instance = reg.create(name).unwrap();
        assert!(instance.is_a(name));
    }
    let example = reg.create("example_type").unwrap();
    assert!(example.is_a("match"));
    assert_eq!(
        example.class().qualified_name(),
        "search.query.ExampleType"
    );
}

#[test]
fn test_normal_set() {
    let reg = registry();
    let mut field = reg.create("field").unwrap();
    for (accessor, value) in [
        ("setAnalyzer", Value::from("test")),
        ("setLenient", Value::from(true)),
        ("setOperator", Value::from("and")),
        ("setType", Value::from("phrase")),
        ("setQuery", Value::from("query")),
    ] {
        assert_eq!(field.call(accessor, Args::value(value)).unwrap(), None);
    }
    assert_eq!(
        field.to_array(),
        json!({
            "analyzer": "test",
            "lenient": true,
            "operator": "and",
            "type": "phrase",
            "query": "query"
        })
    );

    let mut m = reg.create("match").unwrap();
    m.set("var", field.clone()).unwrap();
    assert_eq!(m.get("var").unwrap(), Some(&Value::Instance(field.clone())));
    assert_eq!(
        m.call("getVar", Args::none()).unwrap(),
        Some(Value::Instance(field.clone()))
    );
    assert_eq!(m.to_array(), json!({ "var": field.to_array() }));

    let mut example = reg.create("example_type").unwrap();
    example.call("setText", Args::value("ABC")).unwrap();
    example.call("setVar", Args::value(field.clone())).unwrap();
    assert_eq!(
        example.to_array(),
        json!({ "text": "ABC", "var": field.to_array() })
    );
}

#[test]
fn test_append_preserves_order_and_keys() {
    let reg = registry();
    let mut m = reg.create("match").unwrap();

    m.call("appendField", Args::value(field_with_operator(&reg, "and")))
        .unwrap();
    assert_eq!(m.to_array(), json!([{ "operator": "and" }]));

    m.call("appendField", Args::value(field_with_operator(&reg, "or")))
        .unwrap();
    assert_eq!(
        m.to_array(),
        json!([{ "operator": "and" }, { "operator": "or" }])
    );

    m.call(
        "appendField",
        Args::keyed(field_with_operator(&reg, "not"), "hey"),
    )
    .unwrap();
    assert_eq!(
        m.to_array(),
        json!({
            "0": { "operator": "and" },
            "1": { "operator": "or" },
            "hey": { "operator": "not" }
        })
    );
    let keys: Vec<String> = m.data().iter().map(|(k, _)| k.to_string()).collect();
    assert_eq!(keys, ["0", "1", "hey"]);
}

#[test]
fn test_add_keyed_then_unkeyed() {
    let reg = registry();
    let mut exam = reg.create("exam").unwrap();
    exam.call(
        "addValue",
        Args::keyed(field_with_operator(&reg, "and"), "ok"),
    )
    .unwrap();
    assert_eq!(
        exam.to_array(),
        json!({ "value": { "ok": { "operator": "and" } } })
    );

    exam.call("addValue", Args::value(field_with_operator(&reg, "or")))
        .unwrap();
    assert_eq!(
        exam.to_array(),
        json!({
            "value": {
                "ok": { "operator": "and" },
                "0": { "operator": "or" }
            }
        })
    );
}

#[test]
fn test_json_serialize_matches_to_array() {
    let reg = registry();
    let field = field_with_operator(&reg, "not")
        .with("analyzer", "analyzer")
        .unwrap();
    assert_eq!(
        serde_json::to_string(&field).unwrap(),
        serde_json::to_string(&field.to_array()).unwrap()
    );
}

#[test]
fn test_inherited_wildcard_and_own_properties_render_together() {
    let reg = registry();
    let mut example = reg.create("example_type").unwrap();
    example
        .call("appendField", Args::value(field_with_operator(&reg, "and")))
        .unwrap();
    example.call("setText", Args::value("ABC")).unwrap();
    example.call("addTexts", Args::value("t1")).unwrap();
    example.call("addTexts", Args::value("t2")).unwrap();
    assert_eq!(
        example.to_array(),
        json!({
            "0": { "operator": "and" },
            "text": "ABC",
            "texts": ["t1", "t2"]
        })
    );
}

#[test]
fn test_example_type_adders_are_independent() {
    let reg = registry();
    let mut example = reg.create("example_type").unwrap();
    example.call("addExampleField", Args::value("a")).unwrap();
    example.call("addTexts", Args::keyed("b", "k")).unwrap();
    assert_eq!(
        example.to_array(),
        json!({ "example_field": ["a"], "texts": { "k": "b" } })
    );
}

#[test]
fn test_closed_class_rejects_unknown_names() {
    let reg = registry();
    let mut field = reg.create("field").unwrap();
    assert!(matches!(
        field.set("ghost", 1),
        Err(StoreError::UnknownProperty { .. })
    ));
    assert!(matches!(
        field.call("appendField", Args::value(1)),
        Err(StoreError::InvalidAccessor { .. })
    ));
    assert!(matches!(
        field.call("addOperator", Args::value("x")),
        Err(StoreError::InvalidAccessor { .. })
    ));
    assert!(field.data().is_empty());
}

#[test]
fn test_open_class_accepts_any_name() {
    let reg = registry();
    let mut m = reg.create("match").unwrap();
    assert!(m.has_property("whatever").is_some());
    m.call("setWhatever", Args::value(vec![1, 2])).unwrap();
    assert_eq!(
        m.call("getWhatever", Args::none()).unwrap(),
        Some(Value::from(vec![1, 2]))
    );
}

#[test]
fn test_failed_call_leaves_instance_unchanged() {
    let reg = registry();
    let mut exam = reg.create("exam").unwrap();
    exam.call("addValue", Args::value(field_with_operator(&reg, "and")))
        .unwrap();
    let snapshot = exam.to_array();

    assert!(exam.set("value", "scalar").is_err());
    assert!(exam.add(None, Some("ghost"), 1).is_err());
    assert!(exam.call("setGhost", Args::value(1)).is_err());
    assert_eq!(exam.to_array(), snapshot);
}

#[test]
fn test_max_index_key_stops_sequential_adds() {
    let reg = registry();
    let mut exam = reg.create("exam").unwrap();
    exam.call(
        "addValue",
        Args::keyed(field_with_operator(&reg, "and"), "18446744073709551615"),
    )
    .unwrap();
    let snapshot = exam.to_array();

    let err = exam
        .call("addValue", Args::value(field_with_operator(&reg, "or")))
        .unwrap_err();
    assert!(matches!(err, StoreError::IndexExhausted { .. }));
    assert_eq!(exam.to_array(), snapshot);

    exam.call(
        "addValue",
        Args::keyed(field_with_operator(&reg, "not"), "named"),
    )
    .unwrap();
    assert_eq!(
        exam.to_array(),
        json!({
            "value": {
                "18446744073709551615": { "operator": "and" },
                "named": { "operator": "not" }
            }
        })
    );
}

#[test]
fn test_json_object_with_max_index_key_converts() {
    let value = Value::from(json!({ "18446744073709551615": 1, "a": 2 }));
    assert_eq!(value.to_json(), json!({ "18446744073709551615": 1, "a": 2 }));
}

#[test]
fn test_set_overwrites_in_place() {
    let reg = registry();
    let mut field = reg.create("field").unwrap();
    field.set("query", "a").unwrap();
    field.set("operator", "and").unwrap();
    field.set("query", "b").unwrap();
    let keys: Vec<String> = field.data().iter().map(|(k, _)| k.to_string()).collect();
    assert_eq!(keys, ["query", "operator"]);
    assert_eq!(field.get("query").unwrap(), Some(&Value::from("b")));
}

const FIELD_PROPERTIES: [&str; 8] = [
    "query",
    "operator",
    "zero_terms_query",
    "cutoff_frequency",
    "analyzer",
    "max_expansions",
    "lenient",
    "type",
];

proptest! {
    #[test]
    fn validity_is_closed_over_declared_properties(name in "[a-z][a-z_]{0,15}") {
        let reg = registry();
        let field = reg.create("field").unwrap();
        prop_assert_eq!(
            field.has_property(&name).is_some(),
            FIELD_PROPERTIES.contains(&name.as_str())
        );

        // Wildcard-open through the parent: every name is accepted.
        let example = reg.create("example_type").unwrap();
        prop_assert!(example.has_property(&name).is_some());
    }

    #[test]
    fn nested_rendering_composes(ops in prop::collection::vec("[a-z]{1,8}", 0..6)) {
        let reg = registry();
        let mut m = reg.create("match").unwrap();
        let mut expected = Vec::new();
        for op in &ops {
            let f = field_with_operator(&reg, op);
            expected.push(f.to_array());
            m.append(f, None).unwrap();
        }
        prop_assert_eq!(m.to_array(), serde_json::Value::Array(expected));
    }
}
