//! Core contract tests against synthetic schemas.
//!
//! These tests build their own schema and discriminator registries to
//! exercise the field walk, the resolver, and the round-trip laws without
//! any generated model types.

use lakecat_wire::{
    DiscriminatorMap, FieldDescriptor, FieldKind, ModelSchema, Record, ScalarKind, WireError,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;

fn as_object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("object literal")
}

fn item_schema() -> Arc<ModelSchema> {
    ModelSchema::builder("Item")
        .field(FieldDescriptor::required(
            "label",
            "label",
            FieldKind::Scalar(ScalarKind::String),
        ))
        .field(FieldDescriptor::optional(
            "weight",
            "item-weight",
            FieldKind::Scalar(ScalarKind::Integer),
        ))
        .build()
        .expect("item schema")
}

fn crate_schema() -> Arc<ModelSchema> {
    ModelSchema::builder("Crate")
        .field(FieldDescriptor::required(
            "name",
            "name",
            FieldKind::Scalar(ScalarKind::String),
        ))
        .field(FieldDescriptor::optional(
            "items",
            "items",
            FieldKind::ModelList(item_schema()),
        ))
        .build()
        .expect("crate schema")
}

#[test]
fn test_nested_list_roundtrip_preserves_order() {
    let schema = crate_schema();
    let items = item_schema();

    for count in [0usize, 1, 4] {
        let records: Vec<Record> = (0..count)
            .map(|i| {
                Record::builder(&items)
                    .set_str("label", format!("item-{i}"))
                    .set_i64("weight", i64::try_from(i).expect("small index"))
                    .build()
                    .expect("item record")
            })
            .collect();

        let record = Record::builder(&schema)
            .set_str("name", "box")
            .set_records("items", records)
            .build()
            .expect("crate record");

        let dict = record.encode();
        let decoded = ModelSchema::decode(&schema, &dict).expect("decode");
        assert_eq!(decoded, record, "round trip for {count} items");

        let list = decoded.records_opt("items").expect("items").expect("set");
        for (i, item) in list.iter().enumerate() {
            assert_eq!(item.require_str("label").expect("label"), format!("item-{i}"));
        }
    }
}

#[test]
fn test_absent_optional_stays_absent_through_roundtrip() {
    let schema = crate_schema();
    let record = Record::builder(&schema)
        .set_str("name", "box")
        .build()
        .expect("crate record");

    let dict = record.encode();
    assert!(!dict.contains_key("items"));

    let decoded = ModelSchema::decode(&schema, &dict).expect("decode");
    assert_eq!(decoded, record);
    assert!(decoded.get("items").is_none());
}

#[test]
fn test_alias_is_used_on_the_wire_not_internal_name() {
    let items = item_schema();
    let record = Record::builder(&items)
        .set_str("label", "a")
        .set_i64("weight", 7)
        .build()
        .expect("item record");

    let dict = record.encode();
    assert_eq!(dict.get("item-weight"), Some(&json!(7)));
    assert!(!dict.contains_key("weight"));
}

#[test]
fn test_extra_keys_are_ignored_and_unretrievable() {
    let items = item_schema();
    let dict = as_object(json!({
        "label": "a",
        "item-weight": 2,
        "undeclared-key": {"nested": true}
    }));

    let record = ModelSchema::decode(&items, &dict).expect("decode");
    assert!(record.get("undeclared-key").is_none());

    let reencoded = record.encode();
    assert!(!reencoded.contains_key("undeclared-key"));
}

#[test]
fn test_two_registries_coexist() {
    // Same type name, different field tables; neither interferes with
    // the other.
    let loose = ModelSchema::builder("Item")
        .field(FieldDescriptor::optional(
            "label",
            "label",
            FieldKind::Scalar(ScalarKind::String),
        ))
        .build()
        .expect("loose schema");
    let strict = item_schema();

    let dict = Map::new();
    assert!(ModelSchema::decode(&loose, &dict).is_ok());
    assert!(matches!(
        ModelSchema::decode(&strict, &dict),
        Err(WireError::MissingRequiredField { .. })
    ));
}

fn event_family() -> (Arc<ModelSchema>, Arc<ModelSchema>, Arc<DiscriminatorMap>) {
    let base = vec![
        FieldDescriptor::required("event", "event", FieldKind::Scalar(ScalarKind::String)),
        FieldDescriptor::required("at_ms", "at-ms", FieldKind::Scalar(ScalarKind::Integer)),
    ];

    let created = ModelSchema::builder("Created")
        .fields(base.clone())
        .field(FieldDescriptor::required(
            "owner",
            "owner",
            FieldKind::Scalar(ScalarKind::String),
        ))
        .build()
        .expect("created schema");
    let dropped = ModelSchema::builder("Dropped")
        .fields(base)
        .field(FieldDescriptor::optional(
            "purge",
            "purge",
            FieldKind::Scalar(ScalarKind::Boolean),
        ))
        .build()
        .expect("dropped schema");

    let map = DiscriminatorMap::builder("event")
        .variant("created", &created)
        .variant("dropped", &dropped)
        .build()
        .expect("event map");

    (created, dropped, map)
}

#[test]
fn test_family_decode_dispatches_and_composes_base_fields() {
    let (_, _, map) = event_family();
    let dict = as_object(json!({
        "event": "created",
        "at-ms": 1234567890000_i64,
        "owner": "data-team"
    }));

    let record = map.decode(&dict).expect("decode");
    assert_eq!(record.schema().name(), "Created");
    assert_eq!(record.require_i64("at_ms").expect("at_ms"), 1_234_567_890_000);
    assert_eq!(record.require_str("owner").expect("owner"), "data-team");
}

#[test]
fn test_family_decode_unknown_tag() {
    let (_, _, map) = event_family();
    let dict = as_object(json!({"event": "renamed", "at-ms": 1}));

    let err = map.decode(&dict).expect_err("unknown tag should fail");
    assert!(matches!(
        err,
        WireError::UnknownDiscriminatorValue { alias, value }
            if alias == "event" && value == "renamed"
    ));
}

#[test]
fn test_family_member_missing_base_field() {
    let (_, _, map) = event_family();
    let dict = as_object(json!({"event": "dropped"}));

    let err = map.decode(&dict).expect_err("missing at-ms should fail");
    assert!(matches!(
        err,
        WireError::MissingRequiredField { field } if field == "at_ms"
    ));
}

#[test]
fn test_wire_string_value_fidelity() {
    let items = item_schema();
    let record = Record::builder(&items)
        .set_str("label", "7")
        .set_i64("weight", 7)
        .build()
        .expect("item record");

    let text = serde_json::to_string(&record.encode()).expect("serialize");
    assert!(text.contains(r#""label":"7""#));
    assert!(text.contains(r#""item-weight":7"#));
}
