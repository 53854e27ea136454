//! Property tests over the schema document: normalization is idempotent for
//! arbitrary inputs, and no sequence of edit operations can produce a
//! document whose serialized form breaks the shape invariant.

use proptest::prelude::*;
use proptest::test_runner::TestRunner;
use serde_json::{json, Value};

use crate::schema::document::{normalize, to_value, SchemaKind, SchemaNode, SchemaType};
use crate::schema::edit;
use crate::schema::path::FieldPath;

const TYPE_CHOICES: [SchemaType; 7] = [
    SchemaType::String,
    SchemaType::Number,
    SchemaType::Integer,
    SchemaType::Boolean,
    SchemaType::Null,
    SchemaType::Array,
    SchemaType::Object,
];

/// Strategy producing schema-ish JSON: tagged nodes, plain nested objects,
/// bare type-name strings and junk leaves.
fn arb_schema_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(json!("string")),
        Just(json!("integer")),
        Just(json!("widget")),
        Just(json!(42)),
        Just(json!(true)),
        Just(json!({ "type": "array" })),
        Just(json!({ "type": "number", "minimum": 1.0 })),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop::collection::btree_map("[a-z]{1,5}", inner, 0..4)
            .prop_map(|map| Value::Object(map.into_iter().collect()))
    })
}

#[derive(Debug, Clone)]
enum Op {
    AddTop(String, usize),
    AddNested(usize),
    Rename(usize, String),
    Retype(usize, usize),
    Delete(usize),
    Move(usize, usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        ("[a-z]{0,5}", any::<usize>()).prop_map(|(n, t)| Op::AddTop(n, t)),
        any::<usize>().prop_map(Op::AddNested),
        (any::<usize>(), "[a-z]{0,5}").prop_map(|(i, n)| Op::Rename(i, n)),
        (any::<usize>(), any::<usize>()).prop_map(|(i, t)| Op::Retype(i, t)),
        any::<usize>().prop_map(Op::Delete),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::Move(a, b)),
    ]
}

/// Every addressable path in the document, root included.
fn collect_paths(node: &SchemaNode, prefix: FieldPath, out: &mut Vec<FieldPath>) {
    out.push(prefix.clone());
    match &node.kind {
        SchemaKind::Object { properties } => {
            for (name, child) in properties {
                collect_paths(child, prefix.child(name), out);
            }
        }
        SchemaKind::Array { items: Some(items) } => {
            collect_paths(items, prefix.child(crate::schema::path::ITEMS_SEGMENT), out);
        }
        _ => {}
    }
}

fn pick<'a>(paths: &'a [FieldPath], index: usize) -> &'a FieldPath {
    &paths[index % paths.len()]
}

/// Apply one op, ignoring rejections: rejected edits must leave the
/// document valid too, which is exactly what the final assertions check.
fn apply(doc: &mut SchemaNode, op: &Op) {
    let mut paths = Vec::new();
    collect_paths(doc, FieldPath::root(), &mut paths);
    let non_root: Vec<FieldPath> = paths.iter().filter(|p| !p.is_root()).cloned().collect();

    match op {
        Op::AddTop(name, ty) => {
            let _ = edit::add_top_level_field(doc, name, TYPE_CHOICES[ty % 7]);
        }
        Op::AddNested(i) => {
            let _ = edit::add_nested_field(doc, pick(&paths, *i));
        }
        Op::Rename(i, name) => {
            if !non_root.is_empty() {
                let _ = edit::rename_field(doc, pick(&non_root, *i), name);
            }
        }
        Op::Retype(i, ty) => {
            let _ = edit::retype_field(doc, pick(&paths, *i), TYPE_CHOICES[ty % 7]);
        }
        Op::Delete(i) => {
            if !non_root.is_empty() {
                let _ = edit::delete_field(doc, pick(&non_root, *i));
            }
        }
        Op::Move(src, dst) => {
            if !non_root.is_empty() {
                let _ = edit::move_field(doc, pick(&non_root, *src), pick(&paths, *dst));
            }
        }
    }
}

/// Shape invariant on the serialized form: objects (and only objects) carry
/// `properties`, with `required` equal to the sorted key set; arrays carry
/// at most an `items` subtree.
fn shape_ok(value: &Value) -> bool {
    let Some(map) = value.as_object() else {
        return false;
    };
    match map.get("type").and_then(Value::as_str) {
        Some("object") => {
            let Some(props) = map.get("properties").and_then(Value::as_object) else {
                return false;
            };
            let mut keys: Vec<&str> = props.keys().map(String::as_str).collect();
            keys.sort_unstable();
            let required: Vec<&str> = map
                .get("required")
                .and_then(Value::as_array)
                .map(|a| a.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();
            keys == required && props.values().all(shape_ok)
        }
        Some("array") => {
            if map.get("properties").is_some() || map.get("required").is_some() {
                return false;
            }
            map.get("items").map_or(true, shape_ok)
        }
        Some(_) => map.get("properties").is_none() && map.get("required").is_none(),
        None => false,
    }
}

#[test]
fn normalization_is_idempotent_for_arbitrary_inputs() {
    let mut runner = TestRunner::default();
    runner
        .run(&arb_schema_json(), |input| {
            let once = normalize(&input);
            let twice = normalize(&to_value(&once));
            prop_assert_eq!(&once, &twice);
            Ok(())
        })
        .unwrap();
}

#[test]
fn random_op_sequences_never_break_the_shape_invariant() {
    let mut runner = TestRunner::default();
    let cases = (
        arb_schema_json(),
        prop::collection::vec(arb_op(), 0..24),
    );
    runner
        .run(&cases, |(input, ops)| {
            let mut doc = crate::schema::document::normalize_root(&input);
            for op in &ops {
                apply(&mut doc, op);
            }
            let out = to_value(&doc);
            prop_assert!(shape_ok(&out), "serialized form broke shape: {out}");
            // Serialization round-trips exactly.
            prop_assert_eq!(&normalize(&out), &doc);
            Ok(())
        })
        .unwrap();
}
