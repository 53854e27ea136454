//! Canonical in-memory form of the JSON-Schema-like documents that describe a
//! node's input/output contract.
//!
//! The backend (and older saved workflows) hand us schemas in several layers
//! of sloppiness: fully tagged nodes (`{"type": "object", "properties": …}`),
//! plain nested objects with no `type` tag at all, and bare type-name strings
//! as leaves (`{"a": "string"}`).  `normalize` folds all of those into one
//! typed tree so the editor only ever mutates a well-shaped document, and
//! `to_value` emits the tagged wire form back out.
//!
//! `required` is never stored: for an object node it is *defined* as the key
//! set of `properties`, so it is derived at serialization time and any
//! `required` list present in the input is ignored.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

/// The seven JSON-Schema type tags the editor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Null,
    Array,
    Object,
}

impl SchemaType {
    /// The five non-container kinds, in the order type selectors offer them.
    pub const SCALARS: [SchemaType; 5] = [
        SchemaType::String,
        SchemaType::Number,
        SchemaType::Integer,
        SchemaType::Boolean,
        SchemaType::Null,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Integer => "integer",
            SchemaType::Boolean => "boolean",
            SchemaType::Null => "null",
            SchemaType::Array => "array",
            SchemaType::Object => "object",
        }
    }

    pub fn parse(s: &str) -> Option<SchemaType> {
        match s {
            "string" => Some(SchemaType::String),
            "number" => Some(SchemaType::Number),
            "integer" => Some(SchemaType::Integer),
            "boolean" => Some(SchemaType::Boolean),
            "null" => Some(SchemaType::Null),
            "array" => Some(SchemaType::Array),
            "object" => Some(SchemaType::Object),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, SchemaType::Array | SchemaType::Object)
    }
}

/// Cross-cutting schema metadata that survives a retype.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaMeta {
    pub description: Option<String>,
    pub enum_values: Option<Vec<Value>>,
    pub nullable: Option<bool>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

impl SchemaMeta {
    fn from_map(map: &Map<String, Value>) -> SchemaMeta {
        SchemaMeta {
            description: map
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
            enum_values: map
                .get("enum")
                .and_then(Value::as_array)
                .map(|a| a.to_vec()),
            nullable: map.get("nullable").and_then(Value::as_bool),
            minimum: map.get("minimum").and_then(Value::as_f64),
            maximum: map.get("maximum").and_then(Value::as_f64),
        }
    }

    fn write_into(&self, out: &mut Map<String, Value>) {
        if let Some(d) = &self.description {
            out.insert("description".into(), Value::String(d.clone()));
        }
        if let Some(e) = &self.enum_values {
            out.insert("enum".into(), Value::Array(e.clone()));
        }
        if let Some(n) = self.nullable {
            out.insert("nullable".into(), Value::Bool(n));
        }
        if let Some(m) = self.minimum {
            out.insert("minimum".into(), json!(m));
        }
        if let Some(m) = self.maximum {
            out.insert("maximum".into(), json!(m));
        }
    }
}

/// Structural shape of a schema node.  Only `Object` carries properties and
/// only `Array` carries an item schema, so the shape invariant from the data
/// model holds by construction.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    Scalar(SchemaType),
    Array { items: Option<Box<SchemaNode>> },
    Object { properties: BTreeMap<String, SchemaNode> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub kind: SchemaKind,
    pub meta: SchemaMeta,
}

impl SchemaNode {
    pub fn scalar(ty: SchemaType) -> SchemaNode {
        debug_assert!(ty.is_scalar());
        SchemaNode {
            kind: SchemaKind::Scalar(ty),
            meta: SchemaMeta::default(),
        }
    }

    pub fn object() -> SchemaNode {
        SchemaNode {
            kind: SchemaKind::Object {
                properties: BTreeMap::new(),
            },
            meta: SchemaMeta::default(),
        }
    }

    pub fn array() -> SchemaNode {
        SchemaNode {
            kind: SchemaKind::Array { items: None },
            meta: SchemaMeta::default(),
        }
    }

    /// Fresh node of the given type with empty containers.
    pub fn of_type(ty: SchemaType) -> SchemaNode {
        match ty {
            SchemaType::Object => SchemaNode::object(),
            SchemaType::Array => SchemaNode::array(),
            scalar => SchemaNode::scalar(scalar),
        }
    }

    /// The type tag this node serializes with.
    pub fn schema_type(&self) -> SchemaType {
        match &self.kind {
            SchemaKind::Scalar(ty) => *ty,
            SchemaKind::Array { .. } => SchemaType::Array,
            SchemaKind::Object { .. } => SchemaType::Object,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self.kind, SchemaKind::Object { .. })
    }

    pub fn properties(&self) -> Option<&BTreeMap<String, SchemaNode>> {
        match &self.kind {
            SchemaKind::Object { properties } => Some(properties),
            _ => None,
        }
    }

    pub fn properties_mut(&mut self) -> Option<&mut BTreeMap<String, SchemaNode>> {
        match &mut self.kind {
            SchemaKind::Object { properties } => Some(properties),
            _ => None,
        }
    }
}

/// Recursively canonicalize an arbitrary schema-ish value.
///
/// Idempotent: `normalize(&to_value(&normalize(v))) == normalize(v)` for any
/// input `v`.  Unrecognized leaves default to `string`.
pub fn normalize(value: &Value) -> SchemaNode {
    match value {
        Value::String(s) => {
            let ty = SchemaType::parse(s).unwrap_or(SchemaType::String);
            match ty {
                SchemaType::Object => SchemaNode::object(),
                SchemaType::Array => SchemaNode::array(),
                scalar => SchemaNode::scalar(scalar),
            }
        }
        Value::Object(map) => normalize_map(map),
        // Numbers, bools, arrays and nulls carry no schema information.
        _ => SchemaNode::scalar(SchemaType::String),
    }
}

/// Normalize and coerce to an editable document root (always an object).
pub fn normalize_root(value: &Value) -> SchemaNode {
    let node = normalize(value);
    if node.is_object() {
        node
    } else {
        SchemaNode::object()
    }
}

fn normalize_map(map: &Map<String, Value>) -> SchemaNode {
    let tag = map
        .get("type")
        .and_then(Value::as_str)
        .and_then(SchemaType::parse);

    match tag {
        Some(SchemaType::Object) => {
            let mut properties = BTreeMap::new();
            if let Some(Value::Object(props)) = map.get("properties") {
                for (key, child) in props {
                    properties.insert(key.clone(), normalize(child));
                }
            }
            SchemaNode {
                kind: SchemaKind::Object { properties },
                meta: SchemaMeta::from_map(map),
            }
        }
        Some(SchemaType::Array) => SchemaNode {
            kind: SchemaKind::Array {
                items: map.get("items").map(|v| Box::new(normalize(v))),
            },
            meta: SchemaMeta::from_map(map),
        },
        Some(scalar) => SchemaNode {
            kind: SchemaKind::Scalar(scalar),
            meta: SchemaMeta::from_map(map),
        },
        // No usable `type` tag: treat every key as a property of an
        // implicit object node.
        None => {
            let mut properties = BTreeMap::new();
            for (key, child) in map {
                properties.insert(key.clone(), normalize(child));
            }
            SchemaNode {
                kind: SchemaKind::Object { properties },
                meta: SchemaMeta::default(),
            }
        }
    }
}

/// Serialize back to the tagged wire form.  Object nodes always emit
/// `properties` and a `required` list equal to their sorted key set.
pub fn to_value(node: &SchemaNode) -> Value {
    let mut out = Map::new();
    out.insert(
        "type".into(),
        Value::String(node.schema_type().as_str().into()),
    );
    node.meta.write_into(&mut out);

    match &node.kind {
        SchemaKind::Scalar(_) => {}
        SchemaKind::Array { items } => {
            if let Some(items) = items {
                out.insert("items".into(), to_value(items));
            }
        }
        SchemaKind::Object { properties } => {
            let mut props = Map::new();
            for (key, child) in properties {
                props.insert(key.clone(), to_value(child));
            }
            out.insert("properties".into(), Value::Object(props));
            // BTreeMap iterates in key order, so this is already sorted.
            out.insert(
                "required".into(),
                Value::Array(
                    properties
                        .keys()
                        .map(|k| Value::String(k.clone()))
                        .collect(),
                ),
            );
        }
    }

    Value::Object(out)
}
