#![deny(missing_docs)]

//! # Example Values
//!
//! Deterministic example generation for generated-code documentation.
//! Values are seeded from an FNV-1a hash of the attribute path so the
//! same design always renders the same examples, keeping generated output
//! diff-stable across runs.

use crate::design::types::{Attribute, DataType, Design, Primitive};
use serde_json::{json, Value as JsonValue};

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

fn fnv1a(path: &str) -> u64 {
    let mut h = FNV_OFFSET;
    for b in path.bytes() {
        h ^= b as u64;
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}

const WORDS: &[&str] = &[
    "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel",
];

/// Generates a deterministic example value for the attribute. A declared
/// default value or the first enum member wins over the seeded value.
pub fn example_value(design: &Design, attr: &Attribute, path: &str) -> JsonValue {
    example_seen(design, attr, path, &mut Vec::new())
}

fn example_seen(
    design: &Design,
    attr: &Attribute,
    path: &str,
    seen: &mut Vec<String>,
) -> JsonValue {
    if let Some(def) = &attr.default_value {
        return def.clone();
    }
    if let Some(rules) = &attr.validation {
        if let Some(first) = rules.enum_values.first() {
            return first.clone();
        }
    }
    let seed = fnv1a(path);
    match &attr.data_type {
        DataType::Primitive(p) => primitive_example(*p, seed),
        DataType::Array(elem) => {
            json!([example_seen(design, elem, &format!("{}[0]", path), seen)])
        }
        DataType::Map { key, elem } => {
            let k = example_seen(design, key, &format!("{}.key", path), seen);
            let v = example_seen(design, elem, &format!("{}.value", path), seen);
            let name = match k {
                JsonValue::String(s) => s,
                other => other.to_string(),
            };
            json!({ name: v })
        }
        DataType::Object(o) => {
            let mut out = serde_json::Map::new();
            for (name, field) in o.iter() {
                out.insert(
                    name.to_string(),
                    example_seen(design, field, &format!("{}.{}", path, name), seen),
                );
            }
            JsonValue::Object(out)
        }
        DataType::UserType(name) => {
            if seen.contains(name) {
                // recursive reference, cut off with null
                return JsonValue::Null;
            }
            seen.push(name.clone());
            let v = example_seen(design, &design.user_type(name).attribute, path, seen);
            seen.pop();
            v
        }
    }
}

fn primitive_example(p: Primitive, seed: u64) -> JsonValue {
    match p {
        Primitive::Bool => json!(seed % 2 == 0),
        Primitive::Int | Primitive::Int32 | Primitive::Int64 => json!((seed % 1000) as i64),
        Primitive::UInt | Primitive::UInt32 | Primitive::UInt64 => json!(seed % 1000),
        Primitive::Float32 | Primitive::Float64 => json!((seed % 1000) as f64 / 10.0),
        Primitive::String => json!(WORDS[(seed % WORDS.len() as u64) as usize]),
        Primitive::Bytes => json!(WORDS[(seed % WORDS.len() as u64) as usize]),
        Primitive::Any => json!({ "value": seed % 1000 }),
    }
}
