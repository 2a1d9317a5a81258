#![deny(missing_docs)]

//! # Wire Type Definitions
//!
//! Converts an attribute tree into the struct-shape source text of a wire
//! body type. Field optionality is driven by a [`BodyShapePolicy`]: the
//! same wire format is rendered twice, once with every field optional for
//! decode-then-validate code and once with the default-value policy for
//! lean encode code.

use crate::design::mapped::MappedAttribute;
use crate::design::types::{Attribute, DataType};
use crate::scope::Scope;
use serde::Serialize;

/// Field optionality policy for a generated body shape.
///
/// Replaces the pair of independent booleans (`force all pointers`,
/// `use default value policy`) threaded through the original: only valid
/// combinations are expressible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BodyShapePolicy {
    /// Every field is optional so decoded data can be validated before
    /// use. Byte sequences and untyped values are naturally nilable and
    /// keep their plain type.
    AlwaysOptional,
    /// A field is optional iff it is not required and has no default
    /// value: defaulted fields are materialized before encoding.
    RequiredUnlessDefaulted,
    /// A field is optional iff it is not required. Domain-facing shape.
    RequiredStrict,
}

/// Whether a field is rendered optional under the given policy.
pub fn field_is_optional(scope: &Scope<'_>, policy: BodyShapePolicy, attr: &Attribute) -> bool {
    match policy {
        BodyShapePolicy::AlwaysOptional => match scope.design().as_primitive(attr) {
            Some(p) => !p.naturally_nilable(),
            None => true,
        },
        BodyShapePolicy::RequiredUnlessDefaulted => {
            !attr.required && attr.default_value.is_none()
        }
        BodyShapePolicy::RequiredStrict => !attr.required,
    }
}

/// Renders the struct-shape definition of the attribute under the given
/// policy. For objects this is the brace-delimited field block (the
/// emission layer wraps it in `pub struct Name`); for every other kind it
/// is the bare type expression. User types short-circuit to their
/// registered type name.
pub fn type_def(scope: &Scope<'_>, attr: &Attribute, policy: BodyShapePolicy) -> String {
    if let Some(over) = &attr.type_name_override {
        return over.clone();
    }
    match &attr.data_type {
        DataType::Primitive(p) => p.rust_name().to_string(),
        DataType::Array(elem) => format!("Vec<{}>", element_def(scope, elem)),
        DataType::Map { key, elem } => format!(
            "HashMap<{}, {}>",
            element_def(scope, key),
            element_def(scope, elem)
        ),
        DataType::UserType(name) => scope.struct_name(name),
        DataType::Object(_) => object_def(scope, attr, policy),
    }
}

/// Element position type expression: object-shaped elements are boxed so
/// recursive wire types stay representable.
fn element_def(scope: &Scope<'_>, elem: &Attribute) -> String {
    if scope.design().is_object(elem) {
        format!("Box<{}>", scope.type_name(elem))
    } else {
        type_def(scope, elem, BodyShapePolicy::RequiredStrict)
    }
}

fn object_def(scope: &Scope<'_>, attr: &Attribute, policy: BodyShapePolicy) -> String {
    let mapped = MappedAttribute::new(attr.clone());
    let mut def = String::from("{\n");
    mapped.walk(|name, wire, field| {
        let rust_name = scope.field_name(name);
        let optional = field_is_optional(scope, policy, field);
        if let Some(desc) = &field.description {
            for line in desc.lines() {
                def.push_str(&format!("    /// {}\n", line));
            }
        }
        let mut serde_attrs = Vec::new();
        if wire != rust_name {
            serde_attrs.push(format!("rename = \"{}\"", wire));
        }
        if optional {
            serde_attrs.push("skip_serializing_if = \"Option::is_none\"".to_string());
            serde_attrs.push("default".to_string());
        }
        if !serde_attrs.is_empty() {
            def.push_str(&format!("    #[serde({})]\n", serde_attrs.join(", ")));
        }
        let base = if scope.design().is_object(field) {
            format!("Box<{}>", scope.type_name(field))
        } else {
            type_def(scope, field, BodyShapePolicy::RequiredStrict)
        };
        let ty = if optional {
            format!("Option<{}>", base)
        } else {
            base
        };
        def.push_str(&format!("    pub {}: {},\n", rust_name, ty));
    });
    def.push('}');
    def
}
