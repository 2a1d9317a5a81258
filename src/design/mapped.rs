#![deny(missing_docs)]

//! # Mapped Attributes
//!
//! An object-typed attribute whose field names carry transport wire-name
//! overrides. Used identically for path params, query params, headers and
//! cookies. A field key may use the `"name:elem"` syntax to declare the
//! design attribute name and the wire element name in one token; the
//! constructor splits it into the name map.

use crate::design::types::{Attribute, DataType, Object, Primitive};
use indexmap::IndexMap;

/// An attribute of type object mapping field names to wire element names.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedAttribute {
    attribute: Attribute,
    name_map: IndexMap<String, String>,
}

impl MappedAttribute {
    /// Creates an empty mapped attribute (no fields).
    pub fn empty() -> Self {
        MappedAttribute {
            attribute: Attribute::new(DataType::Object(Object::new())),
            name_map: IndexMap::new(),
        }
    }

    /// Creates a mapped attribute from an object-typed attribute,
    /// splitting any `"name:elem"` field keys into wire-name mappings.
    /// Panics if the attribute is not an object.
    pub fn new(attribute: Attribute) -> Self {
        let obj = match &attribute.data_type {
            DataType::Object(o) => o,
            other => panic!(
                "cannot create a mapped attribute with a non object attribute ({})",
                other.kind_name()
            ), // bug
        };
        let mut fields = Object::new();
        let mut name_map = IndexMap::new();
        let mut wire_seen: IndexMap<String, String> = IndexMap::new();
        for (key, att) in obj.iter() {
            let (name, elem) = match key.split_once(':') {
                Some((n, e)) => (n.to_string(), Some(e.to_string())),
                None => (key.to_string(), None),
            };
            let wire = elem.clone().unwrap_or_else(|| name.clone());
            if let Some(prev) = wire_seen.insert(wire.clone(), name.clone()) {
                panic!(
                    "fields {:?} and {:?} both map to wire name {:?}",
                    prev, name, wire
                ); // bug
            }
            if let Some(e) = elem {
                name_map.insert(name.clone(), e);
            }
            fields.set(name, att.clone());
        }
        let mut attribute = attribute;
        attribute.data_type = DataType::Object(fields);
        MappedAttribute {
            attribute,
            name_map,
        }
    }

    /// Records the wire element name of a child attribute. Panics if
    /// `att_name` is not a field or the wire name is already taken.
    pub fn map(&mut self, elem_name: impl Into<String>, att_name: impl Into<String>) {
        let att_name = att_name.into();
        let elem_name = elem_name.into();
        if self.object().attribute(&att_name).is_none() {
            panic!(
                "{} is not the name of a child of the mapped attribute",
                att_name
            ); // bug
        }
        let taken = self.object().iter().any(|(n, _)| {
            n != att_name && self.elem_name(n) == elem_name
        });
        if taken {
            panic!("wire name {:?} is mapped twice", elem_name); // bug
        }
        self.name_map.insert(att_name, elem_name);
    }

    /// The underlying object-typed attribute.
    pub fn attribute(&self) -> &Attribute {
        &self.attribute
    }

    /// The underlying object.
    pub fn object(&self) -> &Object {
        match &self.attribute.data_type {
            DataType::Object(o) => o,
            _ => unreachable!("mapped attribute is always an object"),
        }
    }

    /// True if the mapped attribute has no field.
    pub fn is_empty(&self) -> bool {
        self.object().is_empty()
    }

    /// Returns the wire element name of a field, defaulting to the field
    /// name when unmapped. Panics if the field does not exist.
    pub fn elem_name<'a>(&'a self, key: &'a str) -> &'a str {
        if let Some(n) = self.name_map.get(key) {
            return n;
        }
        if self.object().attribute(key).is_some() {
            return key;
        }
        panic!("key {:?} is not defined", key); // bug
    }

    /// Iterates `(field name, wire name, attribute)` in declaration order.
    pub fn walk(&self, mut it: impl FnMut(&str, &str, &Attribute)) {
        for (name, att) in self.object().iter() {
            it(name, self.elem_name(name), att);
        }
    }

    /// Whether the named field is required.
    pub fn is_required(&self, name: &str) -> bool {
        self.object().attribute(name).map(|a| a.required).unwrap_or(false)
    }

    /// Whether the named field carries a default value.
    pub fn has_default(&self, name: &str) -> bool {
        self.object()
            .attribute(name)
            .map(|a| a.default_value.is_some())
            .unwrap_or(false)
    }

    /// Whether the named field is represented as a pointer: a primitive
    /// that is not required and, when `use_default` is set, has no default
    /// value. Byte sequences and untyped values are naturally nilable and
    /// are never pointers.
    pub fn is_primitive_pointer(&self, name: &str, use_default: bool) -> bool {
        let att = match self.object().attribute(name) {
            Some(a) => a,
            None => return false,
        };
        let prim = match att.data_type {
            DataType::Primitive(p) => p,
            _ => return false,
        };
        if matches!(prim, Primitive::Bytes | Primitive::Any) {
            return false;
        }
        !att.required && (!use_default || att.default_value.is_none())
    }
}
