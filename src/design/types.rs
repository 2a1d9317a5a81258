#![deny(missing_docs)]

//! # Design Type Model
//!
//! The recursive, language-agnostic representation of a typed value as
//! produced by the upstream design DSL engine. Derivation consumes this
//! model read-only.
//!
//! User types are referenced by name into the [`Design`] registry so that
//! self-referencing types are representable; every recursive walk over
//! attributes threads an explicit visited-name set to terminate on cycles.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashSet;

/// The primitive kinds supported by the design language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Primitive {
    /// Boolean.
    Bool,
    /// Architecture-sized signed integer.
    Int,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// Architecture-sized unsigned integer.
    UInt,
    /// 32-bit unsigned integer.
    UInt32,
    /// 64-bit unsigned integer.
    UInt64,
    /// 32-bit float.
    Float32,
    /// 64-bit float.
    Float64,
    /// UTF-8 string.
    String,
    /// Raw byte sequence.
    Bytes,
    /// Untyped value.
    Any,
}

impl Primitive {
    /// Returns the Rust scalar name used in generated code.
    pub fn rust_name(&self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::Int => "i64",
            Primitive::Int32 => "i32",
            Primitive::Int64 => "i64",
            Primitive::UInt => "u64",
            Primitive::UInt32 => "u32",
            Primitive::UInt64 => "u64",
            Primitive::Float32 => "f32",
            Primitive::Float64 => "f64",
            Primitive::String => "String",
            Primitive::Bytes => "Vec<u8>",
            Primitive::Any => "serde_json::Value",
        }
    }

    /// True if a value of this kind read from a path/query/header string
    /// needs a parse step before use. Strings are used as-is; byte
    /// sequences and untyped values are carried raw.
    pub fn needs_conversion(&self) -> bool {
        !matches!(self, Primitive::String | Primitive::Bytes | Primitive::Any)
    }

    /// True for kinds that are naturally absent-able on the wire and never
    /// receive an extra optionality layer in always-optional body shapes.
    pub fn naturally_nilable(&self) -> bool {
        matches!(self, Primitive::Bytes | Primitive::Any)
    }
}

/// The closed set of attribute kinds. Every dispatch over this enum is an
/// exhaustive `match`; adding a kind is a compile-time-enforced exercise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DataType {
    /// A primitive scalar.
    Primitive(Primitive),
    /// An ordered collection of one element type.
    Array(Box<Attribute>),
    /// A map from a key type to an element type.
    Map {
        /// Key attribute.
        key: Box<Attribute>,
        /// Element attribute.
        elem: Box<Attribute>,
    },
    /// A named, ordered set of fields.
    Object(Object),
    /// A reference by name into the [`Design`] user type registry.
    UserType(String),
}

impl DataType {
    /// Short kind name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            DataType::Primitive(_) => "primitive",
            DataType::Array(_) => "array",
            DataType::Map { .. } => "map",
            DataType::Object(_) => "object",
            DataType::UserType(_) => "user type",
        }
    }
}

/// Validation rules carried by an attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Validation {
    /// Regular expression the (string) value must match.
    pub pattern: Option<String>,
    /// Well-known format name (e.g. "email"), documentation only.
    pub format: Option<String>,
    /// Inclusive minimum for numeric values.
    pub minimum: Option<f64>,
    /// Inclusive maximum for numeric values.
    pub maximum: Option<f64>,
    /// Minimum length for strings and collections.
    pub min_length: Option<usize>,
    /// Maximum length for strings and collections.
    pub max_length: Option<usize>,
    /// Closed set of allowed values.
    pub enum_values: Vec<JsonValue>,
}

impl Validation {
    /// True if no rule is set.
    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
            && self.minimum.is_none()
            && self.maximum.is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
            && self.enum_values.is_empty()
    }
}

/// A typed node of the design tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    /// The type of the value.
    pub data_type: DataType,
    /// Whether the value must be present when used as an object field.
    pub required: bool,
    /// Default used when the value is absent.
    pub default_value: Option<JsonValue>,
    /// Human description.
    pub description: Option<String>,
    /// Validation rules, if any.
    pub validation: Option<Validation>,
    /// Explicit generated-type override (design annotation).
    pub type_name_override: Option<String>,
}

impl Attribute {
    /// Creates an optional attribute of the given type with no metadata.
    pub fn new(data_type: DataType) -> Self {
        Attribute {
            data_type,
            required: false,
            default_value: None,
            description: None,
            validation: None,
            type_name_override: None,
        }
    }

    /// Creates a primitive attribute.
    pub fn primitive(p: Primitive) -> Self {
        Attribute::new(DataType::Primitive(p))
    }

    /// Creates a user type reference attribute.
    pub fn user_type(name: impl Into<String>) -> Self {
        Attribute::new(DataType::UserType(name.into()))
    }

    /// Creates an array attribute.
    pub fn array(elem: Attribute) -> Self {
        Attribute::new(DataType::Array(Box::new(elem)))
    }

    /// Creates a map attribute.
    pub fn map(key: Attribute, elem: Attribute) -> Self {
        Attribute::new(DataType::Map {
            key: Box::new(key),
            elem: Box::new(elem),
        })
    }

    /// Creates an object attribute from `(name, attribute)` pairs.
    pub fn object(fields: Vec<(&str, Attribute)>) -> Self {
        let mut o = Object::new();
        for (n, a) in fields {
            o.set(n, a);
        }
        Attribute::new(DataType::Object(o))
    }

    /// Marks the attribute required.
    pub fn require(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the default value.
    pub fn with_default(mut self, v: JsonValue) -> Self {
        self.default_value = Some(v);
        self
    }

    /// Sets the description.
    pub fn describe(mut self, d: impl Into<String>) -> Self {
        self.description = Some(d.into());
        self
    }

    /// Sets validation rules.
    pub fn with_validation(mut self, v: Validation) -> Self {
        self.validation = Some(v);
        self
    }
}

/// An ordered set of named attributes. Iteration order is declaration
/// order and is part of the derivation contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Object {
    fields: IndexMap<String, Attribute>,
}

impl Object {
    /// Creates an empty object.
    pub fn new() -> Self {
        Object::default()
    }

    /// Adds or replaces a field.
    pub fn set(&mut self, name: impl Into<String>, attribute: Attribute) {
        self.fields.insert(name.into(), attribute);
    }

    /// Looks up a field by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.fields.get(name)
    }

    /// Iterates fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.fields.iter().map(|(n, a)| (n.as_str(), a))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the object has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A named user type definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserTypeDef {
    /// Design-level name, unique within a [`Design`].
    pub name: String,
    /// The wrapped attribute.
    pub attribute: Attribute,
}

/// The resolved, validated design graph: the user type registry plus the
/// HTTP service expressions. Built by the upstream DSL engine; this crate
/// never mutates it.
#[derive(Debug, Clone, Default)]
pub struct Design {
    user_types: IndexMap<String, UserTypeDef>,
    services: Vec<super::http::ServiceExpr>,
}

impl Design {
    /// Creates an empty design.
    pub fn new() -> Self {
        Design::default()
    }

    /// Registers a user type. Panics on duplicate names: the upstream
    /// engine guarantees uniqueness, a duplicate is a bug.
    pub fn register(&mut self, ut: UserTypeDef) {
        if self.user_types.contains_key(&ut.name) {
            panic!("user type {:?} registered twice", ut.name); // bug
        }
        self.user_types.insert(ut.name.clone(), ut);
    }

    /// Adds a service expression.
    pub fn add_service(&mut self, svc: super::http::ServiceExpr) {
        self.services.push(svc);
    }

    /// Looks up a service by name.
    pub fn service(&self, name: &str) -> Option<&super::http::ServiceExpr> {
        self.services.iter().find(|s| s.name == name)
    }

    /// Resolves a user type by name. Panics on a dangling reference: the
    /// design is validated upstream, a miss is a bug.
    pub fn user_type(&self, name: &str) -> &UserTypeDef {
        self.user_types
            .get(name)
            .unwrap_or_else(|| panic!("dangling user type reference {:?}", name)) // bug
    }

    /// Resolves user type references down to the underlying attribute.
    /// Panics on reference cycles with no structural node in between,
    /// which the upstream engine rejects.
    pub fn resolve<'a>(&'a self, attr: &'a Attribute) -> &'a Attribute {
        let mut seen = HashSet::new();
        let mut cur = attr;
        while let DataType::UserType(name) = &cur.data_type {
            if !seen.insert(name.clone()) {
                panic!("user type alias cycle through {:?}", name); // bug
            }
            cur = &self.user_type(name).attribute;
        }
        cur
    }

    /// True if the attribute resolves to an object.
    pub fn is_object(&self, attr: &Attribute) -> bool {
        matches!(self.resolve(attr).data_type, DataType::Object(_))
    }

    /// True if the attribute resolves to an array.
    pub fn is_array(&self, attr: &Attribute) -> bool {
        matches!(self.resolve(attr).data_type, DataType::Array(_))
    }

    /// True if the attribute resolves to a map.
    pub fn is_map(&self, attr: &Attribute) -> bool {
        matches!(self.resolve(attr).data_type, DataType::Map { .. })
    }

    /// True if the attribute resolves to a primitive; returns the kind.
    pub fn as_primitive(&self, attr: &Attribute) -> Option<Primitive> {
        match self.resolve(attr).data_type {
            DataType::Primitive(p) => Some(p),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_rust_names() {
        assert_eq!(Primitive::UInt.rust_name(), "u64");
        assert_eq!(Primitive::Bytes.rust_name(), "Vec<u8>");
        assert_eq!(Primitive::Any.rust_name(), "serde_json::Value");
    }

    #[test]
    fn test_needs_conversion() {
        assert!(Primitive::UInt32.needs_conversion());
        assert!(Primitive::Bool.needs_conversion());
        assert!(!Primitive::String.needs_conversion());
        assert!(!Primitive::Any.needs_conversion());
    }

    #[test]
    fn test_object_order_is_declaration_order() {
        let mut o = Object::new();
        o.set("zulu", Attribute::primitive(Primitive::String));
        o.set("alpha", Attribute::primitive(Primitive::Int32));
        let names: Vec<&str> = o.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["zulu", "alpha"]);
    }

    #[test]
    fn test_resolve_user_type_chain() {
        let mut d = Design::new();
        d.register(UserTypeDef {
            name: "Inner".into(),
            attribute: Attribute::primitive(Primitive::String),
        });
        d.register(UserTypeDef {
            name: "Outer".into(),
            attribute: Attribute::user_type("Inner"),
        });
        let a = Attribute::user_type("Outer");
        let resolved = d.resolve(&a);
        assert_eq!(resolved.data_type, DataType::Primitive(Primitive::String));
    }

    #[test]
    #[should_panic(expected = "dangling user type reference")]
    fn test_dangling_reference_panics() {
        let d = Design::new();
        d.user_type("Nope");
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn test_duplicate_registration_panics() {
        let mut d = Design::new();
        let ut = UserTypeDef {
            name: "T".into(),
            attribute: Attribute::primitive(Primitive::Bool),
        };
        d.register(ut.clone());
        d.register(ut);
    }
}
