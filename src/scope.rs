#![deny(missing_docs)]

//! # Name Scope
//!
//! Renders design names into the identifiers used by generated Rust code:
//! snake_case fields and variables, UpperCamelCase types. Also renders the
//! Rust type name of any attribute, resolving user type references through
//! the design registry.

use crate::design::types::{Attribute, DataType, Design};
use heck::{ToSnakeCase, ToUpperCamelCase};

/// Naming context for one derivation run.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'d> {
    design: &'d Design,
}

impl<'d> Scope<'d> {
    /// Creates a scope over the given design.
    pub fn new(design: &'d Design) -> Self {
        Scope { design }
    }

    /// The design the scope resolves against.
    pub fn design(&self) -> &'d Design {
        self.design
    }

    /// Struct field name for a design attribute name.
    pub fn field_name(&self, name: &str) -> String {
        name.to_snake_case()
    }

    /// Local variable name for a design attribute name.
    pub fn var_name(&self, name: &str) -> String {
        name.to_snake_case()
    }

    /// Generated type name for a design type name.
    pub fn struct_name(&self, name: &str) -> String {
        name.to_upper_camel_case()
    }

    /// Rust type name of the attribute. Anonymous objects have no
    /// standalone name; the upstream engine wraps every object used as a
    /// type in a named user type, so hitting one here is a bug.
    pub fn type_name(&self, attr: &Attribute) -> String {
        if let Some(over) = &attr.type_name_override {
            return over.clone();
        }
        match &attr.data_type {
            DataType::Primitive(p) => p.rust_name().to_string(),
            DataType::Array(elem) => format!("Vec<{}>", self.type_name(elem)),
            DataType::Map { key, elem } => format!(
                "HashMap<{}, {}>",
                self.type_name(key),
                self.type_name(elem)
            ),
            DataType::Object(_) => {
                panic!("anonymous object used as a standalone type") // bug
            }
            DataType::UserType(name) => self.struct_name(name),
        }
    }

    /// Rust reference to the attribute type, optionally wrapped in
    /// `Option` for pointer semantics.
    pub fn type_ref(&self, attr: &Attribute, pointer: bool) -> String {
        let name = self.type_name(attr);
        if pointer {
            format!("Option<{}>", name)
        } else {
            name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::types::{Attribute, Primitive, UserTypeDef};

    #[test]
    fn test_casing() {
        let d = Design::new();
        let s = Scope::new(&d);
        assert_eq!(s.field_name("OrgID"), "org_id");
        assert_eq!(s.var_name("X-Rate-Limit"), "x_rate_limit");
        assert_eq!(s.struct_name("account_request_body"), "AccountRequestBody");
    }

    #[test]
    fn test_type_names() {
        let mut d = Design::new();
        d.register(UserTypeDef {
            name: "account".into(),
            attribute: Attribute::object(vec![("id", Attribute::primitive(Primitive::UInt))]),
        });
        let s = Scope::new(&d);
        assert_eq!(s.type_name(&Attribute::primitive(Primitive::UInt)), "u64");
        assert_eq!(
            s.type_name(&Attribute::array(Attribute::primitive(Primitive::String))),
            "Vec<String>"
        );
        assert_eq!(
            s.type_name(&Attribute::map(
                Attribute::primitive(Primitive::String),
                Attribute::primitive(Primitive::Int32),
            )),
            "HashMap<String, i32>"
        );
        assert_eq!(s.type_name(&Attribute::user_type("account")), "Account");
        assert_eq!(
            s.type_ref(&Attribute::primitive(Primitive::String), true),
            "Option<String>"
        );
    }

    #[test]
    fn test_type_name_override() {
        let d = Design::new();
        let s = Scope::new(&d);
        let mut a = Attribute::primitive(Primitive::String);
        a.type_name_override = Some("uuid::Uuid".into());
        assert_eq!(s.type_name(&a), "uuid::Uuid");
    }

    #[test]
    #[should_panic(expected = "anonymous object")]
    fn test_anonymous_object_panics() {
        let d = Design::new();
        let s = Scope::new(&d);
        s.type_name(&Attribute::object(vec![]));
    }
}
