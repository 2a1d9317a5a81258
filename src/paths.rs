#![deny(missing_docs)]

//! # Route Paths
//!
//! Path pattern helpers: wildcard extraction and the format strings and
//! argument expressions used by generated path constructor functions.

use crate::design::types::{Attribute, DataType, Design, Primitive};
use regex::Regex;

/// Returns the wildcard names of a path pattern, in order of appearance.
pub fn extract_wildcards(path: &str) -> Vec<String> {
    // patterns are validated upstream, the expression is infallible
    let re = Regex::new(r"\{(\w+)\}").unwrap();
    re.captures_iter(path)
        .map(|c| c[1].to_string())
        .collect()
}

/// Converts a path pattern into a `format!` template: each `{name}`
/// wildcard becomes a positional `{}` slot.
pub fn path_format(path: &str) -> String {
    let re = Regex::new(r"\{\w+\}").unwrap();
    re.replace_all(path, "{}").into_owned()
}

/// Expression rendering one path argument into its wire string. `access`
/// evaluates to the argument value; arrays are joined with `", "` after
/// converting each element.
pub fn path_arg_expr(design: &Design, attr: &Attribute, access: &str) -> String {
    match &design.resolve(attr).data_type {
        DataType::Array(elem) => {
            let elem_expr = scalar_expr(design, elem, "v");
            format!(
                "{}.iter().map(|v| {}).collect::<Vec<_>>().join(\", \")",
                access, elem_expr
            )
        }
        _ => scalar_expr(design, attr, access),
    }
}

/// Expression rendering one scalar value into its wire string. Strings
/// are percent-encoded, everything else formats through `Display`.
fn scalar_expr(design: &Design, attr: &Attribute, access: &str) -> String {
    match design.as_primitive(attr) {
        Some(Primitive::String) => format!("urlencoding::encode({}).into_owned()", access),
        _ => format!("format!(\"{{}}\", {})", access),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_wildcards_in_order() {
        assert_eq!(
            extract_wildcards("/orgs/{org_id}/accounts/{id}"),
            vec!["org_id".to_string(), "id".to_string()]
        );
        assert!(extract_wildcards("/healthz").is_empty());
    }

    #[test]
    fn test_path_format() {
        assert_eq!(
            path_format("/orgs/{org_id}/accounts/{id}"),
            "/orgs/{}/accounts/{}"
        );
        assert_eq!(path_format("/healthz"), "/healthz");
    }

    #[test]
    fn test_path_arg_expressions() {
        let d = Design::new();
        let s = Attribute::primitive(Primitive::String);
        assert_eq!(
            path_arg_expr(&d, &s, "name"),
            "urlencoding::encode(name).into_owned()"
        );
        let n = Attribute::primitive(Primitive::UInt);
        assert_eq!(path_arg_expr(&d, &n, "org_id"), "format!(\"{}\", org_id)");
        let arr = Attribute::array(Attribute::primitive(Primitive::Int32));
        assert_eq!(
            path_arg_expr(&d, &arr, "ids"),
            "ids.iter().map(|v| format!(\"{}\", v)).collect::<Vec<_>>().join(\", \")"
        );
    }
}
