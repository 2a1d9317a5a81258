#![deny(missing_docs)]

//! # Validation Code Generation
//!
//! Renders the runtime checks enforcing an attribute's validation rules.
//! Generated snippets follow the merge-error convention: every violated
//! rule pushes a message onto an in-scope `errors: Vec<String>` so a
//! single decode pass reports all problems at once. Generated validators
//! for user types have the signature
//! `fn validate_<name>(value: &<Name>) -> Vec<String>` and nested user
//! type references compile to calls into them, which also terminates
//! recursion for self-referencing types.

use crate::design::mapped::MappedAttribute;
use crate::design::types::{Attribute, DataType, Primitive, Validation};
use crate::scope::Scope;
use crate::typedef::{field_is_optional, BodyShapePolicy};
use serde_json::Value as JsonValue;

/// Renders the validation checks for `target`, a place expression
/// evaluating to the attribute value (already unwrapped from any
/// `Option`; field accesses and method calls borrow as needed). Returns
/// `None` when there is nothing to check.
pub fn validation_code(
    scope: &Scope<'_>,
    attr: &Attribute,
    policy: BodyShapePolicy,
    target: &str,
    ctx: &str,
) -> Option<String> {
    let code = attribute_checks(scope, attr, policy, target, ctx, false);
    if code.is_empty() {
        None
    } else {
        Some(code)
    }
}

/// Name of the generated validator for a user type.
pub fn validator_name(scope: &Scope<'_>, type_name: &str) -> String {
    format!("validate_{}", scope.var_name(type_name))
}

/// Checks for a value known to be present. `target` is a place
/// expression of the value; `is_ref` records whether it is a reference
/// binding that must be dereferenced before numeric casts.
fn attribute_checks(
    scope: &Scope<'_>,
    attr: &Attribute,
    policy: BodyShapePolicy,
    target: &str,
    ctx: &str,
    is_ref: bool,
) -> String {
    let mut code = String::new();
    if let Some(rules) = &attr.validation {
        code.push_str(&rule_checks(scope, attr, rules, target, ctx, is_ref));
    }
    match &attr.data_type {
        DataType::Object(_) => {
            let mapped = MappedAttribute::new(attr.clone());
            mapped.walk(|name, _, field| {
                code.push_str(&field_checks(scope, field, policy, target, ctx, name));
            });
        }
        DataType::Array(elem) => {
            let inner = attribute_checks(scope, elem, policy, "e", &format!("{}[*]", ctx), true);
            if !inner.is_empty() {
                code.push_str(&format!(
                    "for e in {}.iter() {{\n{}}}\n",
                    target,
                    indent(&inner)
                ));
            }
        }
        DataType::Map { key, elem } => {
            let key_checks =
                attribute_checks(scope, key, policy, "k", &format!("{}.key", ctx), true);
            let elem_checks =
                attribute_checks(scope, elem, policy, "v", &format!("{}[*]", ctx), true);
            if !key_checks.is_empty() || !elem_checks.is_empty() {
                code.push_str(&format!(
                    "for (k, v) in {}.iter() {{\n{}{}}}\n",
                    target,
                    indent(&key_checks),
                    indent(&elem_checks)
                ));
                if key_checks.is_empty() {
                    code = code.replacen("for (k, v)", "for (_, v)", 1);
                } else if elem_checks.is_empty() {
                    code = code.replacen("for (k, v)", "for (k, _)", 1);
                }
            }
        }
        DataType::UserType(name) => {
            if has_validations(scope, attr) {
                let arg = if is_ref {
                    target.to_string()
                } else {
                    format!("&{}", target)
                };
                code.push_str(&format!(
                    "errors.extend({}({}));\n",
                    validator_name(scope, name),
                    arg
                ));
            }
        }
        DataType::Primitive(_) => {}
    }
    code
}

/// Checks for one object field, handling optionality and the missing
/// check for required fields kept optional by the policy.
fn field_checks(
    scope: &Scope<'_>,
    field: &Attribute,
    policy: BodyShapePolicy,
    target: &str,
    ctx: &str,
    name: &str,
) -> String {
    let field_name = scope.field_name(name);
    let access = format!("{}.{}", target, field_name);
    let field_ctx = format!("{}.{}", ctx, name);
    let optional = field_is_optional(scope, policy, field);
    let mut code = String::new();
    if field.required && optional {
        code.push_str(&format!(
            "if {}.is_none() {{\n    errors.push(\"{} is missing\".to_string());\n}}\n",
            access, field_ctx
        ));
    }
    let inner = if optional {
        attribute_checks(scope, field, policy, "val", &field_ctx, true)
    } else {
        attribute_checks(scope, field, policy, &access, &field_ctx, false)
    };
    if inner.is_empty() {
        return code;
    }
    if optional {
        code.push_str(&format!(
            "if let Some(val) = &{} {{\n{}}}\n",
            access,
            indent(&inner)
        ));
    } else {
        code.push_str(&inner);
    }
    code
}

fn rule_checks(
    scope: &Scope<'_>,
    attr: &Attribute,
    rules: &Validation,
    target: &str,
    ctx: &str,
    is_ref: bool,
) -> String {
    let mut code = String::new();
    let is_string = matches!(
        scope.design().as_primitive(attr),
        Some(Primitive::String)
    );
    // method calls auto-deref; only bare value uses (casts, comparisons)
    // need the explicit deref of a reference binding
    let value = if is_string {
        format!("{}.as_str()", target)
    } else if is_ref {
        format!("*{}", target)
    } else {
        target.to_string()
    };
    if let Some(pat) = &rules.pattern {
        code.push_str(&format!(
            "if !regex::Regex::new(r{q}{pat}{q}).unwrap().is_match({value}) {{\n    errors.push(format!(\"{ctx} must match '{pat}', got {{}}\", {value}));\n}}\n",
            q = "\"",
        ));
    }
    if !rules.enum_values.is_empty() {
        let cmp = rules
            .enum_values
            .iter()
            .map(|v| format!("{} == {}", value, comparison_literal(v)))
            .collect::<Vec<_>>()
            .join(" || ");
        code.push_str(&format!(
            "if !({}) {{\n    errors.push(format!(\"{} must be one of {}, got {{:?}}\", {}));\n}}\n",
            cmp,
            ctx,
            rules
                .enum_values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ")
                .replace('"', "'"),
            value
        ));
    }
    if let Some(min) = rules.minimum {
        code.push_str(&format!(
            "if ({} as f64) < {}f64 {{\n    errors.push(format!(\"{} must be at least {}, got {{}}\", {}));\n}}\n",
            value, min, ctx, min, value
        ));
    }
    if let Some(max) = rules.maximum {
        code.push_str(&format!(
            "if ({} as f64) > {}f64 {{\n    errors.push(format!(\"{} must be at most {}, got {{}}\", {}));\n}}\n",
            value, max, ctx, max, value
        ));
    }
    if let Some(min) = rules.min_length {
        code.push_str(&format!(
            "if {}.len() < {} {{\n    errors.push(format!(\"{} length must be at least {}, got {{}}\", {}.len()));\n}}\n",
            target, min, ctx, min, target
        ));
    }
    if let Some(max) = rules.max_length {
        code.push_str(&format!(
            "if {}.len() > {} {{\n    errors.push(format!(\"{} length must be at most {}, got {{}}\", {}.len()));\n}}\n",
            target, max, ctx, max, target
        ));
    }
    code
}

/// True if validating the attribute (or anything reachable from it) can
/// produce a message. User type references recurse through the registry
/// with a visited set.
pub fn has_validations(scope: &Scope<'_>, attr: &Attribute) -> bool {
    has_validations_seen(scope, attr, &mut Vec::new())
}

fn has_validations_seen(scope: &Scope<'_>, attr: &Attribute, seen: &mut Vec<String>) -> bool {
    if attr.validation.as_ref().map(|v| !v.is_empty()).unwrap_or(false) {
        return true;
    }
    match &attr.data_type {
        DataType::Primitive(_) => false,
        DataType::Array(elem) => has_validations_seen(scope, elem, seen),
        DataType::Map { key, elem } => {
            has_validations_seen(scope, key, seen) || has_validations_seen(scope, elem, seen)
        }
        DataType::Object(o) => o
            .iter()
            .any(|(_, f)| f.required || has_validations_seen(scope, f, seen)),
        DataType::UserType(name) => {
            if seen.contains(name) {
                return false;
            }
            seen.push(name.clone());
            has_validations_seen(scope, &scope.design().user_type(name).attribute, seen)
        }
    }
}

/// Renders the parse step converting a raw transport string into a typed
/// value, pushing onto `errors` on failure. `raw` is an expression of
/// type `&str`.
pub fn conversion_code(prim: Primitive, var: &str, raw: &str, ctx: &str) -> String {
    let kind = match prim {
        Primitive::Bool => "a boolean",
        Primitive::Int | Primitive::Int32 | Primitive::Int64 => "an integer",
        Primitive::UInt | Primitive::UInt32 | Primitive::UInt64 => "an unsigned integer",
        Primitive::Float32 | Primitive::Float64 => "a number",
        Primitive::String | Primitive::Bytes | Primitive::Any => {
            return format!("let {} = {}.to_string();\n", var, raw);
        }
    };
    format!(
        "let {var}: {ty} = match {raw}.parse() {{\n    Ok(v) => v,\n    Err(_) => {{\n        errors.push(format!(\"{ctx} must be {kind}, got {{}}\", {raw}));\n        Default::default()\n    }}\n}};\n",
        var = var,
        ty = prim.rust_name(),
        raw = raw,
        ctx = ctx,
        kind = kind,
    )
}

/// Literal used in generated equality comparisons against a design value.
fn comparison_literal(v: &JsonValue) -> String {
    match v {
        JsonValue::String(s) => format!("{:?}", s),
        other => other.to_string(),
    }
}

fn indent(code: &str) -> String {
    code.lines()
        .map(|l| {
            if l.is_empty() {
                String::new()
            } else {
                format!("    {}\n", l)
            }
        })
        .collect::<Vec<_>>()
        .join("")
}
