#![deny(missing_docs)]

//! # Type Transforms
//!
//! Plans the code converting a value of one attribute shape into another
//! shape of the same design type, e.g. a decoded request body with every
//! field optional into the domain payload with required fields as values.
//! Top-level conversions are rendered inline; nested user types compile
//! to named helper functions which are deduplicated by name so shared
//! types produce a single helper per conversion pair.

use crate::design::types::{Attribute, DataType};
use crate::error::{AppError, AppResult};
use crate::scope::Scope;
use crate::typedef::{field_is_optional, BodyShapePolicy};
use serde_json::Value as JsonValue;
use std::collections::HashSet;

/// A generated helper function converting one nested type into another.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TransformFunctionData {
    /// Function name, unique per `(source, target)` type pair.
    pub name: String,
    /// Rendered parameter type.
    pub param_type_ref: String,
    /// Rendered return type.
    pub result_type_ref: String,
    /// Full function source.
    pub code: String,
}

/// Options controlling a transform plan.
#[derive(Debug, Clone, Copy)]
pub struct TransformOptions {
    /// Optionality policy of the source shape.
    pub source_policy: BodyShapePolicy,
    /// Optionality policy of the target shape.
    pub target_policy: BodyShapePolicy,
    /// Materialize declared default values for absent optional fields.
    pub init_defaults: bool,
    /// Treat every target field as not required. Used when rendering
    /// server response bodies from results whose required set only binds
    /// the client side.
    pub strip_target_required: bool,
}

/// Renders the code assigning `target_var` from `source_var`, plus the
/// helper functions the code calls. Fails with [`AppError::Transform`]
/// when the two shapes are structurally incompatible, which means the
/// design itself is inconsistent.
pub fn type_transform(
    scope: &Scope<'_>,
    source: &Attribute,
    target: &Attribute,
    source_var: &str,
    target_var: &str,
    opts: TransformOptions,
) -> AppResult<(String, Vec<TransformFunctionData>)> {
    let mut helpers = Vec::new();
    let mut seen = HashSet::new();
    let expr = transform_attribute(
        scope,
        source,
        target,
        source_var,
        source_var,
        opts,
        &mut helpers,
        &mut seen,
    )?;
    let code = format!("let {} = {};\n", target_var, expr);
    Ok((code, helpers))
}

/// Appends helpers to `existing`, skipping names already present.
pub fn append_helpers(
    existing: &mut Vec<TransformFunctionData>,
    new: Vec<TransformFunctionData>,
) {
    for h in new {
        if existing.iter().all(|e| e.name != h.name) {
            existing.push(h);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn transform_attribute(
    scope: &Scope<'_>,
    source: &Attribute,
    target: &Attribute,
    source_expr: &str,
    ctx: &str,
    opts: TransformOptions,
    helpers: &mut Vec<TransformFunctionData>,
    seen: &mut HashSet<String>,
) -> AppResult<String> {
    let design = scope.design();
    let src = design.resolve(source);
    let tgt = design.resolve(target);
    match (&src.data_type, &tgt.data_type) {
        (DataType::Primitive(a), DataType::Primitive(b)) => {
            if a.rust_name() != b.rust_name()
                && !matches!(b, crate::design::types::Primitive::Any)
            {
                return Err(incompatible(ctx, src, tgt));
            }
            Ok(format!("{}.clone()", source_expr))
        }
        (DataType::Array(se), DataType::Array(te)) => {
            transform_collection(scope, se, te, source_expr, ctx, opts, helpers, seen, false)
        }
        (
            DataType::Map { key: sk, elem: se },
            DataType::Map { key: tk, elem: te },
        ) => {
            if scope.type_name(sk) != scope.type_name(tk) {
                return Err(incompatible(ctx, src, tgt));
            }
            transform_collection(scope, se, te, source_expr, ctx, opts, helpers, seen, true)
        }
        (DataType::Object(_), DataType::Object(_)) => {
            transform_object(scope, src, tgt, target, source_expr, ctx, opts, helpers, seen)
        }
        _ => Err(incompatible(ctx, src, tgt)),
    }
}

/// Array and map conversions: cloned wholesale when elements are
/// structurally identical, mapped through a helper otherwise.
#[allow(clippy::too_many_arguments)]
fn transform_collection(
    scope: &Scope<'_>,
    source_elem: &Attribute,
    target_elem: &Attribute,
    source_expr: &str,
    ctx: &str,
    opts: TransformOptions,
    helpers: &mut Vec<TransformFunctionData>,
    seen: &mut HashSet<String>,
    is_map: bool,
) -> AppResult<String> {
    let design = scope.design();
    if design.is_object(source_elem) {
        if !design.is_object(target_elem) {
            return Err(incompatible(
                &format!("{}[*]", ctx),
                design.resolve(source_elem),
                design.resolve(target_elem),
            ));
        }
        let helper = object_helper(scope, source_elem, target_elem, ctx, opts, helpers, seen)?;
        if is_map {
            Ok(format!(
                "{}.iter().map(|(k, v)| (k.clone(), Box::new({}(v)))).collect()",
                source_expr, helper
            ))
        } else {
            Ok(format!(
                "{}.iter().map(|v| Box::new({}(v))).collect()",
                source_expr, helper
            ))
        }
    } else {
        // scalar elements, same wire representation on both sides
        let nested_ctx = format!("{}[*]", ctx);
        transform_attribute(
            scope,
            source_elem,
            target_elem,
            "v",
            &nested_ctx,
            opts,
            helpers,
            seen,
        )?;
        Ok(format!("{}.clone()", source_expr))
    }
}

/// Renders the struct literal building the target object from the source
/// object fields.
#[allow(clippy::too_many_arguments)]
fn transform_object(
    scope: &Scope<'_>,
    src: &Attribute,
    tgt: &Attribute,
    target_orig: &Attribute,
    source_expr: &str,
    ctx: &str,
    opts: TransformOptions,
    helpers: &mut Vec<TransformFunctionData>,
    seen: &mut HashSet<String>,
) -> AppResult<String> {
    let src_obj = match &src.data_type {
        DataType::Object(o) => o,
        _ => unreachable!(),
    };
    let tgt_obj = match &tgt.data_type {
        DataType::Object(o) => o,
        _ => unreachable!(),
    };
    let type_name = object_type_name(scope, target_orig, ctx)?;
    let mut fields = String::new();
    for (name, tgt_field) in tgt_obj.iter() {
        let field_name = scope.field_name(name);
        let tgt_optional = target_field_optional(scope, opts, tgt_field);
        let expr = match src_obj.attribute(name) {
            Some(src_field) => field_expr(
                scope,
                src_field,
                tgt_field,
                tgt_optional,
                &format!("{}.{}", source_expr, field_name),
                &format!("{}.{}", ctx, name),
                opts,
                helpers,
                seen,
            )?,
            None if tgt_optional => "None".to_string(),
            None => match (&tgt_field.default_value, opts.init_defaults) {
                (Some(def), true) => value_literal(def),
                _ => "Default::default()".to_string(),
            },
        };
        fields.push_str(&format!("    {}: {},\n", field_name, expr));
    }
    Ok(format!("{} {{\n{}}}", type_name, fields))
}

/// Conversion expression for one matched field pair.
#[allow(clippy::too_many_arguments)]
fn field_expr(
    scope: &Scope<'_>,
    src_field: &Attribute,
    tgt_field: &Attribute,
    tgt_optional: bool,
    access: &str,
    ctx: &str,
    opts: TransformOptions,
    helpers: &mut Vec<TransformFunctionData>,
    seen: &mut HashSet<String>,
) -> AppResult<String> {
    let design = scope.design();
    let src_optional = field_is_optional(scope, opts.source_policy, src_field);
    if design.is_object(src_field) {
        if !design.is_object(tgt_field) {
            return Err(incompatible(
                ctx,
                design.resolve(src_field),
                design.resolve(tgt_field),
            ));
        }
        let helper = object_helper(scope, src_field, tgt_field, ctx, opts, helpers, seen)?;
        let call = match (src_optional, tgt_optional) {
            (true, true) => format!("{}.as_ref().map(|v| Box::new({}(v)))", access, helper),
            (true, false) => format!("Box::new({}({}.as_ref().unwrap()))", helper, access),
            (false, true) => format!("Some(Box::new({}(&{})))", helper, access),
            (false, false) => format!("Box::new({}(&{}))", helper, access),
        };
        return Ok(call);
    }
    let converted = transform_attribute(
        scope, src_field, tgt_field, access, ctx, opts, helpers, seen,
    )?;
    Ok(match (src_optional, tgt_optional) {
        (true, true) | (false, false) => converted,
        (false, true) => format!("Some({})", converted),
        (true, false) => match (&src_field.default_value, opts.init_defaults) {
            (Some(def), true) => format!(
                "{}.unwrap_or_else(|| {})",
                converted,
                value_literal(def)
            ),
            // presence established by validation before the transform runs
            _ => format!("{}.unwrap()", converted),
        },
    })
}

/// Registers (or reuses) the helper converting one nested named type into
/// another and returns its name.
fn object_helper(
    scope: &Scope<'_>,
    source: &Attribute,
    target: &Attribute,
    ctx: &str,
    opts: TransformOptions,
    helpers: &mut Vec<TransformFunctionData>,
    seen: &mut HashSet<String>,
) -> AppResult<String> {
    let src_name = object_type_name(scope, source, ctx)?;
    let tgt_name = object_type_name(scope, target, ctx)?;
    let name = format!(
        "transform_{}_to_{}",
        scope.var_name(&src_name),
        scope.var_name(&tgt_name)
    );
    if !seen.insert(name.clone()) {
        return Ok(name);
    }
    let body = transform_object(
        scope,
        scope.design().resolve(source),
        scope.design().resolve(target),
        target,
        "v",
        ctx,
        opts,
        helpers,
        seen,
    )?;
    let code = format!(
        "fn {}(v: &{}) -> {} {{\n{}\n}}\n",
        name,
        src_name,
        tgt_name,
        indent(&body)
    );
    append_helpers(
        helpers,
        vec![TransformFunctionData {
            name: name.clone(),
            param_type_ref: format!("&{}", src_name),
            result_type_ref: tgt_name,
            code,
        }],
    );
    Ok(name)
}

/// Rendered type name of an object-kinded attribute. Only named types
/// (user types or attributes carrying an explicit type name) can appear
/// in a transform: an anonymous nested object means the design was not
/// normalized upstream.
fn object_type_name(scope: &Scope<'_>, attr: &Attribute, ctx: &str) -> AppResult<String> {
    if let Some(over) = &attr.type_name_override {
        return Ok(over.clone());
    }
    if let DataType::UserType(name) = &attr.data_type {
        return Ok(scope.struct_name(name));
    }
    Err(AppError::Transform(format!(
        "{} is an anonymous object and cannot be transformed as a named type",
        ctx
    )))
}

fn target_field_optional(scope: &Scope<'_>, opts: TransformOptions, attr: &Attribute) -> bool {
    if opts.strip_target_required {
        let mut stripped = attr.clone();
        stripped.required = false;
        field_is_optional(scope, opts.target_policy, &stripped)
    } else {
        field_is_optional(scope, opts.target_policy, attr)
    }
}

fn incompatible(ctx: &str, src: &Attribute, tgt: &Attribute) -> AppError {
    AppError::Transform(format!(
        "{} is a {} but the target type is a {}",
        ctx,
        src.data_type.kind_name(),
        tgt.data_type.kind_name()
    ))
}

/// Rust literal for a design default value. Compound defaults fall back
/// to `Default::default()`.
pub fn value_literal(v: &JsonValue) -> String {
    match v {
        JsonValue::String(s) => format!("{:?}.to_string()", s),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        _ => "Default::default()".to_string(),
    }
}

fn indent(code: &str) -> String {
    code.lines()
        .map(|l| {
            if l.is_empty() {
                String::new()
            } else {
                format!("    {}", l)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
