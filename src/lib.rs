#![deny(missing_docs)]

//! # httpgen
//!
//! Transport data derivation for design-first HTTP code generation.
//!
//! Given a resolved service design (methods with payload, result and
//! error attribute trees) and its HTTP binding graph (routes, transport
//! slot mappings, tagged responses), this crate derives the complete,
//! internally consistent transport mapping of every endpoint: the
//! path/query/header/cookie decomposition, the differently shaped server
//! and client wire body types, per-field pointer and default policies,
//! validation and raw-string conversion snippets, response discriminator
//! tags, and the bidirectional transform plans between wire bodies and
//! domain types. The derived [`service_data::ServiceData`] is a pure
//! value consumed by a template layer; this crate performs no rendering
//! and no I/O.

/// Design input model: attribute trees, wire-name mappings, HTTP binding
/// expressions.
pub mod design;
/// Unified error type.
pub mod error;
/// Deterministic example value generation.
pub mod example;
/// Route path pattern helpers.
pub mod paths;
/// Rust identifier and type-name rendering.
pub mod scope;
/// The derivation engine and its derived data model.
pub mod service_data;
/// HTTP verb, status and header-casing tables.
pub mod statuses;
/// Transform planning between wire and domain shapes.
pub mod transform;
/// Wire type definition generation and shape policies.
pub mod typedef;
/// Validation snippet generation.
pub mod validation;

pub use design::{
    Attribute, DataType, Design, EndpointExpr, HttpErrorExpr, MappedAttribute, Object,
    Primitive, ResponseExpr, RouteExpr, ServiceExpr, UserTypeDef, Validation,
};
pub use error::{AppError, AppResult};
pub use scope::Scope;
pub use service_data::{analyze, ServiceData, ServicesData};
pub use transform::{TransformFunctionData, TransformOptions};
pub use typedef::BodyShapePolicy;
