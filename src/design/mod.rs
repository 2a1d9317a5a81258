#![deny(missing_docs)]

//! # Design Model
//!
//! Read-only input model for derivation: the attribute tree, the wire-name
//! mapping layer and the HTTP binding graph.

/// HTTP binding expressions.
pub mod http;
/// Mapped (wire-named) attributes.
pub mod mapped;
/// Attribute tree and user type registry.
pub mod types;

pub use http::{EndpointExpr, HttpErrorExpr, ResponseExpr, RouteExpr, ServiceExpr};
pub use mapped::MappedAttribute;
pub use types::{Attribute, DataType, Design, Object, Primitive, UserTypeDef, Validation};
