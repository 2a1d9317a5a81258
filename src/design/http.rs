#![deny(missing_docs)]

//! # HTTP Binding Graph
//!
//! The per-method HTTP binding expressions consumed by derivation: routes,
//! transport slot mappings (path/query/header/cookie), bodies and tagged
//! responses. Produced fully resolved by the upstream DSL engine.

use crate::design::mapped::MappedAttribute;
use crate::design::types::Attribute;

/// A service exposing HTTP endpoints.
#[derive(Debug, Clone, Default)]
pub struct ServiceExpr {
    /// Service name, unique within a design.
    pub name: String,
    /// The service endpoints in declaration order.
    pub endpoints: Vec<EndpointExpr>,
}

/// A single method with its HTTP binding.
#[derive(Debug, Clone)]
pub struct EndpointExpr {
    /// Method name.
    pub name: String,
    /// Method payload attribute, `None` when the method takes nothing.
    pub payload: Option<Attribute>,
    /// Method result attribute, `None` when the method returns nothing.
    pub result: Option<Attribute>,
    /// The routes serving this endpoint, at least one.
    pub routes: Vec<RouteExpr>,
    /// Payload fields carried by path wildcards.
    pub path_params: MappedAttribute,
    /// Payload fields carried by the query string.
    pub query_params: MappedAttribute,
    /// Payload fields carried by request headers.
    pub headers: MappedAttribute,
    /// Payload fields carried by request cookies.
    pub cookies: MappedAttribute,
    /// Request body attribute, `None` when the request has no body.
    pub body: Option<Attribute>,
    /// Set when the body maps a single payload attribute rather than the
    /// whole payload (the `Body("name")` design shorthand).
    pub body_origin: Option<String>,
    /// Declared responses, at least one for methods with a result.
    pub responses: Vec<ResponseExpr>,
    /// Declared error responses.
    pub errors: Vec<HttpErrorExpr>,
}

impl EndpointExpr {
    /// Creates an endpoint with the given name and no bindings.
    pub fn new(name: impl Into<String>) -> Self {
        EndpointExpr {
            name: name.into(),
            payload: None,
            result: None,
            routes: Vec::new(),
            path_params: MappedAttribute::empty(),
            query_params: MappedAttribute::empty(),
            headers: MappedAttribute::empty(),
            cookies: MappedAttribute::empty(),
            body: None,
            body_origin: None,
            responses: Vec::new(),
            errors: Vec::new(),
        }
    }
}

/// One verb + path pattern serving an endpoint.
#[derive(Debug, Clone)]
pub struct RouteExpr {
    /// HTTP verb, upper case.
    pub method: String,
    /// Path pattern with named wildcards, e.g. `/orgs/{org_id}/accounts`.
    pub path: String,
}

/// One possible HTTP response for a method result.
#[derive(Debug, Clone)]
pub struct ResponseExpr {
    /// HTTP status code.
    pub status_code: u16,
    /// Response description.
    pub description: Option<String>,
    /// Result fields carried by response headers.
    pub headers: MappedAttribute,
    /// Response body attribute, `None` for an empty body.
    pub body: Option<Attribute>,
    /// Set when the body maps a single result attribute.
    pub body_origin: Option<String>,
    /// Discriminator: `(attribute name, expected value)`. `None` marks the
    /// default response.
    pub tag: Option<(String, String)>,
}

impl ResponseExpr {
    /// Creates an untagged response with the given status and no headers
    /// or body.
    pub fn new(status_code: u16) -> Self {
        ResponseExpr {
            status_code,
            description: None,
            headers: MappedAttribute::empty(),
            body: None,
            body_origin: None,
            tag: None,
        }
    }
}

/// A declared error response.
#[derive(Debug, Clone)]
pub struct HttpErrorExpr {
    /// Error name, unique within the endpoint.
    pub name: String,
    /// The domain error type attribute.
    pub error_type: Attribute,
    /// The HTTP response carrying the error.
    pub response: ResponseExpr,
}
