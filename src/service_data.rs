#![deny(missing_docs)]

//! # Transport Data Derivation
//!
//! The derivation engine: walks a service's method payload/result/error
//! attribute trees together with the HTTP binding graph and produces, per
//! endpoint, the complete transport mapping consumed by the template
//! layer. Path/query/header/cookie decompositions, the differently shaped
//! server and client wire bodies, per-response discriminator tags,
//! constructors and the transform plans between wire and domain shapes
//! are all computed here, once per service, and memoized.

use crate::design::http::{EndpointExpr, HttpErrorExpr, ResponseExpr, ServiceExpr};
use crate::design::mapped::MappedAttribute;
use crate::design::types::{Attribute, DataType, Design, Primitive};
use crate::error::{AppError, AppResult};
use crate::example::example_value;
use crate::paths::{extract_wildcards, path_arg_expr, path_format};
use crate::scope::Scope;
use crate::statuses::{canonical_header_key, status_const, status_name};
use crate::transform::{
    append_helpers, type_transform, TransformFunctionData, TransformOptions,
};
use crate::typedef::{field_is_optional, type_def, BodyShapePolicy};
use crate::validation::{conversion_code, validation_code, validator_name};
use indexmap::IndexSet;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::rc::Rc;

/// Classification of a param/header wire representation, driving the raw
/// string handling strategy of the generated decode code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WireShape {
    /// Used directly off the wire.
    String,
    /// Untyped value, carried raw.
    Any,
    /// Scalar needing a parse from its raw string.
    Primitive,
    /// `Vec<String>`, no per-element conversion.
    StringSlice,
    /// Array needing per-element conversion.
    Slice,
    /// Map of scalars.
    Map,
    /// `HashMap<String, Vec<String>>`, the raw query/header multimap.
    MapStringSlice,
    /// Object or user type, decoded as a body fragment.
    Composite,
}

/// One path, query or cookie parameter.
#[derive(Debug, Clone, Serialize)]
pub struct ParamData {
    /// Wire name.
    pub name: String,
    /// Design attribute name.
    pub attribute_name: String,
    /// Domain struct field fed by this param, absent for transport-only
    /// params with no domain counterpart.
    pub field_name: Option<String>,
    /// Local variable name in generated code.
    pub var_name: String,
    /// Description from the design.
    pub description: Option<String>,
    /// Rendered Rust type of the decoded value.
    pub type_ref: String,
    /// Wire representation class.
    pub shape: WireShape,
    /// Whether the decoded value is an `Option`.
    pub pointer: bool,
    /// Whether the design marks the field required.
    pub required: bool,
    /// Declared default value.
    pub default_value: Option<JsonValue>,
    /// Raw-string parse snippet, absent for strings.
    pub conversion: Option<String>,
    /// Validation snippet, absent when nothing to check.
    pub validate: Option<String>,
    /// Deterministic documentation example.
    pub example: JsonValue,
}

/// One request or response header.
#[derive(Debug, Clone, Serialize)]
pub struct HeaderData {
    /// Wire name exactly as declared.
    pub name: String,
    /// Canonical HTTP casing of the wire name.
    pub canonical_name: String,
    /// Design attribute name.
    pub attribute_name: String,
    /// Domain struct field fed by this header, if any.
    pub field_name: Option<String>,
    /// Local variable name in generated code.
    pub var_name: String,
    /// Description from the design.
    pub description: Option<String>,
    /// Rendered Rust type of the decoded value.
    pub type_ref: String,
    /// Wire representation class.
    pub shape: WireShape,
    /// Whether the decoded value is an `Option`.
    pub pointer: bool,
    /// Whether the design marks the field required.
    pub required: bool,
    /// Declared default value.
    pub default_value: Option<JsonValue>,
    /// Raw-string parse snippet, absent for strings.
    pub conversion: Option<String>,
    /// Validation snippet, absent when nothing to check.
    pub validate: Option<String>,
    /// Deterministic documentation example.
    pub example: JsonValue,
}

/// A wire body type descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct TypeData {
    /// Generated type name.
    pub name: String,
    /// snake_case variant of the name, used for function naming.
    pub var_name: String,
    /// Description rendered as the type doc comment.
    pub description: Option<String>,
    /// Constructor building this type from the domain value, present on
    /// encode-side bodies only.
    pub init: Option<InitData>,
    /// Struct-shape definition, absent when the type is a bare reference.
    pub def: Option<String>,
    /// Rendered Rust type reference.
    pub type_ref: String,
    /// Body of the generated validator, decode-side bodies only.
    pub validate_def: Option<String>,
    /// Call expression invoking the validator. Present iff `validate_def`
    /// is present.
    pub validate_ref: Option<String>,
    /// Deterministic documentation example.
    pub example: JsonValue,
}

/// A constructor specification.
#[derive(Debug, Clone, Serialize)]
pub struct InitData {
    /// Function name.
    pub name: String,
    /// Doc comment.
    pub description: Option<String>,
    /// Arguments of the server-side rendering, validation included.
    pub server_args: Vec<InitArg>,
    /// Arguments of the client-side rendering, no re-validation.
    pub client_args: Vec<InitArg>,
    /// Name of the constructed type.
    pub return_type_name: String,
    /// Rendered reference to the constructed type.
    pub return_type_ref: String,
    /// Set when the constructor fills a single named field of the return
    /// type rather than the whole struct.
    pub return_type_attribute: Option<String>,
    /// Whether the constructed type is a struct.
    pub return_is_struct: bool,
    /// Server-side body source.
    pub server_code: String,
    /// Client-side body source.
    pub client_code: String,
}

/// One constructor argument.
#[derive(Debug, Clone, Serialize)]
pub struct InitArg {
    /// Argument name.
    pub name: String,
    /// Domain struct field the argument maps to, if any.
    pub field_name: Option<String>,
    /// Rendered Rust type.
    pub type_ref: String,
    /// Whether the argument is an `Option`.
    pub pointer: bool,
    /// Whether the underlying design attribute is required.
    pub required: bool,
    /// Validation call for the argument, server side only.
    pub validate: Option<String>,
    /// Deterministic documentation example.
    pub example: JsonValue,
}

/// The request side of one endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct RequestData {
    /// Path parameters in route order.
    pub path_params: Vec<ParamData>,
    /// Query parameters in declaration order.
    pub query_params: Vec<ParamData>,
    /// Request headers in declaration order.
    pub headers: Vec<HeaderData>,
    /// Request cookies in declaration order.
    pub cookies: Vec<ParamData>,
    /// Decode-side body shape, every field optional.
    pub server_body: Option<TypeData>,
    /// Encode-side body shape, defaults materialized.
    pub client_body: Option<TypeData>,
    /// Constructor building the domain payload from transport parts.
    pub payload_init: Option<InitData>,
    /// True when decoding must run any validation at all.
    pub must_validate: bool,
}

/// The payload of one endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct PayloadData {
    /// Domain payload type name.
    pub name: String,
    /// Rendered reference to the payload type.
    pub type_ref: String,
    /// The request decomposition.
    pub request: RequestData,
    /// When no constructor is needed the decoder returns this transport
    /// variable directly.
    pub decoder_return_value: Option<String>,
}

/// One possible HTTP response.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseData {
    /// HTTP status code.
    pub status_code: u16,
    /// Symbolic rendering of the status code.
    pub status_const: String,
    /// Description from the design.
    pub description: Option<String>,
    /// Response headers in declaration order.
    pub headers: Vec<HeaderData>,
    /// Encode-side body shape (the server sends this response).
    pub server_body: Option<TypeData>,
    /// Decode-side body shape (the client receives it).
    pub client_body: Option<TypeData>,
    /// Constructor rebuilding the domain result client-side.
    pub result_init: Option<InitData>,
    /// Discriminator attribute, snake_cased. `None` marks the default
    /// response.
    pub tag_name: Option<String>,
    /// Value the discriminator must equal for this response to apply.
    pub tag_value: Option<String>,
    /// Whether the discriminator attribute is required in the result.
    pub tag_required: bool,
    /// True when client decoding must run any validation at all.
    pub must_validate: bool,
}

/// The result side of one endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ResultData {
    /// Domain result type name.
    pub name: String,
    /// Rendered reference to the result type.
    pub type_ref: String,
    /// Responses in dispatch order: tagged first, the single untagged
    /// default last.
    pub responses: Vec<ResponseData>,
}

/// One declared error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorData {
    /// Error name.
    pub name: String,
    /// Rendered reference to the domain error type.
    pub type_ref: String,
    /// The response carrying the error.
    pub response: ResponseData,
}

/// Errors sharing one status code.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorGroupData {
    /// HTTP status code of the group.
    pub status_code: u16,
    /// Symbolic rendering of the status code.
    pub status_const: String,
    /// Group members, sorted by type reference.
    pub errors: Vec<ErrorData>,
}

/// One route serving an endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct RouteData {
    /// Canonical HTTP verb.
    pub verb: String,
    /// Path pattern with named wildcards.
    pub path: String,
    /// Wildcard names in order of appearance.
    pub wildcards: Vec<String>,
    /// Constructor producing the concrete request path.
    pub path_init: InitData,
}

/// The full transport derivation of one endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointData {
    /// Method name as declared.
    pub method_name: String,
    /// snake_case method name.
    pub method_var_name: String,
    /// Owning service name.
    pub service_name: String,
    /// Generated server mount function name.
    pub mount_handler: String,
    /// Generated request decoder name (server).
    pub request_decoder: String,
    /// Generated response encoder name (server).
    pub response_encoder: String,
    /// Generated error encoder name (server).
    pub error_encoder: String,
    /// Generated request encoder name (client).
    pub request_encoder: String,
    /// Generated response decoder name (client).
    pub response_decoder: String,
    /// Payload derivation, absent for methods taking nothing.
    pub payload: Option<PayloadData>,
    /// Result derivation, absent for methods returning nothing.
    pub result: Option<ResultData>,
    /// Error responses grouped by status code.
    pub errors: Vec<ErrorGroupData>,
    /// Routes in declaration order, at least one.
    pub routes: Vec<RouteData>,
}

/// The full transport derivation of one service.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceData {
    /// Service name as declared.
    pub name: String,
    /// Generated type name of the service.
    pub struct_name: String,
    /// snake_case service name.
    pub var_name: String,
    /// Endpoint derivations in declaration order.
    pub endpoints: Vec<EndpointData>,
    /// Wire types referenced by server-side bodies, one entry per name.
    pub server_body_attribute_types: Vec<TypeData>,
    /// Wire types referenced by client-side bodies, one entry per name.
    pub client_body_attribute_types: Vec<TypeData>,
    /// Transform helpers used by server decode code, discovery order.
    pub server_transform_helpers: Vec<TransformFunctionData>,
    /// Transform helpers used by client encode code, discovery order.
    pub client_transform_helpers: Vec<TransformFunctionData>,
}

/// Instance-scoped, lazily populated cache of service derivations.
/// Derivation runs once per service name; repeated lookups return the
/// same shared instance.
#[derive(Debug)]
pub struct ServicesData<'d> {
    design: &'d Design,
    services: HashMap<String, Rc<ServiceData>>,
}

impl<'d> ServicesData<'d> {
    /// Creates an empty cache over the given design.
    pub fn new(design: &'d Design) -> Self {
        ServicesData {
            design,
            services: HashMap::new(),
        }
    }

    /// Returns the derivation of the named service, computing it on first
    /// access.
    pub fn get(&mut self, name: &str) -> AppResult<Rc<ServiceData>> {
        if let Some(data) = self.services.get(name) {
            return Ok(Rc::clone(data));
        }
        let svc = self
            .design
            .service(name)
            .ok_or_else(|| AppError::General(format!("unknown service {:?}", name)))?;
        log::debug!("deriving transport data for service {:?}", name);
        let data = Rc::new(analyze(self.design, svc)?);
        self.services.insert(name.to_string(), Rc::clone(&data));
        Ok(data)
    }
}

/// Derives the transport data of one service.
pub fn analyze(design: &Design, svc: &ServiceExpr) -> AppResult<ServiceData> {
    let mut b = Builder {
        scope: Scope::new(design),
        server_type_names: IndexSet::new(),
        client_type_names: IndexSet::new(),
        server_types: Vec::new(),
        client_types: Vec::new(),
        server_helpers: Vec::new(),
        client_helpers: Vec::new(),
    };
    let mut endpoints = Vec::with_capacity(svc.endpoints.len());
    for ep in &svc.endpoints {
        endpoints.push(b.build_endpoint(svc, ep)?);
    }
    let scope = b.scope;
    Ok(ServiceData {
        name: svc.name.clone(),
        struct_name: scope.struct_name(&svc.name),
        var_name: scope.var_name(&svc.name),
        endpoints,
        server_body_attribute_types: b.server_types,
        client_body_attribute_types: b.client_types,
        server_transform_helpers: b.server_helpers,
        client_transform_helpers: b.client_helpers,
    })
}

struct Builder<'d> {
    scope: Scope<'d>,
    server_type_names: IndexSet<String>,
    client_type_names: IndexSet<String>,
    server_types: Vec<TypeData>,
    client_types: Vec<TypeData>,
    server_helpers: Vec<TransformFunctionData>,
    client_helpers: Vec<TransformFunctionData>,
}

impl<'d> Builder<'d> {
    fn build_endpoint(
        &mut self,
        svc: &ServiceExpr,
        ep: &EndpointExpr,
    ) -> AppResult<EndpointData> {
        assert!(!ep.routes.is_empty(), "endpoint {} has no route", ep.name);
        let m = self.scope.var_name(&ep.name);
        let payload = self.build_payload_data(ep)?;
        let result = self.build_result_data(ep)?;
        let errors = self.build_errors_data(ep)?;
        let routes = self.build_routes(ep, payload.as_ref());
        Ok(EndpointData {
            method_name: ep.name.clone(),
            method_var_name: m.clone(),
            service_name: svc.name.clone(),
            mount_handler: format!("mount_{}_handler", m),
            request_decoder: format!("decode_{}_request", m),
            response_encoder: format!("encode_{}_response", m),
            error_encoder: format!("encode_{}_error", m),
            request_encoder: format!("encode_{}_request", m),
            response_decoder: format!("decode_{}_response", m),
            payload,
            result,
            errors,
            routes,
        })
    }

    // ---------------------------------------------------------- payload

    fn build_payload_data(&mut self, ep: &EndpointExpr) -> AppResult<Option<PayloadData>> {
        let payload_attr = match &ep.payload {
            Some(a) => a.clone(),
            None => return Ok(None),
        };
        let name = payload_type_name(&self.scope, ep);
        let path_params = self.extract_path_params(&ep.path_params, Some(&payload_attr));
        let query_params = self.extract_params(&ep.query_params, Some(&payload_attr));
        let headers = self.extract_headers(&ep.headers, Some(&payload_attr));
        let cookies = self.extract_params(&ep.cookies, Some(&payload_attr));

        let body_name = format!("{}RequestBody", self.scope.struct_name(&ep.name));
        let (server_body, client_body) = match &ep.body {
            Some(body) => {
                let sb = self.build_body_type(body, &body_name, true, true)?;
                let cb = self.build_body_type(body, &body_name, true, false)?;
                // client request body is built from the domain payload
                let cb = self.attach_body_init(cb, body, ep, &payload_attr)?;
                (Some(sb), Some(cb))
            }
            None => (None, None),
        };

        let must_validate = path_params.iter().any(|p| p.validate.is_some() || p.conversion.is_some())
            || query_params
                .iter()
                .any(|p| p.validate.is_some() || p.required || p.conversion.is_some())
            || headers
                .iter()
                .any(|h| h.validate.is_some() || h.required || h.conversion.is_some())
            || cookies
                .iter()
                .any(|c| c.validate.is_some() || c.required || c.conversion.is_some())
            || server_body
                .as_ref()
                .map(|b| b.validate_def.is_some())
                .unwrap_or(false);

        let payload_init = if need_init(self.scope.design(), &payload_attr) {
            Some(self.build_payload_init(
                ep,
                &payload_attr,
                &name,
                server_body.as_ref(),
                &path_params,
                &query_params,
                &headers,
                &cookies,
            )?)
        } else {
            None
        };

        // without a constructor the decoder hands back the lone transport
        // variable
        let decoder_return_value = if payload_init.is_none() && server_body.is_none() {
            path_params
                .first()
                .map(|p| p.var_name.clone())
                .or_else(|| query_params.first().map(|p| p.var_name.clone()))
                .or_else(|| headers.first().map(|h| h.var_name.clone()))
                .or_else(|| cookies.first().map(|c| c.var_name.clone()))
        } else {
            None
        };

        Ok(Some(PayloadData {
            type_ref: name.clone(),
            name,
            request: RequestData {
                path_params,
                query_params,
                headers,
                cookies,
                server_body,
                client_body,
                payload_init,
                must_validate,
            },
            decoder_return_value,
        }))
    }

    #[allow(clippy::too_many_arguments)]
    fn build_payload_init(
        &mut self,
        ep: &EndpointExpr,
        payload_attr: &Attribute,
        payload_name: &str,
        server_body: Option<&TypeData>,
        path_params: &[ParamData],
        query_params: &[ParamData],
        headers: &[HeaderData],
        cookies: &[ParamData],
    ) -> AppResult<InitData> {
        let design = self.scope.design();
        let mut server_args = Vec::new();
        let mut client_args = Vec::new();
        let mut server_code = String::new();
        let mut client_code = String::new();
        let mut return_type_attribute = None;

        if let (Some(body_data), Some(body_attr)) = (server_body, &ep.body) {
            let body_named = named_body(design, body_attr, &body_data.name);
            let (target, origin) = match &ep.body_origin {
                Some(field) => {
                    return_type_attribute = Some(self.scope.field_name(field));
                    let target = design
                        .resolve(payload_attr)
                        .clone();
                    let nested = match &target.data_type {
                        DataType::Object(o) => o
                            .attribute(field)
                            .unwrap_or_else(|| {
                                panic!("body origin {:?} is not a payload field", field)
                            })
                            .clone(),
                        _ => panic!("body origin on a non-object payload"), // bug
                    };
                    (nested, true)
                }
                None => (named(payload_attr.clone(), payload_name), false),
            };
            let (code, helpers) = type_transform(
                &self.scope,
                &body_named,
                &target,
                "body",
                "payload",
                TransformOptions {
                    source_policy: BodyShapePolicy::AlwaysOptional,
                    target_policy: BodyShapePolicy::RequiredUnlessDefaulted,
                    init_defaults: true,
                    strip_target_required: false,
                },
            )?;
            append_helpers(&mut self.server_helpers, helpers);
            server_code.push_str(&code.replace("let payload =", "let mut payload ="));
            let (ccode, chelpers) = type_transform(
                &self.scope,
                &body_named,
                &target,
                "body",
                "payload",
                TransformOptions {
                    source_policy: BodyShapePolicy::RequiredUnlessDefaulted,
                    target_policy: BodyShapePolicy::RequiredUnlessDefaulted,
                    init_defaults: true,
                    strip_target_required: false,
                },
            )?;
            append_helpers(&mut self.client_helpers, chelpers);
            client_code.push_str(&ccode.replace("let payload =", "let mut payload ="));
            if origin {
                // wrap the single transformed attribute into the payload
                let field = return_type_attribute.as_ref().unwrap();
                let wrap = format!(
                    "let mut payload = {}::default();\npayload.{} = payload_{};\n",
                    payload_name, field, field
                );
                server_code = server_code.replace("let mut payload =", &format!("let payload_{} =", field));
                server_code.push_str(&wrap);
                client_code = client_code.replace("let mut payload =", &format!("let payload_{} =", field));
                client_code.push_str(&wrap);
            }
            let validate = body_data.validate_ref.clone();
            server_args.push(InitArg {
                name: "body".to_string(),
                field_name: return_type_attribute.clone(),
                type_ref: body_data.type_ref.clone(),
                pointer: false,
                required: true,
                validate,
                example: body_data.example.clone(),
            });
            client_args.push(InitArg {
                name: "body".to_string(),
                field_name: return_type_attribute.clone(),
                type_ref: body_data.type_ref.clone(),
                pointer: false,
                required: true,
                validate: None,
                example: body_data.example.clone(),
            });
        } else if let Some(source) = bare_collection_source(
            design,
            payload_attr,
            path_params,
            query_params,
            headers,
        ) {
            // bare array/map payload with no declared body: the matching
            // transport param carries the whole collection
            server_code.push_str(&format!(
                "let mut payload = {}.clone();\n",
                source.0
            ));
            client_code.push_str(&server_code);
            server_args.push(source.1.clone());
            client_args.push(source.1);
        } else {
            server_code.push_str(&format!(
                "let mut payload = {}::default();\n",
                payload_name
            ));
            client_code.push_str(&server_code);
        }

        let mut assign = String::new();
        for p in path_params.iter().chain(query_params).chain(cookies) {
            if let Some(field) = &p.field_name {
                assign.push_str(&assignment(
                    &self.scope,
                    payload_attr,
                    "payload",
                    &p.attribute_name,
                    field,
                    &p.var_name,
                    p.pointer,
                ));
                server_args.push(arg_from_param(p, true));
                client_args.push(arg_from_param(p, false));
            }
        }
        for h in headers {
            if let Some(field) = &h.field_name {
                assign.push_str(&assignment(
                    &self.scope,
                    payload_attr,
                    "payload",
                    &h.attribute_name,
                    field,
                    &h.var_name,
                    h.pointer,
                ));
                server_args.push(arg_from_header(h, true));
                client_args.push(arg_from_header(h, false));
            }
        }
        server_code.push_str(&assign);
        server_code.push_str("payload\n");
        client_code.push_str(&assign);
        client_code.push_str("payload\n");

        Ok(InitData {
            name: format!("new_{}", self.scope.var_name(payload_name)),
            description: Some(format!(
                "Builds a {} from the decoded request parts.",
                payload_name
            )),
            server_args,
            client_args,
            return_type_name: payload_name.to_string(),
            return_type_ref: payload_name.to_string(),
            return_type_attribute,
            return_is_struct: self.scope.design().is_object(payload_attr),
            server_code,
            client_code,
        })
    }

    // ----------------------------------------------------------- result

    fn build_result_data(&mut self, ep: &EndpointExpr) -> AppResult<Option<ResultData>> {
        let result_attr = match &ep.result {
            Some(a) => a.clone(),
            None => return Ok(None),
        };
        let name = result_type_name(&self.scope, ep);
        assert!(
            !ep.responses.is_empty(),
            "method {} has a result but no response",
            ep.name
        );
        let multiple = ep.responses.len() > 1;
        let mut responses = Vec::with_capacity(ep.responses.len());
        let mut seen_untagged = false;
        for resp in &ep.responses {
            if resp.tag.is_none() {
                if seen_untagged {
                    log::warn!(
                        "method {}: duplicate untagged response {} skipped",
                        ep.name,
                        resp.status_code
                    );
                    continue;
                }
                seen_untagged = true;
            }
            responses.push(self.build_response_data(
                ep,
                resp,
                &result_attr,
                &name,
                "",
                multiple,
                false,
            )?);
        }
        // the single default response dispatches last, stably
        if responses.len() > 1 {
            if let Some(pos) = responses.iter().position(|r| r.tag_name.is_none()) {
                let untagged = responses.remove(pos);
                responses.push(untagged);
            }
        }
        Ok(Some(ResultData {
            type_ref: name.clone(),
            name,
            responses,
        }))
    }

    #[allow(clippy::too_many_arguments)]
    fn build_response_data(
        &mut self,
        ep: &EndpointExpr,
        resp: &ResponseExpr,
        result_attr: &Attribute,
        result_name: &str,
        name_infix: &str,
        multiple: bool,
        is_error: bool,
    ) -> AppResult<ResponseData> {
        let design = self.scope.design();
        let headers = self.extract_headers(&resp.headers, Some(result_attr));
        let suffix = if multiple {
            status_name(resp.status_code)
        } else {
            String::new()
        };
        let body_name = format!(
            "{}{}{}ResponseBody",
            self.scope.struct_name(&ep.name),
            name_infix,
            suffix
        );
        let (server_body, client_body) = match &resp.body {
            Some(body) => {
                let sb = self.build_body_type(body, &body_name, false, true)?;
                // server response body is built from the domain result
                let sb =
                    self.attach_response_body_init(sb, body, resp, result_attr, result_name)?;
                let cb = self.build_body_type(body, &body_name, false, false)?;
                (Some(sb), Some(cb))
            }
            None => (None, None),
        };
        let result_init = if !is_error && need_init(design, result_attr) {
            Some(self.build_result_init(
                resp,
                result_attr,
                result_name,
                &suffix,
                client_body.as_ref(),
                &headers,
            )?)
        } else {
            None
        };
        let (tag_name, tag_value, tag_required) = match &resp.tag {
            Some((attr_name, value)) => {
                let required = match &design.resolve(result_attr).data_type {
                    DataType::Object(o) => o
                        .attribute(attr_name)
                        .map(|a| a.required)
                        .unwrap_or(false),
                    _ => false,
                };
                (
                    Some(self.scope.field_name(attr_name)),
                    Some(value.clone()),
                    required,
                )
            }
            None => (None, None, false),
        };
        let must_validate = headers
            .iter()
            .any(|h| h.validate.is_some() || h.required || h.conversion.is_some())
            || client_body
                .as_ref()
                .map(|b| b.validate_def.is_some())
                .unwrap_or(false);
        Ok(ResponseData {
            status_code: resp.status_code,
            status_const: status_const(resp.status_code),
            description: resp.description.clone(),
            headers,
            server_body,
            client_body,
            result_init,
            tag_name,
            tag_value,
            tag_required,
            must_validate,
        })
    }

    fn build_result_init(
        &mut self,
        resp: &ResponseExpr,
        result_attr: &Attribute,
        result_name: &str,
        suffix: &str,
        client_body: Option<&TypeData>,
        headers: &[HeaderData],
    ) -> AppResult<InitData> {
        let design = self.scope.design();
        let mut client_args = Vec::new();
        let mut client_code = String::new();
        let mut return_type_attribute = None;
        if let (Some(body_data), Some(body_attr)) = (client_body, &resp.body) {
            let body_named = named_body(design, body_attr, &body_data.name);
            let target = match &resp.body_origin {
                Some(field) => {
                    return_type_attribute = Some(self.scope.field_name(field));
                    match &design.resolve(result_attr).data_type {
                        DataType::Object(o) => o
                            .attribute(field)
                            .unwrap_or_else(|| {
                                panic!("body origin {:?} is not a result field", field)
                            })
                            .clone(),
                        _ => panic!("body origin on a non-object result"), // bug
                    }
                }
                None => named(result_attr.clone(), result_name),
            };
            let (code, helpers) = type_transform(
                &self.scope,
                &body_named,
                &target,
                "body",
                "res",
                TransformOptions {
                    source_policy: BodyShapePolicy::AlwaysOptional,
                    target_policy: BodyShapePolicy::RequiredUnlessDefaulted,
                    init_defaults: true,
                    strip_target_required: false,
                },
            )?;
            append_helpers(&mut self.client_helpers, helpers);
            if let Some(field) = &return_type_attribute {
                client_code.push_str(&code.replace("let res =", &format!("let res_{} =", field)));
                client_code.push_str(&format!(
                    "let mut res = {}::default();\nres.{} = res_{};\n",
                    result_name, field, field
                ));
            } else {
                client_code.push_str(&code.replace("let res =", "let mut res ="));
            }
            client_args.push(InitArg {
                name: "body".to_string(),
                field_name: return_type_attribute.clone(),
                type_ref: body_data.type_ref.clone(),
                pointer: false,
                required: true,
                validate: body_data.validate_ref.clone(),
                example: body_data.example.clone(),
            });
        } else {
            client_code.push_str(&format!("let mut res = {}::default();\n", result_name));
        }
        for h in headers {
            if let Some(field) = &h.field_name {
                client_code.push_str(&assignment(
                    &self.scope,
                    result_attr,
                    "res",
                    &h.attribute_name,
                    field,
                    &h.var_name,
                    h.pointer,
                ));
                client_args.push(arg_from_header(h, true));
            }
        }
        client_code.push_str("res\n");
        Ok(InitData {
            name: format!(
                "new_{}{}",
                self.scope.var_name(result_name),
                if suffix.is_empty() {
                    String::new()
                } else {
                    format!("_{}", self.scope.var_name(suffix))
                }
            ),
            description: Some(format!(
                "Rebuilds a {} from a status {} response.",
                result_name, resp.status_code
            )),
            server_args: Vec::new(),
            client_args,
            return_type_name: result_name.to_string(),
            return_type_ref: result_name.to_string(),
            return_type_attribute,
            return_is_struct: design.is_object(result_attr),
            server_code: String::new(),
            client_code,
        })
    }

    // ----------------------------------------------------------- errors

    fn build_errors_data(&mut self, ep: &EndpointExpr) -> AppResult<Vec<ErrorGroupData>> {
        let mut groups: Vec<ErrorGroupData> = Vec::new();
        for err in &ep.errors {
            let data = self.build_error_data(ep, err)?;
            match groups
                .iter_mut()
                .find(|g| g.status_code == err.response.status_code)
            {
                Some(g) => g.errors.push(data),
                None => groups.push(ErrorGroupData {
                    status_code: err.response.status_code,
                    status_const: status_const(err.response.status_code),
                    errors: vec![data],
                }),
            }
        }
        for g in &mut groups {
            g.errors.sort_by(|a, b| a.type_ref.cmp(&b.type_ref));
        }
        Ok(groups)
    }

    fn build_error_data(
        &mut self,
        ep: &EndpointExpr,
        err: &HttpErrorExpr,
    ) -> AppResult<ErrorData> {
        let type_ref = match &err.error_type.data_type {
            DataType::UserType(n) => self.scope.struct_name(n),
            _ => self.scope.type_name(&err.error_type),
        };
        let infix = self.scope.struct_name(&err.name);
        let response = self.build_response_data(
            ep,
            &err.response,
            &err.error_type,
            &type_ref,
            &infix,
            false,
            true,
        )?;
        Ok(ErrorData {
            name: err.name.clone(),
            type_ref,
            response,
        })
    }

    // ------------------------------------------------------------ body

    /// Builds the wire body descriptor for one side. Decode-side shapes
    /// carry a validator; encode-side shapes carry a constructor attached
    /// by the caller.
    fn build_body_type(
        &mut self,
        body: &Attribute,
        name: &str,
        request: bool,
        server: bool,
    ) -> AppResult<TypeData> {
        let design = self.scope.design();
        // only the client request body uses the lean marshaled shape;
        // both decode sides and the server response body keep every
        // field optional
        let policy = if request && !server {
            BodyShapePolicy::RequiredUnlessDefaulted
        } else {
            BodyShapePolicy::AlwaysOptional
        };
        let decode = request == server;
        let resolved = design.resolve(body).clone();
        let var_name = self.scope.var_name(name);
        let def = match resolved.data_type {
            DataType::Object(_) => Some(type_def(&self.scope, &resolved, policy)),
            _ => None,
        };
        let type_ref = match resolved.data_type {
            DataType::Object(_) => name.to_string(),
            _ => type_def(&self.scope, &resolved, policy),
        };
        let (validate_def, validate_ref) = if decode {
            match validation_code(
                &self.scope,
                &resolved,
                policy,
                "body",
                &var_name,
            ) {
                Some(code) => (
                    Some(code),
                    Some(format!("validate_{}(&body)", var_name)),
                ),
                None => (None, None),
            }
        } else {
            (None, None)
        };
        self.collect_user_types(body, request, server);
        Ok(TypeData {
            name: name.to_string(),
            var_name,
            description: body.description.clone(),
            init: None,
            def,
            type_ref,
            validate_def,
            validate_ref,
            example: example_value(design, body, name),
        })
    }

    /// Attaches the payload-to-body constructor to a client request body.
    fn attach_body_init(
        &mut self,
        mut body_data: TypeData,
        body: &Attribute,
        ep: &EndpointExpr,
        payload_attr: &Attribute,
    ) -> AppResult<TypeData> {
        let design = self.scope.design();
        let payload_name = payload_type_name(&self.scope, ep);
        let source = match &ep.body_origin {
            Some(field) => match &design.resolve(payload_attr).data_type {
                DataType::Object(o) => o
                    .attribute(field)
                    .unwrap_or_else(|| panic!("body origin {:?} is not a payload field", field))
                    .clone(),
                _ => panic!("body origin on a non-object payload"), // bug
            },
            None => named(payload_attr.clone(), &payload_name),
        };
        let body_named = named_body(design, body, &body_data.name);
        let (code, helpers) = type_transform(
            &self.scope,
            &source,
            &body_named,
            "p",
            "body",
            TransformOptions {
                source_policy: BodyShapePolicy::RequiredUnlessDefaulted,
                target_policy: BodyShapePolicy::RequiredUnlessDefaulted,
                init_defaults: true,
                strip_target_required: false,
            },
        )?;
        append_helpers(&mut self.client_helpers, helpers);
        let mut client_code = code;
        client_code.push_str("body\n");
        body_data.init = Some(InitData {
            name: format!("new_{}", body_data.var_name),
            description: Some(format!(
                "Builds the {} sent over the wire from the payload.",
                body_data.name
            )),
            server_args: Vec::new(),
            client_args: vec![InitArg {
                name: "p".to_string(),
                field_name: None,
                type_ref: payload_name.clone(),
                pointer: false,
                required: true,
                validate: None,
                example: example_value(design, payload_attr, &payload_name),
            }],
            return_type_name: body_data.name.clone(),
            return_type_ref: body_data.type_ref.clone(),
            return_type_attribute: ep.body_origin.as_ref().map(|f| self.scope.field_name(f)),
            return_is_struct: design.is_object(body),
            server_code: String::new(),
            client_code,
        });
        Ok(body_data)
    }

    /// Attaches the result-to-body constructor to a server response body.
    /// The transform runs with the target required set stripped: every
    /// response field is rendered optional-tolerant server side.
    fn attach_response_body_init(
        &mut self,
        mut body_data: TypeData,
        body: &Attribute,
        resp: &ResponseExpr,
        result_attr: &Attribute,
        result_name: &str,
    ) -> AppResult<TypeData> {
        let design = self.scope.design();
        let source = match &resp.body_origin {
            Some(field) => match &design.resolve(result_attr).data_type {
                DataType::Object(o) => o
                    .attribute(field)
                    .unwrap_or_else(|| panic!("body origin {:?} is not a result field", field))
                    .clone(),
                _ => panic!("body origin on a non-object result"), // bug
            },
            None => named(result_attr.clone(), result_name),
        };
        let body_named = named_body(design, body, &body_data.name);
        let (code, helpers) = type_transform(
            &self.scope,
            &source,
            &body_named,
            "res",
            "body",
            TransformOptions {
                source_policy: BodyShapePolicy::RequiredUnlessDefaulted,
                target_policy: BodyShapePolicy::AlwaysOptional,
                init_defaults: true,
                strip_target_required: true,
            },
        )?;
        append_helpers(&mut self.server_helpers, helpers);
        let mut server_code = code;
        server_code.push_str("body\n");
        body_data.init = Some(InitData {
            name: format!("new_{}", body_data.var_name),
            description: Some(format!(
                "Builds the {} sent over the wire from the result.",
                body_data.name
            )),
            server_args: vec![InitArg {
                name: "res".to_string(),
                field_name: None,
                type_ref: domain_type_name(&self.scope, &source, result_name),
                pointer: false,
                required: true,
                validate: None,
                example: example_value(design, &source, &body_data.name),
            }],
            client_args: Vec::new(),
            return_type_name: body_data.name.clone(),
            return_type_ref: body_data.type_ref.clone(),
            return_type_attribute: resp.body_origin.as_ref().map(|f| self.scope.field_name(f)),
            return_is_struct: design.is_object(body),
            server_code,
            client_code: String::new(),
        });
        Ok(body_data)
    }

    // ------------------------------------------------------ collection

    /// Registers every user type reachable from a body attribute as a
    /// per-side wire type, once per generated name. The visited set
    /// terminates self-referencing types.
    fn collect_user_types(&mut self, attr: &Attribute, request: bool, server: bool) {
        let mut seen = Vec::new();
        self.collect_seen(attr, request, server, &mut seen);
    }

    fn collect_seen(
        &mut self,
        attr: &Attribute,
        request: bool,
        server: bool,
        seen: &mut Vec<String>,
    ) {
        match &attr.data_type {
            DataType::Primitive(_) => {}
            DataType::Array(elem) => self.collect_seen(elem, request, server, seen),
            DataType::Map { key, elem } => {
                self.collect_seen(key, request, server, seen);
                self.collect_seen(elem, request, server, seen);
            }
            DataType::Object(o) => {
                let fields: Vec<Attribute> = o.iter().map(|(_, a)| a.clone()).collect();
                for f in fields {
                    self.collect_seen(&f, request, server, seen);
                }
            }
            DataType::UserType(name) => {
                if seen.contains(name) {
                    return;
                }
                seen.push(name.clone());
                let ut_attr = self.scope.design().user_type(name).attribute.clone();
                let data = self.attribute_type_data(name, &ut_attr, request, server);
                if server {
                    if self.server_type_names.insert(data.name.clone()) {
                        self.server_types.push(data);
                    }
                } else if self.client_type_names.insert(data.name.clone()) {
                    self.client_types.push(data);
                }
                self.collect_seen(&ut_attr, request, server, seen);
            }
        }
    }

    fn attribute_type_data(
        &mut self,
        name: &str,
        attr: &Attribute,
        request: bool,
        server: bool,
    ) -> TypeData {
        let design = self.scope.design();
        let type_name = self.scope.struct_name(name);
        let var_name = self.scope.var_name(name);
        let policy = if request && !server {
            BodyShapePolicy::RequiredUnlessDefaulted
        } else {
            BodyShapePolicy::AlwaysOptional
        };
        let decode = request == server;
        let def = match design.resolve(attr).data_type {
            DataType::Object(_) => {
                Some(type_def(&self.scope, design.resolve(attr), policy))
            }
            _ => None,
        };
        let (validate_def, validate_ref) = if decode {
            match validation_code(
                &self.scope,
                design.resolve(attr),
                policy,
                "value",
                name,
            ) {
                Some(code) => (
                    Some(code),
                    Some(format!("{}(&value)", validator_name(&self.scope, name))),
                ),
                None => (None, None),
            }
        } else {
            (None, None)
        };
        TypeData {
            name: type_name.clone(),
            var_name,
            description: attr.description.clone(),
            init: None,
            def,
            type_ref: type_name,
            validate_def,
            validate_ref,
            example: example_value(design, attr, name),
        }
    }

    // ----------------------------------------------------- extractors

    fn extract_path_params(
        &self,
        mapped: &MappedAttribute,
        domain: Option<&Attribute>,
    ) -> Vec<ParamData> {
        let mut out = Vec::new();
        mapped.walk(|name, wire, attr| {
            // path segments cannot be absent
            let mut p = self.param_data(name, wire, attr, domain, false);
            p.required = true;
            out.push(p);
        });
        out
    }

    fn extract_params(
        &self,
        mapped: &MappedAttribute,
        domain: Option<&Attribute>,
    ) -> Vec<ParamData> {
        let mut out = Vec::new();
        mapped.walk(|name, wire, attr| {
            let pointer = mapped.is_primitive_pointer(name, true);
            out.push(self.param_data(name, wire, attr, domain, pointer));
        });
        out
    }

    fn extract_headers(
        &self,
        mapped: &MappedAttribute,
        domain: Option<&Attribute>,
    ) -> Vec<HeaderData> {
        let mut out = Vec::new();
        mapped.walk(|name, wire, attr| {
            let pointer = mapped.is_primitive_pointer(name, true);
            let p = self.param_data(name, wire, attr, domain, pointer);
            out.push(HeaderData {
                canonical_name: canonical_header_key(wire),
                name: p.name,
                attribute_name: p.attribute_name,
                field_name: p.field_name,
                var_name: p.var_name,
                description: p.description,
                type_ref: p.type_ref,
                shape: p.shape,
                pointer: p.pointer,
                required: p.required,
                default_value: p.default_value,
                conversion: p.conversion,
                validate: p.validate,
                example: p.example,
            });
        });
        out
    }

    fn param_data(
        &self,
        name: &str,
        wire: &str,
        attr: &Attribute,
        domain: Option<&Attribute>,
        pointer: bool,
    ) -> ParamData {
        let design = self.scope.design();
        let var_name = self.scope.var_name(name);
        let field_name = domain.and_then(|d| match &design.resolve(d).data_type {
            DataType::Object(o) => o.attribute(name).map(|_| self.scope.field_name(name)),
            // bare collection/primitive payloads have no fields to map into
            _ => None,
        });
        let conversion = design
            .as_primitive(attr)
            .filter(|p| p.needs_conversion())
            .map(|p| conversion_code(p, &var_name, &format!("{}_raw", var_name), wire));
        let validate = validation_code(
            &self.scope,
            attr,
            BodyShapePolicy::RequiredStrict,
            &var_name,
            wire,
        );
        ParamData {
            name: wire.to_string(),
            attribute_name: name.to_string(),
            field_name,
            var_name: var_name.clone(),
            description: attr.description.clone(),
            type_ref: self.scope.type_ref(attr, pointer),
            shape: classify(design, attr),
            pointer,
            required: attr.required,
            default_value: attr.default_value.clone(),
            conversion,
            validate,
            example: example_value(design, attr, name),
        }
    }

    // ----------------------------------------------------------- paths

    fn build_routes(&self, ep: &EndpointExpr, payload: Option<&PayloadData>) -> Vec<RouteData> {
        let design = self.scope.design();
        let m = self.scope.var_name(&ep.name);
        ep.routes
            .iter()
            .enumerate()
            .map(|(i, route)| {
                let wildcards = extract_wildcards(&route.path);
                let suffix = if i == 0 {
                    String::new()
                } else {
                    format!("{}", i + 1)
                };
                let mut args = Vec::new();
                let mut exprs = Vec::new();
                for w in &wildcards {
                    let param = payload.and_then(|p| {
                        p.request
                            .path_params
                            .iter()
                            .find(|pp| pp.attribute_name == *w || pp.name == *w)
                    });
                    let (type_ref, example, attr) = match param {
                        Some(p) => (
                            p.type_ref.clone(),
                            p.example.clone(),
                            ep.path_params.object().attribute(&p.attribute_name).cloned(),
                        ),
                        None => ("String".to_string(), JsonValue::Null, None),
                    };
                    let var = self.scope.var_name(w);
                    let attr = attr.unwrap_or_else(|| Attribute::primitive(Primitive::String));
                    exprs.push(path_arg_expr(design, &attr, &var));
                    args.push(InitArg {
                        name: var,
                        field_name: Some(self.scope.field_name(w)),
                        type_ref,
                        pointer: false,
                        required: true,
                        validate: None,
                        example,
                    });
                }
                let code = if exprs.is_empty() {
                    format!("{:?}.to_string()\n", route.path)
                } else {
                    format!(
                        "format!({:?}, {})\n",
                        path_format(&route.path),
                        exprs.join(", ")
                    )
                };
                RouteData {
                    verb: crate::statuses::canonical_verb(&route.method),
                    path: route.path.clone(),
                    wildcards: wildcards.clone(),
                    path_init: InitData {
                        name: format!("{}_path{}", m, suffix),
                        description: Some(format!(
                            "Returns the URL path of the {} endpoint.",
                            ep.name
                        )),
                        server_args: args.clone(),
                        client_args: args,
                        return_type_name: "String".to_string(),
                        return_type_ref: "String".to_string(),
                        return_type_attribute: None,
                        return_is_struct: false,
                        server_code: code.clone(),
                        client_code: code,
                    },
                }
            })
            .collect()
    }
}

// -------------------------------------------------------------- support

/// Classifies a param/header attribute into its wire representation.
pub fn classify(design: &Design, attr: &Attribute) -> WireShape {
    match &design.resolve(attr).data_type {
        DataType::Primitive(Primitive::String) => WireShape::String,
        DataType::Primitive(Primitive::Any) => WireShape::Any,
        DataType::Primitive(_) => WireShape::Primitive,
        DataType::Array(elem) => match design.as_primitive(elem) {
            Some(Primitive::String) => WireShape::StringSlice,
            _ => WireShape::Slice,
        },
        DataType::Map { key, elem } => {
            let string_key = matches!(design.as_primitive(key), Some(Primitive::String));
            let string_slice_elem = design.is_array(elem)
                && matches!(&design.resolve(elem).data_type, DataType::Array(e)
                    if matches!(design.as_primitive(e), Some(Primitive::String)));
            if string_key && string_slice_elem {
                WireShape::MapStringSlice
            } else {
                WireShape::Map
            }
        }
        DataType::Object(_) | DataType::UserType(_) => WireShape::Composite,
    }
}

/// True when a raw transport string needs a typed parse anywhere inside
/// the attribute.
pub fn needs_conversion(design: &Design, attr: &Attribute) -> bool {
    match &design.resolve(attr).data_type {
        DataType::Primitive(p) => p.needs_conversion(),
        DataType::Array(elem) => needs_conversion(design, elem),
        DataType::Map { key, elem } => {
            needs_conversion(design, key) || needs_conversion(design, elem)
        }
        DataType::Object(_) | DataType::UserType(_) => true,
    }
}

/// True when the payload/result type needs a constructor: everything but
/// a bare primitive does.
pub fn need_init(design: &Design, attr: &Attribute) -> bool {
    !matches!(design.resolve(attr).data_type, DataType::Primitive(_))
}

fn payload_type_name(scope: &Scope<'_>, ep: &EndpointExpr) -> String {
    match &ep.payload {
        Some(a) => domain_type_name(scope, a, &format!("{}_payload", ep.name)),
        None => String::new(),
    }
}

fn result_type_name(scope: &Scope<'_>, ep: &EndpointExpr) -> String {
    match &ep.result {
        Some(a) => domain_type_name(scope, a, &format!("{}_result", ep.name)),
        None => String::new(),
    }
}

fn domain_type_name(scope: &Scope<'_>, attr: &Attribute, fallback: &str) -> String {
    if let Some(over) = &attr.type_name_override {
        return over.clone();
    }
    match &attr.data_type {
        DataType::UserType(n) => scope.struct_name(n),
        DataType::Object(_) => scope.struct_name(fallback),
        _ => scope.type_name(attr),
    }
}

/// The attribute with an explicit generated name attached.
fn named(mut attr: Attribute, name: &str) -> Attribute {
    if attr.type_name_override.is_none() && matches!(attr.data_type, DataType::Object(_)) {
        attr.type_name_override = Some(name.to_string());
    }
    attr
}

/// The body attribute resolved to its structural shape and renamed to the
/// generated wire type name. Wire shapes always get their own name, even
/// when the design reuses a domain user type as the body.
fn named_body(design: &Design, body: &Attribute, name: &str) -> Attribute {
    let mut resolved = design.resolve(body).clone();
    if matches!(resolved.data_type, DataType::Object(_)) {
        resolved.type_name_override = Some(name.to_string());
    }
    resolved
}

/// Finds the transport param able to carry a bare array/map payload that
/// declared no body: the first matching query param, then header, then
/// path param.
fn bare_collection_source(
    design: &Design,
    payload: &Attribute,
    path_params: &[ParamData],
    query_params: &[ParamData],
    headers: &[HeaderData],
) -> Option<(String, InitArg)> {
    let resolved = design.resolve(payload);
    if !matches!(
        resolved.data_type,
        DataType::Array(_) | DataType::Map { .. }
    ) {
        return None;
    }
    let wanted = match resolved.data_type {
        DataType::Array(_) => [WireShape::StringSlice, WireShape::Slice],
        _ => [WireShape::Map, WireShape::MapStringSlice],
    };
    let from_param = |p: &ParamData| {
        (
            p.var_name.clone(),
            InitArg {
                name: p.var_name.clone(),
                field_name: None,
                type_ref: p.type_ref.clone(),
                pointer: p.pointer,
                required: p.required,
                validate: p.validate.clone(),
                example: p.example.clone(),
            },
        )
    };
    query_params
        .iter()
        .find(|p| wanted.contains(&p.shape))
        .map(from_param)
        .or_else(|| {
            headers.iter().find(|h| wanted.contains(&h.shape)).map(|h| {
                (
                    h.var_name.clone(),
                    InitArg {
                        name: h.var_name.clone(),
                        field_name: None,
                        type_ref: h.type_ref.clone(),
                        pointer: h.pointer,
                        required: h.required,
                        validate: h.validate.clone(),
                        example: h.example.clone(),
                    },
                )
            })
        })
        .or_else(|| {
            path_params
                .iter()
                .find(|p| wanted.contains(&p.shape))
                .map(from_param)
        })
}

/// Assignment of a decoded transport variable into a domain field. The
/// domain side renders a field as a value when it is required or has a
/// default, so the target shape is evaluated under that policy.
fn assignment(
    scope: &Scope<'_>,
    domain: &Attribute,
    target_var: &str,
    attr_name: &str,
    field: &str,
    var: &str,
    pointer: bool,
) -> String {
    let target_optional = match &scope.design().resolve(domain).data_type {
        DataType::Object(o) => o
            .attribute(attr_name)
            .map(|a| field_is_optional(scope, BodyShapePolicy::RequiredUnlessDefaulted, a))
            .unwrap_or(true),
        _ => true,
    };
    match (pointer, target_optional) {
        (true, true) | (false, false) => format!("{}.{} = {};\n", target_var, field, var),
        (false, true) => format!("{}.{} = Some({});\n", target_var, field, var),
        (true, false) => format!("{}.{} = {}.unwrap();\n", target_var, field, var),
    }
}

fn arg_from_param(p: &ParamData, with_validate: bool) -> InitArg {
    InitArg {
        name: p.var_name.clone(),
        field_name: p.field_name.clone(),
        type_ref: p.type_ref.clone(),
        pointer: p.pointer,
        required: p.required,
        validate: if with_validate { p.validate.clone() } else { None },
        example: p.example.clone(),
    }
}

fn arg_from_header(h: &HeaderData, with_validate: bool) -> InitArg {
    InitArg {
        name: h.var_name.clone(),
        field_name: h.field_name.clone(),
        type_ref: h.type_ref.clone(),
        pointer: h.pointer,
        required: h.required,
        validate: if with_validate { h.validate.clone() } else { None },
        example: h.example.clone(),
    }
}
