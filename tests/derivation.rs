//! End-to-end derivation scenarios over representative designs.

use httpgen::design::{
    Attribute, Design, EndpointExpr, MappedAttribute, Primitive, ResponseExpr, RouteExpr,
    ServiceExpr, UserTypeDef, Validation,
};
use httpgen::service_data::{analyze, WireShape};
use httpgen::{AppError, ServicesData};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::rc::Rc;

fn route(method: &str, path: &str) -> RouteExpr {
    RouteExpr {
        method: method.to_string(),
        path: path.to_string(),
    }
}

/// POST /orgs/{org_id}/accounts with a body and two tagged responses.
fn create_account_endpoint() -> EndpointExpr {
    let mut ep = EndpointExpr::new("create_account");
    ep.payload = Some(Attribute::object(vec![
        ("org_id", Attribute::primitive(Primitive::UInt).require()),
        ("name", Attribute::primitive(Primitive::String).require()),
        (
            "description",
            Attribute::primitive(Primitive::String).with_default(json!("An active account")),
        ),
    ]));
    ep.path_params = MappedAttribute::new(Attribute::object(vec![(
        "org_id",
        Attribute::primitive(Primitive::UInt).require(),
    )]));
    ep.body = Some(Attribute::object(vec![
        ("name", Attribute::primitive(Primitive::String).require()),
        (
            "description",
            Attribute::primitive(Primitive::String).with_default(json!("An active account")),
        ),
    ]));
    ep.result = Some(Attribute::object(vec![
        ("id", Attribute::primitive(Primitive::UInt).require()),
        ("name", Attribute::primitive(Primitive::String)),
        ("status", Attribute::primitive(Primitive::String).require()),
        ("location", Attribute::primitive(Primitive::String)),
    ]));
    let mut accepted = ResponseExpr::new(202);
    accepted.tag = Some(("status".to_string(), "provisioning".to_string()));
    accepted.headers = MappedAttribute::new(Attribute::object(vec![(
        "location:Location",
        Attribute::primitive(Primitive::String),
    )]));
    let mut created = ResponseExpr::new(201);
    created.body = Some(Attribute::object(vec![
        ("id", Attribute::primitive(Primitive::UInt).require()),
        ("name", Attribute::primitive(Primitive::String)),
        ("status", Attribute::primitive(Primitive::String).require()),
    ]));
    ep.responses = vec![accepted, created];
    ep.routes = vec![route("post", "/orgs/{org_id}/accounts")];
    ep
}

/// GET /orgs/{org_id}/accounts/{id}; path params declared id-first.
fn get_account_endpoint() -> EndpointExpr {
    let mut ep = EndpointExpr::new("get_account");
    ep.payload = Some(Attribute::object(vec![
        ("id", Attribute::primitive(Primitive::UInt).require()),
        ("org_id", Attribute::primitive(Primitive::UInt).require()),
    ]));
    ep.path_params = MappedAttribute::new(Attribute::object(vec![
        ("id", Attribute::primitive(Primitive::UInt).require()),
        ("org_id", Attribute::primitive(Primitive::UInt).require()),
    ]));
    ep.result = Some(Attribute::user_type("account"));
    let mut ok = ResponseExpr::new(200);
    ok.body = Some(Attribute::user_type("account"));
    ep.responses = vec![ok];
    ep.routes = vec![route("GET", "/orgs/{org_id}/accounts/{id}")];
    ep
}

/// GET /accounts with query params only.
fn list_accounts_endpoint() -> EndpointExpr {
    let mut ep = EndpointExpr::new("list_accounts");
    ep.payload = Some(Attribute::object(vec![
        ("org_id", Attribute::primitive(Primitive::UInt).require()),
        ("filter", Attribute::primitive(Primitive::String)),
    ]));
    ep.query_params = MappedAttribute::new(Attribute::object(vec![
        ("org_id", Attribute::primitive(Primitive::UInt).require()),
        ("filter:q", Attribute::primitive(Primitive::String)),
    ]));
    let mut ok = ResponseExpr::new(200);
    ok.body = Some(Attribute::array(Attribute::user_type("account")));
    ep.result = Some(Attribute::array(Attribute::user_type("account")));
    ep.responses = vec![ok];
    ep.routes = vec![route("GET", "/accounts")];
    ep
}

fn accounts_design() -> Design {
    let mut d = Design::new();
    d.register(UserTypeDef {
        name: "account".into(),
        attribute: Attribute::object(vec![
            ("id", Attribute::primitive(Primitive::UInt).require()),
            ("name", Attribute::primitive(Primitive::String).require()),
            ("status", Attribute::primitive(Primitive::String)),
        ]),
    });
    let svc = ServiceExpr {
        name: "accounts".into(),
        endpoints: vec![
            create_account_endpoint(),
            get_account_endpoint(),
            list_accounts_endpoint(),
        ],
    };
    d.add_service(svc);
    d
}

#[test]
fn test_pointer_policy_determinism() {
    let d = accounts_design();
    let data = analyze(&d, d.service("accounts").unwrap()).unwrap();
    let req = &data.endpoints[0].payload.as_ref().unwrap().request;
    let server_def = req.server_body.as_ref().unwrap().def.as_ref().unwrap();
    let client_def = req.client_body.as_ref().unwrap().def.as_ref().unwrap();
    // decode side: required fields still optional pending validation
    assert!(server_def.contains("pub name: Option<String>,"));
    assert!(server_def.contains("pub description: Option<String>,"));
    // encode side: required and defaulted fields are plain values
    assert!(client_def.contains("pub name: String,"));
    assert!(client_def.contains("pub description: String,"));
}

#[test]
fn test_concrete_create_account_request() {
    let d = accounts_design();
    let data = analyze(&d, d.service("accounts").unwrap()).unwrap();
    let req = &data.endpoints[0].payload.as_ref().unwrap().request;
    assert_eq!(req.path_params.len(), 1);
    assert_eq!(req.query_params.len(), 0);
    assert_eq!(req.headers.len(), 0);
    let org = &req.path_params[0];
    assert_eq!(org.name, "org_id");
    assert!(org.required);
    assert!(!org.pointer);
    assert_eq!(org.type_ref, "u64");
    assert_eq!(org.shape, WireShape::Primitive);
    let body = req.server_body.as_ref().unwrap();
    assert_eq!(body.name, "CreateAccountRequestBody");
    // required body field forces validation
    assert!(body.validate_def.is_some());
    assert!(req.must_validate);
}

#[test]
fn test_payload_constructor_combines_body_and_path() {
    let d = accounts_design();
    let data = analyze(&d, d.service("accounts").unwrap()).unwrap();
    let req = &data.endpoints[0].payload.as_ref().unwrap().request;
    let init = req.payload_init.as_ref().unwrap();
    assert_eq!(init.name, "new_create_account_payload");
    let arg_names: Vec<&str> = init.server_args.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(arg_names, vec!["body", "org_id"]);
    // body arg carries the validation call server-side only
    assert!(init.server_args[0].validate.is_some());
    assert!(init.client_args[0].validate.is_none());
    assert!(init.server_code.contains("name: body.name.clone().unwrap(),"));
    assert!(init
        .server_code
        .contains("description: body.description.clone().unwrap_or_else(|| \"An active account\".to_string()),"));
    assert!(init.server_code.contains("payload.org_id = org_id;\n"));
}

#[test]
fn test_response_tagging_and_ordering() {
    let d = accounts_design();
    let data = analyze(&d, d.service("accounts").unwrap()).unwrap();
    let result = data.endpoints[0].result.as_ref().unwrap();
    assert_eq!(result.responses.len(), 2);
    let tagged = &result.responses[0];
    assert_eq!(tagged.status_code, 202);
    assert_eq!(tagged.status_const, "StatusCode::ACCEPTED");
    assert_eq!(tagged.tag_name.as_deref(), Some("status"));
    assert_eq!(tagged.tag_value.as_deref(), Some("provisioning"));
    assert!(tagged.tag_required);
    assert_eq!(tagged.headers[0].canonical_name, "Location");
    let default = &result.responses[1];
    assert_eq!(default.status_code, 201);
    assert!(default.tag_name.is_none());
}

#[test]
fn test_server_response_body_keeps_fields_optional() {
    let d = accounts_design();
    let data = analyze(&d, d.service("accounts").unwrap()).unwrap();
    let result = data.endpoints[0].result.as_ref().unwrap();
    let created = &result.responses[1];
    assert_eq!(created.status_code, 201);
    let body = created.server_body.as_ref().unwrap();
    // every response field is a pointer server-side, required or not
    let def = body.def.as_ref().unwrap();
    assert!(def.contains("pub id: Option<u64>,"));
    assert!(def.contains("pub status: Option<String>,"));
    // the constructor agrees with the definition
    let init = body.init.as_ref().unwrap();
    assert!(init.server_code.contains("id: Some(res.id.clone()),"));
    assert!(init.server_code.contains("status: Some(res.status.clone()),"));
    assert!(init.server_code.contains("name: res.name.clone(),"));
    // encoding validates nothing; the client decode side does
    assert!(body.validate_def.is_none());
    let client = created.client_body.as_ref().unwrap();
    assert!(client.validate_def.is_some());
}

#[test]
fn test_defaulted_query_param_assigns_value_field() {
    let mut d = Design::new();
    let mut ep = EndpointExpr::new("list_widgets");
    ep.payload = Some(Attribute::object(vec![
        ("org_id", Attribute::primitive(Primitive::UInt).require()),
        (
            "page",
            Attribute::primitive(Primitive::Int32).with_default(json!(1)),
        ),
    ]));
    ep.query_params = MappedAttribute::new(Attribute::object(vec![
        ("org_id", Attribute::primitive(Primitive::UInt).require()),
        (
            "page",
            Attribute::primitive(Primitive::Int32).with_default(json!(1)),
        ),
    ]));
    ep.routes = vec![route("GET", "/widgets")];
    d.add_service(ServiceExpr {
        name: "widgets".into(),
        endpoints: vec![ep],
    });
    let data = analyze(&d, d.service("widgets").unwrap()).unwrap();
    let req = &data.endpoints[0].payload.as_ref().unwrap().request;
    // the default is applied during decode, so the param is a value
    let page = &req.query_params[1];
    assert!(!page.pointer);
    // and the domain field is a value too: a plain move, no Some wrapping
    let init = req.payload_init.as_ref().unwrap();
    assert!(init.server_code.contains("payload.page = page;\n"));
    assert!(init.server_code.contains("payload.org_id = org_id;\n"));
    assert!(!init.server_code.contains("Some(page)"));
}

#[test]
fn test_untagged_response_moves_last_from_any_position() {
    for untagged_first in [true, false] {
        let mut d = Design::new();
        let mut ep = create_account_endpoint();
        let mut responses = ep.responses.clone();
        if untagged_first {
            responses.reverse(); // untagged 201 declared first
        }
        ep.responses = responses;
        d.add_service(ServiceExpr {
            name: "svc".into(),
            endpoints: vec![ep],
        });
        let data = analyze(&d, d.service("svc").unwrap()).unwrap();
        let result = data.endpoints[0].result.as_ref().unwrap();
        assert_eq!(result.responses.last().unwrap().status_code, 201);
        assert!(result.responses.last().unwrap().tag_name.is_none());
        assert_eq!(result.responses[0].status_code, 202);
    }
}

#[test]
fn test_single_untagged_response_is_untouched() {
    let d = accounts_design();
    let data = analyze(&d, d.service("accounts").unwrap()).unwrap();
    let result = data.endpoints[1].result.as_ref().unwrap();
    assert_eq!(result.responses.len(), 1);
    assert!(result.responses[0].tag_name.is_none());
}

#[test]
fn test_duplicate_untagged_response_is_skipped() {
    let mut d = Design::new();
    let mut ep = create_account_endpoint();
    ep.responses.push(ResponseExpr::new(204)); // second untagged
    ep.responses.push(ResponseExpr::new(200)); // third untagged
    d.add_service(ServiceExpr {
        name: "svc".into(),
        endpoints: vec![ep],
    });
    let data = analyze(&d, d.service("svc").unwrap()).unwrap();
    let result = data.endpoints[0].result.as_ref().unwrap();
    // 202 tagged + the first untagged (201) survive
    assert_eq!(result.responses.len(), 2);
    assert_eq!(result.responses[1].status_code, 201);
}

#[test]
fn test_path_argument_ordering_follows_route() {
    let d = accounts_design();
    let data = analyze(&d, d.service("accounts").unwrap()).unwrap();
    // payload declares id before org_id, the route decides
    let route = &data.endpoints[1].routes[0];
    assert_eq!(route.verb, "GET");
    assert_eq!(route.wildcards, vec!["org_id".to_string(), "id".to_string()]);
    let args: Vec<&str> = route
        .path_init
        .server_args
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(args, vec!["org_id", "id"]);
    assert_eq!(route.path_init.name, "get_account_path");
    assert!(route
        .path_init
        .server_code
        .contains("format!(\"/orgs/{}/accounts/{}\""));
}

#[test]
fn test_multiple_routes_get_suffixed_constructors() {
    let mut d = Design::new();
    let mut ep = get_account_endpoint();
    ep.routes = vec![
        route("GET", "/orgs/{org_id}/accounts/{id}"),
        route("GET", "/accounts/{id}"),
    ];
    d.register(UserTypeDef {
        name: "account".into(),
        attribute: Attribute::object(vec![(
            "id",
            Attribute::primitive(Primitive::UInt).require(),
        )]),
    });
    d.add_service(ServiceExpr {
        name: "svc".into(),
        endpoints: vec![ep],
    });
    let data = analyze(&d, d.service("svc").unwrap()).unwrap();
    let routes = &data.endpoints[0].routes;
    assert_eq!(routes[0].path_init.name, "get_account_path");
    assert_eq!(routes[1].path_init.name, "get_account_path2");
}

#[test]
fn test_query_param_pointer_and_conversion() {
    let d = accounts_design();
    let data = analyze(&d, d.service("accounts").unwrap()).unwrap();
    let req = &data.endpoints[2].payload.as_ref().unwrap().request;
    let org = &req.query_params[0];
    assert!(!org.pointer);
    assert!(org.required);
    let conv = org.conversion.as_ref().unwrap();
    // parse failures merge into the error list instead of bailing out
    assert!(conv.contains("let org_id: u64 = match org_id_raw.parse() {"));
    assert!(conv.contains("errors.push("));
    let filter = &req.query_params[1];
    assert!(filter.pointer);
    assert!(!filter.required);
    assert_eq!(filter.name, "q");
    assert_eq!(filter.type_ref, "Option<String>");
    assert!(filter.conversion.is_none());
    assert!(req.must_validate);
}

#[test]
fn test_shared_user_type_registered_once_per_side() {
    let mut d = Design::new();
    d.register(UserTypeDef {
        name: "inner".into(),
        attribute: Attribute::object(vec![
            ("id", Attribute::primitive(Primitive::UInt).require()),
            ("tag", Attribute::primitive(Primitive::String)),
        ]),
    });
    let shape = Attribute::object(vec![(
        "inner",
        Attribute::user_type("inner").require(),
    )]);
    let mut first = EndpointExpr::new("create_widget");
    first.payload = Some(shape.clone());
    first.body = Some(shape.clone());
    first.routes = vec![route("POST", "/widgets")];
    let mut second = EndpointExpr::new("replace_widget");
    second.payload = Some(shape.clone());
    second.body = Some(shape);
    second.routes = vec![route("PUT", "/widgets")];
    d.add_service(ServiceExpr {
        name: "widgets".into(),
        endpoints: vec![first, second],
    });
    let data = analyze(&d, d.service("widgets").unwrap()).unwrap();
    let server_inner: Vec<_> = data
        .server_body_attribute_types
        .iter()
        .filter(|t| t.name == "Inner")
        .collect();
    let client_inner: Vec<_> = data
        .client_body_attribute_types
        .iter()
        .filter(|t| t.name == "Inner")
        .collect();
    assert_eq!(server_inner.len(), 1);
    assert_eq!(client_inner.len(), 1);
    // both endpoints share one helper per direction
    let server_helper_count = data
        .server_transform_helpers
        .iter()
        .filter(|h| h.name == "transform_inner_to_inner")
        .count();
    assert_eq!(server_helper_count, 1);
}

#[test]
fn test_self_referencing_body_type_terminates() {
    let mut d = Design::new();
    d.register(UserTypeDef {
        name: "node".into(),
        attribute: Attribute::object(vec![
            ("value", Attribute::primitive(Primitive::String).require()),
            ("next", Attribute::user_type("node")),
        ]),
    });
    let shape = Attribute::object(vec![("root", Attribute::user_type("node").require())]);
    let mut ep = EndpointExpr::new("put_tree");
    ep.payload = Some(shape.clone());
    ep.body = Some(shape);
    ep.routes = vec![route("PUT", "/tree")];
    d.add_service(ServiceExpr {
        name: "trees".into(),
        endpoints: vec![ep],
    });
    let data = analyze(&d, d.service("trees").unwrap()).unwrap();
    assert_eq!(
        data.server_body_attribute_types
            .iter()
            .filter(|t| t.name == "Node")
            .count(),
        1
    );
}

#[test]
fn test_structural_mismatch_fails_derivation() {
    let mut d = Design::new();
    let mut ep = EndpointExpr::new("broken");
    ep.payload = Some(Attribute::object(vec![(
        "name",
        Attribute::primitive(Primitive::String).require(),
    )]));
    // body declared as an array cannot be bridged to an object payload
    ep.body = Some(Attribute::array(Attribute::primitive(Primitive::String)));
    ep.routes = vec![route("POST", "/broken")];
    d.add_service(ServiceExpr {
        name: "svc".into(),
        endpoints: vec![ep],
    });
    let err = analyze(&d, d.service("svc").unwrap()).unwrap_err();
    assert!(matches!(err, AppError::Transform(_)));
}

#[test]
fn test_bare_primitive_payload_has_no_constructor() {
    let mut d = Design::new();
    let mut ep = EndpointExpr::new("show");
    ep.payload = Some(Attribute::object(vec![(
        "id",
        Attribute::primitive(Primitive::UInt).require(),
    )]));
    ep.path_params = MappedAttribute::new(Attribute::object(vec![(
        "id",
        Attribute::primitive(Primitive::UInt).require(),
    )]));
    ep.routes = vec![route("GET", "/things/{id}")];
    d.add_service(ServiceExpr {
        name: "svc".into(),
        endpoints: vec![ep],
    });
    let data = analyze(&d, d.service("svc").unwrap()).unwrap();
    let payload = data.endpoints[0].payload.as_ref().unwrap();
    // object payloads always get a constructor
    assert!(payload.request.payload_init.is_some());
    assert!(payload.decoder_return_value.is_none());

    // a primitive payload carried by one path param needs no constructor
    let mut d2 = Design::new();
    let mut ep2 = EndpointExpr::new("show");
    ep2.payload = Some(Attribute::primitive(Primitive::UInt).require());
    ep2.path_params = MappedAttribute::new(Attribute::object(vec![(
        "id",
        Attribute::primitive(Primitive::UInt).require(),
    )]));
    ep2.routes = vec![route("GET", "/things/{id}")];
    d2.add_service(ServiceExpr {
        name: "svc".into(),
        endpoints: vec![ep2],
    });
    let data2 = analyze(&d2, d2.service("svc").unwrap()).unwrap();
    let payload2 = data2.endpoints[0].payload.as_ref().unwrap();
    assert!(payload2.request.payload_init.is_none());
    assert_eq!(payload2.decoder_return_value.as_deref(), Some("id"));
}

#[test]
fn test_memoization_returns_shared_instance() {
    let d = accounts_design();
    let mut cache = ServicesData::new(&d);
    let a = cache.get("accounts").unwrap();
    let b = cache.get("accounts").unwrap();
    assert!(Rc::ptr_eq(&a, &b));
}

#[test]
fn test_unknown_service_is_an_error() {
    let d = accounts_design();
    let mut cache = ServicesData::new(&d);
    let err = cache.get("nope").unwrap_err();
    assert!(matches!(err, AppError::General(_)));
}

#[test]
fn test_endpoint_function_names() {
    let d = accounts_design();
    let data = analyze(&d, d.service("accounts").unwrap()).unwrap();
    let ep = &data.endpoints[0];
    assert_eq!(ep.mount_handler, "mount_create_account_handler");
    assert_eq!(ep.request_decoder, "decode_create_account_request");
    assert_eq!(ep.response_encoder, "encode_create_account_response");
    assert_eq!(ep.error_encoder, "encode_create_account_error");
    assert_eq!(ep.request_encoder, "encode_create_account_request");
    assert_eq!(ep.response_decoder, "decode_create_account_response");
}

#[test]
fn test_validation_snippet_on_constrained_param() {
    let mut d = Design::new();
    let mut rules = Validation::default();
    rules.enum_values = vec![json!("active"), json!("closed")];
    let mut ep = EndpointExpr::new("list");
    ep.payload = Some(Attribute::object(vec![(
        "status",
        Attribute::primitive(Primitive::String).with_validation(rules.clone()),
    )]));
    ep.query_params = MappedAttribute::new(Attribute::object(vec![(
        "status",
        Attribute::primitive(Primitive::String).with_validation(rules),
    )]));
    ep.routes = vec![route("GET", "/list")];
    d.add_service(ServiceExpr {
        name: "svc".into(),
        endpoints: vec![ep],
    });
    let data = analyze(&d, d.service("svc").unwrap()).unwrap();
    let req = &data.endpoints[0].payload.as_ref().unwrap().request;
    let status = &req.query_params[0];
    let validate = status.validate.as_ref().unwrap();
    assert!(validate.contains("status.as_str() == \"active\""));
    assert!(req.must_validate);
}
