/// Unit tests for core apirecon types
/// Tests models, auth strategies and output naming
use apirecon::auth::{build_auth, AuthStrategy, AuthType};
use apirecon::models::{Method, Operation, ParameterLocation};
use apirecon::output::{operation_file_stem, sanitize_identifier};

#[test]
fn test_method_display() {
    assert_eq!(Method::GET.to_string(), "GET");
    assert_eq!(Method::POST.to_string(), "POST");
    assert_eq!(Method::PUT.to_string(), "PUT");
    assert_eq!(Method::DELETE.to_string(), "DELETE");
    assert_eq!(Method::PATCH.to_string(), "PATCH");
    assert_eq!(Method::OPTIONS.to_string(), "OPTIONS");
    assert_eq!(Method::HEAD.to_string(), "HEAD");
}

#[test]
fn test_method_parse_is_case_insensitive() {
    assert_eq!("get".parse::<Method>().unwrap(), Method::GET);
    assert_eq!("Patch".parse::<Method>().unwrap(), Method::PATCH);
    assert_eq!("OPTIONS".parse::<Method>().unwrap(), Method::OPTIONS);
    assert!("trace".parse::<Method>().is_err());
    assert!("parameters".parse::<Method>().is_err());
}

#[test]
fn test_methods_with_bodies() {
    assert!(Method::POST.allows_body());
    assert!(Method::PUT.allows_body());
    assert!(Method::PATCH.allows_body());
    assert!(Method::DELETE.allows_body());
    assert!(!Method::GET.allows_body());
    assert!(!Method::HEAD.allows_body());
    assert!(!Method::OPTIONS.allows_body());
}

#[test]
fn test_parameter_locations() {
    assert_eq!(ParameterLocation::parse("query"), Some(ParameterLocation::Query));
    assert_eq!(ParameterLocation::parse("formData"), Some(ParameterLocation::FormData));
    assert_eq!(ParameterLocation::parse("matrix"), None);
}

#[test]
fn test_auth_headers() {
    let bearer = build_auth(AuthType::Bearer, "abc", "X-API-Key");
    assert_eq!(
        bearer.auth_header(),
        ("Authorization".to_string(), "Bearer abc".to_string())
    );

    let key = build_auth(AuthType::ApiKey, "abc", "X-API-Key");
    assert_eq!(key.auth_header(), ("X-API-Key".to_string(), "abc".to_string()));

    let basic = build_auth(AuthType::Basic, "admin:secret", "X-API-Key");
    assert_eq!(
        basic.auth_header(),
        ("Authorization".to_string(), "Basic YWRtaW46c2VjcmV0".to_string())
    );
}

fn op(method: Method, path: &str, id: Option<&str>) -> Operation {
    Operation {
        method,
        path: path.to_string(),
        operation_id: id.map(String::from),
        summary: None,
        security: None,
        parameters: vec![],
        request_body: None,
    }
}

#[test]
fn test_operation_file_stems() {
    assert_eq!(operation_file_stem(&op(Method::GET, "/pets", Some("listPets"))), "get_listPets");
    assert_eq!(operation_file_stem(&op(Method::DELETE, "/pets/{id}", None)), "delete_pets_id");
    assert_eq!(operation_file_stem(&op(Method::POST, "/x", Some("  "))), "post_x");
    assert_eq!(sanitize_identifier("Users::Create (v2)"), "Users_Create_v2");
}
