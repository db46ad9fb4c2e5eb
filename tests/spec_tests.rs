#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use brrtguard::dispatcher::HandlerRegistry;
use brrtguard::server::ContractRequest;
use brrtguard::spec::{build_routes, load_contract, ParameterLocation};
use brrtguard::{Gate, RuntimeConfig};
use common::petstore::PETSTORE_PATH;
use common::temp_files::{create_temp_json, create_temp_spec, create_temp_yaml};
use http::Method;

const MINIMAL_YAML: &str = r#"
openapi: 3.0.0
info:
  title: Widgets
  version: "1"
paths:
  /widgets/{id}:
    parameters:
      - name: id
        in: path
        required: true
        schema: { type: integer }
    get:
      operationId: getWidget
      responses:
        "200": { description: ok }
"#;

#[test]
fn test_load_petstore_routes() {
    let document = load_contract(PETSTORE_PATH).unwrap();
    assert_eq!(document.title(), Some("Swagger Petstore"));

    let routes = build_routes(&document).unwrap();
    assert_eq!(routes.len(), 15);
    let first = &routes[0];
    assert_eq!(first.method, Method::PUT);
    assert_eq!(first.path_template, "/pet");
    assert!(first.request_body_required);

    let delete_pet = routes
        .iter()
        .find(|r| r.operation_id == "deletePet")
        .expect("deletePet route");
    let locations: Vec<_> = delete_pet.parameters.iter().map(|p| p.location).collect();
    assert_eq!(locations, vec![ParameterLocation::Header, ParameterLocation::Path]);
}

#[test]
fn test_load_yaml_file_with_shared_parameters() {
    let file = create_temp_yaml(MINIMAL_YAML);
    let document = load_contract(file.path()).unwrap();
    let routes = build_routes(&document).unwrap();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].parameters.len(), 1);
    assert_eq!(routes[0].parameters[0].name, "id");

    let gate = Gate::new(document, HandlerRegistry::new(), RuntimeConfig::default()).unwrap();
    assert_eq!(gate.handle(&ContractRequest::new(Method::GET, "/widgets/7")).status, 200);
    assert_eq!(gate.handle(&ContractRequest::new(Method::GET, "/widgets/x")).status, 400);
}

#[test]
fn test_load_json_file() {
    let file = create_temp_json(
        r#"{
            "openapi": "3.0.0",
            "info": {"title": "Json", "version": "1"},
            "paths": {"/ping": {"get": {"operationId": "ping", "responses": {"200": {"description": "ok"}}}}}
        }"#,
    );
    let document = load_contract(file.path()).unwrap();
    assert_eq!(document.title(), Some("Json"));
    assert_eq!(build_routes(&document).unwrap()[0].operation_id, "ping");
}

#[test]
fn test_yml_extension_is_yaml() {
    let file = create_temp_spec(MINIMAL_YAML, "yml");
    assert!(load_contract(file.path()).is_ok());
}

#[test]
fn test_missing_file_is_an_error() {
    let err = load_contract("/definitely/not/here.yaml").unwrap_err();
    assert!(format!("{err:#}").contains("failed to read contract"));
}

#[test]
fn test_yaml_content_in_json_file_is_an_error() {
    let file = create_temp_json(MINIMAL_YAML);
    assert!(load_contract(file.path()).is_err());
}

#[test]
fn test_non_mapping_root_is_an_error() {
    let file = create_temp_yaml("- just\n- a\n- list\n");
    assert!(load_contract(file.path()).is_err());
}
