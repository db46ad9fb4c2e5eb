#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Unit tests for the contract linter

use crate::linter::{has_errors, lint_document, LintIssue, LintSeverity};
use crate::spec::ContractDocument;

fn lint_yaml(content: &str) -> Vec<LintIssue> {
    let document = ContractDocument::from_yaml_str(content).expect("parse contract");
    lint_document(&document)
}

fn kinds(issues: &[LintIssue]) -> Vec<&'static str> {
    issues.iter().map(|i| i.kind).collect()
}

#[test]
fn test_clean_contract() {
    let issues = lint_yaml(
        r#"
paths:
  /pet/{petId}:
    get:
      operationId: getPetById
      parameters:
        - { name: petId, in: path, required: true, schema: { type: integer } }
      responses:
        '200':
          content:
            application/json:
              schema: { $ref: '#/components/schemas/Pet' }
components:
  schemas:
    Pet:
      properties:
        id: { type: integer }
"#,
    );
    assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    assert!(!has_errors(&issues));
}

#[test]
fn test_lint_missing_operation_id() {
    let issues = lint_yaml(
        r#"
paths:
  /test:
    get:
      responses: {}
"#,
    );
    assert_eq!(kinds(&issues), ["missing_operation_id"]);
    assert_eq!(issues[0].severity, LintSeverity::Error);
    assert_eq!(issues[0].location, "GET /test");
}

#[test]
fn test_lint_duplicate_operation_id() {
    let issues = lint_yaml(
        r#"
paths:
  /a:
    get: { operationId: same, responses: {} }
  /b:
    post: { operationId: same, responses: {} }
"#,
    );
    assert_eq!(kinds(&issues), ["duplicate_operation_id"]);
    assert!(issues[0].message.contains("GET /a"));
}

#[test]
fn test_lint_dangling_ref() {
    let issues = lint_yaml(
        r#"
paths:
  /pet:
    post:
      operationId: addPet
      requestBody:
        content:
          application/json:
            schema: { $ref: '#/components/schemas/Ghost' }
      responses: {}
components:
  schemas:
    Pet:
      properties:
        owner: { $ref: '#/components/schemas/Owner' }
"#,
    );
    let dangling: Vec<_> = issues.iter().filter(|i| i.kind == "dangling_ref").collect();
    assert_eq!(dangling.len(), 2);
    assert_eq!(
        dangling[0].location,
        "#/paths/~1pet/post/requestBody/content/application~1json/schema"
    );
    assert!(has_errors(&issues));
}

#[test]
fn test_lint_unknown_type_only_inside_schemas() {
    let issues = lint_yaml(
        r#"
paths:
  /x:
    get:
      operationId: x
      parameters:
        - { name: q, in: query, schema: { type: strnig } }
      responses: {}
components:
  schemas:
    Thing:
      properties:
        when: { type: date }
  securitySchemes:
    api_key: { type: apiKey, name: api_key, in: header }
"#,
    );
    assert_eq!(kinds(&issues), ["unknown_type", "unknown_type"]);
    assert!(issues.iter().all(|i| i.severity == LintSeverity::Warning));
}

#[test]
fn test_lint_unsupported_location_and_path_mismatch() {
    let issues = lint_yaml(
        r#"
paths:
  /pet/{petId}/{extra}:
    delete:
      operationId: deletePet
      parameters:
        - { name: api_key, in: header, schema: { type: string } }
        - { name: petId, in: path, required: true, schema: { type: integer } }
      responses: {}
"#,
    );
    assert_eq!(kinds(&issues), ["unsupported_location", "path_param_mismatch"]);
    assert!(!has_errors(&issues));
}

#[test]
fn test_shared_path_parameters_count() {
    let issues = lint_yaml(
        r#"
paths:
  /user/{username}:
    parameters:
      - { name: username, in: path, required: true, schema: { type: string } }
    get: { operationId: getUser, responses: {} }
    delete: { operationId: deleteUser, responses: {} }
"#,
    );
    assert!(issues.is_empty(), "unexpected issues: {issues:?}");
}
