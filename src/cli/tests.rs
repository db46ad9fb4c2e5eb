#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Unit tests for CLI commands

use crate::cli::{execute, Cli, Commands};
use clap::Parser;
use serde_json::Value;

const PETSTORE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/doc/petstore.yaml");

fn run(args: &[&str]) -> (i32, String) {
    let cli = Cli::try_parse_from(args).expect("parse arguments");
    let mut out = Vec::new();
    let code = execute(&cli, &mut out).expect("command runs");
    (code, String::from_utf8(out).expect("utf-8 output"))
}

#[test]
fn test_lint_command_with_flags() {
    let cli = Cli::try_parse_from([
        "brrtguard",
        "lint",
        "--spec",
        "test.yaml",
        "--fail-on-error",
        "--errors-only",
    ])
    .unwrap();

    match cli.command {
        Commands::Lint {
            spec,
            fail_on_error,
            errors_only,
        } => {
            assert_eq!(spec.to_string_lossy(), "test.yaml");
            assert!(fail_on_error);
            assert!(errors_only);
        }
        _ => panic!("Expected Lint command"),
    }
}

#[test]
fn test_body_and_body_file_conflict() {
    let parsed = Cli::try_parse_from([
        "brrtguard", "check", "--spec", "s.yaml", "--path", "/x", "--body", "{}", "--body-file",
        "b.json",
    ]);
    assert!(parsed.is_err());
}

#[test]
fn test_routes_in_declaration_order() {
    let (code, out) = run(&["brrtguard", "routes", "--spec", PETSTORE]);
    assert_eq!(code, 0);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "PUT /pet -> updatePet");
    assert_eq!(lines[1], "POST /pet -> addPet");
    assert!(lines.contains(&"GET /pet/{petId} -> getPetById"));
}

#[test]
fn test_check_accepts_valid_request() {
    let (code, out) = run(&["brrtguard", "check", "--spec", PETSTORE, "--path", "/pet/0"]);
    assert_eq!(code, 0);
    let outcome: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(outcome["outcome"], "accepted");
    assert_eq!(outcome["operation_id"], "getPetById");
    assert_eq!(outcome["parameters"]["petId"], 0);
}

#[test]
fn test_check_reports_rejection() {
    let (code, out) = run(&[
        "brrtguard",
        "check",
        "--spec",
        PETSTORE,
        "--method",
        "post",
        "--path",
        "/store/order",
        "--body",
        r#"{"id": "string", "petId": 0}"#,
    ]);
    assert_eq!(code, 1);
    let outcome: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(outcome["kind"], "InvalidFieldType");
    assert_eq!(outcome["error"], "Invalid field type.");
    assert_eq!(outcome["status"], 400);
}

#[test]
fn test_lint_petstore_is_clean_of_errors() {
    let (code, _) = run(&["brrtguard", "lint", "--spec", PETSTORE, "--fail-on-error"]);
    assert_eq!(code, 0);
}
