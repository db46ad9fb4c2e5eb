//! # Contract Linter Module
//!
//! Reports contract defects before they surface as request-time rejections.
//!
//! ## Checks Performed
//!
//! Errors (the contract cannot be enforced as written):
//!
//! 1. **missing_operation_id** - every operation needs an `operationId` to be
//!    bound to a handler
//! 2. **duplicate_operation_id** - two operations share an `operationId`
//! 3. **dangling_ref** - a `$ref` anywhere in the document does not resolve
//!
//! Warnings (enforced, but probably not what the author meant):
//!
//! 4. **unknown_type** - a schema `type` outside
//!    `integer|number|string|boolean|array|object`; every value sent for it is rejected
//! 5. **unsupported_location** - a parameter `in` other than `path`/`query`;
//!    it is ignored by validation
//! 6. **path_param_mismatch** - the template's placeholder count differs from
//!    the declared path parameters
//!
//! ## Usage
//!
//! ```rust,ignore
//! use brrtguard::linter::{lint_document, print_issues};
//! use brrtguard::spec::load_contract;
//!
//! let document = load_contract("doc/petstore.yaml")?;
//! let issues = lint_document(&document);
//! print_issues(&issues);
//! ```

use crate::spec::{resolve_ref, ContractDocument, ParameterLocation, PrimitiveType, HTTP_METHODS};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::fmt;

#[cfg(test)]
mod tests;

#[allow(clippy::expect_used)]
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^}/]+\}").expect("placeholder pattern is valid"));

/// Severity level for lint issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// The contract cannot be enforced as written
    Error,
    /// Enforced, but likely a mistake
    Warning,
}

impl fmt::Display for LintSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintSeverity::Error => write!(f, "error"),
            LintSeverity::Warning => write!(f, "warning"),
        }
    }
}

/// A lint issue found in a contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintIssue {
    /// Where the issue occurred (e.g. `GET /pet/{petId}`, `#/components/schemas/Pet`)
    pub location: String,
    pub severity: LintSeverity,
    /// Type of lint issue (e.g. `dangling_ref`)
    pub kind: &'static str,
    /// Human-readable description of the problem
    pub message: String,
}

impl LintIssue {
    fn error(location: impl Into<String>, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            severity: LintSeverity::Error,
            kind,
            message: message.into(),
        }
    }

    fn warning(location: impl Into<String>, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            severity: LintSeverity::Warning,
            kind,
            message: message.into(),
        }
    }
}

/// Lint a loaded contract. Issues are reported in document order: operation
/// checks first, then the reference and type walk over the whole tree.
#[must_use]
pub fn lint_document(document: &ContractDocument) -> Vec<LintIssue> {
    let mut issues = Vec::new();
    let mut seen_ids: HashMap<String, String> = HashMap::new();

    for (template, item) in document.paths().into_iter().flatten() {
        let Some(item) = item.as_object() else {
            continue;
        };
        lint_path_item(document, template, item, &mut seen_ids, &mut issues);
    }

    let mut walk = Walk {
        root: document.root(),
        issues: &mut issues,
    };
    walk.visit(document.root(), "#", false);
    issues
}

fn lint_path_item(
    document: &ContractDocument,
    template: &str,
    item: &Map<String, Value>,
    seen_ids: &mut HashMap<String, String>,
    issues: &mut Vec<LintIssue>,
) {
    let shared = item.get("parameters");
    for (key, operation) in item {
        if !HTTP_METHODS.contains(&key.to_ascii_lowercase().as_str()) {
            continue;
        }
        let location = format!("{} {}", key.to_ascii_uppercase(), template);

        match operation.get("operationId").and_then(Value::as_str) {
            None => issues.push(LintIssue::error(
                &location,
                "missing_operation_id",
                "operation has no operationId and cannot be bound to a handler",
            )),
            Some(id) => {
                if let Some(first) = seen_ids.get(id) {
                    issues.push(LintIssue::error(
                        &location,
                        "duplicate_operation_id",
                        format!("operationId '{id}' is already used by {first}"),
                    ));
                } else {
                    seen_ids.insert(id.to_string(), location.clone());
                }
            }
        }

        let declared = lint_parameters(document, &location, shared, operation.get("parameters"), issues);
        let template_path = template.split('?').next().unwrap_or(template);
        let placeholders = PLACEHOLDER.find_iter(template_path).count();
        if placeholders != declared {
            issues.push(LintIssue::warning(
                &location,
                "path_param_mismatch",
                format!(
                    "template has {placeholders} placeholder(s) but {declared} path parameter(s) are declared"
                ),
            ));
        }
    }
}

/// Check parameter locations and return the number of distinct path parameters.
fn lint_parameters(
    document: &ContractDocument,
    location: &str,
    shared: Option<&Value>,
    own: Option<&Value>,
    issues: &mut Vec<LintIssue>,
) -> usize {
    let mut path_params: HashSet<&str> = HashSet::new();
    let params = [shared, own]
        .into_iter()
        .flatten()
        .filter_map(Value::as_array)
        .flatten();

    for param in params {
        // Dangling parameter references are reported by the tree walk.
        let param = match param.get("$ref").and_then(Value::as_str) {
            Some(reference) => match resolve_ref(document.root(), reference) {
                Some(resolved) => resolved,
                None => continue,
            },
            None => param,
        };
        let name = param.get("name").and_then(Value::as_str).unwrap_or("<unnamed>");
        let place = param.get("in").and_then(Value::as_str).unwrap_or("");
        match ParameterLocation::parse(place) {
            Some(ParameterLocation::Path) => {
                path_params.insert(name);
            }
            Some(ParameterLocation::Query) => {}
            _ => issues.push(LintIssue::warning(
                location,
                "unsupported_location",
                format!("parameter '{name}' in '{place}' is not validated (only path and query are)"),
            )),
        }
    }
    path_params.len()
}

struct Walk<'a, 'i> {
    root: &'a Value,
    issues: &'i mut Vec<LintIssue>,
}

impl<'a> Walk<'a, '_> {
    fn visit(&mut self, node: &'a Value, pointer: &str, in_schema: bool) {
        match node {
            Value::Object(map) => {
                if let Some(reference) = map.get("$ref").and_then(Value::as_str) {
                    if resolve_ref(self.root, reference).is_none() {
                        self.issues.push(LintIssue::error(
                            pointer,
                            "dangling_ref",
                            format!("reference '{reference}' does not resolve"),
                        ));
                    }
                }
                if in_schema {
                    if let Some(ty) = map.get("type").and_then(Value::as_str) {
                        if PrimitiveType::parse(ty).is_none() {
                            self.issues.push(LintIssue::warning(
                                pointer,
                                "unknown_type",
                                format!("type '{ty}' is not recognised; every value for it is rejected"),
                            ));
                        }
                    }
                }
                for (key, child) in map {
                    let child_pointer = format!("{pointer}/{}", key.replace('~', "~0").replace('/', "~1"));
                    let child_in_schema =
                        in_schema || key == "schema" || (key == "schemas" && pointer == "#/components");
                    self.visit(child, &child_pointer, child_in_schema);
                }
            }
            Value::Array(items) => {
                for (i, child) in items.iter().enumerate() {
                    self.visit(child, &format!("{pointer}/{i}"), in_schema);
                }
            }
            _ => {}
        }
    }
}

/// `true` when any issue is an error.
#[must_use]
pub fn has_errors(issues: &[LintIssue]) -> bool {
    issues.iter().any(|i| i.severity == LintSeverity::Error)
}

/// Print lint issues to stderr, errors first.
pub fn print_issues(issues: &[LintIssue]) {
    if issues.is_empty() {
        eprintln!("No lint issues found");
        return;
    }

    let errors: Vec<_> = issues
        .iter()
        .filter(|i| i.severity == LintSeverity::Error)
        .collect();
    let warnings: Vec<_> = issues
        .iter()
        .filter(|i| i.severity == LintSeverity::Warning)
        .collect();

    eprintln!("\nLint results: {} error(s), {} warning(s)\n", errors.len(), warnings.len());
    for (title, group) in [("Errors (must fix):", errors), ("Warnings (should fix):", warnings)] {
        if group.is_empty() {
            continue;
        }
        eprintln!("{title}");
        for issue in group {
            eprintln!("   [{}] {}", issue.kind, issue.location);
            eprintln!("      {}", issue.message);
        }
        eprintln!();
    }
}
