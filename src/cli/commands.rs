use crate::dispatcher::HandlerRegistry;
use crate::linter::{has_errors, lint_document, print_issues, LintSeverity};
use crate::runtime_config::RuntimeConfig;
use crate::server::{ContractRequest, Gate};
use crate::spec::load_contract;
use anyhow::Context;
use clap::{Parser, Subcommand};
use http::Method;
use serde_json::{json, Value};
use std::io::Write;
use std::path::PathBuf;

/// Command-line interface for brrtguard
///
/// Offline tooling over a contract: lint it, list its routes, or run a
/// request through validation without a server.
#[derive(Debug, Parser)]
#[command(name = "brrtguard")]
#[command(about = "Contract enforcement for HTTP APIs", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Lint a contract and report defects
    Lint {
        /// Path to the contract file (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Exit with error code if any errors are found
        #[arg(long, default_value_t = false)]
        fail_on_error: bool,

        /// Show only errors (hide warnings)
        #[arg(long, default_value_t = false)]
        errors_only: bool,
    },
    /// Print every route as `METHOD template -> operationId`
    Routes {
        /// Path to the contract file (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,
    },
    /// Validate a single request offline and print the outcome as JSON
    Check {
        /// Path to the contract file (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// HTTP method
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Request target, optionally with a query string (`/pet/findByStatus?status=sold`)
        #[arg(short, long)]
        path: String,

        /// Payload content type (defaults to application/json when a body is given)
        #[arg(long)]
        content_type: Option<String>,

        /// Inline payload
        #[arg(long, conflicts_with = "body_file")]
        body: Option<String>,

        /// Read the payload from a file
        #[arg(long)]
        body_file: Option<PathBuf>,
    },
}

/// Parse process arguments and run the selected command.
///
/// Returns the process exit code.
pub fn run_cli() -> anyhow::Result<i32> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    execute(&cli, &mut stdout.lock())
}

/// Run `cli`, writing command output to `out`. Lint reports go to stderr.
pub fn execute(cli: &Cli, out: &mut impl Write) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Lint {
            spec,
            fail_on_error,
            errors_only,
        } => {
            let document = load_contract(spec)?;
            let mut issues = lint_document(&document);
            if *errors_only {
                issues.retain(|i| i.severity == LintSeverity::Error);
            }
            print_issues(&issues);
            Ok(if *fail_on_error && has_errors(&issues) { 1 } else { 0 })
        }
        Commands::Routes { spec } => {
            let document = load_contract(spec)?;
            let gate = Gate::new(document, HandlerRegistry::new(), RuntimeConfig::from_env())?;
            for route in gate.router().routes() {
                writeln!(
                    out,
                    "{} {} -> {}",
                    route.method, route.path_template, route.operation_id
                )?;
            }
            Ok(0)
        }
        Commands::Check {
            spec,
            method,
            path,
            content_type,
            body,
            body_file,
        } => {
            let document = load_contract(spec)?;
            let gate = Gate::new(document, HandlerRegistry::new(), RuntimeConfig::from_env())?;
            let payload = match (body, body_file) {
                (Some(text), _) => text.clone().into_bytes(),
                (None, Some(file)) => std::fs::read(file)
                    .with_context(|| format!("failed to read body file {}", file.display()))?,
                (None, None) => Vec::new(),
            };
            let content_type = content_type
                .clone()
                .or_else(|| (!payload.is_empty()).then(|| "application/json".to_string()));
            let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
                .with_context(|| format!("invalid HTTP method {method}"))?;
            let request = ContractRequest::from_parts(method, path, content_type.as_deref(), payload);

            let (outcome, code) = match gate.validate_request(&request) {
                Ok(validated) => (
                    json!({
                        "outcome": "accepted",
                        "operation_id": validated.route.operation_id,
                        "parameters": Value::Object(validated.parameters),
                        "body": validated.body,
                    }),
                    0,
                ),
                Err(rejection) => (
                    json!({
                        "outcome": "rejected",
                        "status": rejection.status(),
                        "kind": rejection.kind(),
                        "error": rejection.to_string(),
                    }),
                    1,
                ),
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&outcome)?)?;
            Ok(code)
        }
    }
}
