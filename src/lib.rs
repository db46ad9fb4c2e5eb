//! # brrtguard
//!
//! **brrtguard** enforces an HTTP API contract (an OpenAPI-style document) around business
//! handlers: it matches a request to a declared route, casts and checks path/query parameters,
//! validates the request body against the declared schema and, once the handler has run,
//! validates the response it produced.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - **[`spec`]** - Contract loading (YAML/JSON), schema registry and route extraction
//! - **[`router`]** - Path template compilation and route resolution
//! - **[`validator`]** - Parameter, body, component and response validation with coercion
//! - **[`dispatcher`]** - Handler registry and the request/response types handlers see
//! - **[`server`]** - Transport-neutral request descriptor and the [`Gate`] pipeline
//! - **[`linter`]** - Contract defects reported before they reach request time
//! - **[`cli`]** - The `brrtguard` command-line tool (`lint`, `routes`, `check`)
//! - **[`logging`]** / **[`runtime_config`]** - Environment-driven ambient configuration
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant T as Transport
//!     participant G as Gate
//!     participant R as Router
//!     participant V as Validators
//!     participant H as Handler
//!
//!     T->>G: ContractRequest
//!     G->>R: route(method, path)
//!     R-->>G: RouteMatch | NotFound | MethodNotAllowed
//!     G->>V: validate_parameters, validate_body
//!     V-->>G: ValidatedParameters, Option<Body> | Rejection
//!     G->>H: HandlerRequest (by operationId)
//!     H-->>G: HandlerResponse
//!     G->>V: validate_response
//!     G-->>T: HandlerResponse
//! ```
//!
//! Any failing step short-circuits with a [`Rejection`], rendered as
//! `{"error": "<reason>"}` with status 400, 404 or 405.
//!
//! ## Quick Start
//!
//! ```no_run
//! use brrtguard::dispatcher::{HandlerRegistry, HandlerResponse};
//! use brrtguard::server::{ContractRequest, Gate};
//! use brrtguard::{load_contract, RuntimeConfig};
//! use http::Method;
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let document = load_contract("doc/petstore.yaml")?;
//! let handlers = HandlerRegistry::new().with("getPetById", |req| {
//!     HandlerResponse::json(200, json!({
//!         "id": req.param("petId").cloned(),
//!         "name": "doggie",
//!         "photoUrls": []
//!     }))
//! });
//! let gate = Gate::new(document, handlers, RuntimeConfig::from_env())?;
//!
//! let response = gate.handle(&ContractRequest::new(Method::GET, "/pet/42"));
//! assert_eq!(response.status, 200);
//! # Ok(())
//! # }
//! ```
//!
//! ## Supported Schema Subset
//!
//! Object components with typed properties, `required` lists, `$ref` to other
//! components (recursion included), arrays of primitives or references, and
//! `enum`. Composition keywords (`oneOf`, `allOf`, `anyOf`), conditional schemas and
//! `format` are not interpreted.
//!
//! ## Runtime Considerations
//!
//! Validation is synchronous and runs on the caller's thread. The contract and the
//! compiled router are immutable after startup, so a single `Arc<Gate>` serves every
//! thread without locking.

pub mod cli;
pub mod dispatcher;
mod ids;
pub mod linter;
pub mod logging;
pub mod router;
pub mod runtime_config;
pub mod server;
pub mod spec;
pub mod validator;

pub use ids::RequestId;
pub use runtime_config::RuntimeConfig;
pub use server::Gate;
pub use spec::{load_contract, ContractDocument, RouteMeta};
pub use validator::Rejection;
