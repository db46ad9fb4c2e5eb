use super::request::ContractRequest;
use crate::dispatcher::{HandlerRegistry, HandlerRequest, HandlerResponse};
use crate::ids::RequestId;
use crate::router::Router;
use crate::runtime_config::RuntimeConfig;
use crate::spec::{ContractDocument, RouteMeta};
use crate::validator::{
    validate_body, validate_parameters, validate_response, ComponentValidator, Rejection,
    ValidatedParameters,
};
use serde_json::Value;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, info_span, warn};

/// Header used to correlate a request across logs
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Outcome of request validation: the matched operation plus the coerced
/// parameters and body.
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub route: Arc<RouteMeta>,
    pub parameters: ValidatedParameters,
    pub body: Option<Value>,
}

impl ValidatedRequest {
    #[must_use]
    pub fn operation_id(&self) -> &str {
        &self.route.operation_id
    }
}

/// Contract enforcement in front of business handlers.
///
/// Owns the immutable contract, its compiled router and an explicit handler
/// registry. `Gate` is `Send + Sync`; wrap it in an `Arc` and share it across
/// whatever threads or tasks the transport uses.
#[derive(Debug)]
pub struct Gate {
    document: Arc<ContractDocument>,
    router: Router,
    handlers: HandlerRegistry,
    config: RuntimeConfig,
}

impl Gate {
    /// Compile the router for `document` and take ownership of `handlers`.
    pub fn new(
        document: Arc<ContractDocument>,
        handlers: HandlerRegistry,
        config: RuntimeConfig,
    ) -> anyhow::Result<Self> {
        let router = Router::from_document(&document)?;
        let unbound: Vec<&str> = router
            .routes()
            .map(|r| r.operation_id.as_str())
            .filter(|id| handlers.get(id).is_none())
            .collect();
        if !unbound.is_empty() {
            info!(
                operations = ?unbound,
                "Operations without a handler will answer with the pass-through success"
            );
        }
        Ok(Self {
            document,
            router,
            handlers,
            config,
        })
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    #[must_use]
    pub fn document(&self) -> &ContractDocument {
        &self.document
    }

    #[must_use]
    pub fn config(&self) -> RuntimeConfig {
        self.config
    }

    fn component_validator(&self) -> ComponentValidator<'_> {
        ComponentValidator::new(self.document.registry(), self.config.max_schema_depth)
    }

    /// Match the route and validate parameters then body.
    ///
    /// # Errors
    ///
    /// The first [`Rejection`] raised by the router, the parameter validator or
    /// the body validator.
    pub fn validate_request(&self, request: &ContractRequest) -> Result<ValidatedRequest, Rejection> {
        let matched = self.router.route(&request.method, &request.path)?;
        let parameters = validate_parameters(&matched.route, &matched.path_params, &request.query)?;
        let body = validate_body(&matched.route, &self.component_validator(), request)?;
        Ok(ValidatedRequest {
            route: matched.route,
            parameters,
            body,
        })
    }

    /// Run the full pipeline for one request and produce the response to send.
    ///
    /// Rejections become `{"error": "<reason>"}` with the rejection's status.
    /// A handler panic becomes a `500`. The request id (taken from
    /// `x-request-id` when it is a valid ULID) is echoed on every response.
    pub fn handle(&self, request: &ContractRequest) -> HandlerResponse {
        let request_id = RequestId::from_header_or_new(request.header(REQUEST_ID_HEADER));
        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %request.method,
            path = %request.path
        );
        let _entered = span.enter();
        let started = Instant::now();

        let mut response = self.respond(request_id, request);
        response.set_header(REQUEST_ID_HEADER, request_id.to_string());

        info!(
            status = response.status,
            duration_us = started.elapsed().as_micros(),
            "Request completed"
        );
        response
    }

    fn respond(&self, request_id: RequestId, request: &ContractRequest) -> HandlerResponse {
        let validated = match self.validate_request(request) {
            Ok(v) => v,
            Err(rejection) => {
                warn!(
                    reason = %rejection,
                    kind = rejection.kind(),
                    status = rejection.status(),
                    "Request rejected"
                );
                return HandlerResponse::rejection(rejection);
            }
        };

        let Some(handler) = self.handlers.get(validated.operation_id()) else {
            debug!(
                operation_id = %validated.operation_id(),
                "No handler registered, answering with pass-through success"
            );
            return HandlerResponse::pass_through();
        };

        let ValidatedRequest {
            route,
            parameters,
            body,
        } = validated;
        let handler_request = HandlerRequest {
            request_id,
            method: request.method.clone(),
            path: request.path.clone(),
            operation_id: route.operation_id.clone(),
            parameters,
            body,
        };
        info!(operation_id = %route.operation_id, "Request accepted");

        let response = match catch_unwind(AssertUnwindSafe(|| handler(&handler_request))) {
            Ok(response) => response,
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!(
                    operation_id = %route.operation_id,
                    panic_message = %message,
                    "Handler panicked"
                );
                return HandlerResponse::error(500, "Handler panicked");
            }
        };

        if !self.config.validate_responses {
            return response;
        }
        match validate_response(&route, &self.component_validator(), &response) {
            Ok(()) => response,
            Err(rejection) => {
                warn!(
                    operation_id = %route.operation_id,
                    handler_status = response.status,
                    reason = %rejection,
                    "Handler response rejected"
                );
                HandlerResponse::rejection(rejection)
            }
        }
    }
}
