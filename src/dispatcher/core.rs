//! Dispatcher core module - handler registry and the request/response types
//! handlers see.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::unnecessary_to_owned)]

use crate::ids::RequestId;
use crate::validator::{Rejection, ValidatedParameters};
use http::Method;
use serde::Serialize;
use serde_json::{json, Value};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Maximum inline response headers before heap allocation
pub const MAX_INLINE_HEADERS: usize = 4;

/// Stack-allocated response header storage
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Validated request handed to a business handler.
///
/// Only reaches a handler after parameters and body have passed the
/// contract; `parameters` and `body` hold the coerced values.
#[derive(Debug, Clone, Serialize)]
pub struct HandlerRequest {
    /// Unique request ID for tracing and correlation
    pub request_id: RequestId,
    #[serde(serialize_with = "serialize_method")]
    pub method: Method,
    /// Request path (no query string)
    pub path: String,
    /// `operationId` of the matched route
    pub operation_id: String,
    /// Casted path and query parameters
    pub parameters: ValidatedParameters,
    /// Validated body, if the route accepts one and it was sent
    pub body: Option<Value>,
}

fn serialize_method<S: serde::Serializer>(method: &Method, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(method.as_str())
}

impl HandlerRequest {
    /// Get a validated parameter by name
    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }
}

/// Response produced by a handler (or by the gate itself on rejection).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandlerResponse {
    /// HTTP status code (200, 404, 500, etc.)
    pub status: u16,
    #[serde(skip_serializing)]
    pub headers: HeaderVec,
    /// JSON payload; `None` for responses without content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl HandlerResponse {
    /// Create a JSON response with a content-type header
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self {
            status,
            headers,
            body: Some(body),
        }
    }

    /// Response without content
    #[must_use]
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            headers: HeaderVec::new(),
            body: None,
        }
    }

    /// Create an error response: `{"error": message}`
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, json!({ "error": message }))
    }

    /// Map a rejection to its status and fixed reason.
    #[must_use]
    pub fn rejection(rejection: Rejection) -> Self {
        Self::error(rejection.status(), &rejection.to_string())
    }

    /// The generic pass-through success used when no handler is registered.
    #[must_use]
    pub fn pass_through() -> Self {
        Self::json(200, json!({ "message": "Success." }))
    }

    /// Get a header by name
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or update a header
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }
}

/// Business handler: validated request in, response out.
pub type HandlerFn = Arc<dyn Fn(&HandlerRequest) -> HandlerResponse + Send + Sync>;

/// Explicit `operationId` to handler mapping.
///
/// Built by the caller and handed to the gate, so every test can assemble an
/// isolated registry.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, HandlerFn>,
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.names())
            .finish()
    }
}

impl HandlerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `operation_id`, replacing any previous one.
    pub fn register<F>(&mut self, operation_id: &str, handler: F)
    where
        F: Fn(&HandlerRequest) -> HandlerResponse + Send + Sync + 'static,
    {
        if self
            .handlers
            .insert(operation_id.to_string(), Arc::new(handler))
            .is_some()
        {
            warn!(
                operation_id = %operation_id,
                total_handlers = self.handlers.len(),
                "Replaced existing handler"
            );
        } else {
            info!(
                operation_id = %operation_id,
                total_handlers = self.handlers.len(),
                "Handler registered successfully"
            );
        }
    }

    /// Builder form of [`HandlerRegistry::register`].
    #[must_use]
    pub fn with<F>(mut self, operation_id: &str, handler: F) -> Self
    where
        F: Fn(&HandlerRequest) -> HandlerResponse + Send + Sync + 'static,
    {
        self.register(operation_id, handler);
        self
    }

    #[must_use]
    pub fn get(&self, operation_id: &str) -> Option<&HandlerFn> {
        self.handlers.get(operation_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered operation ids, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_response_body() {
        let res = HandlerResponse::rejection(Rejection::EnumViolation);
        assert_eq!(res.status, 400);
        assert_eq!(res.body, Some(json!({ "error": "Enumeration error." })));
        assert_eq!(res.get_header("Content-Type"), Some("application/json"));
        assert_eq!(HandlerResponse::rejection(Rejection::MethodNotAllowed).status, 405);
    }

    #[test]
    fn test_set_header_replaces() {
        let mut res = HandlerResponse::empty(204);
        res.set_header("X-Trace", "a".to_string());
        res.set_header("x-trace", "b".to_string());
        assert_eq!(res.headers.len(), 1);
        assert_eq!(res.get_header("X-TRACE"), Some("b"));
    }

    #[test]
    fn test_registry_replace_and_lookup() {
        let mut registry = HandlerRegistry::new()
            .with("getPetById", |_req| HandlerResponse::empty(200))
            .with("addPet", |_req| HandlerResponse::empty(201));
        registry.register("getPetById", |_req| HandlerResponse::empty(204));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), ["addPet", "getPetById"]);

        let req = HandlerRequest {
            request_id: RequestId::new(),
            method: Method::GET,
            path: "/pet/1".to_string(),
            operation_id: "getPetById".to_string(),
            parameters: ValidatedParameters::new(),
            body: None,
        };
        let handler = registry.get("getPetById").unwrap();
        assert_eq!(handler(&req).status, 204);
        assert!(registry.get("missing").is_none());
    }
}
