//! # Dispatcher Module
//!
//! Types shared between the gate and business handlers.
//!
//! ## Handler Registration
//!
//! Handlers are plain closures keyed by the `operationId` they serve:
//!
//! ```rust
//! use brrtguard::dispatcher::{HandlerRegistry, HandlerResponse};
//! use serde_json::json;
//!
//! let handlers = HandlerRegistry::new().with("getPetById", |req| {
//!     HandlerResponse::json(200, json!({
//!         "id": req.param("petId").cloned(),
//!         "name": "doggie",
//!         "photoUrls": []
//!     }))
//! });
//! assert_eq!(handlers.len(), 1);
//! ```
//!
//! ## Request Flow
//!
//! 1. Router matches the request to a route
//! 2. Parameters and body are validated against the contract
//! 3. The handler registered for the route's `operationId` runs on the
//!    validated [`HandlerRequest`]
//! 4. Its [`HandlerResponse`] is checked against the declared responses
//!
//! An operation without a registered handler answers `200 {"message": "Success."}`
//! once the request validates. A handler panic becomes a `500` response.

mod core;

pub use core::{
    HandlerFn, HandlerRegistry, HandlerRequest, HandlerResponse, HeaderVec, MAX_INLINE_HEADERS,
};
