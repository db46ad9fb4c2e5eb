//! # Validator Module
//!
//! Request and response validation against the contract document.
//!
//! ## Pipeline
//!
//! For a matched route the gate runs, in order:
//!
//! 1. [`validate_parameters`]: casts path captures and query values
//! 2. [`validate_body`]: content-type negotiation, then either the
//!    [`ComponentValidator`] or a flat form-field check
//! 3. (after the handler) [`validate_response`]: the payload against the
//!    declaration for its status code
//!
//! The first failing check stops the pipeline with a [`Rejection`], whose
//! display text is the fixed client-facing reason.
//!
//! ## Coercion
//!
//! All three stages share the table in [`coerce`]: text from paths, queries
//! and forms is cast by the declared primitive type, JSON values are accepted
//! as-is when they already conform. A JSON float never satisfies `integer`.
//!
//! ## References
//!
//! Components are resolved through the [`SchemaRegistry`](crate::spec::SchemaRegistry)
//! at validation time and never expanded, so recursive schemas are fine. Depth
//! is bounded by [`RuntimeConfig::max_schema_depth`](crate::runtime_config::RuntimeConfig).

mod body;
pub mod coerce;
mod component;
mod error;
mod params;
mod response;

pub use body::validate_body;
pub use component::{ComponentValidator, DEFAULT_MAX_SCHEMA_DEPTH};
pub use error::Rejection;
pub use params::{validate_parameters, ValidatedParameters};
pub use response::validate_response;
