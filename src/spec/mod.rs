//! # Contract Module
//!
//! Loads the API contract and exposes read-only views into it.
//!
//! - [`load`] parses a YAML/JSON document into a [`ContractDocument`]
//! - [`build`] flattens `paths` into [`RouteMeta`] entries in declaration order
//! - [`registry`] resolves `$ref` strings into component definitions by lookup
//! - [`types`] holds the borrowed schema views ([`TypeDescriptor`], [`ComponentDefinition`])
//!
//! The document is immutable after load. Components are looked up on demand,
//! never expanded, so recursive component graphs stay finite.

mod build;
mod load;
mod registry;
mod types;

pub use build::{build_routes, HTTP_METHODS};
pub use load::{load_contract, ContractDocument};
pub use registry::{resolve_ref, SchemaRegistry};
pub use types::{
    ComponentDefinition, ParameterLocation, ParameterSpec, PrimitiveType, RouteMeta,
    TypeDescriptor,
};
