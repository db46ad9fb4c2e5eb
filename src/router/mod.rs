//! # Router Module
//!
//! Path matching and route resolution against the contract's `paths`.
//!
//! ## Architecture
//!
//! 1. **Compilation**: at startup every template (e.g. `/pet/{petId}`) is turned
//!    into an anchored regex with one capture per placeholder. A trailing
//!    `?query=example` suffix on a template is ignored.
//! 2. **Matching**: a request path is tested against every template; the most
//!    specific match wins (most literal segments), declaration order breaks ties.
//!    The method is then looked up on that template, yielding either a
//!    [`RouteMatch`], a method-not-allowed or a route-not-found rejection.
//!
//! ## Example
//!
//! ```rust,ignore
//! use brrtguard::router::Router;
//! use brrtguard::spec::load_contract;
//! use http::Method;
//!
//! let document = load_contract("doc/petstore.yaml")?;
//! let router = Router::from_document(&document)?;
//! let m = router.route(&Method::GET, "/pet/42")?;
//! assert_eq!(m.operation_id(), "getPetById");
//! assert_eq!(m.path_params.as_slice(), ["42"]);
//! ```

mod core;
mod matcher;

pub use core::{RouteMatch, Router};
pub use matcher::{ParamVec, PathMatcher, MAX_INLINE_PARAMS};
