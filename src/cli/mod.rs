//! # CLI Module
//!
//! Command-line tooling over a contract document.
//!
//! ## Commands
//!
//! ### `lint`
//!
//! Report contract defects (dangling references, missing or duplicate
//! `operationId`, unknown types, unsupported parameter locations):
//!
//! ```bash
//! brrtguard lint --spec doc/petstore.yaml --fail-on-error
//! ```
//!
//! ### `routes`
//!
//! List every operation in declaration order:
//!
//! ```bash
//! brrtguard routes --spec doc/petstore.yaml
//! # PUT /pet -> updatePet
//! # POST /pet -> addPet
//! ```
//!
//! ### `check`
//!
//! Run one request through route matching, parameter and body validation and
//! print the outcome as JSON. Exits with `1` when the request is rejected:
//!
//! ```bash
//! brrtguard check --spec doc/petstore.yaml --method POST --path /store/order \
//!     --body '{"id": "string", "petId": 0}'
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{execute, run_cli, Cli, Commands};
