//! # Runtime Configuration Module
//!
//! Environment variable-based configuration for the validation engine.
//!
//! ## Environment Variables
//!
//! ### `BRRTG_MAX_SCHEMA_DEPTH`
//!
//! Upper bound on nested component descent while validating a value. Accepts
//! decimal or hexadecimal (`0x20`). Default: `32`.
//!
//! Contracts may reference components recursively (a `Node` whose `next` is a
//! `Node`). References are resolved lazily, so the bound is what stops a
//! pathologically deep payload from exhausting the stack.
//!
//! ### `BRRTG_VALIDATE_RESPONSES`
//!
//! `true`/`false` (also `1`/`0`, `yes`/`no`). When disabled the gate returns
//! handler output without checking it against the declared responses.
//! Default: `true`.
//!
//! ## Usage
//!
//! ```rust
//! use brrtguard::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Max schema depth: {}", config.max_schema_depth);
//! ```
//!
//! Invalid values fall back to the defaults rather than failing startup.

use crate::validator::DEFAULT_MAX_SCHEMA_DEPTH;
use std::env;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Maximum nested component depth (default: 32)
    pub max_schema_depth: usize,
    /// Run response validation on handler output (default: true)
    pub validate_responses: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_schema_depth: DEFAULT_MAX_SCHEMA_DEPTH,
            validate_responses: true,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let max_schema_depth = lookup("BRRTG_MAX_SCHEMA_DEPTH")
            .and_then(|val| parse_usize(&val))
            .unwrap_or(defaults.max_schema_depth);
        let validate_responses = lookup("BRRTG_VALIDATE_RESPONSES")
            .and_then(|val| parse_bool(&val))
            .unwrap_or(defaults.validate_responses);
        RuntimeConfig {
            max_schema_depth,
            validate_responses,
        }
    }
}

fn parse_usize(val: &str) -> Option<usize> {
    let val = val.trim();
    match val.strip_prefix("0x") {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => val.parse().ok(),
    }
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> RuntimeConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RuntimeConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config(&[]), RuntimeConfig::default());
        assert_eq!(RuntimeConfig::default().max_schema_depth, 32);
        assert!(RuntimeConfig::default().validate_responses);
    }

    #[test]
    fn test_overrides() {
        let c = config(&[
            ("BRRTG_MAX_SCHEMA_DEPTH", "0x10"),
            ("BRRTG_VALIDATE_RESPONSES", "false"),
        ]);
        assert_eq!(c.max_schema_depth, 16);
        assert!(!c.validate_responses);
        assert_eq!(config(&[("BRRTG_MAX_SCHEMA_DEPTH", "8")]).max_schema_depth, 8);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let c = config(&[
            ("BRRTG_MAX_SCHEMA_DEPTH", "deep"),
            ("BRRTG_VALIDATE_RESPONSES", "maybe"),
        ]);
        assert_eq!(c, RuntimeConfig::default());
    }
}
