//! Router core module - hot path for request routing.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use super::matcher::{ParamVec, PathMatcher};
use crate::spec::{build_routes, ContractDocument, RouteMeta};
use crate::validator::Rejection;
use anyhow::Context;
use http::Method;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Result of successfully matching a request to a declared operation.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched operation (Arc to avoid cloning contract data per request)
    pub route: Arc<RouteMeta>,
    /// Captured path segments in placeholder declaration order
    pub path_params: ParamVec,
}

impl RouteMatch {
    #[must_use]
    pub fn operation_id(&self) -> &str {
        &self.route.operation_id
    }
}

/// A compiled template and every operation declared on it.
#[derive(Debug, Clone)]
struct RouteEntry {
    matcher: PathMatcher,
    operations: Vec<Arc<RouteMeta>>,
}

/// Matches request paths against the contract's templates.
///
/// Templates are kept in declaration order. When several templates match a
/// path, the one with the most literal segments wins and declaration order
/// breaks ties, so `/pet/findByStatus` is preferred over `/pet/{petId}`.
#[derive(Debug, Clone)]
pub struct Router {
    entries: Vec<RouteEntry>,
}

impl Router {
    /// Compile every template of `routes`, grouping methods per template.
    pub fn new(routes: Vec<RouteMeta>) -> anyhow::Result<Self> {
        let mut entries: Vec<RouteEntry> = Vec::new();
        for route in routes {
            let route = Arc::new(route);
            match entries
                .iter_mut()
                .find(|e| e.matcher.template() == route.path_template)
            {
                Some(entry) => entry.operations.push(route),
                None => {
                    let matcher = PathMatcher::compile(&route.path_template).with_context(
                        || format!("failed to compile path template {}", route.path_template),
                    )?;
                    entries.push(RouteEntry {
                        matcher,
                        operations: vec![route],
                    });
                }
            }
        }

        let operations: usize = entries.iter().map(|e| e.operations.len()).sum();
        info!(
            templates = entries.len(),
            operations = operations,
            "Routing table loaded"
        );
        Ok(Self { entries })
    }

    pub fn from_document(document: &ContractDocument) -> anyhow::Result<Self> {
        Self::new(build_routes(document)?)
    }

    /// Every operation in declaration order.
    pub fn routes(&self) -> impl Iterator<Item = &Arc<RouteMeta>> {
        self.entries.iter().flat_map(|e| e.operations.iter())
    }

    /// Resolve `method` + `path` to an operation.
    ///
    /// # Errors
    ///
    /// * [`Rejection::RouteNotFound`] - no template matches the path
    /// * [`Rejection::MethodNotAllowed`] - the template exists but not for this method
    pub fn route(&self, method: &Method, path: &str) -> Result<RouteMatch, Rejection> {
        let started = Instant::now();
        let path = path.split('?').next().unwrap_or(path);

        let best = self
            .entries
            .iter()
            .filter(|e| e.matcher.is_match(path))
            .fold(None::<&RouteEntry>, |best, candidate| match best {
                Some(b) if b.matcher.specificity() >= candidate.matcher.specificity() => Some(b),
                _ => Some(candidate),
            });

        let Some(entry) = best else {
            warn!(method = %method, path = %path, "No route matched");
            return Err(Rejection::RouteNotFound);
        };

        let Some(route) = entry.operations.iter().find(|r| r.method == *method) else {
            warn!(
                method = %method,
                path = %path,
                template = %entry.matcher.template(),
                "Method not allowed for template"
            );
            return Err(Rejection::MethodNotAllowed);
        };

        let path_params = entry.matcher.captures(path).unwrap_or_default();
        let elapsed = started.elapsed();
        if elapsed > Duration::from_millis(1) {
            warn!(
                method = %method,
                path = %path,
                template = %entry.matcher.template(),
                duration_us = elapsed.as_micros(),
                "Slow route matching detected"
            );
        } else {
            debug!(
                method = %method,
                path = %path,
                template = %entry.matcher.template(),
                operation_id = %route.operation_id,
                path_params = ?path_params,
                "Route matched"
            );
        }

        Ok(RouteMatch {
            route: Arc::clone(route),
            path_params,
        })
    }
}
