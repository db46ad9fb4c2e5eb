use super::load::ContractDocument;
use super::registry::SchemaRegistry;
use super::types::{ParameterLocation, ParameterSpec, RouteMeta};
use anyhow::Context;
use http::Method;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Operation keys of a path item, lowercase as they appear in the contract.
pub const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Flatten `paths` into one [`RouteMeta`] per (template, method), keeping
/// declaration order. Route tie-breaking depends on that order.
pub fn build_routes(document: &ContractDocument) -> anyhow::Result<Vec<RouteMeta>> {
    let Some(paths) = document.paths() else {
        warn!("Contract declares no paths");
        return Ok(Vec::new());
    };
    let registry = document.registry();
    let mut routes = Vec::new();

    for (template, item) in paths {
        let Some(item) = item.as_object() else {
            warn!(template = %template, "Path item is not a mapping - skipped");
            continue;
        };
        let shared = item
            .get("parameters")
            .map(|p| parse_parameters(&registry, template, p))
            .unwrap_or_default();

        for (key, operation) in item {
            let verb = key.to_ascii_lowercase();
            if !HTTP_METHODS.contains(&verb.as_str()) {
                continue;
            }
            let method = Method::from_bytes(verb.to_ascii_uppercase().as_bytes())
                .with_context(|| format!("invalid method {key} on {template}"))?;
            routes.push(build_route(&registry, template, method, operation, &shared));
        }
    }

    debug!(routes_count = routes.len(), "Routes built from contract");
    Ok(routes)
}

fn build_route(
    registry: &SchemaRegistry<'_>,
    template: &str,
    method: Method,
    operation: &Value,
    shared: &[ParameterSpec],
) -> RouteMeta {
    let operation_id = match operation.get("operationId").and_then(Value::as_str) {
        Some(id) => id.to_string(),
        None => {
            let fallback = fallback_operation_id(&method, template);
            warn!(
                method = %method,
                template = %template,
                operation_id = %fallback,
                "Operation has no operationId - using derived name"
            );
            fallback
        }
    };

    let own = operation
        .get("parameters")
        .map(|p| parse_parameters(registry, template, p))
        .unwrap_or_default();
    // Path-item parameters first, unless the operation redeclares them.
    let mut parameters: Vec<ParameterSpec> = shared
        .iter()
        .filter(|s| {
            !own.iter()
                .any(|o| o.name == s.name && o.location == s.location)
        })
        .cloned()
        .collect();
    parameters.extend(own);

    let request_body = operation.get("requestBody").map(|body| deref(registry, body));
    let request_body_required = request_body
        .and_then(|b| b.get("required"))
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let request_body = request_body.map(|body| {
        body.get("content")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    });

    let responses = operation
        .get("responses")
        .and_then(Value::as_object)
        .map(|responses| {
            responses
                .iter()
                .map(|(code, decl)| (code.clone(), deref(registry, decl).clone()))
                .collect::<Map<String, Value>>()
        })
        .unwrap_or_default();

    RouteMeta {
        method,
        path_template: template.to_string(),
        operation_id,
        parameters,
        request_body,
        request_body_required,
        responses,
    }
}

/// Follow a top-level `$ref` (e.g. `#/components/parameters/Limit`) if present.
fn deref<'a>(registry: &SchemaRegistry<'a>, node: &'a Value) -> &'a Value {
    match node.get("$ref").and_then(Value::as_str) {
        Some(reference) => registry.resolve(reference).unwrap_or(node),
        None => node,
    }
}

fn parse_parameters(
    registry: &SchemaRegistry<'_>,
    template: &str,
    list: &Value,
) -> Vec<ParameterSpec> {
    let Some(list) = list.as_array() else {
        warn!(template = %template, "parameters is not a sequence - ignored");
        return Vec::new();
    };
    list.iter()
        .filter_map(|entry| {
            let entry = deref(registry, entry);
            let name = entry.get("name").and_then(Value::as_str)?;
            let location = entry.get("in").and_then(Value::as_str);
            let Some(location) = location.and_then(ParameterLocation::parse) else {
                warn!(
                    template = %template,
                    parameter = %name,
                    location = ?location,
                    "Unsupported parameter location - ignored"
                );
                return None;
            };
            Some(ParameterSpec {
                name: name.to_string(),
                location,
                required: entry
                    .get("required")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                schema: entry
                    .get("schema")
                    .cloned()
                    .unwrap_or_else(|| Value::Object(Map::new())),
            })
        })
        .collect()
}

fn fallback_operation_id(method: &Method, template: &str) -> String {
    let slug: String = template
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let slug = slug.trim_matches('_');
    format!("{}_{}", method.as_str().to_ascii_lowercase(), slug)
}
