use super::coerce::{coerce_text, enum_allows};
use super::error::Rejection;
use crate::server::MultiMap;
use crate::spec::{ParameterLocation, ParameterSpec, PrimitiveType, RouteMeta, TypeDescriptor};
use serde_json::{Map, Value};
use tracing::debug;

/// Parameter name to casted value, path captures and query values merged.
pub type ValidatedParameters = Map<String, Value>;

/// Validate and cast the path captures and query values of a matched route.
///
/// Declared parameters are processed in declaration order. Path parameters
/// consume `captures` in order; query parameters are looked up by name.
/// Path values are merged first, so a query value with the same name wins.
///
/// # Errors
///
/// - [`Rejection::UnexpectedParameters`] when the route declares nothing but a query was sent
/// - [`Rejection::MissingParameter`] for an absent required parameter
/// - [`Rejection::InvalidParameterType`] when a value does not coerce
/// - [`Rejection::EnumViolation`] when a value is outside the declared enum
pub fn validate_parameters(
    route: &RouteMeta,
    captures: &[String],
    query: &MultiMap,
) -> Result<ValidatedParameters, Rejection> {
    if !route.declares_parameters() {
        if query.is_empty() {
            return Ok(ValidatedParameters::new());
        }
        debug!(
            operation_id = %route.operation_id,
            query_count = query.len(),
            "Query supplied to a route without parameters"
        );
        return Err(Rejection::UnexpectedParameters);
    }

    let mut from_path = ValidatedParameters::new();
    let mut from_query = ValidatedParameters::new();
    let mut remaining = captures.iter();

    for param in &route.parameters {
        match param.location {
            ParameterLocation::Path => match remaining.next() {
                Some(raw) => {
                    let value = cast_scalar(param, param.descriptor(), raw)?;
                    from_path.insert(param.name.clone(), value);
                }
                None if param.required => return Err(missing(param)),
                None => {}
            },
            ParameterLocation::Query => {
                if let Some(value) = cast_query(param, query)? {
                    from_query.insert(param.name.clone(), value);
                } else if param.required {
                    return Err(missing(param));
                }
            }
            ParameterLocation::Header | ParameterLocation::Cookie => {}
        }
    }

    from_path.extend(from_query);
    Ok(from_path)
}

fn missing(param: &ParameterSpec) -> Rejection {
    debug!(name = %param.name, location = %param.location, "Required parameter missing");
    Rejection::MissingParameter
}

fn cast_query(param: &ParameterSpec, query: &MultiMap) -> Result<Option<Value>, Rejection> {
    let descriptor = param.descriptor();
    if descriptor.primitive() != Some(PrimitiveType::Array) {
        return query
            .get_first(&param.name)
            .map(|raw| cast_scalar(param, descriptor, raw))
            .transpose();
    }

    if !query.contains(&param.name) {
        return Ok(None);
    }
    let items = descriptor.items();
    query
        .get_all(&param.name)
        .map(|raw| match items {
            Some(items) => cast_scalar(param, items, raw),
            None => Ok(Value::String(raw.to_string())),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(|elements| Some(Value::Array(elements)))
}

/// Coerce one raw text value by `descriptor`, then check its enum.
fn cast_scalar(
    param: &ParameterSpec,
    descriptor: TypeDescriptor<'_>,
    raw: &str,
) -> Result<Value, Rejection> {
    let value = match descriptor.primitive() {
        Some(ty) => coerce_text(ty, raw).ok_or_else(|| {
            debug!(name = %param.name, expected = %ty, value = %raw, "Parameter type mismatch");
            Rejection::InvalidParameterType
        })?,
        None => match descriptor.type_name() {
            Some(declared) => {
                debug!(name = %param.name, declared = %declared, "Parameter declares an unsupported type");
                return Err(Rejection::InvalidParameterType);
            }
            None => Value::String(raw.to_string()),
        },
    };
    if !enum_allows(descriptor.enumeration(), &value) {
        debug!(name = %param.name, value = %raw, "Parameter outside enumeration");
        return Err(Rejection::EnumViolation);
    }
    Ok(value)
}
