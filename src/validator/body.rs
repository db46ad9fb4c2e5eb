use super::coerce::{coerce_text, enum_allows};
use super::component::ComponentValidator;
use super::error::Rejection;
use crate::server::{ContractRequest, MultiMap};
use crate::spec::{ComponentDefinition, PrimitiveType, RouteMeta, TypeDescriptor};
use serde_json::{Map, Value};
use tracing::{debug, error};

const JSON: &str = "application/json";

/// Validate the request payload of a matched route.
///
/// Returns `Ok(None)` when the route accepts no payload (or an optional one was
/// omitted) and `Ok(Some(body))` with the coerced body otherwise.
///
/// JSON payloads are checked against the `application/json` schema. Any other
/// payload is read from the decoded form fields, either against the referenced
/// component of the first declared content type or field by field when the
/// schema is inline.
pub fn validate_body(
    route: &RouteMeta,
    validator: &ComponentValidator<'_>,
    request: &ContractRequest,
) -> Result<Option<Value>, Rejection> {
    let Some(content) = route.request_body.as_ref() else {
        if request.has_payload() {
            debug!(operation_id = %route.operation_id, "Payload sent to a route without a body");
            return Err(Rejection::UnexpectedBody);
        }
        return Ok(None);
    };

    if !request.has_payload() && !route.request_body_required {
        return Ok(None);
    }

    let declares_json = content.contains_key(JSON);
    if declares_json != request.is_json() {
        debug!(
            operation_id = %route.operation_id,
            declares_json = declares_json,
            content_type = ?request.content_type,
            "Payload content type does not match the contract"
        );
        return Err(Rejection::ContentTypeMismatch);
    }

    if declares_json {
        validate_json(route, validator, content, request).map(Some)
    } else {
        validate_form(route, validator, content, &request.form).map(Some)
    }
}

fn schema_of<'a>(media: Option<&'a Value>) -> Option<TypeDescriptor<'a>> {
    media.and_then(|m| m.get("schema")).map(TypeDescriptor::new)
}

fn validate_json(
    route: &RouteMeta,
    validator: &ComponentValidator<'_>,
    content: &Map<String, Value>,
    request: &ContractRequest,
) -> Result<Value, Rejection> {
    let payload: Value = serde_json::from_slice(&request.body).map_err(|e| {
        debug!(operation_id = %route.operation_id, error = %e, "JSON payload does not decode");
        Rejection::MalformedBody
    })?;

    let Some(schema) = schema_of(content.get(JSON)) else {
        error!(operation_id = %route.operation_id, "JSON body declared without a schema");
        return Err(Rejection::SchemaNotFound);
    };
    validate_against(route, validator, schema, &payload)
}

/// Referenced schema goes through the registry; an inline object schema with
/// `properties` is validated in place.
fn validate_against(
    route: &RouteMeta,
    validator: &ComponentValidator<'_>,
    schema: TypeDescriptor<'_>,
    payload: &Value,
) -> Result<Value, Rejection> {
    if let Some(reference) = schema.reference() {
        return validator.validate_ref(reference, payload);
    }
    match ComponentDefinition::new(schema.raw()) {
        Some(inline) if schema.properties().is_some() => validator.validate(inline, payload),
        _ => {
            error!(operation_id = %route.operation_id, "Body schema is neither a reference nor an object");
            Err(Rejection::SchemaNotFound)
        }
    }
}

fn validate_form(
    route: &RouteMeta,
    validator: &ComponentValidator<'_>,
    content: &Map<String, Value>,
    form: &MultiMap,
) -> Result<Value, Rejection> {
    let Some(schema) = schema_of(content.values().next()) else {
        error!(operation_id = %route.operation_id, "Form body declared without a schema");
        return Err(Rejection::SchemaNotFound);
    };

    if let Some(reference) = schema.reference() {
        return validator.validate_ref(reference, &Value::Object(form.to_json_object()));
    }
    validate_inline_fields(schema, form)
}

/// Flat per-field check of an inline form schema. References in this branch
/// are not resolved; their values pass through as text.
fn validate_inline_fields(schema: TypeDescriptor<'_>, form: &MultiMap) -> Result<Value, Rejection> {
    let mut validated = form.to_json_object();
    let required = schema.required_fields();

    for (name, node) in schema.properties().into_iter().flatten() {
        let field = TypeDescriptor::new(node);
        let Some(raw) = form.get_first(name) else {
            if field.required_flag() || required.contains(&name.as_str()) {
                debug!(field = %name, "Required form field missing");
                return Err(Rejection::MissingField);
            }
            continue;
        };
        if field.reference().is_some() {
            continue;
        }

        let value = match field.primitive() {
            Some(PrimitiveType::Array) => {
                let items = field.items();
                let elements = form
                    .get_all(name)
                    .map(|raw| coerce_form_value(items, raw))
                    .collect::<Result<Vec<_>, _>>()?;
                Value::Array(elements)
            }
            _ => coerce_form_value(Some(field), raw)?,
        };
        validated.insert(name.clone(), value);
    }
    Ok(Value::Object(validated))
}

fn coerce_form_value(descriptor: Option<TypeDescriptor<'_>>, raw: &str) -> Result<Value, Rejection> {
    let Some(descriptor) = descriptor else {
        return Ok(Value::String(raw.to_string()));
    };
    let value = match (descriptor.primitive(), descriptor.type_name()) {
        (Some(ty), _) => coerce_text(ty, raw).ok_or(Rejection::InvalidFieldType)?,
        (None, Some(_)) => return Err(Rejection::InvalidFieldType),
        (None, None) => Value::String(raw.to_string()),
    };
    if enum_allows(descriptor.enumeration(), &value) {
        Ok(value)
    } else {
        Err(Rejection::EnumViolation)
    }
}
