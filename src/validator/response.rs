use super::component::ComponentValidator;
use super::error::Rejection;
use crate::dispatcher::HandlerResponse;
use crate::spec::{RouteMeta, TypeDescriptor};
use serde_json::Value;
use tracing::{debug, warn};

/// Validate a handler's output against the responses the route declares.
///
/// The declaration is looked up by exact status, then status range (`2XX`),
/// then `default`. Declarations without an `application/json` content entry
/// impose nothing on the payload.
///
/// # Errors
///
/// Every failure is reported as [`Rejection::InvalidResponse`]: an undeclared
/// status, a missing payload, an unresolvable schema or a structural mismatch.
pub fn validate_response(
    route: &RouteMeta,
    validator: &ComponentValidator<'_>,
    response: &HandlerResponse,
) -> Result<(), Rejection> {
    let Some(declaration) = route.response_for(response.status) else {
        warn!(
            operation_id = %route.operation_id,
            status = response.status,
            "Handler returned an undeclared status"
        );
        return Err(Rejection::InvalidResponse);
    };

    let Some(schema) = declaration
        .get("content")
        .and_then(Value::as_object)
        .and_then(|content| content.get("application/json"))
        .and_then(|media| media.get("schema"))
        .map(TypeDescriptor::new)
    else {
        return Ok(());
    };

    let Some(body) = response.body.as_ref() else {
        warn!(operation_id = %route.operation_id, status = response.status, "Declared response payload missing");
        return Err(Rejection::InvalidResponse);
    };

    validator
        .validate_descriptor(schema, body)
        .map(|_| ())
        .map_err(|cause| {
            debug!(
                operation_id = %route.operation_id,
                status = response.status,
                cause = cause.kind(),
                "Response payload breaks the contract"
            );
            Rejection::InvalidResponse
        })
}
