use super::coerce::{coerce_value, enum_allows};
use super::error::Rejection;
use crate::spec::{ComponentDefinition, PrimitiveType, SchemaRegistry, TypeDescriptor};
use serde_json::Value;
use tracing::{debug, error, warn};

/// Default recursion bound for nested components.
pub const DEFAULT_MAX_SCHEMA_DEPTH: usize = 32;

/// Recursive structural validator shared by request bodies, nested objects
/// and response payloads.
///
/// Returns the coerced value on success. Properties the component does not
/// declare pass through untouched. A failure inside a referenced component is
/// reported as [`Rejection::ValidationError`] to the parent, without detail.
#[derive(Debug, Clone, Copy)]
pub struct ComponentValidator<'a> {
    registry: SchemaRegistry<'a>,
    max_depth: usize,
}

impl<'a> ComponentValidator<'a> {
    #[must_use]
    pub fn new(registry: SchemaRegistry<'a>, max_depth: usize) -> Self {
        Self {
            registry,
            max_depth,
        }
    }

    #[must_use]
    pub fn registry(&self) -> SchemaRegistry<'a> {
        self.registry
    }

    /// Validate `value` against an already resolved component.
    pub fn validate(
        &self,
        component: ComponentDefinition<'a>,
        value: &Value,
    ) -> Result<Value, Rejection> {
        self.validate_at(component, value, 0)
    }

    /// Resolve `reference` and validate `value` against it.
    ///
    /// # Errors
    ///
    /// [`Rejection::SchemaNotFound`] if the reference does not resolve, otherwise
    /// whatever the top-level check of the component reports.
    pub fn validate_ref(&self, reference: &str, value: &Value) -> Result<Value, Rejection> {
        let Some(component) = self.registry.component(reference) else {
            error!(reference = %reference, "Schema reference does not resolve");
            return Err(Rejection::SchemaNotFound);
        };
        self.validate(component, value)
    }

    /// Validate `value` against any type descriptor: a reference, a primitive,
    /// an array or an inline object. Used for response payloads, which are not
    /// always a single component.
    pub fn validate_descriptor(
        &self,
        descriptor: TypeDescriptor<'a>,
        value: &Value,
    ) -> Result<Value, Rejection> {
        self.validate_field(descriptor, value, 0)
    }

    fn validate_at(
        &self,
        component: ComponentDefinition<'a>,
        value: &Value,
        depth: usize,
    ) -> Result<Value, Rejection> {
        if depth > self.max_depth {
            warn!(
                max_depth = self.max_depth,
                "Schema nesting exceeds configured depth"
            );
            return Err(Rejection::ValidationError);
        }
        let Some(object) = value.as_object() else {
            debug!(depth = depth, "Component value is not an object");
            return Err(Rejection::ValidationError);
        };

        let mut validated = object.clone();
        for (name, descriptor) in component.properties() {
            let field = match object.get(name) {
                None | Some(Value::Null) => {
                    if component.is_required(name) {
                        debug!(field = %name, "Required field missing");
                        return Err(Rejection::MissingField);
                    }
                    continue;
                }
                Some(field) => field,
            };
            let coerced = self.validate_field(descriptor, field, depth).map_err(|r| {
                debug!(field = %name, reason = r.kind(), "Field rejected");
                r
            })?;
            validated.insert(name.to_string(), coerced);
        }
        Ok(Value::Object(validated))
    }

    fn validate_field(
        &self,
        descriptor: TypeDescriptor<'a>,
        field: &Value,
        depth: usize,
    ) -> Result<Value, Rejection> {
        if let Some(reference) = descriptor.reference() {
            return self.validate_nested(reference, field, depth);
        }
        let Some(ty) = descriptor.primitive() else {
            if let Some(declared) = descriptor.type_name() {
                debug!(declared = %declared, "Field declares an unsupported type");
                return Err(Rejection::InvalidFieldType);
            }
            return Ok(field.clone());
        };
        let coerced = coerce_value(ty, field).ok_or(Rejection::InvalidFieldType)?;

        match ty {
            PrimitiveType::Array => self.validate_items(descriptor, coerced, depth),
            PrimitiveType::Object => match ComponentDefinition::new(descriptor.raw()) {
                Some(inline) if descriptor.properties().is_some() => self
                    .validate_at(inline, &coerced, depth + 1)
                    .map_err(|_| Rejection::ValidationError),
                _ => Ok(coerced),
            },
            _ if enum_allows(descriptor.enumeration(), &coerced) => Ok(coerced),
            _ => Err(Rejection::EnumViolation),
        }
    }

    fn validate_nested(&self, reference: &str, field: &Value, depth: usize) -> Result<Value, Rejection> {
        let Some(component) = self.registry.component(reference) else {
            error!(reference = %reference, "Nested schema reference does not resolve");
            return Err(Rejection::ValidationError);
        };
        self.validate_at(component, field, depth + 1).map_err(|inner| {
            debug!(reference = %reference, cause = inner.kind(), "Nested component rejected");
            Rejection::ValidationError
        })
    }

    fn validate_items(
        &self,
        descriptor: TypeDescriptor<'a>,
        coerced: Value,
        depth: usize,
    ) -> Result<Value, Rejection> {
        let Value::Array(elements) = coerced else {
            return Err(Rejection::InvalidFieldType);
        };
        let Some(items) = descriptor.items() else {
            return Ok(Value::Array(elements));
        };
        elements
            .iter()
            .map(|element| self.validate_field(items, element, depth + 1))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }
}
