use http::Method;
use serde_json::{Map, Value};
use std::fmt;

/// Where a declared parameter is carried on the request.
///
/// Only `Path` and `Query` take part in validation; `Header` and `Cookie`
/// are kept so the route metadata mirrors the contract faithfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    /// Parse the `in` attribute of a parameter object.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "path" => Some(ParameterLocation::Path),
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            "cookie" => Some(ParameterLocation::Cookie),
            _ => None,
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterLocation::Path => write!(f, "path"),
            ParameterLocation::Query => write!(f, "query"),
            ParameterLocation::Header => write!(f, "header"),
            ParameterLocation::Cookie => write!(f, "cookie"),
        }
    }
}

/// Primitive type tags understood by the coercion table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    Integer,
    String,
    Boolean,
    Number,
    Array,
    Object,
}

impl PrimitiveType {
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "integer" => Some(PrimitiveType::Integer),
            "string" => Some(PrimitiveType::String),
            "boolean" => Some(PrimitiveType::Boolean),
            "number" => Some(PrimitiveType::Number),
            "array" => Some(PrimitiveType::Array),
            "object" => Some(PrimitiveType::Object),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveType::Integer => "integer",
            PrimitiveType::String => "string",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Number => "number",
            PrimitiveType::Array => "array",
            PrimitiveType::Object => "object",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Borrowed view over a schema node of the contract document.
///
/// A descriptor is either a reference (`$ref`) to a component or a primitive
/// type tag, optionally carrying `items` (arrays), `enum` and, for inline
/// objects, `properties`. Nothing is copied out of the document.
#[derive(Debug, Clone, Copy)]
pub struct TypeDescriptor<'a> {
    node: &'a Value,
}

impl<'a> TypeDescriptor<'a> {
    #[must_use]
    pub fn new(node: &'a Value) -> Self {
        Self { node }
    }

    #[must_use]
    pub fn raw(&self) -> &'a Value {
        self.node
    }

    /// The `$ref` string if this descriptor points at a component.
    #[must_use]
    pub fn reference(&self) -> Option<&'a str> {
        self.node.get("$ref").and_then(Value::as_str)
    }

    #[must_use]
    pub fn type_name(&self) -> Option<&'a str> {
        self.node.get("type").and_then(Value::as_str)
    }

    /// Recognised primitive type, `None` for untyped or unknown descriptors.
    #[must_use]
    pub fn primitive(&self) -> Option<PrimitiveType> {
        self.type_name().and_then(PrimitiveType::parse)
    }

    #[must_use]
    pub fn items(&self) -> Option<TypeDescriptor<'a>> {
        self.node.get("items").map(TypeDescriptor::new)
    }

    #[must_use]
    pub fn enumeration(&self) -> Option<&'a [Value]> {
        self.node
            .get("enum")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }

    #[must_use]
    pub fn properties(&self) -> Option<&'a Map<String, Value>> {
        self.node.get("properties").and_then(Value::as_object)
    }

    /// Names listed in a schema-level `required` array.
    #[must_use]
    pub fn required_fields(&self) -> Vec<&'a str> {
        self.node
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Field-level `required: true` flag, as used by inline form fields.
    #[must_use]
    pub fn required_flag(&self) -> bool {
        self.node
            .get("required")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// A named, reusable object schema (or an inline object schema).
#[derive(Debug, Clone, Copy)]
pub struct ComponentDefinition<'a> {
    node: &'a Value,
}

impl<'a> ComponentDefinition<'a> {
    /// Wrap a resolved node; only objects can be component definitions.
    #[must_use]
    pub fn new(node: &'a Value) -> Option<Self> {
        node.is_object().then_some(Self { node })
    }

    #[must_use]
    pub fn descriptor(&self) -> TypeDescriptor<'a> {
        TypeDescriptor::new(self.node)
    }

    /// Declared properties in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = (&'a str, TypeDescriptor<'a>)> {
        self.descriptor()
            .properties()
            .into_iter()
            .flat_map(|props| props.iter())
            .map(|(name, node)| (name.as_str(), TypeDescriptor::new(node)))
    }

    #[must_use]
    pub fn is_required(&self, field: &str) -> bool {
        self.node
            .get("required")
            .and_then(Value::as_array)
            .is_some_and(|names| names.iter().any(|n| n.as_str() == Some(field)))
    }
}

/// One declared parameter of an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    /// Type descriptor node; `{}` when the contract omits `schema`.
    pub schema: Value,
}

impl ParameterSpec {
    #[must_use]
    pub fn descriptor(&self) -> TypeDescriptor<'_> {
        TypeDescriptor::new(&self.schema)
    }
}

/// One method on one path template, extracted from the contract at startup.
#[derive(Debug, Clone)]
pub struct RouteMeta {
    pub method: Method,
    pub path_template: String,
    pub operation_id: String,
    pub parameters: Vec<ParameterSpec>,
    /// `requestBody.content` (content type -> media object), if a body is declared.
    pub request_body: Option<Map<String, Value>>,
    pub request_body_required: bool,
    /// `responses` keyed by status code string (`"200"`, `"2XX"`, `"default"`).
    pub responses: Map<String, Value>,
}

impl RouteMeta {
    #[must_use]
    pub fn declares_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }

    /// Response declaration for `status`: exact code, then range (`2XX`), then `default`.
    #[must_use]
    pub fn response_for(&self, status: u16) -> Option<&Value> {
        let exact = status.to_string();
        let range = format!("{}XX", status / 100);
        self.responses
            .get(&exact)
            .or_else(|| {
                self.responses
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(&range))
                    .map(|(_, v)| v)
            })
            .or_else(|| self.responses.get("default"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_views() {
        let node = json!({
            "type": "array",
            "items": { "type": "string", "enum": ["a", "b"] }
        });
        let d = TypeDescriptor::new(&node);
        assert_eq!(d.primitive(), Some(PrimitiveType::Array));
        let items = d.items().unwrap();
        assert_eq!(items.primitive(), Some(PrimitiveType::String));
        assert_eq!(items.enumeration().unwrap().len(), 2);
        assert!(d.reference().is_none());
    }

    #[test]
    fn test_unknown_type_is_not_primitive() {
        let node = json!({ "type": "file" });
        assert_eq!(TypeDescriptor::new(&node).type_name(), Some("file"));
        assert!(TypeDescriptor::new(&node).primitive().is_none());
    }

    #[test]
    fn test_component_required() {
        let node = json!({
            "required": ["name"],
            "properties": { "id": { "type": "integer" }, "name": { "type": "string" } }
        });
        let c = ComponentDefinition::new(&node).unwrap();
        assert!(c.is_required("name"));
        assert!(!c.is_required("id"));
        let names: Vec<&str> = c.properties().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["id", "name"]);
        assert!(ComponentDefinition::new(&json!("nope")).is_none());
    }

    #[test]
    fn test_response_lookup_order() {
        let responses = json!({
            "200": { "description": "ok" },
            "4XX": { "description": "client" },
            "default": { "description": "fallback" }
        });
        let route = RouteMeta {
            method: Method::GET,
            path_template: "/x".into(),
            operation_id: "x".into(),
            parameters: vec![],
            request_body: None,
            request_body_required: false,
            responses: responses.as_object().unwrap().clone(),
        };
        assert_eq!(route.response_for(200).unwrap()["description"], "ok");
        assert_eq!(route.response_for(404).unwrap()["description"], "client");
        assert_eq!(route.response_for(500).unwrap()["description"], "fallback");
    }
}
