use http::Method;
use serde_json::{Map, Value};
use smallvec::SmallVec;
use tracing::debug;

/// Maximum inline query/form pairs before heap allocation
pub const MAX_INLINE_PAIRS: usize = 8;

/// Ordered multi-map of decoded `name=value` pairs.
///
/// Keeps every occurrence of a repeated key in arrival order, which is what
/// array-valued query parameters and repeated form fields need.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiMap {
    pairs: SmallVec<[(String, String); MAX_INLINE_PAIRS]>,
}

impl MultiMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// First occurrence of `name`.
    #[must_use]
    pub fn get_first(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every occurrence of `name`, in arrival order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Fold into a JSON object: a key seen once maps to a string, a repeated
    /// key maps to an array of strings. Key order follows first appearance.
    #[must_use]
    pub fn to_json_object(&self) -> Map<String, Value> {
        let mut object = Map::new();
        for (name, value) in self.iter() {
            let value = Value::String(value.to_string());
            match object.get_mut(name) {
                None => {
                    object.insert(name.to_string(), value);
                }
                Some(Value::Array(values)) => values.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
            }
        }
        object
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MultiMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = MultiMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Parse the query string of a request target
///
/// Everything after the first `?` is URL-decoded into ordered pairs. A target
/// without `?` yields an empty map.
#[must_use]
pub fn parse_query_params(target: &str) -> MultiMap {
    match target.split_once('?') {
        Some((_, query)) => decode_pairs(query.as_bytes()),
        None => MultiMap::new(),
    }
}

fn decode_pairs(bytes: &[u8]) -> MultiMap {
    url::form_urlencoded::parse(bytes)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// `true` for `application/json` and structured `application/*+json` types.
/// Media type parameters such as `charset` are ignored.
#[must_use]
pub fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

fn is_form_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|essence| {
            essence
                .trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
}

/// Transport-neutral description of one inbound request.
///
/// Whatever accepts connections builds one of these and hands it to the
/// gate; nothing here depends on a particular HTTP server.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractRequest {
    pub method: Method,
    /// Request path without the query string
    pub path: String,
    pub query: MultiMap,
    /// Lower-cased header names
    pub headers: MultiMap,
    /// Raw payload bytes
    pub body: Vec<u8>,
    pub content_type: Option<String>,
    /// Decoded form fields for `application/x-www-form-urlencoded` payloads
    pub form: MultiMap,
}

impl ContractRequest {
    /// A request with no query, headers or payload.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: MultiMap::new(),
            headers: MultiMap::new(),
            body: Vec::new(),
            content_type: None,
            form: MultiMap::new(),
        }
    }

    /// Build a request from its raw parts
    ///
    /// `target` may carry a query string, which is split off and decoded.
    /// Form-encoded bodies are decoded into [`ContractRequest::form`].
    #[must_use]
    pub fn from_parts(
        method: Method,
        target: &str,
        content_type: Option<&str>,
        body: Vec<u8>,
    ) -> Self {
        let path = target.split('?').next().unwrap_or("/").to_string();
        let query = parse_query_params(target);
        let form = match content_type {
            Some(ct) if is_form_content_type(ct) => decode_pairs(&body),
            _ => MultiMap::new(),
        };
        debug!(
            method = %method,
            path = %path,
            query_count = query.len(),
            form_count = form.len(),
            body_size_bytes = body.len(),
            "Request parts decoded"
        );
        Self {
            method,
            path,
            query,
            headers: MultiMap::new(),
            body,
            content_type: content_type.map(str::to_string),
            form,
        }
    }

    #[must_use]
    pub fn with_query(mut self, name: &str, value: &str) -> Self {
        self.query.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value);
        self
    }

    /// Replace the payload with `body` serialized as JSON.
    #[must_use]
    pub fn with_json_body(mut self, body: &Value) -> Self {
        self.body = body.to_string().into_bytes();
        self.content_type = Some("application/json".to_string());
        self.form = MultiMap::new();
        self
    }

    /// Append a form field; the payload bytes are re-encoded to match.
    #[must_use]
    pub fn with_form_field(mut self, name: &str, value: &str) -> Self {
        self.form.insert(name, value);
        self.body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.form.iter())
            .finish()
            .into_bytes();
        self.content_type = Some("application/x-www-form-urlencoded".to_string());
        self
    }

    /// Header value by (case-insensitive) name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get_first(&name.to_ascii_lowercase())
    }

    /// Whether the payload is classified as JSON by its content type.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.content_type.as_deref().is_some_and(is_json_content_type)
    }

    /// Whether the request carries any payload bytes.
    #[must_use]
    pub fn has_payload(&self) -> bool {
        !self.body.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_query_params() {
        let q = parse_query_params("/p?x=1&y=2&x=3");
        assert_eq!(q.get_first("x"), Some("1"));
        assert_eq!(q.get_all("x").collect::<Vec<_>>(), ["1", "3"]);
        assert_eq!(q.get_first("y"), Some("2"));
        assert!(parse_query_params("/p").is_empty());
    }

    #[test]
    fn test_query_values_are_url_decoded() {
        let q = parse_query_params("/p?name=hello%20world&tag=a+b");
        assert_eq!(q.get_first("name"), Some("hello world"));
        assert_eq!(q.get_first("tag"), Some("a b"));
    }

    #[test]
    fn test_json_content_types() {
        assert!(is_json_content_type("application/json"));
        assert!(is_json_content_type("application/json; charset=utf-8"));
        assert!(is_json_content_type("application/problem+json"));
        assert!(!is_json_content_type("application/x-www-form-urlencoded"));
        assert!(!is_json_content_type("text/json-ish"));
    }

    #[test]
    fn test_from_parts_splits_target_and_decodes_form() {
        let req = ContractRequest::from_parts(
            Method::POST,
            "/pet/3?debug=1",
            Some("application/x-www-form-urlencoded"),
            b"name=rex&status=sold".to_vec(),
        );
        assert_eq!(req.path, "/pet/3");
        assert_eq!(req.query.get_first("debug"), Some("1"));
        assert_eq!(req.form.get_first("name"), Some("rex"));
        assert!(!req.is_json());
        assert!(req.has_payload());
    }

    #[test]
    fn test_form_builder_reencodes_body() {
        let req = ContractRequest::new(Method::POST, "/pet/0")
            .with_form_field("name", "a b")
            .with_form_field("status", "sold");
        assert_eq!(req.body, b"name=a+b&status=sold".to_vec());
        assert_eq!(req.form.len(), 2);
    }

    #[test]
    fn test_repeated_keys_fold_into_arrays() {
        let map: MultiMap = [("tag", "a"), ("name", "x"), ("tag", "b"), ("tag", "c")]
            .into_iter()
            .collect();
        assert_eq!(
            Value::Object(map.to_json_object()),
            json!({ "tag": ["a", "b", "c"], "name": "x" })
        );
    }

    #[test]
    fn test_headers_are_case_insensitive() {
        let req = ContractRequest::new(Method::GET, "/").with_header("X-Request-Id", "abc");
        assert_eq!(req.header("x-request-id"), Some("abc"));
    }
}
