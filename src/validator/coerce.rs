//! Coercion table shared by every validator.
//!
//! | target  | accepted                                                   |
//! |---------|------------------------------------------------------------|
//! | integer | JSON integer, text holding a whole number                  |
//! | string  | text, JSON number or boolean (rendered as text)            |
//! | boolean | JSON boolean, text `true`/`false`/`1`/`0`                  |
//! | number  | JSON number, text holding a finite float                   |
//! | array   | JSON array                                                 |
//! | object  | JSON object                                                |
//!
//! A JSON float is never narrowed to an integer, even `0.0`.

use crate::spec::PrimitiveType;
use serde_json::{Number, Value};

/// Coerce a decoded JSON value to `ty`. `None` means the value cannot be
/// interpreted as that type.
#[must_use]
pub fn coerce_value(ty: PrimitiveType, value: &Value) -> Option<Value> {
    match (ty, value) {
        (PrimitiveType::Integer, Value::Number(n)) => {
            (n.is_i64() || n.is_u64()).then(|| value.clone())
        }
        (PrimitiveType::Number, Value::Number(_))
        | (PrimitiveType::String, Value::String(_))
        | (PrimitiveType::Boolean, Value::Bool(_))
        | (PrimitiveType::Array, Value::Array(_))
        | (PrimitiveType::Object, Value::Object(_)) => Some(value.clone()),
        (PrimitiveType::String, Value::Number(n)) => Some(Value::String(n.to_string())),
        (PrimitiveType::String, Value::Bool(b)) => Some(Value::String(b.to_string())),
        (_, Value::String(text)) => coerce_text(ty, text),
        _ => None,
    }
}

/// Coerce raw text (a path capture, query value or form field) to `ty`.
#[must_use]
pub fn coerce_text(ty: PrimitiveType, text: &str) -> Option<Value> {
    let trimmed = text.trim();
    match ty {
        PrimitiveType::Integer => trimmed
            .parse::<i64>()
            .map(Value::from)
            .or_else(|_| trimmed.parse::<u64>().map(Value::from))
            .ok(),
        PrimitiveType::Number => trimmed
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        PrimitiveType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
            "true" | "1" => Some(Value::Bool(true)),
            "false" | "0" => Some(Value::Bool(false)),
            _ => None,
        },
        PrimitiveType::String => Some(Value::String(text.to_string())),
        PrimitiveType::Array | PrimitiveType::Object => None,
    }
}

/// `true` when no enum is declared or `value` is one of its members.
/// Numbers compare by magnitude, so `1` matches an enum entry `1.0`.
#[must_use]
pub fn enum_allows(allowed: Option<&[Value]>, value: &Value) -> bool {
    match allowed {
        None => true,
        Some(members) => members.iter().any(|member| same_value(member, value)),
    }
}

fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_float_never_narrows_to_integer() {
        assert!(coerce_value(PrimitiveType::Integer, &json!(0.0)).is_none());
        assert!(coerce_value(PrimitiveType::Integer, &json!(0.5)).is_none());
        assert_eq!(coerce_value(PrimitiveType::Integer, &json!(7)), Some(json!(7)));
    }

    #[test]
    fn test_text_to_integer() {
        assert_eq!(coerce_value(PrimitiveType::Integer, &json!("42")), Some(json!(42)));
        assert!(coerce_value(PrimitiveType::Integer, &json!("string")).is_none());
        assert!(coerce_text(PrimitiveType::Integer, "1.5").is_none());
        assert!(coerce_value(PrimitiveType::Integer, &json!(true)).is_none());
    }

    #[test]
    fn test_string_accepts_scalars_only() {
        assert_eq!(coerce_value(PrimitiveType::String, &json!(5)), Some(json!("5")));
        assert_eq!(coerce_value(PrimitiveType::String, &json!(false)), Some(json!("false")));
        assert!(coerce_value(PrimitiveType::String, &json!({"a": 1})).is_none());
        assert!(coerce_value(PrimitiveType::String, &json!(["x"])).is_none());
    }

    #[test]
    fn test_boolean_and_number() {
        assert_eq!(coerce_text(PrimitiveType::Boolean, "TRUE"), Some(json!(true)));
        assert_eq!(coerce_text(PrimitiveType::Boolean, "0"), Some(json!(false)));
        assert!(coerce_text(PrimitiveType::Boolean, "yes").is_none());
        assert_eq!(coerce_text(PrimitiveType::Number, "2.5"), Some(json!(2.5)));
        assert!(coerce_text(PrimitiveType::Number, "NaN").is_none());
        assert_eq!(coerce_value(PrimitiveType::Number, &json!(3)), Some(json!(3)));
    }

    #[test]
    fn test_array_from_text_is_rejected() {
        assert!(coerce_text(PrimitiveType::Array, "a,b").is_none());
        assert_eq!(coerce_value(PrimitiveType::Array, &json!([1])), Some(json!([1])));
    }

    #[test]
    fn test_enum_membership() {
        let allowed = [json!("available"), json!("pending"), json!(1.0)];
        assert!(enum_allows(Some(&allowed[..]), &json!("pending")));
        assert!(!enum_allows(Some(&allowed[..]), &json!("onhold")));
        assert!(enum_allows(Some(&allowed[..]), &json!(1)));
        assert!(enum_allows(None, &json!("anything")));
    }

    #[test]
    fn test_coercion_is_idempotent() {
        for (ty, v) in [
            (PrimitiveType::Integer, json!("12")),
            (PrimitiveType::String, json!(3)),
            (PrimitiveType::Boolean, json!("false")),
            (PrimitiveType::Number, json!("0.25")),
        ] {
            let once = coerce_value(ty, &v).unwrap();
            assert_eq!(coerce_value(ty, &once), Some(once.clone()));
        }
    }
}
