//! Structural argument checks against a tool's input schema.
//!
//! Covers the subset of JSON Schema the generated schemas use: an object
//! root, `required`, `additionalProperties: false` and primitive `type`
//! constraints on properties. Anything richer is left to the typed
//! deserialization inside the handler.

use serde_json::Value;

use crate::core::protocol::JsonObject;

/// Check `arguments` against `schema`, returning a readable reason on failure.
pub fn validate_arguments(schema: &JsonObject, arguments: &JsonObject) -> Result<(), String> {
    if schema.get("type").is_some_and(|ty| !type_allows(ty, "object")) {
        return Err("schema does not describe an argument object".to_string());
    }

    let properties = schema.get("properties").and_then(Value::as_object);

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for field in required.iter().filter_map(Value::as_str) {
            if !arguments.contains_key(field) {
                return Err(format!("missing required argument '{field}'"));
            }
        }
    }

    let closed = schema.get("additionalProperties") == Some(&Value::Bool(false));

    for (key, value) in arguments {
        match properties.and_then(|p| p.get(key)) {
            Some(property) => check_property(key, property, value)?,
            None if closed => return Err(format!("unexpected argument '{key}'")),
            None => {}
        }
    }

    Ok(())
}

fn check_property(key: &str, property: &Value, value: &Value) -> Result<(), String> {
    let Some(expected) = property.get("type") else {
        return Ok(());
    };

    let actual = json_type(value);
    if type_allows(expected, actual) || (actual == "integer" && type_allows(expected, "number")) {
        Ok(())
    } else {
        Err(format!("argument '{key}' must be of type {expected}, got {actual}"))
    }
}

/// Whether a schema `type` (a string or an array of strings) admits `name`.
fn type_allows(ty: &Value, name: &str) -> bool {
    match ty {
        Value::String(s) => s == name,
        Value::Array(items) => items.iter().any(|t| t.as_str() == Some(name)),
        _ => true,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn schema() -> JsonObject {
        object(json!({
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "count": { "type": "integer" },
                "ratio": { "type": "number" },
                "note": { "type": ["string", "null"] }
            },
            "required": ["name"],
            "additionalProperties": false
        }))
    }

    #[test]
    fn test_accepts_matching_arguments() {
        let args = object(json!({ "name": "a", "count": 2, "ratio": 3, "note": null }));
        assert!(validate_arguments(&schema(), &args).is_ok());
    }

    #[test]
    fn test_rejects_missing_required() {
        let err = validate_arguments(&schema(), &JsonObject::new()).unwrap_err();
        assert!(err.contains("'name'"));
    }

    #[test]
    fn test_rejects_unexpected_argument() {
        let args = object(json!({ "name": "a", "extra": true }));
        let err = validate_arguments(&schema(), &args).unwrap_err();
        assert!(err.contains("'extra'"));
    }

    #[test]
    fn test_rejects_wrong_type() {
        let args = object(json!({ "name": 5 }));
        assert!(validate_arguments(&schema(), &args).is_err());

        let args = object(json!({ "name": "a", "count": 1.5 }));
        assert!(validate_arguments(&schema(), &args).is_err());
    }

    #[test]
    fn test_open_schema_allows_extras() {
        let open = object(json!({ "type": "object" }));
        let args = object(json!({ "anything": [1, 2] }));
        assert!(validate_arguments(&open, &args).is_ok());
    }

    #[test]
    fn test_empty_schema_for_no_args() {
        let closed = object(json!({ "type": "object", "additionalProperties": false }));
        assert!(validate_arguments(&closed, &JsonObject::new()).is_ok());
        assert!(validate_arguments(&closed, &object(json!({ "x": 1 }))).is_err());
    }
}
