//! Best-effort decoding of JSON that upstream sometimes double-encodes.
//!
//! Some fields arrive either as a nested object or as a string holding that
//! object's JSON text. Decoding never fails: anything that is not (or does
//! not decode to) the expected shape is reported as absent.

use serde_json::{Map, Value};

/// Returns the object carried by `value`, decoding it from a JSON string if
/// necessary.
#[must_use]
pub fn parse_embedded_json(value: &Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map.clone()),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        },
        _ => None,
    }
}

/// Returns the object or array encoded in a JSON string.
///
/// Used by the generic record renderer; scalars and undecodable strings
/// yield `None` and are shown as plain text.
#[must_use]
pub fn parse_embedded_container(text: &str) -> Option<Value> {
    let trimmed = text.trim_start();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return None;
    }
    match serde_json::from_str::<Value>(text) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Some(value),
        _ => None,
    }
}

/// Follows a dotted path (`"a.b.c"`) through nested objects.
#[must_use]
pub fn value_at<'a>(map: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = map.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn object_passes_through() {
        let value = json!({"fullName": "Long Range"});
        let map = parse_embedded_json(&value).unwrap();
        assert_eq!(map.get("fullName"), Some(&json!("Long Range")));
    }

    #[test]
    fn json_string_is_decoded() {
        let value = json!("{\"fullName\":\"Long Range\",\"price\":1000}");
        let map = parse_embedded_json(&value).unwrap();
        assert_eq!(map.get("price"), Some(&json!(1000)));
    }

    #[test]
    fn malformed_or_non_object_is_absent() {
        assert!(parse_embedded_json(&json!("{not json")).is_none());
        assert!(parse_embedded_json(&json!("[1,2]")).is_none());
        assert!(parse_embedded_json(&json!("")).is_none());
        assert!(parse_embedded_json(&json!(null)).is_none());
        assert!(parse_embedded_json(&json!(42)).is_none());
    }

    #[test]
    fn embedded_container_accepts_objects_and_arrays_only() {
        assert_eq!(parse_embedded_container("[1, 2]"), Some(json!([1, 2])));
        assert_eq!(
            parse_embedded_container(" {\"a\": 1}"),
            Some(json!({"a": 1}))
        );
        assert!(parse_embedded_container("42").is_none());
        assert!(parse_embedded_container("\"quoted\"").is_none());
        assert!(parse_embedded_container("{broken").is_none());
    }

    #[test]
    fn value_at_walks_nested_objects() {
        let map = json!({"a": {"b": {"c": 3}}, "x": 1});
        let map = map.as_object().unwrap();
        assert_eq!(value_at(map, "a.b.c"), Some(&json!(3)));
        assert_eq!(value_at(map, "x"), Some(&json!(1)));
        assert!(value_at(map, "x.y").is_none());
        assert!(value_at(map, "missing").is_none());
    }
}
