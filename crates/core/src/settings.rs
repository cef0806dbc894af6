//! Destination settings handling — sanitization of raw option objects before
//! they reach a vendor initializer, and typed parsing into per-destination
//! config structs.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::RelayResult;

/// Strip unusable values from a raw settings object.
///
/// Keys mapping to `null` or `""` are dropped. Arrays keep only elements that
/// are neither `null` nor `""`, preserving relative order; a key whose array
/// empties out is dropped rather than kept as `[]`. Everything else — numbers,
/// booleans, non-empty strings, nested objects — is copied through untouched.
/// The settings UI lets users save rows that are empty strings, so this runs
/// on every options object before it is forwarded to a vendor initializer.
///
/// Total over any input map; sanitizing twice is a no-op.
pub fn sanitize(options: &Map<String, Value>) -> Map<String, Value> {
    let mut cleaned = Map::new();
    for (key, value) in options {
        match value {
            Value::Null => {}
            Value::String(s) if s.is_empty() => {}
            Value::Array(elements) => {
                let kept: Vec<Value> =
                    elements.iter().filter(|e| !is_blank(e)).cloned().collect();
                if !kept.is_empty() {
                    cleaned.insert(key.clone(), Value::Array(kept));
                }
            }
            other => {
                cleaned.insert(key.clone(), other.clone());
            }
        }
    }
    cleaned
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Deserialize a raw settings object into a typed destination config.
pub fn parse<T: DeserializeOwned>(settings: &Value) -> RelayResult<T> {
    Ok(serde_json::from_value(settings.clone())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_sanitize_drops_null_and_empty() {
        let cleaned = sanitize(&object(json!({
            "a": null,
            "b": "",
            "c": [],
            "d": "x",
        })));
        assert_eq!(Value::Object(cleaned), json!({ "d": "x" }));
    }

    #[test]
    fn test_sanitize_filters_arrays_in_order() {
        let cleaned = sanitize(&object(json!({ "u": ["", "foo", null, "bar"] })));
        assert_eq!(Value::Object(cleaned), json!({ "u": ["foo", "bar"] }));
    }

    #[test]
    fn test_sanitize_drops_arrays_that_empty_out() {
        let cleaned = sanitize(&object(json!({ "u": ["", ""], "v": [null] })));
        assert!(cleaned.is_empty());
    }

    #[test]
    fn test_sanitize_keeps_falsy_scalars_and_objects() {
        let options = object(json!({
            "zero": 0,
            "off": false,
            "nested": { "inner": "" },
        }));
        let cleaned = sanitize(&options);
        // Nested objects pass through untouched; only top-level values are
        // inspected.
        assert_eq!(cleaned, options);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let options = object(json!({
            "tid": "2620795819800",
            "empty": "",
            "gone": null,
            "urls": ["", "https://example.com", null],
            "limit": 0,
        }));
        let once = sanitize(&options);
        let twice = sanitize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_parse_typed_config() {
        #[derive(Deserialize, Default)]
        #[serde(default)]
        struct Sample {
            tid: String,
            limit: u32,
        }

        let sample: Sample = parse(&json!({ "tid": "t-1", "limit": 3 })).unwrap();
        assert_eq!(sample.tid, "t-1");
        assert_eq!(sample.limit, 3);

        // Missing options fall back to defaults rather than erroring.
        let defaulted: Sample = parse(&json!({})).unwrap();
        assert!(defaulted.tid.is_empty());

        // Only structurally impossible input fails.
        assert!(parse::<Sample>(&json!("not an object")).is_err());
    }
}
