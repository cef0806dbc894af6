//! Vendor payload assembly — builds a destination payload from a canonical
//! event and a shape descriptor.
//!
//! Fields are populated only when the source property is present; absence
//! means omission, never `null` or zero. Numbers pass through untouched.

use serde_json::{Map, Value};

use tagrelay_core::CanonicalEvent;

use crate::mapping::{FieldMap, LineItems, PayloadShape};

/// Build the vendor payload for `event` under `shape`, then copy any
/// configured custom properties verbatim (without overwriting a field a
/// built-in mapping already populated). Returns `None` when nothing
/// recognizable was present — the vendor call is then made without a payload
/// argument.
pub fn build(
    event: &CanonicalEvent,
    shape: &PayloadShape,
    custom_properties: &[String],
) -> Option<Value> {
    let mut payload = Map::new();

    for field in shape.fields {
        if let Some(value) = event.property(field.from) {
            payload.entry(field.to).or_insert_with(|| value.clone());
        }
    }

    match shape.line_items {
        LineItems::None => {}
        LineItems::FromEvent(fields) => {
            let item = line_item(|key| event.property(key), fields);
            if !item.is_empty() {
                payload.insert(
                    "line_items".into(),
                    Value::Array(vec![Value::Object(item)]),
                );
            }
        }
        LineItems::FromCollection { property, fields } => {
            if let Some(Value::Array(entries)) = event.property(property) {
                let items: Vec<Value> = entries
                    .iter()
                    .filter_map(|entry| entry.as_object())
                    .map(|entry| {
                        line_item(|key| entry.get(key).filter(|v| !v.is_null()), fields)
                    })
                    .filter(|item| !item.is_empty())
                    .map(Value::Object)
                    .collect();
                if !items.is_empty() {
                    payload.insert("line_items".into(), Value::Array(items));
                }
            }
        }
    }

    for name in custom_properties {
        if let Some(value) = event.property(name) {
            payload.entry(name.as_str()).or_insert_with(|| value.clone());
        }
    }

    if payload.is_empty() {
        None
    } else {
        Some(Value::Object(payload))
    }
}

/// Assemble one line item, first-present source winning per target field.
fn line_item<'a>(
    lookup: impl Fn(&str) -> Option<&'a Value>,
    fields: &[FieldMap],
) -> Map<String, Value> {
    let mut item = Map::new();
    for field in fields {
        if let Some(value) = lookup(field.from) {
            item.entry(field.to).or_insert_with(|| value.clone());
        }
    }
    item
}
