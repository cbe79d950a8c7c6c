//! Extracts a display string from whatever JSON a webhook sends back.
//!
//! Automation backends disagree on reply shape: a bare string, `{"reply"}`,
//! `{"output"}`, `[{"output"}]`, `{"output": {"text"}}` and more. Each arm
//! below recognizes one shape, tried in a fixed priority order.

use serde_json::{Map, Value};

/// Returns `None` when no usable text is found. Never panics.
pub fn extract_reply(value: &Value) -> Option<String> {
    match value {
        v if is_falsy(v) => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => from_sequence(items),
        Value::Object(map) => from_object(map),
        _ => None,
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

fn from_sequence(items: &[Value]) -> Option<String> {
    let first = items.first()?;
    if let Some(reply) = extract_reply(first).filter(|r| !r.is_empty()) {
        return Some(reply);
    }

    let joined = items
        .iter()
        .map(item_to_string)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    (!joined.is_empty()).then_some(joined)
}

/// Stringify one element of a sequence reply, preferring known text fields.
fn item_to_string(item: &Value) -> String {
    match item {
        Value::String(s) => s.clone(),
        Value::Object(map) => {
            if let Some(Value::String(s)) = map.get("output") {
                return s.clone();
            }
            if let Some(Value::String(s)) = map.get("output").and_then(|o| o.get("text")) {
                return s.clone();
            }
            if let Some(Value::String(s)) = map.get("text") {
                return s.clone();
            }
            item.to_string()
        }
        other => other.to_string(),
    }
}

fn from_object(map: &Map<String, Value>) -> Option<String> {
    if let Some(s) = non_blank(map.get("reply")) {
        return Some(s);
    }

    match map.get("output") {
        Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.clone()),
        Some(Value::Object(output)) => {
            if let Some(s) = non_blank(output.get("text")) {
                return Some(s);
            }
            if let Some(s) = non_blank(output.get("output")) {
                return Some(s);
            }
        }
        Some(Value::Array(items)) if !items.is_empty() => {
            let joined = items
                .iter()
                .map(|it| match it {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("\n");
            if !joined.trim().is_empty() {
                return Some(joined);
            }
        }
        _ => {}
    }

    non_blank(map.get("text")).or_else(|| non_blank(map.get("result")))
}

fn non_blank(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}
