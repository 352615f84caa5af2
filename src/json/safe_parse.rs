//! Defensive JSON object parsing.
//!
//! Schema descriptors and filter payloads arrive as client-supplied strings.
//! Parsing goes through serde_json's native decoder exclusively: decode time
//! is linear in input length regardless of content, and decoded maps are
//! plain owned containers, so keys that look like prototype-chain accessors
//! (`__proto__`, `constructor`, ...) are ordinary data keys with no shared
//! side effects.

use serde_json::{Map, Value};

/// Parse `text` into a JSON object mapping.
///
/// Returns `None` for the empty string, syntactically invalid JSON, and any
/// JSON that decodes to something other than an object (arrays, primitives,
/// the `null` literal). Callers that need a typed error instead of a
/// sentinel wrap this at their own boundary.
pub fn parse_object_or_null(text: &str) -> Option<Map<String, Value>> {
    if text.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Whether `text` is a well-formed JSON object.
pub fn is_valid_object_json(text: &str) -> bool {
    parse_object_or_null(text).is_some()
}
