//! Column schema descriptors: comparison and value validation.
//!
//! A descriptor is either a bare type name (`"string"`, `"datetime"`) or a
//! JSON object with a `type` key and optional modifiers (`required`, `min`,
//! `max`). The bare form is shorthand for `{"type": <name>}` with no other
//! keys.

use chrono::DateTime;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

use super::deep_equal::objects_equal;
use super::safe_parse::parse_object_or_null;
use crate::core::{QueryError, Result, type_name};

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

// ============================================================================
// DESCRIPTOR COMPARISON
// ============================================================================

/// Normalized form of one schema cell.
enum Descriptor<'a> {
    /// Decoded JSON object, or the `{"type": name}` expansion of a bare name.
    Object(Map<String, Value>),
    /// Text that looks like JSON but fails object parsing; compared verbatim.
    Raw(&'a str),
}

fn looks_like_json(text: &str) -> bool {
    matches!(
        text.trim_start().chars().next(),
        Some('{') | Some('[') | Some('"')
    )
}

fn normalize(text: &str) -> Descriptor<'_> {
    if let Some(map) = parse_object_or_null(text) {
        return Descriptor::Object(map);
    }
    if looks_like_json(text) {
        // Malformed or non-object JSON; degrade to exact string comparison
        // instead of failing the whole schema check.
        return Descriptor::Raw(text);
    }
    let mut map = Map::new();
    map.insert("type".to_string(), Value::String(text.to_string()));
    Descriptor::Object(map)
}

fn descriptors_equal(a: &Descriptor<'_>, b: &Descriptor<'_>) -> bool {
    match (a, b) {
        (Descriptor::Object(x), Descriptor::Object(y)) => objects_equal(x, y),
        (Descriptor::Raw(x), Descriptor::Raw(y)) => x == y,
        _ => false,
    }
}

/// Whether two ordered column-schema rows describe the same schema.
///
/// Cells are normalized independently per index and compared structurally,
/// so `"string"` and `{"type":"string"}` are the same column. Short-circuits
/// on the first mismatching index.
pub fn schema_rows_equal(a: &[String], b: &[String]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .all(|(left, right)| descriptors_equal(&normalize(left), &normalize(right)))
}

// ============================================================================
// DESCRIPTOR VALIDATION
// ============================================================================

/// Parsed per-column schema used to validate incoming row values.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub type_name: String,
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl FieldSchema {
    /// Parse a descriptor cell. Bare type names carry no modifiers; object
    /// descriptors missing a `type` key validate as untyped.
    pub fn parse(descriptor: &str) -> Self {
        match parse_object_or_null(descriptor) {
            Some(map) => Self {
                type_name: map
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or("any")
                    .to_string(),
                required: map.get("required").and_then(Value::as_bool).unwrap_or(false),
                min: map.get("min").and_then(Value::as_f64),
                max: map.get("max").and_then(Value::as_f64),
            },
            None => Self {
                type_name: descriptor.to_string(),
                required: false,
                min: None,
                max: None,
            },
        }
    }

    /// Validate one field value against this schema.
    ///
    /// `None` means the field is absent from the row; `required` rejects both
    /// absent fields and explicit nulls.
    pub fn validate(&self, field: &str, value: Option<&Value>) -> Result<()> {
        let value = match value {
            None | Some(Value::Null) => {
                if self.required {
                    return Err(QueryError::SchemaViolation(format!(
                        "field '{field}' is required"
                    )));
                }
                return Ok(());
            }
            Some(v) => v,
        };

        self.check_type(field, value)?;
        self.check_bounds(field, value)
    }

    fn check_type(&self, field: &str, value: &Value) -> Result<()> {
        let ok = match self.type_name.as_str() {
            "string" => value.is_string(),
            "number" => value.is_number(),
            "boolean" => value.is_boolean(),
            "array" => value.is_array(),
            "datetime" => match value.as_str() {
                Some(s) => DateTime::parse_from_rfc3339(s).is_ok(),
                None => false,
            },
            "email" => match value.as_str() {
                Some(s) => EMAIL_RE.is_match(s),
                None => false,
            },
            // Unknown type names constrain nothing.
            _ => true,
        };
        if ok {
            Ok(())
        } else {
            Err(QueryError::SchemaViolation(format!(
                "field '{field}' expects {}, got {}",
                self.type_name,
                type_name(value)
            )))
        }
    }

    /// `min`/`max` bound numbers by value and strings by character length.
    fn check_bounds(&self, field: &str, value: &Value) -> Result<()> {
        if self.min.is_none() && self.max.is_none() {
            return Ok(());
        }
        let measured = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => Some(s.chars().count() as f64),
            _ => None,
        };
        let Some(measured) = measured else {
            return Ok(());
        };
        if let Some(min) = self.min {
            if measured < min {
                return Err(QueryError::SchemaViolation(format!(
                    "field '{field}' below minimum {min}"
                )));
            }
        }
        if let Some(max) = self.max {
            if measured > max {
                return Err(QueryError::SchemaViolation(format!(
                    "field '{field}' above maximum {max}"
                )));
            }
        }
        Ok(())
    }
}
