use serde_json::Value;

/// A row field that arrives either as JSON-bearing text or as an
/// already-decoded structure.
///
/// The field is decoded once for rewriting and re-encoded to its original
/// representation only when a rewrite actually produced a change, so
/// untouched values round-trip byte-for-byte.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Json(Value),
}

impl FieldValue {
    /// Decoded JSON view of the field. `None` when text content is not
    /// valid JSON; the caller treats that as "leave the field alone".
    pub fn decode(&self) -> Option<Value> {
        match self {
            FieldValue::Text(text) => serde_json::from_str(text).ok(),
            FieldValue::Json(value) => Some(value.clone()),
        }
    }

    /// Re-encodes a rewritten value into this field's original
    /// representation.
    pub fn encode(&self, value: Value) -> FieldValue {
        match self {
            FieldValue::Text(_) => FieldValue::Text(value.to_string()),
            FieldValue::Json(_) => FieldValue::Json(value),
        }
    }
}
