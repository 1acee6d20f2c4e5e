//! Stored document representation

use serde::Serialize;
use serde_json::{Map, Value};

/// One stored record: a JSON object with string keys
pub type Document = Map<String, Value>;

/// Field holding the document identifier
pub const ID_FIELD: &str = "id";

/// Identifier of `document`, when present and a string
pub fn id_of(document: &Document) -> Option<&str> {
    document.get(ID_FIELD).and_then(Value::as_str)
}

/// Whether `document` carries `id` as its identifier
pub fn has_id(document: &Document, id: &str) -> bool {
    id_of(document) == Some(id)
}

/// Convert a serializable value into a document
///
/// Fails when `value` does not serialize to a JSON object.
pub fn to_document<T: Serialize>(value: &T) -> serde_json::Result<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(<serde_json::Error as serde::ser::Error>::custom(format!(
            "expected object, got {}",
            kind_of(&other)
        ))),
    }
}

/// Serialize a document to its compact stored form
pub fn to_bytes(document: &Document) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(document)
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
