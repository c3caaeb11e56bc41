use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::field_map::{quote_field_map, FieldMap};
use crate::errors::{Result, ValidationError};

/// Renames the keys of `form` through `map`.
///
/// Every field survives: unmapped keys keep their name. Values are cloned
/// and the result preserves the form's key order. When two form keys map to
/// the same backend key, the later one in the form wins.
pub fn translate<V: Clone>(form: &IndexMap<String, V>, map: &FieldMap) -> IndexMap<String, V> {
    rename_keys(form, map)
}

/// Translates a JSON quote form with the shared quote field map.
pub fn to_backend_payload(form: &Map<String, Value>) -> Map<String, Value> {
    rename_keys(form, quote_field_map())
}

/// Key renaming shared by every record type. Both targets collect with
/// insert semantics, so the later of two colliding keys keeps its value.
fn rename_keys<'a, V, I, R>(fields: I, map: &FieldMap) -> R
where
    V: Clone + 'a,
    I: IntoIterator<Item = (&'a String, &'a V)>,
    R: FromIterator<(String, V)>,
{
    fields
        .into_iter()
        .map(|(key, value)| (map.backend_key(key).to_string(), value.clone()))
        .collect()
}

/// Like [`to_backend_payload`] for an arbitrary JSON value, which must be an object.
pub fn translate_value(form: &Value) -> Result<Value> {
    match form {
        Value::Object(fields) => Ok(Value::Object(to_backend_payload(fields))),
        other => Err(ValidationError::InvalidInput(format!(
            "Quote form must be a JSON object, got {}",
            json_kind(other)
        ))
        .into()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
