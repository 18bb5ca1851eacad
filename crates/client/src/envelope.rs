//! Response shape normalization.
//!
//! Endpoints of the API are not consistent about envelopes: a list may come
//! back bare, as `{ "data": [..] }`, or under an entity-named key such as
//! `{ "success": true, "labourers": [..] }`. These helpers accept all of
//! them.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Decode a list response.
///
/// Order of preference: a bare array, the `data` field (recursively), then
/// the first array-valued field by key order. `null` reads as an empty list.
pub fn extract_list<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, ApiError> {
    let items = find_array(value)
        .ok_or_else(|| ApiError::Decode("expected a list in the response".into()))?;
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(|e| ApiError::Decode(e.to_string())))
        .collect()
}

fn find_array(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Null => Some(Vec::new()),
        Value::Object(mut map) => {
            if let Some(data) = map.remove("data") {
                return find_array(data);
            }
            map.into_iter().find_map(|(_, v)| match v {
                Value::Array(items) => Some(items),
                _ => None,
            })
        }
        _ => None,
    }
}

/// Decode a single-record response.
///
/// Tries the `data` field first, then the body itself, then each
/// object-valued field (for `{ "success": true, "labour": {..} }`).
pub fn extract_one<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    let value = match value {
        Value::Object(mut map) if matches!(map.get("data"), Some(Value::Object(_))) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };

    let first_err = match serde_json::from_value::<T>(value.clone()) {
        Ok(record) => return Ok(record),
        Err(e) => e,
    };

    if let Value::Object(map) = value {
        for nested in map.into_values().filter(Value::is_object) {
            if let Ok(record) = serde_json::from_value::<T>(nested) {
                return Ok(record);
            }
        }
    }

    Err(ApiError::Decode(first_err.to_string()))
}
