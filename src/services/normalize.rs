// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Collection payload normalization.
//!
//! Backend list endpoints answer in one of three shapes: a bare array, a
//! `{success, data}` envelope, or a single object. All of them become an
//! ordered list of records here.

use serde_json::Value;

/// Normalize a collection payload into an ordered list of records.
///
/// Checked in order:
/// 1. an array is returned unchanged;
/// 2. an object with `success == true` and non-null `data` yields `data`
///    (or `[data]` when it is not an array);
/// 3. any other object yields `[payload]`;
/// 4. anything else yields `[]`.
pub fn normalize_list(payload: Value) -> Vec<Value> {
    match payload {
        Value::Array(items) => items,
        Value::Object(mut obj) => {
            let success = obj.get("success").and_then(Value::as_bool) == Some(true);
            let has_data = obj.get("data").is_some_and(|d| !d.is_null());
            if success && has_data {
                match obj.remove("data") {
                    Some(Value::Array(items)) => items,
                    Some(data) => vec![data],
                    None => Vec::new(),
                }
            } else {
                vec![Value::Object(obj)]
            }
        }
        _ => Vec::new(),
    }
}

/// The most recent record. Histories grow by appending.
pub fn latest(records: &[Value]) -> Option<&Value> {
    records.last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_array() {
        let out = normalize_list(json!([{"id": 1}, {"id": 2}]));
        assert_eq!(out, vec![json!({"id": 1}), json!({"id": 2})]);
    }

    #[test]
    fn test_envelope_with_list() {
        let out = normalize_list(json!({"success": true, "data": [{"id": 1}]}));
        assert_eq!(out, vec![json!({"id": 1})]);
    }

    #[test]
    fn test_envelope_with_single_record() {
        let out = normalize_list(json!({"success": true, "data": {"id": 5}}));
        assert_eq!(out, vec![json!({"id": 5})]);
    }

    #[test]
    fn test_failed_envelope_is_a_record() {
        let payload = json!({"success": false, "data": [1, 2]});
        assert_eq!(normalize_list(payload.clone()), vec![payload]);

        let payload = json!({"success": true, "data": null});
        assert_eq!(normalize_list(payload.clone()), vec![payload]);
    }

    #[test]
    fn test_plain_object() {
        let payload = json!({"id": 9, "subject": "hi"});
        assert_eq!(normalize_list(payload.clone()), vec![payload]);
    }

    #[test]
    fn test_scalars_are_empty() {
        assert!(normalize_list(Value::Null).is_empty());
        assert!(normalize_list(json!("text")).is_empty());
        assert!(normalize_list(json!(42)).is_empty());
    }

    #[test]
    fn test_latest_is_last() {
        let records = vec![json!({"id": 1}), json!({"id": 2})];
        assert_eq!(latest(&records), Some(&json!({"id": 2})));
        assert_eq!(latest(&[]), None);
    }
}
