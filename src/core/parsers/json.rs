//! Nested JSON catalogs.
//!
//! `{"settings": {"title": "Settings"}}` yields `settings.title`. String
//! arrays are joined with ` | `, arrays of objects expand with indices.

use std::path::Path;

use serde_json::Value;

use super::{ParseError, TranslationFormat};
use crate::core::types::TranslationEntry;

pub const ARRAY_SEPARATOR: &str = " | ";

pub fn parse(content: &str, source_file: &Path) -> Result<Vec<TranslationEntry>, ParseError> {
    let json: Value = serde_json::from_str(content)
        .map_err(|e| ParseError::malformed(TranslationFormat::Json, source_file, e))?;

    let mut flat = Vec::new();
    flatten_json(&json, String::new(), &mut flat);

    Ok(flat
        .into_iter()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(key, text)| TranslationEntry::new(key, text, source_file))
        .collect())
}

/// Flatten `value` into `(dotted key, text)` pairs in document order.
pub(super) fn flatten_json(value: &Value, prefix: String, result: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                flatten_json(val, join_key(&prefix, key), result);
            }
        }
        Value::Array(arr) => {
            if arr.is_empty() {
                return;
            }
            let is_scalar_array = arr
                .iter()
                .all(|v| !matches!(v, Value::Object(_) | Value::Array(_)));

            if is_scalar_array && !prefix.is_empty() {
                let values: Vec<String> = arr.iter().filter_map(scalar_text).collect();
                result.push((prefix, values.join(ARRAY_SEPARATOR)));
            } else {
                for (index, val) in arr.iter().enumerate() {
                    flatten_json(val, join_key(&prefix, &index.to_string()), result);
                }
            }
        }
        scalar => {
            if let Some(text) = scalar_text(scalar) {
                if !prefix.is_empty() {
                    result.push((prefix, text));
                }
            }
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(super) fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}
