//! Nested YAML catalogs in Rails i18n style.
//!
//! A single top-level locale key (`en:`, `pt-BR:`) is stripped, so
//! `en: {home: {title: Home}}` yields `home.title`.

use std::{path::Path, sync::LazyLock};

use regex::Regex;
use serde_yaml::Value;

use super::{
    ParseError, TranslationFormat,
    json::{ARRAY_SEPARATOR, join_key},
};
use crate::core::types::TranslationEntry;

static LOCALE_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z]{2}(-[a-z]{2})?$").unwrap());

pub fn parse(content: &str, source_file: &Path) -> Result<Vec<TranslationEntry>, ParseError> {
    let yaml: Value = serde_yaml::from_str(content)
        .map_err(|e| ParseError::malformed(TranslationFormat::Yaml, source_file, e))?;

    let mut flat = Vec::new();
    flatten_yaml(strip_locale_root(&yaml), String::new(), &mut flat);

    Ok(flat
        .into_iter()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(key, text)| TranslationEntry::new(key, text, source_file))
        .collect())
}

fn strip_locale_root(value: &Value) -> &Value {
    if let Value::Mapping(map) = value {
        if map.len() == 1 {
            if let Some((Value::String(key), inner @ Value::Mapping(_))) = map.iter().next() {
                if LOCALE_KEY_RE.is_match(key) {
                    return inner;
                }
            }
        }
    }
    value
}

fn flatten_yaml(value: &Value, prefix: String, result: &mut Vec<(String, String)>) {
    match value {
        Value::Mapping(map) => {
            for (key, val) in map {
                if let Some(key) = scalar_text(key) {
                    flatten_yaml(val, join_key(&prefix, &key), result);
                }
            }
        }
        Value::Sequence(seq) => {
            if seq.is_empty() {
                return;
            }
            let is_scalar_seq = seq
                .iter()
                .all(|v| !matches!(v, Value::Mapping(_) | Value::Sequence(_)));

            if is_scalar_seq && !prefix.is_empty() {
                let values: Vec<String> = seq.iter().filter_map(scalar_text).collect();
                result.push((prefix, values.join(ARRAY_SEPARATOR)));
            } else {
                for (index, val) in seq.iter().enumerate() {
                    flatten_yaml(val, join_key(&prefix, &index.to_string()), result);
                }
            }
        }
        Value::Tagged(tagged) => flatten_yaml(&tagged.value, prefix, result),
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
