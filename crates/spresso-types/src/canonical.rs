// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Canonical JSON serialization.
//!
//! Signatures and AEAD plaintexts are computed over JSON, so both sides of
//! the protocol must serialize composed objects identically: object keys
//! sorted lexicographically, compact separators, UTF-8.

use crate::TypesError;
use serde::Serialize;
use serde_json::Value;

/// Renders `value` in canonical form.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

/// Serializes any `Serialize` type and renders it canonically.
pub fn to_canonical_json<T: Serialize>(value: &T) -> Result<String, TypesError> {
    let value = serde_json::to_value(value).map_err(|e| TypesError::InvalidJson(e.to_string()))?;
    Ok(canonical_json(&value))
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // Object keys are strings; reuse serde_json's escaping.
                out.push_str(&Value::String((*key).clone()).to_string());
                out.push(':');
                write_canonical(&map[*key], out);
            }
            out.push('}');
        },
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        },
        scalar => out.push_str(&scalar.to_string()),
    }
}
