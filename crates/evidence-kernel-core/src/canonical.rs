//! Canonical JSON encoding for deterministic hashing and signing.
//!
//! This module implements the JSON Canonicalization Scheme (RFC 8785):
//! - Object members sorted by the UTF-16 code units of their keys
//! - No insignificant whitespace
//! - Numbers formatted as ECMAScript does (`1.5`, `100`, `1e+21`)
//! - Minimal string escaping, non-ASCII emitted as raw UTF-8
//!
//! The canonical string is the exact input to the fingerprint hash and to the
//! signing digest. Any change to its bytes invalidates every signature that was
//! ever published.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::error::CanonicalizationError;

/// Maximum nesting depth accepted by the canonicalizer.
pub const MAX_DEPTH: usize = 128;

/// Serialize any value to its canonical JSON string.
pub fn canonicalize<T: Serialize + ?Sized>(value: &T) -> Result<String, CanonicalizationError> {
    let value = serde_json::to_value(value)
        .map_err(|e| CanonicalizationError::NotSerializable(e.to_string()))?;
    canonicalize_value(&value)
}

/// Canonicalize an already-built JSON value.
pub fn canonicalize_value(value: &Value) -> Result<String, CanonicalizationError> {
    check_structure(value, &Path::root(), 0)?;
    serde_jcs::to_string(value).map_err(|e| CanonicalizationError::Encoding(e.to_string()))
}

/// Canonical JSON as UTF-8 bytes.
pub fn canonical_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CanonicalizationError> {
    canonicalize(value).map(String::into_bytes)
}

/// JSON path used in error messages.
#[derive(Debug, Clone)]
struct Path {
    segments: Vec<String>,
}

impl Path {
    fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    fn field(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }

    fn index(&self, idx: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{idx}]"));
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "$")
        } else {
            write!(f, "$.{}", self.segments.join("."))
        }
    }
}

fn check_structure(value: &Value, path: &Path, depth: usize) -> Result<(), CanonicalizationError> {
    if depth > MAX_DEPTH {
        return Err(CanonicalizationError::TooDeep {
            path: path.to_string(),
            max: MAX_DEPTH,
        });
    }

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                check_structure(child, &path.field(key), depth + 1)?;
            }
            Ok(())
        }
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                check_structure(item, &path.index(idx), depth + 1)?;
            }
            Ok(())
        }
        Value::Number(num) => match num.as_f64() {
            Some(f) if !f.is_finite() => {
                Err(CanonicalizationError::NonFiniteNumber(path.to_string()))
            }
            _ => Ok(()),
        },
        Value::String(_) | Value::Bool(_) | Value::Null => Ok(()),
    }
}
