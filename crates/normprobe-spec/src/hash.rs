//! Canonical hashing of parameter snapshots.
//!
//! Snapshots are serialized to JSON, canonicalized (sorted keys, no
//! whitespace, shortest number form) and hashed with BLAKE3 so two exports
//! made with the same controls can be matched without comparing pixels.

use crate::error::SpecError;
use crate::params::FrameParams;

/// Computes the canonical BLAKE3 hash of a parameter snapshot.
///
/// ```text
/// params_hash = hex(BLAKE3(canonical_json(params)))
/// ```
///
/// # Example
/// ```
/// use normprobe_spec::{canonical_params_hash, FrameParams};
///
/// let hash = canonical_params_hash(&FrameParams::default()).unwrap();
/// assert_eq!(hash.len(), 64);
/// ```
pub fn canonical_params_hash(params: &FrameParams) -> Result<String, SpecError> {
    let value = params.to_value()?;
    Ok(canonical_value_hash(&value))
}

/// Computes the canonical BLAKE3 hash of a JSON value.
pub fn canonical_value_hash(value: &serde_json::Value) -> String {
    let canonical = canonicalize_json(value);
    blake3::hash(canonical.as_bytes()).to_hex().to_string()
}

/// Produces a deterministic JSON string with lexicographically sorted keys
/// and no whitespace.
pub fn canonicalize_json(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => format_number(n),
        serde_json::Value::String(s) => format_string(s),
        serde_json::Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(canonicalize_json).collect();
            format!("[{}]", items.join(","))
        }
        serde_json::Value::Object(obj) => {
            let mut entries: Vec<(&String, &serde_json::Value)> = obj.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            let pairs: Vec<String> = entries
                .into_iter()
                .map(|(k, v)| format!("{}:{}", format_string(k), canonicalize_json(v)))
                .collect();
            format!("{{{}}}", pairs.join(","))
        }
    }
}

fn format_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if !f.is_finite() => "null".to_string(),
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => format!("{}", f),
        None => "null".to_string(),
    }
}

fn format_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c < '\x20' => result.push_str(&format!("\\u{:04x}", c as u32)),
            c => result.push(c),
        }
    }
    result.push('"');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::EncodingMode;

    #[test]
    fn test_sorted_keys() {
        let value = serde_json::json!({"b": 1, "a": [true, null, 2.5], "c": "x"});
        assert_eq!(canonicalize_json(&value), r#"{"a":[true,null,2.5],"b":1,"c":"x"}"#);
    }

    #[test]
    fn test_integer_like_floats() {
        let value = serde_json::json!({"bits": 8.0, "zero": -0.0});
        assert_eq!(canonicalize_json(&value), r#"{"bits":8,"zero":0}"#);
    }

    #[test]
    fn test_hash_stable_and_sensitive() {
        let a = FrameParams::default();
        let b = FrameParams::builder().encoding(EncodingMode::HemiOct).build();

        let hash_a1 = canonical_params_hash(&a).unwrap();
        let hash_a2 = canonical_params_hash(&a).unwrap();
        let hash_b = canonical_params_hash(&b).unwrap();

        assert_eq!(hash_a1, hash_a2);
        assert_ne!(hash_a1, hash_b);
        assert_eq!(hash_a1.len(), 64);
    }
}
