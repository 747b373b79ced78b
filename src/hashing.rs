//! SHA-256 digests for the run manifest.
//!
//! Artifact digests let a rebuilt output tree be checked against a previous
//! run's manifest; canonical JSON keeps the manifest hash stable across
//! serializer key ordering.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::path::Path;

/// SHA-256 of `data` as lowercase hex.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// SHA-256 of a file's bytes.
pub fn sha256_file(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(sha256_hex(&bytes))
}

/// Serialize with object keys sorted and no whitespace.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    serde_json::to_string(&sort_value(&v))
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sort_value(v)))
                    .collect(),
            )
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_value).collect()),
        _ => v.clone(),
    }
}

/// Hash of the canonical-JSON form of a manifest.
pub fn compute_manifest_hash<T: Serialize>(manifest: &T) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(manifest)?;
    Ok(sha256_hex(canonical.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canonical_json_sorts_keys() {
        let obj = json!({"rete": 1, "climate": 2, "mother": 3});
        assert_eq!(
            canonical_json(&obj).unwrap(),
            r#"{"climate":2,"mother":3,"rete":1}"#
        );
    }

    #[test]
    fn manifest_hash_ignores_key_order() {
        let a = json!({"run_id": "x", "artifacts": ["a", "b"]});
        let b = json!({"artifacts": ["a", "b"], "run_id": "x"});
        assert_eq!(
            compute_manifest_hash(&a).unwrap(),
            compute_manifest_hash(&b).unwrap()
        );
    }

    #[test]
    fn digest_is_deterministic() {
        assert_eq!(sha256_hex(b"rete"), sha256_hex(b"rete"));
        assert_ne!(sha256_hex(b"rete"), sha256_hex(b"rule"));
    }
}
