//! Content digests over canonical JSON
//!
//! A revision is identified by the SHA-1 of its document's canonical
//! serialization (keys sorted recursively, compact separators), so equal
//! content always hashes identically regardless of field insertion order.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use sha1::{Digest, Sha1};

use crate::error::HistoryError;

/// Digest length in bytes (SHA-1)
pub const DIGEST_LEN: usize = 20;

/// Deterministic fingerprint of a document's canonical serialization
///
/// Doubles as the public revision identifier and as the dedup/storage key
/// for archived snapshots.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentDigest([u8; DIGEST_LEN]);

impl ContentDigest {
    /// Compute the digest of a document's canonical content
    pub fn compute(doc: &Value) -> Self {
        let hash = Sha1::digest(canonical_string(doc).as_bytes());
        Self(hash.into())
    }

    /// Convert to hexadecimal string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hexadecimal string
    pub fn from_hex(hex_str: &str) -> Result<Self, HistoryError> {
        let bytes =
            hex::decode(hex_str).map_err(|_| HistoryError::InvalidDigest(hex_str.to_string()))?;
        if bytes.len() != DIGEST_LEN {
            return Err(HistoryError::InvalidDigest(hex_str.to_string()));
        }
        let mut arr = [0u8; DIGEST_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ContentDigest").field(&self.to_hex()).finish()
    }
}

// Digests live inside JSON documents (log entries, branch keys), so they
// serialize as hex strings rather than byte arrays.
impl Serialize for ContentDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Canonical compact serialization: keys sorted at every nesting level
pub fn canonical_string(doc: &Value) -> String {
    sort_keys(doc).to_string()
}

/// Canonical pretty-printed serialization, used for line-oriented diffing
pub fn canonical_pretty(doc: &Value) -> String {
    serde_json::to_string_pretty(&sort_keys(doc)).unwrap_or_default()
}

fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut sorted = serde_json::Map::with_capacity(entries.len());
            for (key, value) in entries {
                sorted.insert(key.clone(), sort_keys(value));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}
