//! Hashing System - SHA-256 Content Fingerprints
//!
//! A product's content hash ignores the volatile timestamp fields, so a
//! metadata-only save does not look like a content change.

use sha2::{Digest, Sha256};
use serde::Serialize;
use serde_json::{Value, to_string};
use tracing::debug;

/// Top-level fields that never contribute to a content hash
pub const VOLATILE_FIELDS: [&str; 4] = [
    "lastRevised",
    "lastUpdated",
    "companyRevisionDate",
    "lastVerified",
];

/// Lowercase hex SHA-256 digest of `data`
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Serialize with object keys sorted at every depth and no whitespace
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    to_string(&canonicalize(serde_json::to_value(value)?))
}

// Keys are sorted explicitly so the output never depends on the map
// implementation serde_json was built with. Arrays keep their order.
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(entries.into_iter().map(|(k, v)| (k, canonicalize(v))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        scalar => scalar,
    }
}

fn strip_volatile(mut content: Value) -> Value {
    if let Value::Object(map) = &mut content {
        for field in VOLATILE_FIELDS {
            map.remove(field);
        }
    }
    content
}

/// Compute the content hash of a product record.
///
/// The record is serialized, stripped of [`VOLATILE_FIELDS`] and
/// canonicalized before hashing. Returns 64 lowercase hex characters.
pub fn compute_content_hash<T: Serialize>(product: &T) -> Result<String, serde_json::Error> {
    let content = strip_volatile(serde_json::to_value(product)?);
    let canonical = canonical_json(&content)?;
    let hash = sha256_hex(canonical.as_bytes());
    debug!(bytes = canonical.len(), hash = %hash, "computed content hash");
    Ok(hash)
}

/// True iff the product's current content hash differs from `stored_hash`.
///
/// Hex case in the stored hash is ignored.
pub fn has_content_changed<T: Serialize>(
    product: &T,
    stored_hash: &str,
) -> Result<bool, serde_json::Error> {
    Ok(!compute_content_hash(product)?.eq_ignore_ascii_case(stored_hash.trim()))
}
