use sha2::Sha256;
use digest::Digest;
use serde_json::Value;

/// Number of hex characters in a rendered digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Digest of a block's canonical fields, rendered as 64 lowercase hex chars.
///
/// The payload goes through `serde_json`, whose default map keeps keys
/// sorted, so structurally equal payloads hash identically regardless of
/// how they were built.
pub fn digest(index: u64, timestamp: &str, payload: &Value, prev_hash: &str, nonce: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(index.to_be_bytes());
    hasher.update(timestamp.as_bytes());
    hasher.update(canonical_payload(payload).as_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(nonce.to_be_bytes());
    hex::encode(hasher.finalize())
}

fn canonical_payload(payload: &Value) -> String {
    serde_json::to_string(payload).expect("json values always serialize")
}
