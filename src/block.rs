use chrono::Utc;
use serde::{Serialize, Deserialize};
use serde_json::Value;

use crate::hash;

/// Predecessor reference carried by a genesis block.
pub const GENESIS_HASH: &str = "0";

/// A record linked to its predecessor by hash. The `hash` field is a cache
/// of `compute_hash()`; after mutating `payload` or `nonce` the caller must
/// call `recompute_hash` or the block goes stale, which is exactly the
/// condition `chain::is_chain_valid` detects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Block {
    pub index: u64,
    pub timestamp: String,
    pub payload: Value,
    pub prev_hash: String,
    pub nonce: u64,
    pub hash: String,
}

impl Block {
    pub fn new(index: u64, timestamp: String, payload: Value, prev_hash: String) -> Self {
        let mut block = Self {
            index,
            timestamp,
            payload,
            prev_hash,
            nonce: 0,
            hash: String::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// Stamped with the current wall clock, RFC 3339.
    pub fn now(index: u64, payload: Value, prev_hash: String) -> Self {
        Self::new(index, Utc::now().to_rfc3339(), payload, prev_hash)
    }

    pub fn genesis(payload: Value) -> Self {
        Self::now(0, payload, GENESIS_HASH.into())
    }

    /// Next block in the chain, linked to `self` by hash.
    pub fn next(&self, payload: Value) -> Self {
        Self::now(self.index + 1, payload, self.hash.clone())
    }

    pub fn compute_hash(&self) -> String {
        hash::digest(self.index, &self.timestamp, &self.payload, &self.prev_hash, self.nonce)
    }

    pub fn recompute_hash(&mut self) {
        self.hash = self.compute_hash();
    }
}
