use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::{Serialize, Deserialize};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task;
use tracing::debug;

use crate::block::Block;

/// A 256-bit digest renders as 64 hex chars, so more leading zeros than
/// that can never be satisfied.
pub const MAX_DIFFICULTY: usize = 64;

const PROGRESS_INTERVAL: u64 = 100_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    BadDifficulty,
    NoMiners,
}

/// What a finished search reports back: who won, the qualifying nonce and
/// hash, and how long the search took.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Receipt {
    pub miner: String,
    pub nonce: u64,
    pub hash: String,
    pub elapsed: Duration,
}

pub fn meets_difficulty(hash: &str, difficulty: usize) -> bool {
    hash.len() >= difficulty && hash.bytes().take(difficulty).all(|b| b == b'0')
}

/// Brute-force search: bump the nonce and recompute until the hash carries
/// `difficulty` leading zero hex chars. Difficulty 0 is vacuously satisfied
/// and returns without touching the block. The timestamp is fixed at
/// construction, so the search space is exactly the nonce sequence 0,1,2,..
pub fn mine(block: &mut Block, difficulty: usize) -> Result<u64, Error> {
    if difficulty > MAX_DIFFICULTY {
        return Err(Error::BadDifficulty);
    }
    while !meets_difficulty(&block.hash, difficulty) {
        block.nonce += 1;
        block.recompute_hash();
        if block.nonce % PROGRESS_INTERVAL == 0 {
            debug!(nonce = block.nonce, hash = %block.hash, "still searching");
        }
    }
    Ok(block.nonce)
}

/// Same search with cooperative cancellation, checked between increments so
/// the block always holds a consistent nonce/hash pair. Returns `None` if
/// cancelled before a qualifying nonce turned up. The caller is expected to
/// have range-checked the difficulty already.
pub fn mine_until(block: &mut Block, difficulty: usize, cancel: &AtomicBool) -> Option<u64> {
    loop {
        if meets_difficulty(&block.hash, difficulty) {
            return Some(block.nonce);
        }
        if cancel.load(Ordering::Relaxed) {
            return None;
        }
        block.nonce += 1;
        block.recompute_hash();
    }
}

/// Race independent miners over the same payload and predecessor. Every
/// miner gets its own block instance stamped with one shared timestamp, so
/// no search has a head start. First receipt to arrive wins; the rest are
/// cancelled cooperatively.
pub async fn race(
    miners: &[String],
    payload: Value,
    prev_hash: &str,
    difficulty: usize,
) -> Result<Receipt, Error> {
    if difficulty > MAX_DIFFICULTY {
        return Err(Error::BadDifficulty);
    }
    if miners.is_empty() {
        return Err(Error::NoMiners);
    }
    let timestamp = Utc::now().to_rfc3339();
    let cancel = Arc::new(AtomicBool::new(false));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut handles = Vec::with_capacity(miners.len());
    for name in miners {
        let mut block = Block::new(0, timestamp.clone(), payload.clone(), prev_hash.to_string());
        let name = name.clone();
        let cancel = Arc::clone(&cancel);
        let tx = tx.clone();
        handles.push(task::spawn_blocking(move || {
            let start = Instant::now();
            if let Some(nonce) = mine_until(&mut block, difficulty, &cancel) {
                let elapsed = start.elapsed();
                debug!(miner = %name, nonce, elapsed_ms = elapsed.as_millis() as u64, "search finished");
                let _ = tx.send(Receipt { miner: name, nonce, hash: block.hash, elapsed });
            }
        }));
    }
    drop(tx);
    let winner = rx.recv().await.ok_or(Error::NoMiners)?;
    cancel.store(true, Ordering::Relaxed);
    for handle in handles {
        let _ = handle.await;
    }
    Ok(winner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate() -> Block {
        Block::new(
            1,
            "2024-01-01T00:00:00Z".into(),
            json!({ "from": "A", "to": "B", "amount": 10 }),
            "prev".into(),
        )
    }

    #[test]
    fn difficulty_zero_is_immediate() {
        let mut block = candidate();
        let before = block.hash.clone();
        assert_eq!(mine(&mut block, 0), Ok(0));
        assert_eq!(block.hash, before);
    }

    #[test]
    fn mined_hash_meets_target() {
        for difficulty in 1..=3 {
            let mut block = candidate();
            let nonce = mine(&mut block, difficulty).unwrap();
            assert_eq!(block.nonce, nonce);
            assert!(meets_difficulty(&block.hash, difficulty));
            assert_eq!(block.hash, block.compute_hash());
        }
    }

    #[test]
    fn unsatisfiable_difficulty_is_rejected() {
        let mut block = candidate();
        assert_eq!(mine(&mut block, MAX_DIFFICULTY + 1), Err(Error::BadDifficulty));
    }

    #[test]
    fn cancelled_search_stops_consistent() {
        let mut block = candidate();
        let cancel = AtomicBool::new(true);
        // a fresh block almost surely misses 8 leading zeros, so the flag
        // is seen on the first pass
        if let Some(nonce) = mine_until(&mut block, 8, &cancel) {
            assert_eq!(nonce, 0);
        }
        assert_eq!(block.hash, block.compute_hash());
    }

    #[test]
    fn difficulty_predicate() {
        assert!(meets_difficulty("00abc", 2));
        assert!(!meets_difficulty("0abc", 2));
        assert!(meets_difficulty("anything", 0));
        assert!(!meets_difficulty("0", 2));
    }

    #[tokio::test]
    async fn race_picks_a_qualifying_winner() {
        let miners = vec!["alice".to_string(), "bob".to_string(), "carol".to_string()];
        let receipt = race(&miners, json!({ "amount": 10 }), "prev", 2).await.unwrap();
        assert!(miners.contains(&receipt.miner));
        assert!(meets_difficulty(&receipt.hash, 2));
    }

    #[tokio::test]
    async fn race_rejects_bad_input() {
        assert_eq!(
            race(&[], json!(null), "prev", 1).await,
            Err(Error::NoMiners)
        );
        let miners = vec!["alice".to_string()];
        assert_eq!(
            race(&miners, json!(null), "prev", MAX_DIFFICULTY + 1).await,
            Err(Error::BadDifficulty)
        );
    }
}
