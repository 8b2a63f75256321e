use crate::block::Block;

/// Link and hash integrity over an ordered sequence of blocks.
///
/// For every adjacent pair the successor must reference the predecessor's
/// cached hash, and its own cached hash must match a fresh recomputation.
/// Chains of length 0 or 1 are trivially valid; block 0 is never checked
/// against anything.
pub fn is_chain_valid(blocks: &[Block]) -> bool {
    for i in 1..blocks.len() {
        if blocks[i].prev_hash != blocks[i - 1].hash {
            return false;
        }
        if blocks[i].hash != blocks[i].compute_hash() {
            return false;
        }
    }
    true
}

/// Repair pass after upstream edits: re-point every successor at its
/// predecessor's current hash and recompute forward.
pub fn relink(blocks: &mut [Block]) {
    for i in 1..blocks.len() {
        blocks[i].prev_hash = blocks[i - 1].hash.clone();
        blocks[i].recompute_hash();
    }
}
