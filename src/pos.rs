use rand::Rng;
use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Validator {
    pub name: String,
    pub stake: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    NoValidators,
    BadStake,
}

/// Stake-weighted draw: one uniform integer in `[0, total_stake)` mapped
/// through cumulative stake intervals, so selection probability is exactly
/// stake / total regardless of roster order. Memory stays O(1) in the stake
/// values, unlike expanding a flat lottery of repeated names.
pub fn select_validator<'a, R: Rng>(
    validators: &'a [Validator],
    rng: &mut R,
) -> Result<&'a Validator, Error> {
    if validators.is_empty() {
        return Err(Error::NoValidators);
    }
    if validators.iter().any(|v| v.stake == 0) {
        return Err(Error::BadStake);
    }
    let total: u64 = validators.iter().map(|v| v.stake).sum();
    let draw = rng.gen_range(0, total);
    let mut cumulative = 0;
    for validator in validators {
        cumulative += validator.stake;
        if draw < cumulative {
            return Ok(validator);
        }
    }
    unreachable!("draw is below total stake")
}
