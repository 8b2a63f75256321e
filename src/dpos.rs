use rand::Rng;
use serde::{Serialize, Deserialize};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Delegate {
    pub name: String,
    pub votes: u32,
}

impl Delegate {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), votes: 0 }
    }
}

/// A voter casts exactly one ballot per round: for `preference` when set,
/// for a uniformly random delegate otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Voter {
    pub name: String,
    pub preference: Option<String>,
}

impl Voter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), preference: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    NoDelegates,
    NoVoters,
    UnknownDelegate,
}

/// One election round: tallies reset to zero, every voter casts one ballot,
/// the winner is drawn uniformly among the delegates tied for the highest
/// tally.
pub fn elect<'a, R: Rng>(
    delegates: &'a mut [Delegate],
    voters: &[Voter],
    rng: &mut R,
) -> Result<&'a Delegate, Error> {
    if delegates.is_empty() {
        return Err(Error::NoDelegates);
    }
    if voters.is_empty() {
        return Err(Error::NoVoters);
    }
    for delegate in delegates.iter_mut() {
        delegate.votes = 0;
    }
    for voter in voters {
        let idx = match &voter.preference {
            Some(name) => delegates
                .iter()
                .position(|d| &d.name == name)
                .ok_or(Error::UnknownDelegate)?,
            None => rng.gen_range(0, delegates.len()),
        };
        delegates[idx].votes += 1;
        debug!(voter = %voter.name, delegate = %delegates[idx].name, "ballot cast");
    }
    let top = delegates.iter().map(|d| d.votes).max().unwrap_or(0);
    let tied: Vec<usize> = delegates
        .iter()
        .enumerate()
        .filter(|(_, d)| d.votes == top)
        .map(|(i, _)| i)
        .collect();
    let winner = tied[rng.gen_range(0, tied.len())];
    Ok(&delegates[winner])
}
