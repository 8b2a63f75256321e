use names::Generator;
use rand::Rng;
use serde::{Serialize, Deserialize};
use serde_json::{json, Value};
use tracing::info;

use crate::block::GENESIS_HASH;
use crate::{dpos, miner, pos};

/// Knobs for one simulation run. Defaults mirror the classic demo: three
/// miners at difficulty 4, three validators, three delegates, five voters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub difficulty: usize,
    pub seed: Option<u64>,
    pub miners: usize,
    pub validators: usize,
    pub delegates: usize,
    pub voters: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            difficulty: 4,
            seed: None,
            miners: 3,
            validators: 3,
            delegates: 3,
            voters: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rosters {
    pub miners: Vec<String>,
    pub validators: Vec<pos::Validator>,
    pub delegates: Vec<dpos::Delegate>,
    pub voters: Vec<dpos::Voter>,
}

/// Fresh actors for one run, discarded afterwards. Stakes are drawn from
/// the caller's generator in 10..=100; names come from the name generator
/// and carry no identity beyond the run.
pub fn rosters<R: Rng>(config: &Config, rng: &mut R) -> Rosters {
    let mut generator = Generator::default();
    let mut name = move || generator.next().unwrap_or_else(|| String::from("anon"));
    Rosters {
        miners: (0..config.miners).map(|_| name()).collect(),
        validators: (0..config.validators)
            .map(|_| pos::Validator { name: name(), stake: rng.gen_range(10, 101) })
            .collect(),
        delegates: (0..config.delegates).map(|_| dpos::Delegate::new(name())).collect(),
        voters: (0..config.voters).map(|_| dpos::Voter::new(name())).collect(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PosOutcome {
    pub name: String,
    pub stake: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DposOutcome {
    pub name: String,
    pub votes: u32,
}

/// Winners of the three consensus rounds, as plain data for presentation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Outcome {
    pub pow: miner::Receipt,
    pub pos: PosOutcome,
    pub dpos: DposOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Pow(miner::Error),
    Pos(pos::Error),
    Dpos(dpos::Error),
}

impl From<miner::Error> for Error {
    fn from(e: miner::Error) -> Self {
        Error::Pow(e)
    }
}

impl From<pos::Error> for Error {
    fn from(e: pos::Error) -> Self {
        Error::Pos(e)
    }
}

impl From<dpos::Error> for Error {
    fn from(e: dpos::Error) -> Self {
        Error::Dpos(e)
    }
}

pub fn demo_payload() -> Value {
    json!({ "from": "A", "to": "B", "amount": 10 })
}

pub async fn run_pow(miners: &[String], difficulty: usize) -> Result<miner::Receipt, miner::Error> {
    miner::race(miners, demo_payload(), GENESIS_HASH, difficulty).await
}

pub fn run_pos<R: Rng>(validators: &[pos::Validator], rng: &mut R) -> Result<PosOutcome, pos::Error> {
    let winner = pos::select_validator(validators, rng)?;
    Ok(PosOutcome { name: winner.name.clone(), stake: winner.stake })
}

pub fn run_dpos<R: Rng>(
    delegates: &mut [dpos::Delegate],
    voters: &[dpos::Voter],
    rng: &mut R,
) -> Result<DposOutcome, dpos::Error> {
    let winner = dpos::elect(delegates, voters, rng)?;
    Ok(DposOutcome { name: winner.name.clone(), votes: winner.votes })
}

/// All three consensus rounds over freshly generated rosters.
pub async fn run_all<R: Rng>(config: &Config, rng: &mut R) -> Result<Outcome, Error> {
    let mut rosters = rosters(config, rng);
    info!(
        miners = rosters.miners.len(),
        validators = rosters.validators.len(),
        delegates = rosters.delegates.len(),
        voters = rosters.voters.len(),
        "rosters drawn"
    );
    let pow = run_pow(&rosters.miners, config.difficulty).await?;
    let pos = run_pos(&rosters.validators, rng)?;
    let dpos = run_dpos(&mut rosters.delegates, &rosters.voters, rng)?;
    Ok(Outcome { pow, pos, dpos })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn rosters_respect_config() {
        let config = Config { miners: 2, validators: 4, delegates: 3, voters: 7, ..Config::default() };
        let mut rng = StdRng::seed_from_u64(0);
        let rosters = rosters(&config, &mut rng);
        assert_eq!(rosters.miners.len(), 2);
        assert_eq!(rosters.validators.len(), 4);
        assert_eq!(rosters.delegates.len(), 3);
        assert_eq!(rosters.voters.len(), 7);
        assert!(rosters.validators.iter().all(|v| (10..=100).contains(&v.stake)));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: Config = serde_json::from_str(r#"{ "difficulty": 2, "seed": 9 }"#).unwrap();
        assert_eq!(config.difficulty, 2);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.miners, 3);
        assert_eq!(config.voters, 5);
    }

    #[tokio::test]
    async fn run_all_produces_consistent_outcome() {
        let config = Config { difficulty: 1, ..Config::default() };
        let mut rng = StdRng::seed_from_u64(11);
        let outcome = run_all(&config, &mut rng).await.unwrap();
        assert!(miner::meets_difficulty(&outcome.pow.hash, 1));
        assert!(outcome.pos.stake >= 10);
        assert!(outcome.dpos.votes >= 1);
    }
}
