use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use caucus::block::Block;
use caucus::{chain, miner, sim};

/// Runs the tamper-detection walkthrough, a single mining demo, and one
/// round of each consensus policy.
#[derive(Parser, Debug)]
#[command(name = "caucus")]
struct Args {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Leading zero hex chars a mined hash must carry
    #[arg(long)]
    difficulty: Option<usize>,
    /// Seed for the selection RNG; omit for entropy
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    miners: Option<usize>,
    #[arg(long)]
    validators: Option<usize>,
    #[arg(long)]
    delegates: Option<usize>,
    #[arg(long)]
    voters: Option<usize>,
}

fn load_config(args: &Args) -> Result<sim::Config, String> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("can't read {}: {}", path.display(), e))?;
            serde_json::from_str(&text)
                .map_err(|e| format!("can't parse {}: {}", path.display(), e))?
        }
        None => sim::Config::default(),
    };
    if let Some(d) = args.difficulty {
        config.difficulty = d;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(n) = args.miners {
        config.miners = n;
    }
    if let Some(n) = args.validators {
        config.validators = n;
    }
    if let Some(n) = args.delegates {
        config.delegates = n;
    }
    if let Some(n) = args.voters {
        config.voters = n;
    }
    Ok(config)
}

/// Three payload-bearing blocks on a genesis: tamper with one, watch the
/// chain break, then re-link downstream and watch it recover.
fn tamper_walkthrough() {
    let genesis = Block::genesis(json!(null));
    let one = genesis.next(json!({ "amount": 100 }));
    let two = one.next(json!({ "amount": 200 }));
    let three = two.next(json!({ "amount": 300 }));
    let mut blocks = vec![genesis, one, two, three];
    info!(valid = chain::is_chain_valid(&blocks), "fresh chain");

    blocks[1].payload = json!({ "amount": 999 });
    blocks[1].recompute_hash();
    info!(valid = chain::is_chain_valid(&blocks), "after tampering block 1");

    chain::relink(&mut blocks);
    info!(valid = chain::is_chain_valid(&blocks), "after re-linking downstream");
}

fn single_mine(difficulty: usize) -> Result<(), miner::Error> {
    let mut block = Block::now(
        1,
        json!({ "sender": "Alice", "receiver": "Bob", "amount": 42 }),
        caucus::block::GENESIS_HASH.into(),
    );
    info!(index = block.index, difficulty, "mining one block");
    let start = Instant::now();
    let nonce = miner::mine(&mut block, difficulty)?;
    info!(
        nonce,
        hash = %block.hash,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "block mined"
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(msg) => {
            error!("{}", msg);
            process::exit(1);
        }
    };
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    tamper_walkthrough();

    if let Err(e) = single_mine(config.difficulty) {
        error!(?e, "mining demo failed");
        process::exit(1);
    }

    match sim::run_all(&config, &mut rng).await {
        Ok(outcome) => {
            info!(
                winner = %outcome.pow.miner,
                nonce = outcome.pow.nonce,
                hash = %outcome.pow.hash,
                elapsed_ms = outcome.pow.elapsed.as_millis() as u64,
                "pow race"
            );
            info!(winner = %outcome.pos.name, stake = outcome.pos.stake, "pos draw");
            info!(winner = %outcome.dpos.name, votes = outcome.dpos.votes, "dpos election");
        }
        Err(e) => {
            error!(?e, "consensus round failed");
            process::exit(1);
        }
    }
}
