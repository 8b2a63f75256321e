use caucus::block::Block;
use caucus::{hash, miner};

use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::json;

fn hashing(crit: &mut Criterion) {
    let payload = json!({ "from": "A", "to": "B", "amount": 10 });
    crit.bench_function("block digest", |b| b.iter(|| {
        let _ = hash::digest(1, "2024-01-01T00:00:00Z", &payload, "0", 7);
    }));
}

fn mining(crit: &mut Criterion) {
    crit.bench_function("mine difficulty 2", |b| b.iter(|| {
        let mut block = Block::new(
            1,
            "2024-01-01T00:00:00Z".into(),
            json!({ "from": "A", "to": "B", "amount": 10 }),
            "0".into(),
        );
        miner::mine(&mut block, 2).unwrap();
    }));
}

criterion_group!(benches, hashing, mining);
criterion_main!(benches);
