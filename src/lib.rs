//! Educational consensus simulator: hash-linked blocks with tamper
//! detection, and three policies for picking a block producer
//! (proof-of-work, proof-of-stake, delegated proof-of-stake).

pub mod hash;
pub mod block;
pub mod chain;
pub mod miner;
pub mod pos;
pub mod dpos;
pub mod sim;
