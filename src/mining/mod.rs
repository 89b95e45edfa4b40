//! Block production: the nonce search and the mempool seam

pub mod mempool;
pub mod miner;

pub use mempool::{FifoMempool, TxSource};
pub use miner::{Miner, MinerConfig, MiningOutcome};
