//! The proof-of-work miner
//!
//! One mining attempt runs ASSEMBLE → SEARCH → {FOUND | ABANDONED}: take a
//! pending transaction (or the sentinel), build a candidate on the current
//! tip, walk nonces until the hash hits the difficulty target, then
//! re-validate and append under the chain lock and hand the serialized
//! block to the publisher. A block seen from the network at the candidate's
//! height abandons the search — that race is already lost.

use crate::core::{validation, Block, SharedChain, Transaction};
use crate::crypto::meets_difficulty;
use crate::mining::mempool::TxSource;
use crate::network::BlockPublisher;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Attempts between cooperative yields in the search loop
const YIELD_INTERVAL: u64 = 256;

/// Tuning for the nonce search
#[derive(Debug, Clone)]
pub struct MinerConfig {
    /// Pause inserted every [`YIELD_INTERVAL`] attempts. Zero degrades to a
    /// bare scheduler yield.
    pub throttle: Duration,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            throttle: Duration::from_millis(2),
        }
    }
}

/// Result of one full mining cycle
#[derive(Debug)]
pub enum MiningOutcome {
    /// Candidate accepted locally and handed to the publisher
    Mined(Block),
    /// Another block claimed this height while we searched
    Abandoned { height: u64 },
    /// Found a nonce but the candidate no longer validated; dropped
    Discarded,
}

enum SearchOutcome {
    Found,
    Abandoned,
}

/// Long-running mining worker
pub struct Miner {
    chain: SharedChain,
    pool: Arc<dyn TxSource>,
    publisher: Arc<dyn BlockPublisher>,
    /// Blocks the inbound handler accepted from the network
    notifications: mpsc::Receiver<Block>,
    config: MinerConfig,
}

impl Miner {
    pub fn new(
        chain: SharedChain,
        pool: Arc<dyn TxSource>,
        publisher: Arc<dyn BlockPublisher>,
        notifications: mpsc::Receiver<Block>,
        config: MinerConfig,
    ) -> Self {
        Self {
            chain,
            pool,
            publisher,
            notifications,
            config,
        }
    }

    /// Mine until the process exits; there is no terminal state.
    pub async fn run(mut self) {
        loop {
            self.mine_once().await;
        }
    }

    /// One ASSEMBLE → SEARCH → {FOUND | ABANDONED} cycle
    pub async fn mine_once(&mut self) -> MiningOutcome {
        let tx = self.assemble_tx().await;

        let (mut candidate, difficulty) = {
            let chain = self.chain.read().await;
            let ledger = chain.ledger();
            (Block::candidate(ledger.tip(), tx), ledger.difficulty())
        };

        log::info!(
            "mining block {} at difficulty {}",
            candidate.height,
            difficulty
        );

        match self.search(&mut candidate, difficulty).await {
            SearchOutcome::Abandoned => {
                log::info!("abandoning block {}: height already claimed", candidate.height);
                MiningOutcome::Abandoned {
                    height: candidate.height,
                }
            }
            SearchOutcome::Found => {
                let mut chain = self.chain.write().await;
                match chain.try_accept(candidate.clone()) {
                    Ok(()) => {
                        drop(chain);
                        log::info!("mined block {} ({})", candidate.height, candidate.hash);
                        self.publish(&candidate);
                        MiningOutcome::Mined(candidate)
                    }
                    Err(err) => {
                        log::warn!(
                            "discarding mined block {}: {}",
                            candidate.height,
                            err
                        );
                        MiningOutcome::Discarded
                    }
                }
            }
        }
    }

    /// Pull the next valid pending transaction; mine the sentinel when the
    /// pool has nothing usable
    async fn assemble_tx(&self) -> Transaction {
        let chain = self.chain.read().await;
        while let Some(tx) = self.pool.next_pending() {
            match validation::validate(&tx, chain.utxos()) {
                Ok(()) => return tx,
                Err(err) => log::warn!("dropping pending transaction {}: {}", tx.id, err),
            }
        }
        Transaction::default()
    }

    /// Walk nonces from 0 until the hash meets the target or the height is
    /// claimed by a network block. The race check is a non-blocking poll so
    /// the search stays live when no competitor ever shows up; no lock is
    /// held here.
    async fn search(&mut self, block: &mut Block, difficulty: usize) -> SearchOutcome {
        let mut nonce: u64 = 0;
        loop {
            block.nonce = nonce;
            let hash = block.calculate_hash();
            if meets_difficulty(&hash, difficulty) {
                block.hash = hash;
                return SearchOutcome::Found;
            }

            match self.notifications.try_recv() {
                Ok(seen) if seen.height == block.height => return SearchOutcome::Abandoned,
                _ => {}
            }

            nonce = nonce.wrapping_add(1);
            if nonce % YIELD_INTERVAL == 0 {
                if self.config.throttle.is_zero() {
                    tokio::task::yield_now().await;
                } else {
                    tokio::time::sleep(self.config.throttle).await;
                }
            }
        }
    }

    /// Serialize and hand off to the transport. The block is locally final
    /// either way: delivery failures are logged, never rolled back.
    fn publish(&self, block: &Block) {
        let payload = match serde_json::to_vec(block) {
            Ok(payload) => payload,
            Err(err) => {
                log::error!("failed to serialize block {}: {}", block.hash, err);
                return;
            }
        };
        match self.publisher.publish(payload) {
            Ok(()) => log::info!("block {} handed to transport", block.hash),
            Err(err) => log::error!("failed to publish block {}: {}", block.hash, err),
        }
    }
}
