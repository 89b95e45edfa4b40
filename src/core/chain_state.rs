//! Shared chain state: ledger plus UTXO set behind one lock
//!
//! The miner and the inbound-block handler are both writers. Keeping the
//! ledger and the UTXO set under a single `RwLock` means the balance check
//! inside transaction validation can never race a concurrent spend: a block
//! is validated, appended, and has its UTXO side effects applied in one
//! critical section. No lock is held across the nonce search.

use crate::core::block::{Block, BlockError};
use crate::core::ledger::Ledger;
use crate::core::utxo::UtxoSet;
use crate::core::validation::{self, TxRejection};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// How the two writer roles share the chain
pub type SharedChain = Arc<RwLock<ChainState>>;

/// Why a block was not accepted
#[derive(Error, Debug)]
pub enum AcceptError {
    #[error("block rejected: {0}")]
    Block(#[from] BlockError),
    #[error("transaction rejected: {0}")]
    Tx(#[from] TxRejection),
}

/// The ledger and the spendable-output index it implies
#[derive(Debug, Default)]
pub struct ChainState {
    ledger: Ledger,
    utxos: UtxoSet,
}

impl ChainState {
    pub fn new(difficulty: usize) -> Self {
        Self {
            ledger: Ledger::new(difficulty),
            utxos: UtxoSet::new(),
        }
    }

    /// Wrap a fresh chain for sharing between the miner and the inbound
    /// handler
    pub fn shared(difficulty: usize) -> SharedChain {
        Arc::new(RwLock::new(Self::new(difficulty)))
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn utxos(&self) -> &UtxoSet {
        &self.utxos
    }

    /// Spendable balance for an address
    pub fn balance(&self, address: &str) -> u64 {
        self.utxos.total_by_address(address)
    }

    /// Validate a block and, on success, append it and apply its
    /// transaction's UTXO side effects — all atomically. Rejection leaves
    /// both the ledger and the UTXO set untouched.
    pub fn try_accept(&mut self, block: Block) -> Result<(), AcceptError> {
        block.validate(&self.ledger)?;

        // Sentinel transactions (genesis, blocks mined from an empty pool)
        // carry nothing to validate or apply
        if !block.tx.is_empty() {
            validation::validate(&block.tx, &self.utxos)?;

            for input in &block.tx.inputs {
                self.utxos.remove(&input.tx_id, input.output_index);
            }
            for output in &block.tx.outputs {
                self.utxos
                    .add(&output.tx_id, output.output_index, output.amount, &output.address);
            }
        }

        log::info!("accepted block {} ({})", block.height, block.hash);
        self.ledger.append(block);
        Ok(())
    }

    /// Seed a spendable output directly, bypassing validation.
    ///
    /// This stands in for the coinbase/faucet path the full node owns;
    /// tests and embedders use it to fund addresses.
    pub fn credit(&mut self, tx_id: &str, output_index: u32, amount: u64, address: &str) {
        self.utxos.add(tx_id, output_index, amount, address);
    }
}
