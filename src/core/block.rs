//! Blocks and per-block structural validation
//!
//! A block carries exactly one transaction. Its hash is the SHA-256 of
//! `height ‖ transaction ‖ timestamps ‖ nonce ‖ prev_hash`, hex-encoded;
//! the serde field names below are the wire format blocks cross the
//! transport in.

use crate::core::ledger::Ledger;
use crate::core::transaction::Transaction;
use crate::crypto::sha256_hex;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a block failed structural validation
#[derive(Error, Debug)]
pub enum BlockError {
    #[error("invalid height: expected {expected}, got {actual}")]
    HeightMismatch { expected: u64, actual: u64 },
    #[error("previous hash does not match the chain tip")]
    PrevHashMismatch,
    #[error("stored hash does not match block contents")]
    HashMismatch,
}

/// A block in the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Height in the chain; genesis is 0
    pub height: u64,
    /// The single transaction this block carries
    #[serde(rename = "transaction_data")]
    pub tx: Transaction,
    /// Free-form creation timestamp; empty for genesis
    pub timestamps: String,
    /// Nonce found by the proof-of-work search
    pub nonce: u64,
    /// Hex SHA-256 over this block's contents
    pub hash: String,
    /// Hash of the predecessor; empty for genesis
    pub prev_hash: String,
}

impl Block {
    /// The height-0 block, hashed over empty/default fields.
    ///
    /// Synthesized exactly once, when the ledger is constructed.
    pub fn genesis() -> Self {
        let mut block = Self {
            height: 0,
            tx: Transaction::default(),
            timestamps: String::new(),
            nonce: 0,
            hash: String::new(),
            prev_hash: String::new(),
        };
        block.hash = block.calculate_hash();
        block
    }

    /// An unmined candidate extending `tip` (or starting a chain at height 0)
    pub fn candidate(tip: Option<&Block>, tx: Transaction) -> Self {
        let (height, prev_hash) = match tip {
            Some(tip) => (tip.height + 1, tip.hash.clone()),
            None => (0, String::new()),
        };
        Self {
            height,
            tx,
            timestamps: Utc::now().to_rfc3339(),
            nonce: 0,
            hash: String::new(),
            prev_hash,
        }
    }

    /// Hash of this block's contents. Pure; identical fields always yield
    /// an identical digest.
    pub fn calculate_hash(&self) -> String {
        let data = format!(
            "{}{}{}{}{}",
            self.height,
            self.tx.canonical_string(),
            self.timestamps,
            self.nonce,
            self.prev_hash
        );
        sha256_hex(data.as_bytes())
    }

    /// Does the stored hash match the block contents?
    pub fn validate_hash(&self) -> bool {
        self.calculate_hash() == self.hash
    }

    /// Structural validation against the current chain tip: height linkage,
    /// previous-hash linkage, and hash integrity. A failing block must be
    /// discarded, never appended.
    pub fn validate(&self, ledger: &Ledger) -> Result<(), BlockError> {
        if let Some(tip) = ledger.tip() {
            if tip.height + 1 != self.height {
                return Err(BlockError::HeightMismatch {
                    expected: tip.height + 1,
                    actual: self.height,
                });
            }
            if tip.hash != self.prev_hash {
                return Err(BlockError::PrevHashMismatch);
            }
        }
        if !self.validate_hash() {
            return Err(BlockError::HashMismatch);
        }
        Ok(())
    }

    /// True when this block competes with the current tip — same height,
    /// branch point detected. Resolution is left to the caller; this core
    /// never picks a winner.
    pub fn is_new_fork(&self, ledger: &Ledger) -> bool {
        matches!(ledger.tip(), Some(tip) if tip.height == self.height)
    }
}

/// Test-only nonce search; the real one lives in the miner
#[cfg(test)]
pub(crate) fn mine(block: &mut Block, difficulty: usize) {
    use crate::crypto::meets_difficulty;
    for nonce in 0.. {
        block.nonce = nonce;
        let hash = block.calculate_hash();
        if meets_difficulty(&hash, difficulty) {
            block.hash = hash;
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ledger::Ledger;

    #[test]
    fn test_hash_is_deterministic() {
        let block = Block::genesis();
        assert_eq!(block.calculate_hash(), block.calculate_hash());

        let twin = Block::genesis();
        assert_eq!(block.hash, twin.hash);
    }

    #[test]
    fn test_hash_covers_all_fields() {
        let base = Block::genesis();
        let mut block = base.clone();
        block.nonce += 1;
        assert_ne!(block.calculate_hash(), base.hash);

        let mut block = base.clone();
        block.timestamps = "2026-01-01T00:00:00+00:00".into();
        assert_ne!(block.calculate_hash(), base.hash);

        let mut block = base.clone();
        block.tx.amount = 1;
        assert_ne!(block.calculate_hash(), base.hash);
    }

    #[test]
    fn test_validate_hash_detects_tampering() {
        let mut block = Block::genesis();
        assert!(block.validate_hash());
        block.nonce = 7;
        assert!(!block.validate_hash());
    }

    #[test]
    fn test_genesis_only_ledger_is_valid() {
        let ledger = Ledger::new(2);
        assert_eq!(ledger.tip_height(), 0);
        let genesis = ledger.tip().unwrap();
        assert_eq!(genesis.prev_hash, "");
        assert!(genesis.validate_hash());
    }

    #[test]
    fn test_linked_candidate_passes_validation() {
        let ledger = Ledger::new(2);
        let mut block = Block::candidate(ledger.tip(), Transaction::default());
        mine(&mut block, 2);

        assert!(block.validate(&ledger).is_ok());
        assert!(block.hash.starts_with("00"));
    }

    #[test]
    fn test_wrong_height_rejected() {
        let ledger = Ledger::new(2);
        let mut block = Block::candidate(ledger.tip(), Transaction::default());
        block.height = 5;
        mine(&mut block, 0);

        assert!(matches!(
            block.validate(&ledger),
            Err(BlockError::HeightMismatch {
                expected: 1,
                actual: 5
            })
        ));
    }

    #[test]
    fn test_mismatched_prev_hash_rejected() {
        let ledger = Ledger::new(2);
        let mut block = Block::candidate(ledger.tip(), Transaction::default());
        block.prev_hash = "beef".repeat(16);
        mine(&mut block, 0);

        assert!(matches!(
            block.validate(&ledger),
            Err(BlockError::PrevHashMismatch)
        ));
    }

    #[test]
    fn test_stale_hash_rejected() {
        let ledger = Ledger::new(2);
        let mut block = Block::candidate(ledger.tip(), Transaction::default());
        mine(&mut block, 0);
        block.nonce += 1;

        assert!(matches!(block.validate(&ledger), Err(BlockError::HashMismatch)));
    }

    #[test]
    fn test_fork_detection() {
        let ledger = Ledger::new(2);

        let same_height = Block {
            height: 0,
            ..Block::genesis()
        };
        assert!(same_height.is_new_fork(&ledger));

        let next_height = Block::candidate(ledger.tip(), Transaction::default());
        assert!(!next_height.is_new_fork(&ledger));
    }

    #[test]
    fn test_wire_format_field_names() {
        let block = Block::genesis();
        let json: serde_json::Value = serde_json::from_str(&serde_json::to_string(&block).unwrap()).unwrap();

        for field in ["height", "transaction_data", "timestamps", "nonce", "hash", "prev_hash"] {
            assert!(json.get(field).is_some(), "missing wire field {field}");
        }
        assert_eq!(json["hash"].as_str().unwrap().len(), 64);
    }
}
