//! The append-only chain of accepted blocks
//!
//! The ledger owns the block sequence outright: it is created once with a
//! synthesized genesis block, grows only through [`Ledger::append`], and is
//! never truncated or rewritten. Reorgs are out of scope.

use crate::core::block::Block;

/// Default proof-of-work target: leading `'0'` hex characters required
pub const DEFAULT_DIFFICULTY: usize = 2;

/// The ordered sequence of accepted blocks plus the difficulty target
#[derive(Debug, Clone)]
pub struct Ledger {
    blocks: Vec<Block>,
    difficulty: usize,
}

impl Ledger {
    /// Create a ledger holding only the genesis block
    pub fn new(difficulty: usize) -> Self {
        Self {
            blocks: vec![Block::genesis()],
            difficulty,
        }
    }

    /// Push an already-validated block onto the chain.
    ///
    /// The ledger does not re-validate; callers go through
    /// [`crate::core::ChainState::try_accept`].
    pub fn append(&mut self, block: Block) {
        log::debug!("appending block {} ({})", block.height, block.hash);
        self.blocks.push(block);
    }

    /// The current tip, if any
    pub fn tip(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Height of the tip, or −1 for an empty ledger.
    ///
    /// The empty case is unreachable after construction — genesis is always
    /// present — but the contract is kept.
    pub fn tip_height(&self) -> i64 {
        match self.blocks.last() {
            Some(block) => block.height as i64,
            None => -1,
        }
    }

    /// Proof-of-work target for new blocks
    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    /// Block at a given height
    pub fn get(&self, height: u64) -> Option<&Block> {
        self.blocks.get(height as usize)
    }

    /// All accepted blocks, genesis first
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Walk the whole chain checking linkage and hash integrity
    pub fn verify_chain(&self) -> bool {
        for pair in self.blocks.windows(2) {
            let (prev, current) = (&pair[0], &pair[1]);
            if current.height != prev.height + 1
                || current.prev_hash != prev.hash
                || !current.validate_hash()
            {
                return false;
            }
        }
        true
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(DEFAULT_DIFFICULTY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transaction::Transaction;

    fn extend(ledger: &mut Ledger) {
        let mut block = Block::candidate(ledger.tip(), Transaction::default());
        block.hash = block.calculate_hash();
        ledger.append(block);
    }

    #[test]
    fn test_starts_at_genesis() {
        let ledger = Ledger::new(DEFAULT_DIFFICULTY);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.tip_height(), 0);
        assert_eq!(ledger.difficulty(), 2);
    }

    #[test]
    fn test_append_advances_tip() {
        let mut ledger = Ledger::new(2);
        extend(&mut ledger);
        extend(&mut ledger);

        assert_eq!(ledger.tip_height(), 2);
        assert_eq!(ledger.get(1).unwrap().height, 1);
        assert!(ledger.verify_chain());
    }

    #[test]
    fn test_chain_linkage_holds_for_adjacent_pairs() {
        let mut ledger = Ledger::new(2);
        for _ in 0..4 {
            extend(&mut ledger);
        }
        for pair in ledger.blocks().windows(2) {
            assert_eq!(pair[1].height, pair[0].height + 1);
            assert_eq!(pair[1].prev_hash, pair[0].hash);
        }
    }

    #[test]
    fn test_verify_chain_catches_broken_link() {
        let mut ledger = Ledger::new(2);
        extend(&mut ledger);

        let mut orphan = Block::candidate(ledger.tip(), Transaction::default());
        orphan.prev_hash = "feed".repeat(16);
        orphan.hash = orphan.calculate_hash();
        ledger.append(orphan);

        assert!(!ledger.verify_chain());
    }
}
