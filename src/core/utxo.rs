//! Unspent transaction output tracking
//!
//! The UTXO set is the spendable-output index the balance check runs
//! against. Spend-once enforcement is the validator's job; this module only
//! maintains the index.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An unspent transaction output
///
/// Identified by `(tx_id, output_index)`; immutable once created and removed
/// atomically when spent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    /// Transaction that created this output
    pub tx_id: String,
    /// Position within that transaction's outputs
    pub output_index: u32,
    /// Spendable amount
    pub amount: u64,
    /// Owning address
    pub address: String,
}

/// The set of spendable outputs, keyed by transaction id then output index
///
/// Invariant: an outer entry exists only while it holds at least one output;
/// emptied inner maps are pruned on removal.
#[derive(Debug, Default, Clone)]
pub struct UtxoSet {
    outputs: HashMap<String, HashMap<u32, Utxo>>,
}

impl UtxoSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the output at `(tx_id, output_index)`
    pub fn add(&mut self, tx_id: &str, output_index: u32, amount: u64, address: &str) {
        self.outputs.entry(tx_id.to_string()).or_default().insert(
            output_index,
            Utxo {
                tx_id: tx_id.to_string(),
                output_index,
                amount,
                address: address.to_string(),
            },
        );
    }

    /// Delete the output at `(tx_id, output_index)` if present.
    ///
    /// No-op when absent; prunes the transaction entry once its last output
    /// is gone.
    pub fn remove(&mut self, tx_id: &str, output_index: u32) {
        if let Some(entries) = self.outputs.get_mut(tx_id) {
            entries.remove(&output_index);
            if entries.is_empty() {
                self.outputs.remove(tx_id);
            }
        }
    }

    /// Look up a single output
    pub fn get(&self, tx_id: &str, output_index: u32) -> Option<&Utxo> {
        self.outputs.get(tx_id)?.get(&output_index)
    }

    /// All outputs currently owned by an address, in no particular order
    pub fn by_address(&self, address: &str) -> Vec<Utxo> {
        self.outputs
            .values()
            .flat_map(|entries| entries.values())
            .filter(|utxo| utxo.address == address)
            .cloned()
            .collect()
    }

    /// Total spendable amount for an address
    pub fn total_by_address(&self, address: &str) -> u64 {
        self.by_address(address).iter().map(|u| u.amount).sum()
    }

    /// Number of transactions with at least one unspent output
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_balance() {
        let mut set = UtxoSet::new();
        set.add("tx1", 0, 40, "alice");
        set.add("tx1", 1, 10, "bob");
        set.add("tx2", 0, 25, "alice");

        assert_eq!(set.total_by_address("alice"), 65);
        assert_eq!(set.total_by_address("bob"), 10);
        assert_eq!(set.total_by_address("carol"), 0);
        assert_eq!(set.by_address("alice").len(), 2);
    }

    #[test]
    fn test_add_overwrites_same_key() {
        let mut set = UtxoSet::new();
        set.add("tx1", 0, 40, "alice");
        set.add("tx1", 0, 15, "alice");
        assert_eq!(set.total_by_address("alice"), 15);
    }

    #[test]
    fn test_remove_prunes_empty_entries() {
        let mut set = UtxoSet::new();
        set.add("tx1", 0, 40, "alice");
        set.add("tx1", 1, 10, "alice");

        set.remove("tx1", 0);
        assert_eq!(set.len(), 1);

        set.remove("tx1", 1);
        assert!(set.is_empty());
        assert!(set.get("tx1", 1).is_none());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut set = UtxoSet::new();
        set.add("tx1", 0, 40, "alice");
        set.remove("tx9", 0);
        set.remove("tx1", 7);
        assert_eq!(set.total_by_address("alice"), 40);
    }
}
