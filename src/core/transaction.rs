//! Single-transfer transactions
//!
//! Each block carries exactly one transaction: a signed transfer of `amount`
//! from `sender` to `recipient`, spending a set of input UTXOs and creating
//! a set of output UTXOs. The sender field is the base58 wire form of the
//! sender's public key; the signature covers [`Transaction::digest`].

use crate::core::utxo::Utxo;
use crate::crypto::{sha256, KeyError, KeyPair};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// A signed transfer between two addresses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction id
    pub id: String,
    /// Base58 compressed public key of the sender
    pub sender: String,
    /// Recipient address
    pub recipient: String,
    /// Amount transferred
    pub amount: u64,
    /// Base58 compact ECDSA signature over [`Transaction::digest`]
    pub signature: String,
    /// Outputs consumed by this transfer
    pub inputs: Vec<Utxo>,
    /// Outputs created by this transfer
    pub outputs: Vec<Utxo>,
}

impl Transaction {
    /// The sentinel carried by genesis and by blocks mined from an empty
    /// pool: no inputs, no outputs, nothing to validate or apply.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && self.outputs.is_empty()
    }

    /// The digest the signature covers: SHA-256 over id, sender, recipient,
    /// amount, and every input's and output's (tx_id, amount, output_index,
    /// address) in declaration order.
    pub fn digest(&self) -> [u8; 32] {
        let mut data = String::new();
        let _ = write!(data, "{}{}{}{}", self.id, self.sender, self.recipient, self.amount);
        for utxo in self.inputs.iter().chain(self.outputs.iter()) {
            let _ = write!(
                data,
                "{}{}{}{}",
                utxo.tx_id, utxo.amount, utxo.output_index, utxo.address
            );
        }
        sha256(data.as_bytes())
    }

    /// Deterministic rendering of every field, used as this transaction's
    /// contribution to the enclosing block's hash preimage.
    pub fn canonical_string(&self) -> String {
        let mut data = String::new();
        let _ = write!(
            data,
            "{}|{}|{}|{}|{}",
            self.id, self.sender, self.recipient, self.amount, self.signature
        );
        for utxo in self.inputs.iter().chain(self.outputs.iter()) {
            let _ = write!(
                data,
                "|{}:{}:{}:{}",
                utxo.tx_id, utxo.output_index, utxo.amount, utxo.address
            );
        }
        data
    }

    /// Sign this transaction, filling in `sender` and `signature`
    pub fn sign(&mut self, key_pair: &KeyPair) -> Result<(), KeyError> {
        self.sender = key_pair.public_key_b58();
        self.signature = key_pair.sign_b58(&self.digest())?;
        Ok(())
    }
}
