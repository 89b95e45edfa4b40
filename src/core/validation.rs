//! Transaction acceptance rules
//!
//! Validation is side-effect-free: UTXO consumption and creation happen in
//! [`crate::core::ChainState`] only after a transaction passes. Every
//! decode or verify failure is a typed, recoverable rejection — a bad
//! transaction is dropped, never allowed to take the process down.

use crate::core::transaction::Transaction;
use crate::core::utxo::UtxoSet;
use crate::crypto::{
    public_key_from_wire, public_key_to_address, signature_from_wire, verify_signature,
};
use thiserror::Error;

/// Why a transaction was rejected
#[derive(Error, Debug)]
pub enum TxRejection {
    #[error("sender public key does not decode")]
    MalformedSender,
    #[error("transaction has no inputs")]
    MissingInputs,
    #[error("transaction has no outputs")]
    MissingOutputs,
    #[error("amount {amount} exceeds sender balance {balance}")]
    Overspend { amount: u64, balance: u64 },
    #[error("signature does not decode")]
    MalformedSignature,
    #[error("signature verification failed")]
    BadSignature,
}

/// Check a transaction against the current UTXO set.
///
/// Callers apply UTXO side effects only after this returns `Ok`.
pub fn validate(tx: &Transaction, utxos: &UtxoSet) -> Result<(), TxRejection> {
    // Fail closed on an underivable sender address
    let public_key =
        public_key_from_wire(&tx.sender).map_err(|_| TxRejection::MalformedSender)?;
    let sender_address = public_key_to_address(&public_key);

    if tx.inputs.is_empty() {
        return Err(TxRejection::MissingInputs);
    }
    if tx.outputs.is_empty() {
        return Err(TxRejection::MissingOutputs);
    }

    let balance = utxos.total_by_address(&sender_address);
    if tx.amount > balance {
        return Err(TxRejection::Overspend {
            amount: tx.amount,
            balance,
        });
    }

    let signature =
        signature_from_wire(&tx.signature).map_err(|_| TxRejection::MalformedSignature)?;

    match verify_signature(&public_key, &tx.digest(), &signature) {
        Ok(true) => Ok(()),
        _ => Err(TxRejection::BadSignature),
    }
}
