//! Core consensus components
//!
//! The fundamental building blocks:
//! - UTXO tracking (spendable-output index, balance queries)
//! - Transactions (single signed transfer, digest + canonical form)
//! - Transaction validation (signature + balance acceptance rules)
//! - Blocks (hashing, structural validation, fork detection)
//! - Ledger (append-only chain, difficulty target)
//! - Chain state (ledger + UTXO set under one writer lock)

pub mod block;
pub mod chain_state;
pub mod ledger;
pub mod transaction;
pub mod utxo;
pub mod validation;

pub use block::{Block, BlockError};
pub use chain_state::{AcceptError, ChainState, SharedChain};
pub use ledger::{Ledger, DEFAULT_DIFFICULTY};
pub use transaction::Transaction;
pub use utxo::{Utxo, UtxoSet};
pub use validation::{validate, TxRejection};
