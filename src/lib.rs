//! nanochain: the consensus core of a minimal proof-of-work ledger node
//!
//! This crate maintains an append-only chain of single-transaction blocks,
//! validates blocks and transactions (structural linkage, proof-of-work
//! hash integrity, signatures, balances), mines against a fixed difficulty
//! target, and tracks spendable outputs so double-spends are rejected.
//!
//! Peer transport, wallets, and the transaction pool live outside the
//! crate and are reached through narrow seams: a [`network::BlockPublisher`]
//! for outbound bytes, an mpsc stream of deserialized blocks into the
//! [`network::InboundHandler`], and a [`mining::TxSource`] for pending
//! transactions.
//!
//! # Example
//!
//! ```no_run
//! use nanochain::core::ChainState;
//! use nanochain::mining::{FifoMempool, Miner, MinerConfig};
//! use nanochain::network::{ChannelPublisher, InboundHandler};
//! use std::sync::Arc;
//! use tokio::sync::mpsc;
//!
//! # async fn wire() {
//! let chain = ChainState::shared(2);
//! let pool = Arc::new(FifoMempool::new());
//! let (publisher, _outbound) = ChannelPublisher::new();
//! let (notify_tx, notify_rx) = mpsc::channel(16);
//! let (_inbound_tx, inbound_rx) = mpsc::channel(16);
//!
//! let miner = Miner::new(
//!     chain.clone(),
//!     pool,
//!     Arc::new(publisher),
//!     notify_rx,
//!     MinerConfig::default(),
//! );
//! let handler = InboundHandler::new(chain, notify_tx);
//!
//! tokio::spawn(miner.run());
//! tokio::spawn(handler.run(inbound_rx));
//! # }
//! ```

pub mod core;
pub mod crypto;
pub mod mining;
pub mod network;

// Re-export commonly used types
pub use crate::core::{
    AcceptError, Block, BlockError, ChainState, Ledger, SharedChain, Transaction, TxRejection,
    Utxo, UtxoSet, DEFAULT_DIFFICULTY,
};
pub use crate::crypto::KeyPair;
pub use crate::mining::{FifoMempool, Miner, MinerConfig, MiningOutcome, TxSource};
pub use crate::network::{
    BlockPublisher, ChannelPublisher, Disposition, InboundHandler, PublishError,
};
