//! The mempool seam
//!
//! The transaction pool is an external collaborator: the core only ever
//! asks it for the next pending transaction. [`FifoMempool`] is a minimal
//! in-process implementation for tests and single-process embedders.

use crate::core::Transaction;
use std::collections::VecDeque;
use std::sync::Mutex;

/// "Give me the next pending transaction, or indicate none available"
pub trait TxSource: Send + Sync {
    fn next_pending(&self) -> Option<Transaction>;
}

/// First-in-first-out pending pool
#[derive(Debug, Default)]
pub struct FifoMempool {
    queue: Mutex<VecDeque<Transaction>>,
}

impl FifoMempool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a transaction for inclusion in a future block
    pub fn push(&self, tx: Transaction) {
        self.queue.lock().unwrap().push_back(tx);
    }

    pub fn len(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().unwrap().is_empty()
    }
}

impl TxSource for FifoMempool {
    fn next_pending(&self) -> Option<Transaction> {
        self.queue.lock().unwrap().pop_front()
    }
}
