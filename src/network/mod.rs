//! Transport boundary
//!
//! The pub/sub transport itself lives outside this crate. What crosses the
//! seam: outbound, serialized block bytes handed to a [`BlockPublisher`];
//! inbound, already-deserialized [`Block`]s drained from an mpsc channel by
//! the [`InboundHandler`], which validates, appends, and notifies the miner
//! of a lost height race.

use crate::core::{AcceptError, Block, SharedChain};
use thiserror::Error;
use tokio::sync::mpsc;

/// Delivery failure after a block is already locally final
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("transport rejected payload: {0}")]
    Transport(String),
    #[error("transport channel closed")]
    ChannelClosed,
}

/// The "publish bytes on a topic" primitive the transport provides
pub trait BlockPublisher: Send + Sync {
    fn publish(&self, payload: Vec<u8>) -> Result<(), PublishError>;
}

/// In-process publisher backed by an unbounded channel.
///
/// Stands in for a real pub/sub topic in tests and single-process setups.
#[derive(Clone)]
pub struct ChannelPublisher {
    sender: mpsc::UnboundedSender<Vec<u8>>,
}

impl ChannelPublisher {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Vec<u8>>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl BlockPublisher for ChannelPublisher {
    fn publish(&self, payload: Vec<u8>) -> Result<(), PublishError> {
        self.sender
            .send(payload)
            .map_err(|_| PublishError::ChannelClosed)
    }
}

/// What became of an inbound block
#[derive(Debug)]
pub enum Disposition {
    /// Validated and appended; the miner was notified
    Accepted,
    /// Competes with the current tip at the same height. Detection only:
    /// the block is not appended and no winner is picked — the caller
    /// decides what a fork means to it.
    Fork { block: Block },
    /// Failed validation and was dropped; the sender is not informed
    Rejected(AcceptError),
}

/// Applies blocks received from the transport to the shared chain
pub struct InboundHandler {
    chain: SharedChain,
    miner_notify: mpsc::Sender<Block>,
}

impl InboundHandler {
    pub fn new(chain: SharedChain, miner_notify: mpsc::Sender<Block>) -> Self {
        Self {
            chain,
            miner_notify,
        }
    }

    /// Validate and apply one inbound block
    pub async fn handle(&self, block: Block) -> Disposition {
        let mut chain = self.chain.write().await;

        if block.is_new_fork(chain.ledger()) {
            log::warn!(
                "fork detected: block {} competes with the tip at height {}",
                block.hash,
                block.height
            );
            return Disposition::Fork { block };
        }

        match chain.try_accept(block.clone()) {
            Ok(()) => {
                drop(chain);
                // Let the miner abandon any in-flight search for this height
                if self.miner_notify.try_send(block).is_err() {
                    log::debug!("miner notification channel full or closed");
                }
                Disposition::Accepted
            }
            Err(err) => {
                log::warn!("dropping inbound block: {}", err);
                Disposition::Rejected(err)
            }
        }
    }

    /// Drain the transport's stream of deserialized candidate blocks
    pub async fn run(self, mut receiver: mpsc::Receiver<Block>) {
        while let Some(block) = receiver.recv().await {
            match self.handle(block).await {
                Disposition::Accepted => {}
                Disposition::Fork { block } => {
                    log::warn!("unresolved fork at height {}", block.height);
                }
                Disposition::Rejected(_) => {}
            }
        }
        log::info!("inbound block stream closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{block, ChainState, Transaction};

    fn mined_next(chain: &ChainState) -> Block {
        let mut candidate = Block::candidate(chain.ledger().tip(), Transaction::default());
        block::mine(&mut candidate, chain.ledger().difficulty());
        candidate
    }

    #[tokio::test]
    async fn test_accepts_and_notifies_miner() {
        let chain = ChainState::shared(2);
        let (notify_tx, mut notify_rx) = mpsc::channel(8);
        let handler = InboundHandler::new(chain.clone(), notify_tx);

        let block = mined_next(&*chain.read().await);
        let disposition = handler.handle(block.clone()).await;

        assert!(matches!(disposition, Disposition::Accepted));
        assert_eq!(chain.read().await.ledger().tip_height(), 1);
        assert_eq!(notify_rx.recv().await.unwrap().hash, block.hash);
    }

    #[tokio::test]
    async fn test_rejects_unlinked_block() {
        let chain = ChainState::shared(2);
        let (notify_tx, mut notify_rx) = mpsc::channel(8);
        let handler = InboundHandler::new(chain.clone(), notify_tx);

        let mut block = mined_next(&*chain.read().await);
        block.prev_hash = "dead".repeat(16);
        block.hash = block.calculate_hash();

        let disposition = handler.handle(block).await;
        assert!(matches!(disposition, Disposition::Rejected(_)));
        assert_eq!(chain.read().await.ledger().tip_height(), 0);
        assert!(notify_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_competing_height_surfaces_as_fork() {
        let chain = ChainState::shared(2);
        let (notify_tx, _notify_rx) = mpsc::channel(8);
        let handler = InboundHandler::new(chain.clone(), notify_tx);

        // Two distinct blocks both extending genesis
        let first = mined_next(&*chain.read().await);
        let mut second = Block::candidate(chain.read().await.ledger().tip(), Transaction::default());
        second.timestamps = "2026-02-02T00:00:00+00:00".into();
        crate::core::block::mine(&mut second, 2);

        assert!(matches!(handler.handle(first).await, Disposition::Accepted));
        let disposition = handler.handle(second).await;

        // Exactly one block holds height 1; the competitor is surfaced, not resolved
        assert!(matches!(disposition, Disposition::Fork { .. }));
        assert_eq!(chain.read().await.ledger().tip_height(), 1);
    }

    #[tokio::test]
    async fn test_run_drains_stream() {
        let chain = ChainState::shared(2);
        let (notify_tx, _notify_rx) = mpsc::channel(8);
        let (block_tx, block_rx) = mpsc::channel(8);

        let block = mined_next(&*chain.read().await);
        block_tx.send(block).await.unwrap();
        drop(block_tx);

        InboundHandler::new(chain.clone(), notify_tx).run(block_rx).await;
        assert_eq!(chain.read().await.ledger().tip_height(), 1);
    }

    #[test]
    fn test_channel_publisher_delivers_payloads() {
        let (publisher, mut receiver) = ChannelPublisher::new();
        publisher.publish(b"block bytes".to_vec()).unwrap();
        assert_eq!(receiver.try_recv().unwrap(), b"block bytes");

        drop(receiver);
        assert!(matches!(
            publisher.publish(vec![]),
            Err(PublishError::ChannelClosed)
        ));
    }
}
