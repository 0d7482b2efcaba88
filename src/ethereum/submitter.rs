use alloy::primitives::B256;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::ConfirmationConfig;
use crate::error::{ContractError, Result, TransportError};
use crate::ethereum::{
    provider::Transport, signer::SignedTransaction, BroadcastAck, ConfirmationState,
    ReceiptInfo, SendResult,
};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Fixed-interval receipt polling with a bounded number of attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPoller {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for ConfirmationPoller {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ConfirmationPoller {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    pub fn from_config(config: &ConfirmationConfig) -> Self {
        Self::new(config.max_attempts, Duration::from_millis(config.interval_ms))
    }

    /// Polls for the receipt of `hash`.
    ///
    /// Returns `(None, TimedOut)` once every attempt came back empty. Transport
    /// errors on individual polls are logged and count as an empty attempt. With
    /// `max_attempts == 0` nothing is polled and the state stays `Pending`.
    pub async fn wait_for_receipt<T: Transport + ?Sized>(
        &self,
        transport: &T,
        hash: B256,
    ) -> (Option<ReceiptInfo>, ConfirmationState) {
        if self.max_attempts == 0 {
            return (None, ConfirmationState::Pending);
        }

        for attempt in 1..=self.max_attempts {
            match transport.transaction_receipt(hash).await {
                Ok(Some(receipt)) => {
                    info!(
                        "Transaction {:?} confirmed in block {:?} after {} poll(s)",
                        hash, receipt.block_number, attempt
                    );
                    return (Some(receipt), ConfirmationState::Confirmed);
                }
                Ok(None) => {
                    debug!(
                        "No receipt for {:?} yet ({}/{})",
                        hash, attempt, self.max_attempts
                    );
                }
                Err(e) => {
                    warn!(
                        "Receipt poll {}/{} for {:?} failed: {}",
                        attempt, self.max_attempts, hash, e
                    );
                }
            }

            if attempt < self.max_attempts {
                tokio::time::sleep(self.interval).await;
            }
        }

        warn!(
            "Transaction {:?} not confirmed after {} polls",
            hash, self.max_attempts
        );
        (None, ConfirmationState::TimedOut)
    }
}

/// Broadcasts signed transactions and waits for their receipts.
pub struct TransactionSubmitter<T: ?Sized> {
    transport: Arc<T>,
    poller: ConfirmationPoller,
}

impl<T: Transport + ?Sized> TransactionSubmitter<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            poller: ConfirmationPoller::default(),
        }
    }

    pub fn with_poller(mut self, poller: ConfirmationPoller) -> Self {
        self.poller = poller;
        self
    }

    pub fn poller(&self) -> &ConfirmationPoller {
        &self.poller
    }

    pub async fn submit(&self, signed: &SignedTransaction) -> Result<SendResult> {
        let raw_transaction = signed.raw_hex();

        let transaction_hash = match self.transport.send_raw_transaction(&signed.raw).await {
            Ok(hash) => hash,
            Err(TransportError::Rpc { code, message }) => {
                error!("Broadcast of {:?} rejected ({}): {}", signed.hash, code, message);
                return Err(ContractError::Broadcast(message));
            }
            Err(TransportError::Connection(message)) => {
                error!("Broadcast of {:?} failed: {}", signed.hash, message);
                return Err(ContractError::Transport(message));
            }
        };
        info!("Broadcast transaction {:?}", transaction_hash);

        let (receipt, state) = self
            .poller
            .wait_for_receipt(self.transport.as_ref(), transaction_hash)
            .await;

        Ok(SendResult {
            transaction_hash,
            broadcast: BroadcastAck {
                transaction_hash,
                raw_transaction,
            },
            receipt,
            state,
        })
    }
}
