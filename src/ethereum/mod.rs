pub mod abi;
pub mod contract;
pub mod decoder;
pub mod provider;
pub mod reader;
pub mod signer;
pub mod submitter;
pub mod tokens;
pub mod utils;

#[cfg(test)]
pub(crate) mod mock;

use alloy::primitives::{B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

use signer::SigningMode;

/// Parameters of a state-changing call.
///
/// Unset `value`, `gas_limit`, `nonce` and `gas_price` are resolved when the
/// transaction is built; anything set here is used as is.
#[derive(Clone, Default)]
pub struct SendRequest {
    pub sender_address: String,
    pub to_address: String,
    pub private_key: String,
    pub value: Option<U256>,
    pub gas_price: Option<u128>,
    pub gas_limit: Option<u64>,
    pub nonce: Option<u64>,
    /// Absent or negative selects legacy (pre-EIP-155) signing.
    pub chain_id: Option<i64>,
}

impl SendRequest {
    pub fn new(sender_address: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            sender_address: sender_address.into(),
            private_key: private_key.into(),
            ..Default::default()
        }
    }

    pub fn with_to(mut self, to_address: impl Into<String>) -> Self {
        self.to_address = to_address.into();
        self
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = Some(gas_price);
        self
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn with_chain_id(mut self, chain_id: i64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn signing_mode(&self) -> SigningMode {
        match self.chain_id {
            Some(id) if id >= 0 => SigningMode::Eip155(id as u64),
            _ => SigningMode::Legacy,
        }
    }
}

impl fmt::Debug for SendRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendRequest")
            .field("sender_address", &self.sender_address)
            .field("to_address", &self.to_address)
            .field("private_key", &"<redacted>")
            .field("value", &self.value)
            .field("gas_price", &self.gas_price)
            .field("gas_limit", &self.gas_limit)
            .field("nonce", &self.nonce)
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptInfo {
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub effective_gas_price: u128,
    pub status: bool,
}

/// The node accepted the raw transaction into its pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastAck {
    pub transaction_hash: B256,
    pub raw_transaction: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationState {
    Pending,
    Confirmed,
    TimedOut,
}

/// Outcome of a write. A missing receipt is inconclusive: the transaction may
/// still be mined after the poll budget ran out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendResult {
    pub transaction_hash: B256,
    pub broadcast: BroadcastAck,
    pub receipt: Option<ReceiptInfo>,
    pub state: ConfirmationState,
}

impl SendResult {
    pub fn is_confirmed(&self) -> bool {
        self.state == ConfirmationState::Confirmed
    }
}
