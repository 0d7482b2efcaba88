//! Nonce/gas defaulting and legacy transaction signing.
//!
//! Transactions are always legacy-typed. With a chain id they are signed per
//! EIP-155 (the chain id is part of the signing hash and of `v`); without one they
//! are signed the pre-EIP-155 way and can be replayed on any chain.

use alloy::{
    consensus::{SignableTransaction, TxEnvelope, TxLegacy},
    eips::eip2718::Encodable2718,
    network::TxSignerSync,
    primitives::{Address, Bytes, TxKind, B256, U256},
    signers::local::PrivateKeySigner,
};
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

use crate::error::{ContractError, Result, TransportError};
use crate::ethereum::{provider::Transport, utils, SendRequest};

pub const DEFAULT_GAS_LIMIT: u64 = 8_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningMode {
    Legacy,
    Eip155(u64),
}

impl SigningMode {
    pub fn chain_id(self) -> Option<u64> {
        match self {
            SigningMode::Legacy => None,
            SigningMode::Eip155(chain_id) => Some(chain_id),
        }
    }
}

/// A signed legacy transaction and its wire encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub nonce: u64,
    pub gas_price: u128,
    pub gas_limit: u64,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub signing_mode: SigningMode,
    /// `r || s || y_parity`
    pub signature: Bytes,
    pub raw: Bytes,
    pub hash: B256,
}

impl SignedTransaction {
    pub fn chain_id(&self) -> Option<u64> {
        self.signing_mode.chain_id()
    }

    pub fn raw_hex(&self) -> String {
        utils::to_hex(&self.raw)
    }
}

pub struct TransactionBuilder<T: ?Sized> {
    transport: Arc<T>,
    default_gas_limit: u64,
}

impl<T: Transport + ?Sized> TransactionBuilder<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            default_gas_limit: DEFAULT_GAS_LIMIT,
        }
    }

    pub fn with_default_gas_limit(mut self, gas_limit: u64) -> Self {
        self.default_gas_limit = gas_limit;
        self
    }

    /// Validates `request`, resolves the unset nonce and gas price from the node,
    /// and signs.
    pub async fn build_and_sign(
        &self,
        request: SendRequest,
        calldata: &Bytes,
    ) -> Result<SignedTransaction> {
        validate(&request, calldata)?;

        let sender = utils::validate_address(&request.sender_address)?;
        let to = utils::validate_address(&request.to_address)?;
        let signer = parse_private_key(&request.private_key)?;
        let signing_mode = request.signing_mode();

        let value = request.value.unwrap_or(U256::ZERO);
        let gas_limit = request.gas_limit.unwrap_or(self.default_gas_limit);

        let nonce = match request.nonce {
            Some(nonce) => nonce,
            None => {
                let nonce = self
                    .transport
                    .transaction_count(sender)
                    .await
                    .map_err(|e| lookup_error("nonce", e))?;
                debug!("Resolved nonce {} for {:?}", nonce, sender);
                nonce
            }
        };

        let gas_price = match request.gas_price {
            Some(gas_price) => gas_price,
            None => {
                let gas_price = self
                    .transport
                    .gas_price()
                    .await
                    .map_err(|e| lookup_error("gas price", e))?;
                debug!("Resolved gas price {}", gas_price);
                gas_price
            }
        };

        let tx = TxLegacy {
            chain_id: signing_mode.chain_id(),
            nonce,
            gas_price,
            gas_limit,
            to: TxKind::Call(to),
            value,
            input: calldata.clone(),
        };

        sign_legacy(tx, &signer)
    }
}

/// Signs `tx` locally. The signing mode is taken from `tx.chain_id`.
pub fn sign_legacy(mut tx: TxLegacy, signer: &PrivateKeySigner) -> Result<SignedTransaction> {
    let signature = signer
        .sign_transaction_sync(&mut tx)
        .map_err(|e| ContractError::Signing(e.to_string()))?;
    let signature_bytes = Bytes::from(signature.as_bytes().to_vec());

    let signing_mode = match tx.chain_id {
        Some(chain_id) => SigningMode::Eip155(chain_id),
        None => SigningMode::Legacy,
    };
    let to = match tx.to {
        TxKind::Call(to) => to,
        TxKind::Create => {
            return Err(ContractError::InvalidArgument(
                "contract creation is not supported".to_string(),
            ))
        }
    };
    let (nonce, gas_price, gas_limit, value, data) =
        (tx.nonce, tx.gas_price, tx.gas_limit, tx.value, tx.input.clone());

    let signed = tx.into_signed(signature);
    let hash = *signed.hash();
    let raw = TxEnvelope::from(signed).encoded_2718();

    Ok(SignedTransaction {
        nonce,
        gas_price,
        gas_limit,
        to,
        value,
        data,
        signing_mode,
        signature: signature_bytes,
        raw: raw.into(),
        hash,
    })
}

fn validate(request: &SendRequest, calldata: &Bytes) -> Result<()> {
    utils::require_non_empty("sender_address", &request.sender_address)?;
    utils::require_non_empty("to_address", &request.to_address)?;
    utils::require_non_empty("private_key", &request.private_key)?;
    if calldata.is_empty() {
        return Err(ContractError::InvalidArgument(
            "calldata must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn parse_private_key(private_key: &str) -> Result<PrivateKeySigner> {
    let private_key = private_key.trim();
    let private_key = private_key
        .strip_prefix("0x")
        .or_else(|| private_key.strip_prefix("0X"))
        .unwrap_or(private_key);

    PrivateKeySigner::from_str(private_key)
        .map_err(|e| ContractError::InvalidArgument(format!("Invalid private key: {}", e)))
}

fn lookup_error(what: &str, err: TransportError) -> ContractError {
    ContractError::Transport(format!("failed to fetch {}: {}", what, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ethereum::abi::{encode_call, TypedValue};
    use crate::ethereum::mock::{MockTransport, MOCK_GAS_PRICE, MOCK_NONCE};
    use alloy::primitives::keccak256;

    /// Well-known development key (anvil/hardhat account #0).
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_SENDER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
    const TOKEN: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    fn transfer_calldata() -> Bytes {
        encode_call(
            "transfer",
            &[
                TypedValue::Address(TEST_SENDER.parse().unwrap()),
                TypedValue::uint(100u64),
            ],
        )
        .unwrap()
    }

    fn request() -> SendRequest {
        SendRequest::new(TEST_SENDER, TEST_KEY).with_to(TOKEN)
    }

    #[tokio::test]
    async fn unset_nonce_and_gas_price_come_from_the_node() {
        let transport = Arc::new(MockTransport::new());
        let builder = TransactionBuilder::new(transport.clone());

        let signed = builder
            .build_and_sign(request(), &transfer_calldata())
            .await
            .unwrap();

        assert_eq!(signed.nonce, MOCK_NONCE);
        assert_eq!(signed.gas_price, MOCK_GAS_PRICE);
        assert_eq!(signed.gas_limit, DEFAULT_GAS_LIMIT);
        assert_eq!(signed.value, U256::ZERO);
        assert_eq!(signed.data, transfer_calldata());
        assert_eq!(transport.count("eth_getTransactionCount"), 1);
        assert_eq!(transport.count("eth_gasPrice"), 1);
    }

    #[tokio::test]
    async fn caller_supplied_fields_are_never_overwritten() {
        let transport = Arc::new(MockTransport::new());
        let builder = TransactionBuilder::new(transport.clone());

        let request = request()
            .with_nonce(42)
            .with_gas_price(3)
            .with_gas_limit(21_000)
            .with_value(U256::from(5));
        let signed = builder
            .build_and_sign(request, &transfer_calldata())
            .await
            .unwrap();

        assert_eq!(signed.nonce, 42);
        assert_eq!(signed.gas_price, 3);
        assert_eq!(signed.gas_limit, 21_000);
        assert_eq!(signed.value, U256::from(5));
        assert_eq!(transport.total_requests(), 0);
    }

    #[tokio::test]
    async fn configured_default_gas_limit_is_used() {
        let transport = Arc::new(MockTransport::new());
        let builder = TransactionBuilder::new(transport).with_default_gas_limit(100_000);

        let signed = builder
            .build_and_sign(request(), &transfer_calldata())
            .await
            .unwrap();

        assert_eq!(signed.gas_limit, 100_000);
    }

    #[tokio::test]
    async fn validation_order_is_sender_recipient_key_calldata() {
        let transport = Arc::new(MockTransport::new());
        let builder = TransactionBuilder::new(transport.clone());

        let err = builder
            .build_and_sign(SendRequest::default(), &Bytes::new())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid argument: sender_address must not be empty"
        );

        let err = builder
            .build_and_sign(SendRequest::new(TEST_SENDER, ""), &Bytes::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid argument: to_address must not be empty");

        let err = builder
            .build_and_sign(SendRequest::new(TEST_SENDER, "").with_to(TOKEN), &Bytes::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid argument: private_key must not be empty");

        let err = builder
            .build_and_sign(request(), &Bytes::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid argument: calldata must not be empty");

        assert_eq!(transport.total_requests(), 0);
    }

    #[tokio::test]
    async fn malformed_private_key_fails_before_network() {
        let transport = Arc::new(MockTransport::new());
        let builder = TransactionBuilder::new(transport.clone());

        let err = builder
            .build_and_sign(
                SendRequest::new(TEST_SENDER, "0x1234").with_to(TOKEN),
                &transfer_calldata(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ContractError::InvalidArgument(_)));
        assert_eq!(transport.total_requests(), 0);
    }

    #[tokio::test]
    async fn legacy_and_replay_protected_signatures_differ() {
        let transport = Arc::new(MockTransport::new());
        let builder = TransactionBuilder::new(transport);
        let base = request().with_nonce(1).with_gas_price(1_000_000_000);

        let legacy = builder
            .build_and_sign(base.clone(), &transfer_calldata())
            .await
            .unwrap();
        let negative = builder
            .build_and_sign(base.clone().with_chain_id(-1), &transfer_calldata())
            .await
            .unwrap();
        let protected = builder
            .build_and_sign(base.with_chain_id(1), &transfer_calldata())
            .await
            .unwrap();

        assert_eq!(legacy.signing_mode, SigningMode::Legacy);
        assert_eq!(protected.signing_mode, SigningMode::Eip155(1));
        assert_eq!(protected.chain_id(), Some(1));
        assert_eq!(legacy.raw, negative.raw);
        assert_ne!(legacy.signature, protected.signature);
        assert_ne!(legacy.raw, protected.raw);
    }

    #[tokio::test]
    async fn signing_is_deterministic_and_hash_matches_raw() {
        let transport = Arc::new(MockTransport::new());
        let builder = TransactionBuilder::new(transport);
        let base = request().with_nonce(0).with_gas_price(1).with_chain_id(31337);

        let first = builder
            .build_and_sign(base.clone(), &transfer_calldata())
            .await
            .unwrap();
        let second = builder
            .build_and_sign(base, &transfer_calldata())
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first.signature.len(), 65);
        assert_eq!(first.hash, keccak256(&first.raw));
        assert!(first.raw_hex().starts_with("0x"));
    }
}
