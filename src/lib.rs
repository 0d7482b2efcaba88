//! Client for reading from and transacting with Ethereum smart contracts.
//!
//! Reads are `eth_call`s whose return data is decoded into typed values. Writes are
//! legacy transactions signed locally, broadcast as raw bytes and polled for a
//! receipt. [`ProviderManager`] wires both to configured networks; [`Contract`] and
//! the token facades in [`ethereum::tokens`] are the entry points.

pub mod config;
pub mod error;
pub mod ethereum;

pub use config::{Config, ConfirmationConfig, NetworkConfig, TransactionConfig};
pub use error::{ContractError, Result, TransportError};
pub use ethereum::{
    abi::{AbiKind, CallSpec, TypedValue},
    contract::Contract,
    decoder::DecodedValue,
    provider::{ProviderManager, RpcTransport, Transport},
    signer::{SignedTransaction, SigningMode},
    submitter::ConfirmationPoller,
    tokens::{Erc1155, Erc20, Erc721},
    BroadcastAck, ConfirmationState, ReceiptInfo, SendRequest, SendResult,
};

/// Installs a stderr `tracing` subscriber filtered by `RUST_LOG` (at least `info`).
///
/// Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
