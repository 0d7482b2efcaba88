use alloy::primitives::Bytes;
use std::sync::Arc;
use tracing::debug;

use crate::error::{ContractError, Result, TransportError};
use crate::ethereum::{
    abi::AbiKind,
    decoder::{decode_output, DecodedValue},
    provider::Transport,
    utils,
};

/// Read-only calls against contract state.
pub struct ContractReader<T: ?Sized> {
    transport: Arc<T>,
}

impl<T: Transport + ?Sized> ContractReader<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Executes `calldata` against `contract_address` at the pending block and decodes
    /// the return data with `shape`.
    ///
    /// `Ok(None)` means the node answered with neither a value nor an error.
    pub async fn read(
        &self,
        contract_address: &str,
        calldata: &Bytes,
        shape: &[AbiKind],
    ) -> Result<Option<Vec<DecodedValue>>> {
        utils::require_non_empty("contract_address", contract_address)?;
        if calldata.is_empty() {
            return Err(ContractError::InvalidArgument(
                "calldata must not be empty".to_string(),
            ));
        }
        let address = utils::validate_address(contract_address)?;

        debug!(
            "eth_call to {:?} with {} bytes of calldata",
            address,
            calldata.len()
        );

        let raw = match self.transport.call(address, calldata.clone()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("eth_call to {:?} returned no value", address);
                return Ok(None);
            }
            Err(TransportError::Rpc { message, .. }) => {
                debug!("eth_call to {:?} failed: {}", address, message);
                return Err(ContractError::ContractCall(message));
            }
            Err(TransportError::Connection(message)) => {
                return Err(ContractError::Transport(message));
            }
        };

        decode_output(&raw, shape).map(Some)
    }
}
