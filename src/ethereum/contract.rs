use alloy::primitives::{Address, Bytes, U256};
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::ethereum::{
    abi::{encode_call, AbiKind, TypedValue},
    decoder::{uint_batch, DecodedValue},
    provider::Transport,
    reader::ContractReader,
    signer::TransactionBuilder,
    submitter::{ConfirmationPoller, TransactionSubmitter},
    SendRequest, SendResult,
};

/// A handle on one deployed contract.
///
/// Reads go through `eth_call`; writes are built, signed locally, broadcast and
/// polled for a receipt. The address is validated on first use, so an invalid one
/// fails the call rather than the constructor.
pub struct Contract<T: ?Sized> {
    address: String,
    reader: ContractReader<T>,
    builder: TransactionBuilder<T>,
    submitter: TransactionSubmitter<T>,
}

impl<T: Transport + ?Sized> Contract<T> {
    pub fn new(address: impl Into<String>, transport: Arc<T>) -> Self {
        Self {
            address: address.into(),
            reader: ContractReader::new(transport.clone()),
            builder: TransactionBuilder::new(transport.clone()),
            submitter: TransactionSubmitter::new(transport),
        }
    }

    pub fn with_default_gas_limit(mut self, gas_limit: u64) -> Self {
        self.builder = self.builder.with_default_gas_limit(gas_limit);
        self
    }

    pub fn with_poller(mut self, poller: ConfirmationPoller) -> Self {
        self.submitter = self.submitter.with_poller(poller);
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Runs prebuilt `calldata` as a read call.
    pub async fn select(
        &self,
        calldata: &Bytes,
        shape: &[AbiKind],
    ) -> Result<Option<Vec<DecodedValue>>> {
        self.reader.read(&self.address, calldata, shape).await
    }

    pub async fn call_function(
        &self,
        function_name: &str,
        arguments: &[TypedValue],
        shape: &[AbiKind],
    ) -> Result<Option<Vec<DecodedValue>>> {
        let calldata = encode_call(function_name, arguments)?;
        self.select(&calldata, shape).await
    }

    async fn read_single(
        &self,
        function_name: &str,
        arguments: &[TypedValue],
        kind: AbiKind,
    ) -> Result<Option<DecodedValue>> {
        let values = self
            .call_function(function_name, arguments, &[kind])
            .await?;
        Ok(values.and_then(|values| values.into_iter().next()))
    }

    pub async fn read_uint(
        &self,
        function_name: &str,
        arguments: &[TypedValue],
    ) -> Result<Option<U256>> {
        let value = self
            .read_single(function_name, arguments, AbiKind::Uint256)
            .await?;
        Ok(value.and_then(|v| v.as_uint()))
    }

    pub async fn read_address(
        &self,
        function_name: &str,
        arguments: &[TypedValue],
    ) -> Result<Option<Address>> {
        let value = self
            .read_single(function_name, arguments, AbiKind::Address)
            .await?;
        Ok(value.and_then(|v| v.as_address()))
    }

    pub async fn read_bool(
        &self,
        function_name: &str,
        arguments: &[TypedValue],
    ) -> Result<Option<bool>> {
        let value = self
            .read_single(function_name, arguments, AbiKind::Bool)
            .await?;
        Ok(value.and_then(|v| v.as_bool()))
    }

    /// Reads a `uint256[]` result. Elements missing from a truncated payload come
    /// back as zero in their original position.
    pub async fn read_uint_batch(
        &self,
        function_name: &str,
        arguments: &[TypedValue],
    ) -> Result<Option<Vec<U256>>> {
        let values = self
            .call_function(
                function_name,
                arguments,
                &[AbiKind::array_of(AbiKind::Uint256)],
            )
            .await?;

        match values {
            None => Ok(None),
            Some(values) => match values.first() {
                Some(array) => uint_batch(array).map(Some),
                None => Ok(Some(Vec::new())),
            },
        }
    }

    /// Signs and submits `calldata` addressed to this contract. Any `to_address` on
    /// `request` is replaced.
    pub async fn transact(&self, calldata: Bytes, request: SendRequest) -> Result<SendResult> {
        let request = request.with_to(self.address.clone());
        debug!("Transacting with {} ({:?})", self.address, request);

        let signed = self.builder.build_and_sign(request, &calldata).await?;
        self.submitter.submit(&signed).await
    }

    pub async fn send_function(
        &self,
        function_name: &str,
        arguments: &[TypedValue],
        request: SendRequest,
    ) -> Result<SendResult> {
        let calldata = encode_call(function_name, arguments)?;
        self.transact(calldata, request).await
    }

    /// Field-by-field form of [`Contract::transact`]. Nonce and value use their defaults.
    pub async fn transact_with(
        &self,
        sender_address: &str,
        private_key: &str,
        gas_price: Option<u128>,
        gas_limit: Option<u64>,
        calldata: Bytes,
    ) -> Result<SendResult> {
        let mut request = SendRequest::new(sender_address, private_key);
        request.gas_price = gas_price;
        request.gas_limit = gas_limit;
        self.transact(calldata, request).await
    }
}
