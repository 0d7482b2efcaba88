//! In-memory [`Transport`] that records every request it receives.

use alloy::primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use std::sync::Mutex;

use crate::error::TransportError;
use crate::ethereum::{provider::Transport, ReceiptInfo};

pub(crate) const MOCK_NONCE: u64 = 7;
pub(crate) const MOCK_GAS_PRICE: u128 = 20_000_000_000;
pub(crate) const MOCK_TX_HASH: B256 = B256::repeat_byte(0xab);

pub(crate) struct MockTransport {
    call_result: Result<Option<Bytes>, TransportError>,
    broadcast_result: Result<B256, TransportError>,
    /// 1-based poll on which the receipt shows up.
    receipt_on_poll: Option<usize>,
    failing_polls: usize,
    requests: Mutex<Vec<&'static str>>,
    last_call: Mutex<Option<(Address, Bytes)>>,
    last_raw: Mutex<Option<Bytes>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self {
            call_result: Ok(Some(Bytes::new())),
            broadcast_result: Ok(MOCK_TX_HASH),
            receipt_on_poll: Some(1),
            failing_polls: 0,
            requests: Mutex::new(Vec::new()),
            last_call: Mutex::new(None),
            last_raw: Mutex::new(None),
        }
    }

    pub(crate) fn returning(mut self, raw: Vec<u8>) -> Self {
        self.call_result = Ok(Some(raw.into()));
        self
    }

    pub(crate) fn with_call_result(mut self, result: Result<Option<Bytes>, TransportError>) -> Self {
        self.call_result = result;
        self
    }

    pub(crate) fn with_broadcast_result(mut self, result: Result<B256, TransportError>) -> Self {
        self.broadcast_result = result;
        self
    }

    pub(crate) fn with_receipt_on_poll(mut self, poll: Option<usize>) -> Self {
        self.receipt_on_poll = poll;
        self
    }

    pub(crate) fn with_failing_polls(mut self, polls: usize) -> Self {
        self.failing_polls = polls;
        self
    }

    fn record(&self, method: &'static str) -> usize {
        let mut requests = self.requests.lock().unwrap();
        requests.push(method);
        requests.iter().filter(|m| **m == method).count()
    }

    pub(crate) fn count(&self, method: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|m| **m == method)
            .count()
    }

    pub(crate) fn total_requests(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn last_call(&self) -> Option<(Address, Bytes)> {
        self.last_call.lock().unwrap().clone()
    }

    pub(crate) fn last_raw_transaction(&self) -> Option<Bytes> {
        self.last_raw.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn call(&self, to: Address, data: Bytes) -> Result<Option<Bytes>, TransportError> {
        self.record("eth_call");
        *self.last_call.lock().unwrap() = Some((to, data));
        self.call_result.clone()
    }

    async fn transaction_count(&self, _address: Address) -> Result<u64, TransportError> {
        self.record("eth_getTransactionCount");
        Ok(MOCK_NONCE)
    }

    async fn gas_price(&self) -> Result<u128, TransportError> {
        self.record("eth_gasPrice");
        Ok(MOCK_GAS_PRICE)
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256, TransportError> {
        self.record("eth_sendRawTransaction");
        *self.last_raw.lock().unwrap() = Some(Bytes::copy_from_slice(raw));
        self.broadcast_result.clone()
    }

    async fn transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<ReceiptInfo>, TransportError> {
        let poll = self.record("eth_getTransactionReceipt");
        if poll <= self.failing_polls {
            return Err(TransportError::Connection("connection reset".to_string()));
        }

        match self.receipt_on_poll {
            Some(on) if poll >= on => Ok(Some(ReceiptInfo {
                transaction_hash: hash,
                block_number: Some(100),
                gas_used: 51_000,
                effective_gas_price: MOCK_GAS_PRICE,
                status: true,
            })),
            _ => Ok(None),
        }
    }
}
