use crate::config::{Config, NetworkConfig};
use crate::error::TransportError;
use crate::ethereum::{
    contract::Contract, submitter::ConfirmationPoller, utils, ReceiptInfo, SendRequest,
};
use alloy::{
    eips::BlockId,
    primitives::{Address, Bytes, B256, U64},
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::types::TransactionRequest,
    transports::{
        http::{Client, Http},
        RpcError, TransportErrorKind,
    },
};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// The node-facing calls the contract layer depends on.
#[async_trait]
pub trait Transport: Send + Sync {
    /// `eth_call` against the `pending` block. `None` when the node returned no value.
    async fn call(&self, to: Address, data: Bytes) -> Result<Option<Bytes>, TransportError>;

    /// `eth_getTransactionCount` at `latest`.
    async fn transaction_count(&self, address: Address) -> Result<u64, TransportError>;

    async fn gas_price(&self) -> Result<u128, TransportError>;

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256, TransportError>;

    async fn transaction_receipt(&self, hash: B256)
        -> Result<Option<ReceiptInfo>, TransportError>;
}

/// JSON-RPC over HTTP.
#[derive(Debug, Clone)]
pub struct RpcTransport {
    provider: RootProvider<Http<Client>>,
}

impl RpcTransport {
    pub fn new(rpc_url: &str) -> Result<Self> {
        let url = rpc_url
            .parse()
            .map_err(|e| anyhow!("Invalid RPC URL '{}': {}", rpc_url, e))?;
        let provider = ProviderBuilder::new().on_http(url);

        Ok(Self { provider })
    }

    pub async fn check_connection(&self) -> bool {
        match self.provider.get_block_number().await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("Connection check failed: {}", e);
                false
            }
        }
    }
}

fn into_transport_error(err: RpcError<TransportErrorKind>) -> TransportError {
    match err {
        RpcError::ErrorResp(payload) => TransportError::Rpc {
            code: payload.code,
            message: payload.message.to_string(),
        },
        other => TransportError::Connection(utils::interpret_rpc_error(&other.to_string())),
    }
}

#[async_trait]
impl Transport for RpcTransport {
    async fn call(&self, to: Address, data: Bytes) -> Result<Option<Bytes>, TransportError> {
        let request = TransactionRequest::default().to(to).input(data.into());

        self.provider
            .raw_request::<_, Option<Bytes>>("eth_call".into(), (request, BlockId::pending()))
            .await
            .map_err(into_transport_error)
    }

    async fn transaction_count(&self, address: Address) -> Result<u64, TransportError> {
        let count = self
            .provider
            .raw_request::<_, U64>(
                "eth_getTransactionCount".into(),
                (address, BlockId::latest()),
            )
            .await
            .map_err(into_transport_error)?;

        Ok(count.to::<u64>())
    }

    async fn gas_price(&self) -> Result<u128, TransportError> {
        self.provider
            .get_gas_price()
            .await
            .map_err(into_transport_error)
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256, TransportError> {
        let pending = self
            .provider
            .send_raw_transaction(raw)
            .await
            .map_err(into_transport_error)?;

        Ok(*pending.tx_hash())
    }

    async fn transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<ReceiptInfo>, TransportError> {
        let receipt = self
            .provider
            .get_transaction_receipt(hash)
            .await
            .map_err(into_transport_error)?;

        Ok(receipt.map(|receipt| ReceiptInfo {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used as u64,
            effective_gas_price: receipt.effective_gas_price,
            status: receipt.status(),
        }))
    }
}

/// One transport per configured network, plus the defaults contracts are built with.
#[derive(Debug)]
pub struct ProviderManager {
    transports: HashMap<String, Arc<RpcTransport>>,
    config: Config,
}

impl ProviderManager {
    pub fn new(config: Config) -> Result<Self> {
        let mut transports = HashMap::new();

        for (network_name, network_config) in &config.networks {
            let transport = RpcTransport::new(&network_config.rpc_url)
                .map_err(|e| anyhow!("Network '{}': {}", network_name, e))?;
            transports.insert(network_name.clone(), Arc::new(transport));
        }

        Ok(Self { transports, config })
    }

    fn network_name<'a>(&'a self, network: Option<&'a str>) -> &'a str {
        network.unwrap_or(&self.config.default_network)
    }

    pub fn get_transport(&self, network: Option<&str>) -> Result<Arc<RpcTransport>> {
        let network_name = self.network_name(network);
        self.transports
            .get(network_name)
            .cloned()
            .ok_or_else(|| anyhow!("Network '{}' not found", network_name))
    }

    pub fn get_network_config(&self, network: Option<&str>) -> Result<&NetworkConfig> {
        let network_name = self.network_name(network);
        self.config
            .networks
            .get(network_name)
            .ok_or_else(|| anyhow!("Network '{}' not configured", network_name))
    }

    pub fn get_available_networks(&self) -> Vec<String> {
        let mut networks: Vec<String> = self.config.networks.keys().cloned().collect();
        networks.sort();
        networks
    }

    /// A contract handle on `network` using the configured gas and confirmation defaults.
    pub fn contract(&self, address: &str, network: Option<&str>) -> Result<Contract<RpcTransport>> {
        if let Some(net) = network {
            utils::validate_network(net, &self.get_available_networks())?;
        }
        let transport = self.get_transport(network)?;

        Ok(Contract::new(address, transport)
            .with_default_gas_limit(self.config.transaction.default_gas_limit)
            .with_poller(ConfirmationPoller::from_config(&self.config.confirmation)))
    }

    /// A request pre-filled with the network's chain id, if one is configured.
    pub fn new_request(
        &self,
        network: Option<&str>,
        sender_address: &str,
        private_key: &str,
    ) -> Result<SendRequest> {
        let network_config = self.get_network_config(network)?;
        let mut request = SendRequest::new(sender_address, private_key);
        request.chain_id = network_config.chain_id;
        Ok(request)
    }

    pub async fn check_connection(&self, network: Option<&str>) -> Result<bool> {
        let transport = self
            .get_transport(network)
            .map_err(|e| anyhow!("Failed to get provider for connection check: {}", e))?;

        Ok(transport.check_connection().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ethereum::signer::SigningMode;
    use alloy::rpc::json_rpc::ErrorPayload;

    #[test]
    fn manager_builds_a_transport_per_network() {
        let manager = ProviderManager::new(Config::default()).unwrap();
        let networks = manager.get_available_networks();

        assert!(networks.contains(&"ethereum".to_string()));
        assert!(networks.contains(&"local".to_string()));
        assert!(manager.get_transport(None).is_ok());
        assert!(manager.get_transport(Some("nowhere")).is_err());
    }

    #[test]
    fn invalid_rpc_url_is_rejected() {
        let mut config = Config::default();
        config.networks.get_mut("local").unwrap().rpc_url = "not a url".to_string();

        assert!(ProviderManager::new(config).is_err());
    }

    #[test]
    fn contract_on_unknown_network_fails() {
        let manager = ProviderManager::new(Config::default()).unwrap();
        assert!(manager
            .contract("0x0000000000000000000000000000000000000001", Some("nowhere"))
            .is_err());
    }

    #[test]
    fn new_request_carries_network_chain_id() {
        let manager = ProviderManager::new(Config::default()).unwrap();

        let request = manager
            .new_request(Some("sepolia"), "0xsender", "key")
            .unwrap();
        assert_eq!(request.signing_mode(), SigningMode::Eip155(11155111));

        let request = manager.new_request(Some("local"), "0xsender", "key").unwrap();
        assert_eq!(request.signing_mode(), SigningMode::Legacy);
    }

    #[test]
    fn error_response_maps_to_rpc_variant() {
        let payload = ErrorPayload {
            code: -32000,
            message: "nonce too low".into(),
            data: None,
        };
        let err = into_transport_error(RpcError::ErrorResp(payload));

        match err {
            TransportError::Rpc { code, message } => {
                assert_eq!(code, -32000);
                assert_eq!(message, "nonce too low");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn local_failure_maps_to_connection_variant() {
        let err = into_transport_error(RpcError::local_usage_str("boom"));
        assert!(matches!(err, TransportError::Connection(_)));
    }
}
