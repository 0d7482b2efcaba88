use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::ethereum::{signer::DEFAULT_GAS_LIMIT, submitter::DEFAULT_MAX_ATTEMPTS};

pub const RPC_URL_ENV: &str = "CONTRACT_CLIENT_RPC_URL";
pub const NETWORK_ENV: &str = "CONTRACT_CLIENT_NETWORK";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub networks: HashMap<String, NetworkConfig>,
    pub default_network: String,
    #[serde(default)]
    pub transaction: TransactionConfig,
    #[serde(default)]
    pub confirmation: ConfirmationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub rpc_url: String,
    /// Omitted or negative means transactions on this network are signed without
    /// replay protection.
    pub chain_id: Option<i64>,
    pub explorer_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionConfig {
    pub default_gas_limit: u64,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            default_gas_limit: DEFAULT_GAS_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationConfig {
    pub max_attempts: u32,
    pub interval_ms: u64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval_ms: 1000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut networks = HashMap::new();

        networks.insert(
            "ethereum".to_string(),
            NetworkConfig {
                rpc_url: "https://ethereum-rpc.publicnode.com".to_string(),
                chain_id: Some(1),
                explorer_url: Some("https://etherscan.io".to_string()),
            },
        );

        networks.insert(
            "sepolia".to_string(),
            NetworkConfig {
                rpc_url: "https://ethereum-sepolia-rpc.publicnode.com".to_string(),
                chain_id: Some(11155111),
                explorer_url: Some("https://sepolia.etherscan.io".to_string()),
            },
        );

        // Dev nodes; signed without a chain id
        networks.insert(
            "local".to_string(),
            NetworkConfig {
                rpc_url: "http://127.0.0.1:8545".to_string(),
                chain_id: None,
                explorer_url: None,
            },
        );

        Self {
            networks,
            default_network: "ethereum".to_string(),
            transaction: TransactionConfig::default(),
            confirmation: ConfirmationConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {:?}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {:?}: {}", path, e))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub async fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| anyhow!("Failed to serialize config: {}", e))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    anyhow!("Failed to create config directory {:?}: {}", parent, e)
                })?;
            }
        }

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {:?}: {}", path, e))?;

        Ok(())
    }

    /// Load configuration with fallback to default, then apply environment overrides
    pub async fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Self {
        let mut config = match path {
            Some(path) => match Self::load_from_file(path).await {
                Ok(config) => {
                    tracing::info!("Loaded configuration from file");
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to load config file, using defaults: {}", e);
                    Self::default()
                }
            },
            None => Self::default(),
        };

        config.apply_overrides(
            std::env::var(NETWORK_ENV).ok(),
            std::env::var(RPC_URL_ENV).ok(),
        );
        config
    }

    pub fn add_network(&mut self, name: String, config: NetworkConfig) {
        self.networks.insert(name, config);
    }

    /// The default network must exist.
    pub fn validate(&self) -> Result<()> {
        if !self.networks.contains_key(&self.default_network) {
            return Err(anyhow!(
                "Default network '{}' is not configured",
                self.default_network
            ));
        }
        Ok(())
    }

    /// `network` selects the default network; `rpc_url` then replaces its URL. An
    /// unknown network is added with no chain id.
    fn apply_overrides(&mut self, network: Option<String>, rpc_url: Option<String>) {
        if let Some(network) = network.filter(|n| !n.trim().is_empty()) {
            tracing::info!("Using {} from {}", network, NETWORK_ENV);
            self.default_network = network;
        }

        if let Some(rpc_url) = rpc_url.filter(|u| !u.trim().is_empty()) {
            tracing::info!(
                "Overriding RPC URL of {} from {}",
                self.default_network,
                RPC_URL_ENV
            );
            self.networks
                .entry(self.default_network.clone())
                .and_modify(|network| network.rpc_url = rpc_url.clone())
                .or_insert(NetworkConfig {
                    rpc_url,
                    chain_id: None,
                    explorer_url: None,
                });
        } else if !self.networks.contains_key(&self.default_network) {
            tracing::warn!(
                "Default network {} is not configured and no RPC URL was given",
                self.default_network
            );
        }
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("contract-client").join("config.toml"))
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let sample_config = r#"# Contract client configuration

# Network used when none is specified
default_network = "ethereum"

[networks.ethereum]
rpc_url = "https://ethereum-rpc.publicnode.com"
chain_id = 1
explorer_url = "https://etherscan.io"

[networks.sepolia]
rpc_url = "https://ethereum-sepolia-rpc.publicnode.com"
chain_id = 11155111
explorer_url = "https://sepolia.etherscan.io"

# No chain_id: transactions are signed without replay protection
[networks.local]
rpc_url = "http://127.0.0.1:8545"

[transaction]
default_gas_limit = 8000000

# Receipt polling after broadcast
[confirmation]
max_attempts = 60
interval_ms = 1000

# Environment variables:
# CONTRACT_CLIENT_NETWORK - overrides default_network
# CONTRACT_CLIENT_RPC_URL - overrides the RPC URL of the default network
"#;
        sample_config.to_string()
    }
}
