//! Network catalog and per-network RPC configuration.

use std::collections::BTreeMap;

use derive_more::Deref;
use serde::Serialize;

use crate::{AccountCredential, ConfigError, EnvSnapshot, env::INFURA_KEY};

/// The in-process development network.
pub const LOCAL_NETWORK: &str = "hardhat";
/// The network enabled by `NODE_URL`.
pub const CUSTOM_NETWORK: &str = "custom";

/// Networks that cannot be reached without an Infura key.
pub const PROVIDER_KEY_NETWORKS: &[&str] = &[
    "mainnet", "rinkeby", "kovan", "goerli", "ropsten", "mumbai", "polygon",
];

/// Where a network's RPC endpoint lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcEndpoint {
    /// `https://{subdomain}.infura.io/v3/{INFURA_KEY}`
    Infura(&'static str),
    /// A public endpoint used as-is.
    Public(&'static str),
}

impl RpcEndpoint {
    /// Build the endpoint URL, or `None` when the provider key is missing.
    pub fn url(&self, infura_key: Option<&str>) -> Option<String> {
        match self {
            Self::Infura(subdomain) => {
                infura_key.map(|key| format!("https://{subdomain}.infura.io/v3/{key}"))
            }
            Self::Public(url) => Some(url.to_string()),
        }
    }
}

/// A network known by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownNetwork {
    pub name: &'static str,
    pub chain_id: u64,
    /// `None` for networks only known for their chain id.
    pub endpoint: Option<RpcEndpoint>,
}

const fn known(name: &'static str, chain_id: u64, endpoint: Option<RpcEndpoint>) -> KnownNetwork {
    KnownNetwork {
        name,
        chain_id,
        endpoint,
    }
}

/// Every network name the configuration knows about.
pub const KNOWN_NETWORKS: &[KnownNetwork] = &[
    known(LOCAL_NETWORK, 31337, None),
    known("mainnet", 1, Some(RpcEndpoint::Infura("mainnet"))),
    known("gnosis", 100, Some(RpcEndpoint::Public("https://rpc.gnosischain.com"))),
    known("ewc", 246, Some(RpcEndpoint::Public("https://rpc.energyweb.org"))),
    known("goerli", 5, Some(RpcEndpoint::Infura("goerli"))),
    known("mumbai", 80001, Some(RpcEndpoint::Infura("polygon-mumbai"))),
    known("polygon", 137, Some(RpcEndpoint::Infura("polygon-mainnet"))),
    known("volta", 73799, Some(RpcEndpoint::Public("https://volta-rpc.energyweb.org"))),
    known("bsc", 56, Some(RpcEndpoint::Public("https://bsc-dataseed.binance.org/"))),
    known("arbitrum", 42161, Some(RpcEndpoint::Public("https://arb1.arbitrum.io/rpc"))),
    known(
        "fantomTestnet",
        4002,
        Some(RpcEndpoint::Public("https://rpc.testnet.fantom.network/")),
    ),
    known(
        "avalanche",
        43114,
        Some(RpcEndpoint::Public("https://api.avax.network/ext/bc/C/rpc")),
    ),
    known("bevm", 11501, None),
    known("bevmTestnet", 11503, None),
];

/// Look up a network by name.
pub fn known_network(name: &str) -> Option<&'static KnownNetwork> {
    KNOWN_NETWORKS.iter().find(|network| network.name == name)
}

/// Resolve a network name, or a decimal chain id, to a chain id.
pub fn chain_id_for(network: &str) -> Option<u64> {
    network
        .parse::<u64>()
        .ok()
        .or_else(|| known_network(network).map(|known| known.chain_id))
}

/// Whether the network is hosted by a provider that needs an API key.
pub fn requires_provider_key(network: &str) -> bool {
    PROVIDER_KEY_NETWORKS.contains(&network)
}

/// Fail fast when the selected network needs a provider key that is absent.
///
/// Must run before any network I/O.
pub fn ensure_provider_key(network: &str, env: &EnvSnapshot) -> Result<(), ConfigError> {
    if requires_provider_key(network) && env.infura_key.is_none() {
        return Err(ConfigError::MissingProviderKey {
            key: INFURA_KEY,
            network: network.to_string(),
        });
    }
    Ok(())
}

/// RPC configuration of a remote network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkConfig {
    pub url: String,
    pub accounts: AccountCredential,
}

impl NetworkConfig {
    pub fn new(url: impl Into<String>, accounts: AccountCredential) -> Self {
        Self {
            url: url.into(),
            accounts,
        }
    }
}

/// Settings of the in-process development network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HardhatNetworkConfig {
    pub allow_unlimited_contract_size: bool,
    pub block_gas_limit: u64,
    pub gas: u64,
}

impl Default for HardhatNetworkConfig {
    fn default() -> Self {
        Self {
            allow_unlimited_contract_size: true,
            block_gas_limit: 100_000_000,
            gas: 100_000_000,
        }
    }
}

/// Remote networks keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deref)]
pub struct NetworksConfig(BTreeMap<String, NetworkConfig>);

impl NetworksConfig {
    /// Assemble the remote networks, all sharing the same credential.
    ///
    /// Infura-hosted entries are left out when `INFURA_KEY` is unset, and the
    /// `custom` entry only exists when `NODE_URL` is set.
    pub fn assemble(env: &EnvSnapshot, credential: &AccountCredential) -> Self {
        let infura_key = env.infura_key.as_deref();
        let mut networks = BTreeMap::new();

        for network in KNOWN_NETWORKS {
            let Some(endpoint) = network.endpoint else {
                continue;
            };

            match endpoint.url(infura_key) {
                Some(url) => {
                    networks.insert(
                        network.name.to_string(),
                        NetworkConfig::new(url, credential.clone()),
                    );
                }
                None => {
                    tracing::debug!(network = network.name, "Skipping network, no {} set", INFURA_KEY);
                }
            }
        }

        if let Some(node_url) = &env.node_url {
            if let Err(e) = url::Url::parse(node_url) {
                tracing::warn!(err = %e, node_url = %node_url, "NODE_URL does not parse as a URL");
            }
            networks.insert(
                CUSTOM_NETWORK.to_string(),
                NetworkConfig::new(node_url.clone(), credential.clone()),
            );
        }

        Self(networks)
    }
}
