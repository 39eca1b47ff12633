//! Errors raised while resolving the toolchain configuration.

use thiserror::Error;

use crate::singleton::SINGLETON_FACTORY_REPO;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A network hosted by a keyed RPC provider was selected without the key.
    #[error("Could not find {key} in env, unable to connect to network {network}")]
    MissingProviderKey { key: &'static str, network: String },

    /// No singleton factory deployment is registered for the chain.
    #[error(
        "Safe factory not found for network {chain_id}. You can request a new deployment at {repo}. \
         For more information, see https://github.com/safe-global/safe-contracts#replay-protection-eip-155",
        repo = SINGLETON_FACTORY_REPO
    )]
    FactoryNotFound { chain_id: u64 },

    /// A registered factory deployment does not match its signed transaction.
    #[error("Invalid factory deployment for chain {chain_id}: {reason}")]
    InvalidFactoryDeployment { chain_id: u64, reason: String },

    /// The selected network is not part of the assembled configuration.
    #[error("Network {0} is not configured")]
    UnknownNetwork(String),

    /// The network name is neither a known network nor a decimal chain id.
    #[error("Unable to determine the chain id of network {0}, pass --chain-id")]
    UnknownChainId(String),

    /// The network has no RPC endpoint in the assembled configuration.
    #[error("Network {0} has no RPC URL, pass --rpc-url")]
    MissingRpcUrl(String),

    #[error("Invalid RPC URL for network {network}: {source}")]
    InvalidRpcUrl {
        network: String,
        #[source]
        source: url::ParseError,
    },

    /// The node answered a JSON-RPC request with an error object.
    #[error("{method} failed with RPC error {code}: {message}")]
    Rpc {
        method: String,
        code: i64,
        message: String,
    },

    /// The node answered with neither a `result` nor an `error`.
    #[error("{method} response carries no result")]
    EmptyRpcResponse { method: String },

    #[error("SOLIDITY_SETTINGS is not valid JSON: {0}")]
    InvalidSoliditySettings(#[source] serde_json::Error),

    #[error("Invalid account credential: {0}")]
    InvalidCredential(String),

    #[error("Malformed signed transaction: {0}")]
    Rlp(#[from] alloy_core::rlp::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),
}
