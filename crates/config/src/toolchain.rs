//! The complete configuration object handed to the contract toolchain.

use std::{collections::BTreeMap, path::Path};

use serde::Serialize;

use crate::{
    AccountCredential, ConfigError, DeploymentDescriptor, EnvSnapshot, HardhatNetworkConfig,
    NetworksConfig, SingletonFactoryRegistry, SolidityConfig, ensure_provider_key,
    networks::LOCAL_NETWORK, resolve_credential,
};

/// Name of the account every deployment is sent from.
pub const DEPLOYER_ACCOUNT: &str = "deployer";

/// Test runner timeout, in milliseconds.
pub const MOCHA_TIMEOUT_MS: u64 = 2_000_000;

/// Project layout relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectPaths {
    pub artifacts: String,
    pub cache: String,
    pub deploy: String,
    pub sources: String,
}

impl Default for ProjectPaths {
    fn default() -> Self {
        Self {
            artifacts: "build/artifacts".to_string(),
            cache: "build/cache".to_string(),
            deploy: "src/deploy".to_string(),
            sources: "contracts".to_string(),
        }
    }
}

/// The local network plus every remote network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkSection {
    pub hardhat: HardhatNetworkConfig,
    #[serde(flatten)]
    pub remote: NetworksConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MochaConfig {
    pub timeout: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EtherscanConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Resolved toolchain configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolchainConfig {
    pub default_network: String,
    pub paths: ProjectPaths,
    pub solidity: SolidityConfig,
    pub networks: NetworkSection,
    /// Singleton factory descriptors keyed by decimal chain id.
    pub deterministic_deployment: BTreeMap<String, DeploymentDescriptor>,
    pub named_accounts: BTreeMap<String, u32>,
    pub mocha: MochaConfig,
    pub etherscan: EtherscanConfig,
}

impl ToolchainConfig {
    /// Start building a configuration from an environment snapshot.
    pub fn builder(env: &EnvSnapshot) -> ToolchainConfigBuilder<'_> {
        ToolchainConfigBuilder::new(env)
    }

    /// The credential shared by the remote networks.
    pub fn credential(&self) -> Option<&AccountCredential> {
        self.networks.remote.values().next().map(|network| &network.accounts)
    }

    /// Save the configuration as JSON, or TOML when the path ends in `.toml`.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::to_string_pretty(self)?,
            _ => serde_json::to_string_pretty(self)?,
        };
        std::fs::write(path, content)?;
        tracing::info!(path = %path.display(), "Configuration saved");
        Ok(())
    }
}

/// Builder for [`ToolchainConfig`].
///
/// # Example
///
/// ```
/// use saferig_config::{EnvSnapshot, ToolchainConfig};
///
/// let env = EnvSnapshot::from_vars([("NODE_URL", "http://localhost:8545")]);
/// let config = ToolchainConfig::builder(&env).network("custom").build()?;
/// assert_eq!(config.networks.remote["custom"].url, "http://localhost:8545");
/// # Ok::<(), saferig_config::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ToolchainConfigBuilder<'a> {
    env: &'a EnvSnapshot,
    network: String,
    registry: Option<SingletonFactoryRegistry>,
}

impl<'a> ToolchainConfigBuilder<'a> {
    pub fn new(env: &'a EnvSnapshot) -> Self {
        Self {
            env,
            network: LOCAL_NETWORK.to_string(),
            registry: None,
        }
    }

    /// Select the network the toolchain will run against. Defaults to `hardhat`.
    pub fn network(mut self, network: impl Into<String>) -> Self {
        self.network = network.into();
        self
    }

    /// Use a custom factory registry instead of the built-in one.
    pub fn registry(mut self, registry: SingletonFactoryRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Build the configuration.
    ///
    /// The provider-key guard runs first, so a missing key aborts before
    /// anything else is resolved.
    pub fn build(self) -> Result<ToolchainConfig, ConfigError> {
        ensure_provider_key(&self.network, self.env)?;

        let credential = resolve_credential(self.env);
        let remote = NetworksConfig::assemble(self.env, &credential);

        if self.network != LOCAL_NETWORK && !remote.contains_key(&self.network) {
            return Err(ConfigError::UnknownNetwork(self.network));
        }

        let solidity = SolidityConfig::from_env(self.env)?;
        let registry = self.registry.unwrap_or_default();

        tracing::debug!(
            network = %self.network,
            credential = credential.kind(),
            networks = remote.len(),
            "Resolved toolchain configuration"
        );

        if credential.is_default() && self.network != LOCAL_NETWORK {
            tracing::warn!(
                network = %self.network,
                "Using the publicly known default mnemonic on a remote network"
            );
        }

        Ok(ToolchainConfig {
            default_network: self.network,
            paths: ProjectPaths::default(),
            solidity,
            networks: NetworkSection {
                hardhat: HardhatNetworkConfig::default(),
                remote,
            },
            deterministic_deployment: registry.descriptors(),
            named_accounts: BTreeMap::from([(DEPLOYER_ACCOUNT.to_string(), 0)]),
            mocha: MochaConfig {
                timeout: MOCHA_TIMEOUT_MS,
            },
            etherscan: EtherscanConfig {
                api_key: self.env.etherscan_api_key.clone(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ToolchainConfig::builder(&EnvSnapshot::default())
            .build()
            .unwrap();

        assert_eq!(config.default_network, "hardhat");
        assert_eq!(config.paths, ProjectPaths::default());
        assert_eq!(config.named_accounts[DEPLOYER_ACCOUNT], 0);
        assert_eq!(config.mocha.timeout, 2_000_000);
        assert!(config.etherscan.api_key.is_none());
        assert!(config.networks.hardhat.allow_unlimited_contract_size);
        assert!(config.credential().is_some_and(AccountCredential::is_default));
    }

    #[test]
    fn test_missing_provider_key_aborts() {
        let err = ToolchainConfig::builder(&EnvSnapshot::default())
            .network("polygon")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingProviderKey { ref network, .. } if network == "polygon"));
    }

    #[test]
    fn test_custom_network_requires_node_url() {
        let err = ToolchainConfig::builder(&EnvSnapshot::default())
            .network("custom")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownNetwork(ref name) if name == "custom"));
    }

    #[test]
    fn test_etherscan_passthrough() {
        let env = EnvSnapshot::from_vars([("ETHERSCAN_API_KEY", "verify-me")]);
        let config = ToolchainConfig::builder(&env).build().unwrap();
        assert_eq!(config.etherscan.api_key.as_deref(), Some("verify-me"));
    }

    #[test]
    fn test_serialized_shape() {
        let env = EnvSnapshot::from_vars([("PK", "0x01"), ("INFURA_KEY", "abc")]);
        let config = ToolchainConfig::builder(&env).network("mainnet").build().unwrap();
        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["defaultNetwork"], "mainnet");
        assert_eq!(json["networks"]["hardhat"]["blockGasLimit"], 100_000_000);
        assert_eq!(json["networks"]["mainnet"]["accounts"], serde_json::json!(["0x01"]));
        assert_eq!(json["namedAccounts"]["deployer"], 0);
        assert_eq!(json["solidity"]["compilers"][0]["version"], "0.7.6");
        assert!(json["deterministicDeployment"]["11501"]["signedTx"].is_string());
    }
}
