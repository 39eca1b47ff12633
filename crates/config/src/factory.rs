//! Checks whether the singleton factory exists on a live chain, and deploys it
//! from its pre-signed transaction when the deployer has been funded.

use alloy_core::primitives::{B256, Bytes, U64, U256};
use anyhow::{Context, Result};
use serde::Serialize;
use url::Url;

use crate::{
    ConfigError, DeploymentDescriptor, EnvSnapshot, NetworksConfig, ensure_provider_key,
    networks::chain_id_for, resolve_credential, rpc,
};

/// The chain a factory check runs against and the endpoint serving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryTarget {
    pub chain_id: u64,
    pub rpc_url: Url,
}

impl FactoryTarget {
    /// Resolve the chain id and RPC endpoint for `network`.
    ///
    /// An explicit `rpc_url` only has to pass the provider-key guard, so
    /// networks without a configured endpoint (such as `bevm`) can still be
    /// checked. Otherwise the URL is taken from the assembled network map.
    pub fn resolve(
        env: &EnvSnapshot,
        network: &str,
        chain_id: Option<u64>,
        rpc_url: Option<Url>,
    ) -> Result<Self, ConfigError> {
        ensure_provider_key(network, env)?;

        let chain_id = chain_id
            .or_else(|| chain_id_for(network))
            .ok_or_else(|| ConfigError::UnknownChainId(network.to_string()))?;

        let rpc_url = match rpc_url {
            Some(url) => url,
            None => {
                let networks = NetworksConfig::assemble(env, &resolve_credential(env));
                let entry = networks
                    .get(network)
                    .ok_or_else(|| ConfigError::MissingRpcUrl(network.to_string()))?;
                Url::parse(&entry.url).map_err(|source| ConfigError::InvalidRpcUrl {
                    network: network.to_string(),
                    source,
                })?
            }
        };

        Ok(Self { chain_id, rpc_url })
    }
}

/// State of the singleton factory on a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactoryStatus {
    pub chain_id: u64,
    pub factory_deployed: bool,
    pub deployer_balance: U256,
    pub deployer_funded: bool,
}

impl FactoryStatus {
    /// Derive the status from raw chain observations.
    pub fn evaluate(
        chain_id: u64,
        factory_code: &Bytes,
        deployer_balance: U256,
        descriptor: &DeploymentDescriptor,
    ) -> Self {
        Self {
            chain_id,
            factory_deployed: !factory_code.is_empty(),
            deployer_balance,
            deployer_funded: deployer_balance >= descriptor.funding,
        }
    }
}

/// Outcome of [`broadcast_factory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastOutcome {
    /// The factory already has code, nothing was sent.
    AlreadyDeployed,
    /// The deployer cannot pay for the deployment yet.
    Unfunded { balance: U256, required: U256 },
    /// The signed transaction was accepted by the node.
    Sent { tx_hash: B256 },
}

/// Query the chain for the factory code and the deployer balance.
///
/// Fails if the endpoint serves a different chain than `expected_chain_id`,
/// since the signed transaction would be rejected there anyway.
pub async fn probe_factory(
    client: &reqwest::Client,
    rpc_url: &Url,
    expected_chain_id: u64,
    descriptor: &DeploymentDescriptor,
) -> Result<FactoryStatus> {
    let chain_id: U64 = rpc::json_rpc_call(client, rpc_url, "eth_chainId", vec![])
        .await
        .context("Failed to query chain id")?;
    let chain_id = chain_id.to::<u64>();

    if chain_id != expected_chain_id {
        anyhow::bail!(
            "RPC endpoint serves chain {} but the descriptor is for chain {}",
            chain_id,
            expected_chain_id
        );
    }

    let code: Bytes = rpc::json_rpc_call(
        client,
        rpc_url,
        "eth_getCode",
        vec![
            serde_json::json!(descriptor.factory),
            serde_json::json!("latest"),
        ],
    )
    .await
    .context("Failed to fetch factory code")?;

    let balance: U256 = rpc::json_rpc_call(
        client,
        rpc_url,
        "eth_getBalance",
        vec![
            serde_json::json!(descriptor.deployer),
            serde_json::json!("latest"),
        ],
    )
    .await
    .context("Failed to fetch deployer balance")?;

    let status = FactoryStatus::evaluate(chain_id, &code, balance, descriptor);

    tracing::info!(
        chain_id,
        factory = %descriptor.factory,
        factory_deployed = status.factory_deployed,
        deployer_balance = %status.deployer_balance,
        deployer_funded = status.deployer_funded,
        "Probed singleton factory"
    );

    Ok(status)
}

/// Broadcast the pre-signed deployment if the factory is missing and the
/// deployer can pay for it.
pub async fn broadcast_factory(
    client: &reqwest::Client,
    rpc_url: &Url,
    expected_chain_id: u64,
    descriptor: &DeploymentDescriptor,
) -> Result<BroadcastOutcome> {
    let status = probe_factory(client, rpc_url, expected_chain_id, descriptor).await?;

    if status.factory_deployed {
        return Ok(BroadcastOutcome::AlreadyDeployed);
    }
    if !status.deployer_funded {
        return Ok(BroadcastOutcome::Unfunded {
            balance: status.deployer_balance,
            required: descriptor.funding,
        });
    }

    let tx_hash: B256 = rpc::json_rpc_call(
        client,
        rpc_url,
        "eth_sendRawTransaction",
        vec![serde_json::json!(descriptor.signed_tx)],
    )
    .await
    .context("Failed to send factory deployment transaction")?;

    tracing::info!(%tx_hash, factory = %descriptor.factory, "Factory deployment sent");

    Ok(BroadcastOutcome::Sent { tx_hash })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SingletonFactoryRegistry;

    fn descriptor() -> DeploymentDescriptor {
        SingletonFactoryRegistry::builtin().descriptor(11501).unwrap()
    }

    fn node() -> Url {
        Url::parse("http://node:8545").unwrap()
    }

    #[test]
    fn test_target_for_network_without_endpoint() {
        let target =
            FactoryTarget::resolve(&EnvSnapshot::default(), "bevm", None, Some(node())).unwrap();
        assert_eq!(target, FactoryTarget { chain_id: 11501, rpc_url: node() });

        let target =
            FactoryTarget::resolve(&EnvSnapshot::default(), "bevmTestnet", None, Some(node())).unwrap();
        assert_eq!(target.chain_id, 11503);
    }

    #[test]
    fn test_target_needs_url_when_network_has_none() {
        let err = FactoryTarget::resolve(&EnvSnapshot::default(), "bevm", None, None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRpcUrl(ref name) if name == "bevm"));

        let err = FactoryTarget::resolve(&EnvSnapshot::default(), "hardhat", None, None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRpcUrl(_)));
    }

    #[test]
    fn test_target_keeps_provider_key_guard() {
        let err =
            FactoryTarget::resolve(&EnvSnapshot::default(), "mainnet", None, Some(node())).unwrap_err();
        assert!(matches!(err, ConfigError::MissingProviderKey { .. }));
    }

    #[test]
    fn test_target_url_from_network_map() {
        let env = EnvSnapshot::from_vars([("INFURA_KEY", "k3y")]);
        let target = FactoryTarget::resolve(&env, "goerli", None, None).unwrap();
        assert_eq!(target.chain_id, 5);
        assert_eq!(target.rpc_url.as_str(), "https://goerli.infura.io/v3/k3y");

        let env = EnvSnapshot::from_vars([("NODE_URL", "http://10.0.0.7:8545")]);
        let target = FactoryTarget::resolve(&env, "custom", Some(11501), None).unwrap();
        assert_eq!(target, FactoryTarget {
            chain_id: 11501,
            rpc_url: Url::parse("http://10.0.0.7:8545").unwrap(),
        });
    }

    #[test]
    fn test_target_custom_needs_chain_id() {
        let env = EnvSnapshot::from_vars([("NODE_URL", "http://10.0.0.7:8545")]);
        let err = FactoryTarget::resolve(&env, "custom", None, None).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownChainId(ref name) if name == "custom"));
        assert!(err.to_string().contains("--chain-id"));
    }

    #[test]
    fn test_status_without_code_or_funds() {
        let status = FactoryStatus::evaluate(11501, &Bytes::new(), U256::ZERO, &descriptor());
        assert!(!status.factory_deployed);
        assert!(!status.deployer_funded);
    }

    #[test]
    fn test_status_funded_exactly() {
        let descriptor = descriptor();
        let status = FactoryStatus::evaluate(11501, &Bytes::new(), descriptor.funding, &descriptor);
        assert!(status.deployer_funded);
    }

    #[test]
    fn test_status_deployed() {
        let status = FactoryStatus::evaluate(
            11501,
            &Bytes::from_static(&[0x60, 0x80]),
            U256::ZERO,
            &descriptor(),
        );
        assert!(status.factory_deployed);
    }
}
