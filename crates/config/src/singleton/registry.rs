//! Chain id → singleton factory deployment registry.

use std::{collections::BTreeMap, path::Path};

use alloy_core::primitives::{Address, Bytes, U256, address, hex};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize, Serializer};

use super::LegacyTransaction;
use crate::{ConfigError, networks::chain_id_for};

/// Where factory deployments for new chains are requested.
pub const SINGLETON_FACTORY_REPO: &str = "https://github.com/safe-global/safe-singleton-factory";

/// Address of the Safe singleton factory on every chain it is deployed to.
pub const SAFE_SINGLETON_FACTORY: Address = address!("914d7Fec6aaC8cd542e72Bca78B30650d45643d7");
/// Account that signs every Safe singleton factory deployment.
pub const SAFE_SINGLETON_DEPLOYER: Address =
    address!("E1CB04A0fA36DdD16a06ea828007E35e1a3cBC37");

const BEVM_GAS_PRICE: u64 = 50_000_000;
const BEVM_GAS_LIMIT: u64 = 101_616;

/// BEVM mainnet (11501).
pub(crate) const BEVM_MAINNET_TRANSACTION: &[u8] = &hex!(
    "f8a6808402faf08083018cf08080b853604580600e600039806000f350fe7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffe03601600081602082378035828234f58015156039578182fd5b8082525050506014600cf38259fea0cd0786c5a8e7d2bb2575763be83434e8b6a1db63d6cc6afa405b6615569ec830a055d1f40376d1109a62e822e60e4312af9549ce13b93a21bd0b022f7bbd477047"
);

/// BEVM testnet (11503).
pub(crate) const BEVM_TESTNET_TRANSACTION: &[u8] = &hex!(
    "f8a6808402faf08083018cf08080b853604580600e600039806000f350fe7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffe03601600081602082378035828234f58015156039578182fd5b8082525050506014600cf3825a02a0f8ea5f1212ae52173f4b9b99bd18b62e0555da845834081215993317b48b3e1ca0757bd526f59d74395ede30cde3ab630fee4a9147e05081d700cf8d92d8cc16b0"
);

/// A pre-signed factory deployment, in the shape of the published
/// singleton-factory artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactoryDeployment {
    pub gas_price: u64,
    pub gas_limit: u64,
    pub signer_address: Address,
    pub address: Address,
    pub transaction: Bytes,
}

impl FactoryDeployment {
    fn bevm(transaction: &'static [u8]) -> Self {
        Self {
            gas_price: BEVM_GAS_PRICE,
            gas_limit: BEVM_GAS_LIMIT,
            signer_address: SAFE_SINGLETON_DEPLOYER,
            address: SAFE_SINGLETON_FACTORY,
            transaction: Bytes::from_static(transaction),
        }
    }

    /// `gasLimit × gasPrice`, in wei.
    pub fn funding(&self) -> U256 {
        U256::from(self.gas_limit) * U256::from(self.gas_price)
    }

    /// Check the metadata against the signed transaction it describes.
    pub fn verify(&self, chain_id: u64) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidFactoryDeployment { chain_id, reason };
        let tx = LegacyTransaction::decode(&self.transaction)?;

        if tx.chain_id() != Some(chain_id) {
            return Err(invalid(format!(
                "transaction is bound to chain {:?}",
                tx.chain_id()
            )));
        }
        if !tx.is_contract_creation() {
            return Err(invalid("transaction is not a contract creation".to_string()));
        }
        if tx.gas_price != u128::from(self.gas_price) || tx.gas_limit != self.gas_limit {
            return Err(invalid(format!(
                "transaction pays {} gas at {} wei, metadata says {} at {}",
                tx.gas_limit, tx.gas_price, self.gas_limit, self.gas_price
            )));
        }
        let created = self.signer_address.create(tx.nonce);
        if created != self.address {
            return Err(invalid(format!(
                "{} at nonce {} creates {}, not {}",
                self.signer_address, tx.nonce, created, self.address
            )));
        }

        Ok(())
    }

    pub fn descriptor(&self) -> DeploymentDescriptor {
        DeploymentDescriptor {
            factory: self.address,
            deployer: self.signer_address,
            funding: self.funding(),
            signed_tx: self.transaction.clone(),
        }
    }
}

/// Everything needed to reproduce the singleton factory on a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentDescriptor {
    pub factory: Address,
    pub deployer: Address,
    /// Decimal wei string when serialized.
    #[serde(serialize_with = "serialize_decimal")]
    pub funding: U256,
    pub signed_tx: Bytes,
}

fn serialize_decimal<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Known factory deployments keyed by chain id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingletonFactoryRegistry {
    deployments: BTreeMap<u64, FactoryDeployment>,
}

impl Default for SingletonFactoryRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SingletonFactoryRegistry {
    /// A registry with no deployments.
    pub fn empty() -> Self {
        Self {
            deployments: BTreeMap::new(),
        }
    }

    /// The deployments shipped with this crate.
    pub fn builtin() -> Self {
        Self {
            deployments: BTreeMap::from([
                (11501, FactoryDeployment::bevm(BEVM_MAINNET_TRANSACTION)),
                (11503, FactoryDeployment::bevm(BEVM_TESTNET_TRANSACTION)),
            ]),
        }
    }

    /// Register a deployment after checking it against its signed transaction.
    pub fn register(&mut self, chain_id: u64, deployment: FactoryDeployment) -> Result<(), ConfigError> {
        deployment.verify(chain_id)?;
        if self.deployments.insert(chain_id, deployment).is_some() {
            tracing::debug!(chain_id, "Replaced registered factory deployment");
        }
        Ok(())
    }

    /// Merge deployments from a JSON file of the form `{ "<chainId>": { ... } }`.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read factory registry from {}", path.display()))?;

        let entries: BTreeMap<String, FactoryDeployment> =
            serde_json::from_str(&content).context("Failed to parse factory registry JSON")?;

        for (key, deployment) in entries {
            let chain_id: u64 = key
                .parse()
                .context(format!("Invalid chain id {:?} in factory registry", key))?;
            self.register(chain_id, deployment)?;
        }

        tracing::info!(
            path = %path.display(),
            chains = self.deployments.len(),
            "Loaded factory registry"
        );

        Ok(())
    }

    pub fn get(&self, chain_id: u64) -> Option<&FactoryDeployment> {
        self.deployments.get(&chain_id)
    }

    pub fn chain_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.deployments.keys().copied()
    }

    /// The deployment descriptor for `chain_id`.
    pub fn descriptor(&self, chain_id: u64) -> Result<DeploymentDescriptor, ConfigError> {
        self.get(chain_id)
            .map(FactoryDeployment::descriptor)
            .ok_or(ConfigError::FactoryNotFound { chain_id })
    }

    /// The deployment descriptor for a network name or decimal chain id.
    pub fn descriptor_for_network(&self, network: &str) -> Result<DeploymentDescriptor, ConfigError> {
        let chain_id =
            chain_id_for(network).ok_or_else(|| ConfigError::UnknownChainId(network.to_string()))?;
        self.descriptor(chain_id)
    }

    /// All descriptors keyed by decimal chain id.
    pub fn descriptors(&self) -> BTreeMap<String, DeploymentDescriptor> {
        self.deployments
            .iter()
            .map(|(chain_id, deployment)| (chain_id.to_string(), deployment.descriptor()))
            .collect()
    }
}
