//! Deterministic deployment of the singleton CREATE2 factory.
//!
//! A factory is reproduced on a new chain by funding a fixed deployer account
//! and broadcasting a pre-signed, EIP-155 bound transaction. Because the
//! deployer and its nonce are the same everywhere, the factory lands at the
//! same address on every chain, and so do the contracts it deploys.

mod registry;
mod tx;

pub use registry::{
    DeploymentDescriptor, FactoryDeployment, SAFE_SINGLETON_DEPLOYER, SAFE_SINGLETON_FACTORY,
    SINGLETON_FACTORY_REPO, SingletonFactoryRegistry,
};
pub use tx::LegacyTransaction;
