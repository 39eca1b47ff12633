//! saferig-config - Configuration for a smart-contract development toolchain.
//!
//! This crate turns a snapshot of the environment into the configuration the
//! toolchain consumes: network RPC endpoints with their account credential,
//! the Solidity compiler list, and the descriptors needed to deploy the
//! singleton CREATE2 factory deterministically on each supported chain.

mod credentials;
pub use credentials::{AccountCredential, DEFAULT_MNEMONIC, resolve_credential};

pub mod env;
pub use env::EnvSnapshot;

mod error;
pub use error::ConfigError;

pub mod factory;
pub use factory::{BroadcastOutcome, FactoryStatus, FactoryTarget, broadcast_factory, probe_factory};

pub mod networks;
pub use networks::{
    HardhatNetworkConfig, NetworkConfig, NetworksConfig, ensure_provider_key,
    requires_provider_key,
};

pub mod rpc;

pub mod singleton;
pub use singleton::{
    DeploymentDescriptor, FactoryDeployment, LegacyTransaction, SingletonFactoryRegistry,
};

mod solidity;
pub use solidity::{
    DEFAULT_SOLIDITY_VERSION, LEGACY_SOLIDITY_VERSIONS, SolidityCompiler, SolidityConfig,
};

mod toolchain;
pub use toolchain::{
    DEPLOYER_ACCOUNT, EtherscanConfig, MochaConfig, NetworkSection, ProjectPaths,
    ToolchainConfig, ToolchainConfigBuilder,
};
