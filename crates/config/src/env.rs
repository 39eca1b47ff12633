//! Snapshot of the environment variables the configuration is built from.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Enables a `custom` network pointing at this RPC endpoint.
pub const NODE_URL: &str = "NODE_URL";
/// API key for the Infura-hosted networks.
pub const INFURA_KEY: &str = "INFURA_KEY";
/// Seed phrase overriding the default mnemonic.
pub const MNEMONIC: &str = "MNEMONIC";
/// Contract verification API key.
pub const ETHERSCAN_API_KEY: &str = "ETHERSCAN_API_KEY";
/// Secret key, takes precedence over the mnemonic.
pub const PK: &str = "PK";
/// Primary Solidity compiler version.
pub const SOLIDITY_VERSION: &str = "SOLIDITY_VERSION";
/// JSON-encoded settings for the primary compiler.
pub const SOLIDITY_SETTINGS: &str = "SOLIDITY_SETTINGS";

/// Immutable view of the recognised environment variables.
///
/// The snapshot is captured once at startup and passed explicitly to every
/// resolver. Empty values are treated as unset.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infura_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etherscan_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pk: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solidity_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solidity_settings: Option<String>,
}

impl EnvSnapshot {
    /// Build a snapshot from `(name, value)` pairs, ignoring unrelated names.
    ///
    /// ```
    /// use saferig_config::EnvSnapshot;
    ///
    /// let env = EnvSnapshot::from_vars([("PK", "0x01"), ("HOME", "/root")]);
    /// assert_eq!(env.pk.as_deref(), Some("0x01"));
    /// ```
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut env = Self::default();
        for (name, value) in vars {
            let slot = match name.as_ref() {
                NODE_URL => &mut env.node_url,
                INFURA_KEY => &mut env.infura_key,
                MNEMONIC => &mut env.mnemonic,
                ETHERSCAN_API_KEY => &mut env.etherscan_api_key,
                PK => &mut env.pk,
                SOLIDITY_VERSION => &mut env.solidity_version,
                SOLIDITY_SETTINGS => &mut env.solidity_settings,
                _ => continue,
            };
            *slot = Some(value.into());
        }
        env.normalized()
    }

    /// Drop empty values so that `FOO=` behaves like an unset variable.
    pub fn normalized(self) -> Self {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        Self {
            node_url: present(self.node_url),
            infura_key: present(self.infura_key),
            mnemonic: present(self.mnemonic),
            etherscan_api_key: present(self.etherscan_api_key),
            pk: present(self.pk),
            solidity_version: present(self.solidity_version),
            solidity_settings: present(self.solidity_settings),
        }
    }
}

impl fmt::Debug for EnvSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");

        f.debug_struct("EnvSnapshot")
            .field("node_url", &self.node_url)
            .field("infura_key", &redact(&self.infura_key))
            .field("mnemonic", &redact(&self.mnemonic))
            .field("etherscan_api_key", &redact(&self.etherscan_api_key))
            .field("pk", &redact(&self.pk))
            .field("solidity_version", &self.solidity_version)
            .field("solidity_settings", &self.solidity_settings)
            .finish()
    }
}
