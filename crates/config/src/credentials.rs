//! Account credential selection shared by every remote network.

use std::fmt;

use alloy_signer_local::{MnemonicBuilder, PrivateKeySigner, coins_bip39::English};
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{ConfigError, EnvSnapshot};

/// Publicly known seed phrase used when neither `PK` nor `MNEMONIC` is set.
///
/// Only suitable for local and test networks.
pub const DEFAULT_MNEMONIC: &str =
    "candy maple cake sugar pudding cream honey rich smooth crumble sweet treat";

/// How accounts are authorised on a network.
#[derive(Clone, PartialEq, Eq)]
pub enum AccountCredential {
    /// A single raw secret key.
    PrivateKey(String),
    /// Accounts derived from a BIP-39 seed phrase.
    Mnemonic { mnemonic: String },
}

impl AccountCredential {
    /// Short label for display, never the secret itself.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PrivateKey(_) => "private-key",
            Self::Mnemonic { .. } => "mnemonic",
        }
    }

    /// Whether this credential is the publicly known fallback phrase.
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Mnemonic { mnemonic } if mnemonic == DEFAULT_MNEMONIC)
    }

    /// Derive the local signer for the account at `index`.
    ///
    /// Mnemonics follow the `m/44'/60'/0'/0/{index}` path. A private key only
    /// has an account at index 0.
    pub fn signer(&self, index: u32) -> Result<PrivateKeySigner, ConfigError> {
        match self {
            Self::PrivateKey(key) if index == 0 => key
                .parse::<PrivateKeySigner>()
                .map_err(|e| ConfigError::InvalidCredential(e.to_string())),
            Self::PrivateKey(_) => Err(ConfigError::InvalidCredential(format!(
                "a private key credential has no account at index {index}"
            ))),
            Self::Mnemonic { mnemonic } => MnemonicBuilder::<English>::default()
                .phrase(mnemonic.as_str())
                .index(index)
                .and_then(|builder| builder.build())
                .map_err(|e| ConfigError::InvalidCredential(e.to_string())),
        }
    }
}

impl fmt::Debug for AccountCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrivateKey(_) => f.write_str("PrivateKey(<redacted>)"),
            Self::Mnemonic { .. } if self.is_default() => f.write_str("Mnemonic(<default>)"),
            Self::Mnemonic { .. } => f.write_str("Mnemonic(<redacted>)"),
        }
    }
}

/// Serialized in the shape network clients expect: `["0x.."]` or `{ "mnemonic": ".." }`.
impl Serialize for AccountCredential {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::PrivateKey(key) => [key].serialize(serializer),
            Self::Mnemonic { mnemonic } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("mnemonic", mnemonic)?;
                map.end()
            }
        }
    }
}

/// Select the account credential from the environment snapshot.
///
/// `PK` wins over `MNEMONIC`; with neither set the [`DEFAULT_MNEMONIC`] is used.
pub fn resolve_credential(env: &EnvSnapshot) -> AccountCredential {
    if let Some(pk) = &env.pk {
        return AccountCredential::PrivateKey(pk.clone());
    }

    let mnemonic = env.mnemonic.as_deref().unwrap_or(DEFAULT_MNEMONIC);
    AccountCredential::Mnemonic {
        mnemonic: mnemonic.to_string(),
    }
}
