//! Solidity compiler list.

use serde::Serialize;
use serde_json::Value;

use crate::{ConfigError, EnvSnapshot};

/// Primary compiler version when `SOLIDITY_VERSION` is unset.
pub const DEFAULT_SOLIDITY_VERSION: &str = "0.7.6";

/// Legacy compilers always included after the primary one.
pub const LEGACY_SOLIDITY_VERSIONS: [&str; 2] = ["0.6.12", "0.5.17"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolidityCompiler {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolidityConfig {
    pub compilers: Vec<SolidityCompiler>,
}

impl SolidityConfig {
    /// Build the compiler list. `SOLIDITY_SETTINGS` is passed through verbatim
    /// once it parses as JSON.
    pub fn from_env(env: &EnvSnapshot) -> Result<Self, ConfigError> {
        let settings = env
            .solidity_settings
            .as_deref()
            .map(serde_json::from_str::<Value>)
            .transpose()
            .map_err(ConfigError::InvalidSoliditySettings)?;

        let primary = SolidityCompiler {
            version: env
                .solidity_version
                .clone()
                .unwrap_or_else(|| DEFAULT_SOLIDITY_VERSION.to_string()),
            settings,
        };

        let legacy = LEGACY_SOLIDITY_VERSIONS.iter().map(|version| SolidityCompiler {
            version: version.to_string(),
            settings: None,
        });

        Ok(Self {
            compilers: std::iter::once(primary).chain(legacy).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn versions(config: &SolidityConfig) -> Vec<&str> {
        config.compilers.iter().map(|c| c.version.as_str()).collect()
    }

    #[test]
    fn test_default_compilers() {
        let config = SolidityConfig::from_env(&EnvSnapshot::default()).unwrap();
        assert_eq!(versions(&config), ["0.7.6", "0.6.12", "0.5.17"]);
        assert!(config.compilers.iter().all(|c| c.settings.is_none()));
    }

    #[test]
    fn test_primary_version_and_settings() {
        let env = EnvSnapshot::from_vars([
            ("SOLIDITY_VERSION", "0.8.19"),
            ("SOLIDITY_SETTINGS", r#"{"optimizer":{"enabled":true,"runs":200}}"#),
        ]);
        let config = SolidityConfig::from_env(&env).unwrap();

        assert_eq!(versions(&config), ["0.8.19", "0.6.12", "0.5.17"]);
        assert_eq!(
            config.compilers[0].settings,
            Some(serde_json::json!({ "optimizer": { "enabled": true, "runs": 200 } }))
        );
        assert!(config.compilers[1].settings.is_none());
    }

    #[test]
    fn test_invalid_settings() {
        let env = EnvSnapshot::from_vars([("SOLIDITY_SETTINGS", "{optimizer")]);
        assert!(matches!(
            SolidityConfig::from_env(&env),
            Err(ConfigError::InvalidSoliditySettings(_))
        ));
    }
}
