use std::path::PathBuf;

use clap::{Parser, Subcommand};
use saferig_config::{EnvSnapshot, networks::LOCAL_NETWORK};
use tracing::level_filters::LevelFilter;
use url::Url;

/// Output format of the generated configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum OutputFormat {
    Json,
    Toml,
}

#[derive(Parser)]
#[command(name = "saferig")]
#[command(
    author,
    version,
    about = "Resolve networks, credentials and singleton factory deployments for a contract toolchain"
)]
pub struct Cli {
    /// The verbosity level.
    #[arg(short, long, global = true, env = "SAFERIG_VERBOSITY", default_value_t = LevelFilter::INFO)]
    pub verbosity: LevelFilter,

    /// The network the toolchain will run against.
    #[arg(short, long, global = true, env = "SAFERIG_NETWORK", default_value = LOCAL_NETWORK)]
    pub network: String,

    #[clap(flatten)]
    pub env: EnvArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Environment inputs, read once at startup.
#[derive(Debug, Clone, Parser)]
pub struct EnvArgs {
    /// RPC endpoint of the `custom` network.
    #[arg(long, global = true, env = "NODE_URL")]
    pub node_url: Option<String>,

    /// API key for Infura-hosted networks.
    #[arg(long, global = true, env = "INFURA_KEY", hide_env_values = true)]
    pub infura_key: Option<String>,

    /// Seed phrase for the network accounts.
    #[arg(long, global = true, env = "MNEMONIC", hide_env_values = true)]
    pub mnemonic: Option<String>,

    /// Contract verification API key.
    #[arg(long, global = true, env = "ETHERSCAN_API_KEY", hide_env_values = true)]
    pub etherscan_api_key: Option<String>,

    /// Secret key for the network accounts. Takes precedence over the mnemonic.
    #[arg(long, global = true, env = "PK", hide_env_values = true)]
    pub pk: Option<String>,

    /// Primary Solidity compiler version.
    #[arg(long, global = true, env = "SOLIDITY_VERSION")]
    pub solidity_version: Option<String>,

    /// JSON-encoded settings for the primary compiler.
    #[arg(long, global = true, env = "SOLIDITY_SETTINGS")]
    pub solidity_settings: Option<String>,
}

impl From<EnvArgs> for EnvSnapshot {
    fn from(args: EnvArgs) -> Self {
        EnvSnapshot {
            node_url: args.node_url,
            infura_key: args.infura_key,
            mnemonic: args.mnemonic,
            etherscan_api_key: args.etherscan_api_key,
            pk: args.pk,
            solidity_version: args.solidity_version,
            solidity_settings: args.solidity_settings,
        }
        .normalized()
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print or save the resolved toolchain configuration.
    Config {
        #[arg(long, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Write to this file instead of stdout. The format follows the extension.
        #[arg(long, short)]
        out: Option<PathBuf>,
    },

    /// List the configured networks.
    Networks,

    /// Show the address of a configured account.
    Account {
        /// Account index (the `deployer` named account is index 0).
        #[arg(long, default_value_t = 0)]
        index: u32,
    },

    /// Print the singleton factory deployment descriptor of a chain.
    ///
    /// Without `--chain-id`, the chain is looked up from `--network`.
    Descriptor {
        #[arg(long)]
        chain_id: Option<u64>,

        /// Extra factory deployments, as `{ "<chainId>": { ... } }` JSON.
        #[arg(long, env = "SAFERIG_FACTORY_REGISTRY")]
        registry: Option<PathBuf>,
    },

    /// Check whether the singleton factory is deployed on a live chain.
    FactoryStatus {
        #[arg(long)]
        chain_id: Option<u64>,

        /// RPC endpoint to query. Defaults to the selected network's URL.
        #[arg(long)]
        rpc_url: Option<Url>,

        #[arg(long, env = "SAFERIG_FACTORY_REGISTRY")]
        registry: Option<PathBuf>,

        /// Send the pre-signed deployment if the factory is missing and the
        /// deployer is funded.
        #[arg(long)]
        broadcast: bool,
    },
}
