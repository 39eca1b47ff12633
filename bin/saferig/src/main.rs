//! saferig resolves networks, credentials and singleton factory deployments for a
//! smart-contract toolchain.

mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use comfy_table::Table;

use cli::{Cli, Command, OutputFormat};
use saferig_config::{
    BroadcastOutcome, EnvSnapshot, FactoryTarget, SingletonFactoryRegistry, ToolchainConfig,
    broadcast_factory, ensure_provider_key, networks::chain_id_for, probe_factory,
    resolve_credential, rpc,
};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is not an error.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize the logger.
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .with_writer(std::io::stderr)
        .init();

    if let Ok(path) = &dotenv {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }

    let env = EnvSnapshot::from(cli.env.clone());

    match cli.command {
        Command::Config { format, out } => {
            let config = ToolchainConfig::builder(&env).network(&cli.network).build()?;

            match out {
                Some(path) => config.save_to_file(&path)?,
                None => {
                    let content = match format {
                        OutputFormat::Json => serde_json::to_string_pretty(&config)?,
                        OutputFormat::Toml => toml_string(&config)?,
                    };
                    println!("{content}");
                }
            }
        }

        Command::Networks => {
            let config = ToolchainConfig::builder(&env).network(&cli.network).build()?;

            let mut table = Table::new();
            table.set_header(vec!["Network", "Chain ID", "URL", "Accounts"]);
            table.add_row(vec![
                "hardhat".to_string(),
                "31337".to_string(),
                "(in-process)".to_string(),
                "-".to_string(),
            ]);
            for (name, network) in config.networks.remote.iter() {
                table.add_row(vec![
                    name.clone(),
                    chain_id_for(name).map(|id| id.to_string()).unwrap_or_default(),
                    redact_key(&network.url, env.infura_key.as_deref()),
                    network.accounts.kind().to_string(),
                ]);
            }
            println!("{table}");
        }

        Command::Account { index } => {
            ensure_provider_key(&cli.network, &env)?;
            let credential = resolve_credential(&env);
            let signer = credential.signer(index)?;

            if credential.is_default() {
                tracing::warn!("Using the publicly known default mnemonic");
            }
            println!("{}", signer.address().to_checksum(None));
        }

        Command::Descriptor { chain_id, registry } => {
            let registry = load_registry(registry.as_deref())?;
            let descriptor = match chain_id {
                Some(chain_id) => registry.descriptor(chain_id)?,
                None => registry.descriptor_for_network(&cli.network)?,
            };
            println!("{}", serde_json::to_string_pretty(&descriptor)?);
        }

        Command::FactoryStatus {
            chain_id,
            rpc_url,
            registry,
            broadcast,
        } => {
            let FactoryTarget { chain_id, rpc_url } =
                FactoryTarget::resolve(&env, &cli.network, chain_id, rpc_url)?;

            let registry = load_registry(registry.as_deref())?;
            let descriptor = registry.descriptor(chain_id)?;
            let client = rpc::create_client()?;

            if broadcast {
                match broadcast_factory(&client, &rpc_url, chain_id, &descriptor).await? {
                    BroadcastOutcome::AlreadyDeployed => {
                        println!("Factory already deployed at {}", descriptor.factory);
                    }
                    BroadcastOutcome::Unfunded { balance, required } => {
                        println!(
                            "Deployer {} holds {} wei, fund it with at least {} wei first",
                            descriptor.deployer, balance, required
                        );
                    }
                    BroadcastOutcome::Sent { tx_hash } => {
                        println!("Factory deployment sent: {tx_hash}");
                    }
                }
            } else {
                let status = probe_factory(&client, &rpc_url, chain_id, &descriptor).await?;
                println!("{}", serde_json::to_string_pretty(&status)?);
            }
        }
    }

    Ok(())
}

fn load_registry(path: Option<&Path>) -> Result<SingletonFactoryRegistry> {
    let mut registry = SingletonFactoryRegistry::builtin();
    if let Some(path) = path {
        registry.extend_from_file(path)?;
    }
    Ok(registry)
}

fn toml_string(config: &ToolchainConfig) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize configuration to TOML")
}

/// Hide the provider key embedded in an RPC URL.
fn redact_key(url: &str, key: Option<&str>) -> String {
    match key {
        Some(key) => url.replace(key, "***"),
        None => url.to_string(),
    }
}
