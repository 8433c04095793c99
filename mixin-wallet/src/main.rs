// Copyright (c) 2024 Botho Foundation

//! Mixin Thin Wallet CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use mixin_account_keys::Address;
use mixin_crypto_keys::Key;
use mixin_transaction_core::constants::TX_VERSION_LATEST;
use mixin_wallet::{
    commands::{self, address::AddressSource, print_error},
    ClientConfig,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mixin-wallet")]
#[command(about = "Mixin thin wallet - build, inspect and submit kernel transactions")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Client configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a XIN address for a spend key, or a MIX address for members
    Address {
        /// Private spend key (hex, 32-byte scalar or 64-byte ed25519 key)
        #[arg(long, conflicts_with_all = ["public_spend", "members"])]
        spend: Option<Key>,

        /// Public spend key of a public address (hex)
        #[arg(long, conflicts_with = "members")]
        public_spend: Option<Key>,

        /// MIX members, user ids or XIN addresses
        #[arg(long, value_delimiter = ',')]
        members: Vec<String>,

        /// MIX threshold
        #[arg(long, default_value = "1")]
        threshold: u8,
    },

    /// Decode a raw transaction and print it as JSON
    Decode {
        /// Transaction hex
        raw: String,
    },

    /// Derive the ghost keys of an output locally
    Ghost {
        /// Receiver XIN addresses
        #[arg(required = true)]
        receivers: Vec<Address>,

        /// Output index
        #[arg(long, default_value = "0")]
        index: u8,

        /// Transaction version, selecting the hash family
        #[arg(long, default_value_t = TX_VERSION_LATEST)]
        version: u8,
    },

    /// Submit a signed raw transaction to a kernel node
    SendRaw {
        /// Transaction hex
        raw: String,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<ClientConfig> {
    let mut config = match path {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };
    config.apply_env();
    config.validate()?;
    Ok(config)
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Address {
            spend,
            public_spend,
            members,
            threshold,
        } => {
            let source = match (spend, public_spend) {
                (Some(spend), _) => AddressSource::PrivateSpend(spend),
                (None, Some(public_spend)) => AddressSource::PublicSpend(public_spend),
                (None, None) => AddressSource::Members { members, threshold },
            };
            commands::address::run(source)
        }
        Commands::Decode { raw } => commands::decode::run(&raw),
        Commands::Ghost {
            receivers,
            index,
            version,
        } => commands::ghost::run(&receivers, index, version),
        Commands::SendRaw { raw } => {
            let config = load_config(cli.config.as_ref())?;
            commands::send_raw::run(&config, &raw).await
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let result = run(cli).await;
    if let Err(e) = &result {
        print_error(&e.to_string());
    }
    result
}
