//! Command-line surface.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use dvita_wallet_core::ClientConfig;

#[derive(Parser)]
#[command(name = "dvita-cli", about = "dVITA operator client")]
pub struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "DVITA_CONFIG")]
    pub config: Option<PathBuf>,

    /// JSON-RPC endpoint of the node.
    #[arg(long, env = "DVITA_NODE_URL")]
    pub node_url: Option<String>,

    /// Encrypted wallet file used for signing.
    #[arg(long, env = "DVITA_WALLET")]
    pub wallet: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "DVITA_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "DVITA_LOG_FORMAT")]
    pub log_format: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// File settings (or defaults) with flag and env overrides applied.
    pub fn client_config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let path_str = path.to_string_lossy();
                let config = ClientConfig::from_toml_file(&path_str)
                    .with_context(|| format!("loading config from {}", path.display()))?;
                tracing::debug!("loaded config from {}", path.display());
                config
            }
            None => ClientConfig::default(),
        };
        if let Some(url) = &self.node_url {
            config.node_url = url.clone();
        }
        if let Some(wallet) = &self.wallet {
            config.wallet_path = Some(wallet.clone());
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.log_format = format.clone();
        }
        Ok(config)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Resolve a name (e-mail style or ending with .id.dvita.com) to its address.
    Resolve { name: String },

    /// Bind a name to an address.
    Register {
        name: String,
        /// Address or 0x-prefixed account the name points to.
        account: String,
        /// Account paying for and signing the transaction (defaults to the wallet's).
        signer: Option<String>,
    },

    /// Remove a name binding.
    Unregister {
        name: String,
        signer: Option<String>,
    },

    /// Send tokens to a name, a social handle or an address.
    ///
    /// Optional arguments are positional: `transfer <token> <to> <amount> [from] [data] [signers]`.
    Transfer {
        token: String,
        to: String,
        amount: String,
        /// Sender (defaults to the wallet's default account).
        from: Option<String>,
        /// Data passed to the receiver's payment callback.
        data: Option<String>,
        /// Extra co-signers (comma-separated).
        #[arg(value_delimiter = ',')]
        signers: Vec<String>,
    },

    /// Token balance of a name, a social handle or an address.
    #[command(alias = "balanceOf")]
    BalanceOf { token: String, identifier: String },

    /// Contract manifest name.
    Name { token: String },

    /// Token decimals.
    Decimals { token: String },

    /// Token total supply.
    #[command(alias = "totalSupply")]
    TotalSupply { token: String },

    /// Add a freshly generated account to the wallet file (created if missing).
    CreateWallet {
        #[arg(long)]
        label: Option<String>,
    },

    /// Interactive shell accepting the commands above.
    Shell,
}

/// One line typed into the shell.
#[derive(Parser, Debug)]
#[command(name = "dvita", no_binary_name = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Command,
}
