//! Client configuration with TOML file support.

use dvita_types::{Account, NetworkSettings};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::WalletError;

/// One unit of the fee token, which has 8 decimals.
pub const GAS_FACTOR: u64 = 100_000_000;
pub const GAS_DECIMALS: u8 = 8;

/// Well-known contracts the client talks to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractIds {
    /// Naming service exposing `resolve`, `register` and `unregister`.
    #[serde(default = "default_naming_service", with = "account_hex")]
    pub naming_service: Account,

    /// Proxy ledger holding balances keyed by social handle.
    #[serde(default = "default_social_ledger", with = "account_hex")]
    pub social_ledger: Account,

    /// Native fee token.
    #[serde(default = "default_gas_token", with = "account_hex")]
    pub gas_token: Account,
}

/// Configuration for the client.
///
/// Can be loaded from a TOML file via [`ClientConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// JSON-RPC endpoint of the node.
    #[serde(default = "default_node_url")]
    pub node_url: String,

    /// Upper bound for a whole RPC request.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Gas ceiling for read-only invocations and naming-service transactions.
    #[serde(default = "default_max_gas")]
    pub test_mode_gas: u64,

    /// Gas ceiling for transfer transactions.
    #[serde(default = "default_max_gas")]
    pub transfer_max_gas: u64,

    /// Encrypted wallet file used for signing.
    #[serde(default)]
    pub wallet_path: Option<PathBuf>,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    // Tables last so the TOML output stays valid.
    #[serde(default)]
    pub network: NetworkSettings,

    #[serde(default)]
    pub contracts: ContractIds,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_naming_service() -> Account {
    Account::new([
        0x6b, 0x46, 0xf8, 0x0f, 0xe4, 0x2a, 0x4b, 0x27, 0xb7, 0xab, 0xf8, 0x40, 0xa3, 0x9f,
        0xdd, 0x69, 0xf0, 0x01, 0x78, 0x29,
    ])
}

fn default_social_ledger() -> Account {
    Account::new([
        0xa8, 0xc9, 0xa1, 0x6a, 0x0e, 0x6e, 0x76, 0xe7, 0x51, 0xc1, 0xfe, 0x76, 0x01, 0x3c,
        0x61, 0x9f, 0x80, 0x42, 0xed, 0x4f,
    ])
}

fn default_gas_token() -> Account {
    Account::new([
        0xcf, 0x76, 0xe2, 0x8b, 0xd0, 0x06, 0x2c, 0x4a, 0x47, 0x8e, 0xe3, 0x55, 0x61, 0x01,
        0x13, 0x19, 0xf3, 0xcf, 0xa4, 0xd2,
    ])
}

fn default_node_url() -> String {
    "http://127.0.0.1:10332".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_max_gas() -> u64 {
    20 * GAS_FACTOR
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "human".to_string()
}

/// Accounts are written in their `0x` hex form.
mod account_hex {
    use dvita_types::Account;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(account: &Account, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&account.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Account, D::Error> {
        let text = String::deserialize(d)?;
        Account::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, WalletError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| WalletError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, WalletError> {
        toml::from_str(s).map_err(|e| WalletError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, WalletError> {
        toml::to_string_pretty(self).map_err(|e| WalletError::Config(e.to_string()))
    }
}

impl Default for ContractIds {
    fn default() -> Self {
        Self {
            naming_service: default_naming_service(),
            social_ledger: default_social_ledger(),
            gas_token: default_gas_token(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            node_url: default_node_url(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            network: NetworkSettings::default(),
            contracts: ContractIds::default(),
            test_mode_gas: default_max_gas(),
            transfer_max_gas: default_max_gas(),
            wallet_path: None,
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}
