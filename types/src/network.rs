//! Network parameters the client needs to talk to a node.

use serde::{Deserialize, Serialize};

/// Per-network constants: address encoding, signing domain and draft expiry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSettings {
    /// Version byte prefixed to base58check addresses.
    #[serde(default = "default_address_version")]
    pub address_version: u8,

    /// Network magic mixed into every signed message.
    #[serde(default = "default_magic")]
    pub magic: u32,

    /// Blocks after the current height during which a draft stays valid.
    #[serde(default = "default_valid_until_increment")]
    pub max_valid_until_block_increment: u32,
}

fn default_address_version() -> u8 {
    0x35
}

fn default_magic() -> u32 {
    860_833_102
}

fn default_valid_until_increment() -> u32 {
    5760
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            address_version: default_address_version(),
            magic: default_magic(),
            max_valid_until_block_increment: default_valid_until_increment(),
        }
    }
}
