//! Ledger account identifier (20-byte script hash).
//!
//! Two text forms are supported:
//! - hex: `0x` + 40 hex chars, most significant byte first (the bytes are stored
//!   little-endian, so the hex form is the reversed byte order)
//! - address: base58check of `version ‖ bytes ‖ checksum`, where the checksum is the
//!   first 4 bytes of double SHA-256 over `version ‖ bytes`

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// A fixed-width ledger participant identifier.
///
/// Accounts are only ever produced by parsing, by resolution against the node,
/// or by deriving them from a public key. They are never synthesized.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Account([u8; 20]);

const CHECKSUM_LEN: usize = 4;

impl Account {
    pub const LEN: usize = 20;
    pub const ZERO: Self = Self([0u8; 20]);

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Build an account from a byte slice that must be exactly 20 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypesError> {
        let arr: [u8; 20] = bytes.try_into().map_err(|_| {
            TypesError::InvalidAccount(format!("expected 20 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Parse the big-endian hex form, with or without the `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, TypesError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != Self::LEN * 2 {
            return Err(TypesError::InvalidAccount(format!(
                "expected 40 hex characters, got {}",
                digits.len()
            )));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| TypesError::InvalidAccount(format!("{s}: {e}")))?;
        bytes.reverse();
        Ok(Self(bytes))
    }

    /// Encode as a base58check address with the given version byte.
    pub fn to_address(&self, version: u8) -> String {
        let mut payload = Vec::with_capacity(1 + Self::LEN + CHECKSUM_LEN);
        payload.push(version);
        payload.extend_from_slice(&self.0);
        let checksum = double_sha256(&payload);
        payload.extend_from_slice(&checksum[..CHECKSUM_LEN]);
        bs58::encode(payload).into_string()
    }

    /// Decode a base58check address, verifying checksum and version byte.
    pub fn from_address(s: &str, version: u8) -> Result<Self, TypesError> {
        let data = bs58::decode(s)
            .into_vec()
            .map_err(|e| TypesError::InvalidAccount(format!("{s}: {e}")))?;
        if data.len() != 1 + Self::LEN + CHECKSUM_LEN {
            return Err(TypesError::InvalidAccount(format!(
                "{s}: decoded length {} is not an address",
                data.len()
            )));
        }
        let (payload, checksum) = data.split_at(1 + Self::LEN);
        if double_sha256(payload)[..CHECKSUM_LEN] != *checksum {
            return Err(TypesError::InvalidAccount(format!("{s}: bad checksum")));
        }
        if payload[0] != version {
            return Err(TypesError::InvalidAccount(format!(
                "{s}: address version 0x{:02x}, expected 0x{version:02x}",
                payload[0]
            )));
        }
        Self::from_slice(&payload[1..])
    }

    /// Parse either text form. Hex is tried first since it is unambiguous.
    pub fn parse(s: &str, version: u8) -> Result<Self, TypesError> {
        let s = s.trim();
        if s.starts_with("0x") || s.starts_with("0X") || s.len() == Self::LEN * 2 {
            if let Ok(account) = Self::from_hex(s) {
                return Ok(account);
            }
        }
        Self::from_address(s, version)
    }
}

fn double_sha256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut be = self.0;
        be.reverse();
        write!(f, "0x{}", hex::encode(be))
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Account({self})")
    }
}

impl FromStr for Account {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}
