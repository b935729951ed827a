//! Transaction signers and witness scopes.

use dvita_types::Account;
use serde::{Deserialize, Serialize};
use std::ops::BitOr;

/// Limits which contracts may consume a signer's witness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WitnessScope(u8);

impl WitnessScope {
    /// Witness only valid for the transaction fee.
    pub const NONE: Self = Self(0x00);
    /// Valid when the contract is called directly by the entry script.
    pub const CALLED_BY_ENTRY: Self = Self(0x01);
    /// Valid inside the contracts listed in `allowed_contracts`.
    pub const CUSTOM_CONTRACTS: Self = Self(0x10);
    /// Valid everywhere.
    pub const GLOBAL: Self = Self(0x80);

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for WitnessScope {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// An account that must witness the transaction, with its scope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signer {
    pub account: Account,
    pub scopes: WitnessScope,
    pub allowed_contracts: Vec<Account>,
}

impl Signer {
    /// A signer valid for entry calls and for the listed contracts only.
    pub fn restricted(account: Account, allowed_contracts: &[Account]) -> Self {
        Self {
            account,
            scopes: WitnessScope::CALLED_BY_ENTRY | WitnessScope::CUSTOM_CONTRACTS,
            allowed_contracts: allowed_contracts.to_vec(),
        }
    }

    /// A signer valid only for calls made directly by the entry script.
    pub fn called_by_entry(account: Account) -> Self {
        Self {
            account,
            scopes: WitnessScope::CALLED_BY_ENTRY,
            allowed_contracts: Vec::new(),
        }
    }

    /// Whether `contract` may consume this witness when it is not the entry call.
    pub fn allows_contract(&self, contract: &Account) -> bool {
        self.scopes.contains(WitnessScope::GLOBAL)
            || (self.scopes.contains(WitnessScope::CUSTOM_CONTRACTS)
                && self.allowed_contracts.contains(contract))
    }
}
