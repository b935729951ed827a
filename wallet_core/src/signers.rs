//! Signer-set construction.
//!
//! The sender always comes first and appears once. Co-signers keep their relative
//! order, duplicates are dropped, and every signer is restricted to entry calls plus
//! the operation's contract allow-list.

use dvita_transactions::Signer;
use dvita_types::Account;

/// Build the ordered signer list for `sender` and optional `cosigners`.
pub fn build_signer_set(sender: Account, cosigners: &[Account], allowed: &[Account]) -> Vec<Signer> {
    let mut allow_list: Vec<Account> = Vec::with_capacity(allowed.len());
    for contract in allowed {
        if !allow_list.contains(contract) {
            allow_list.push(*contract);
        }
    }

    let mut accounts = Vec::with_capacity(cosigners.len() + 1);
    accounts.push(sender);
    for account in cosigners {
        if !accounts.contains(account) {
            accounts.push(*account);
        }
    }

    accounts
        .into_iter()
        .map(|account| Signer::restricted(account, &allow_list))
        .collect()
}
