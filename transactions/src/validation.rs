//! Signer-list shape checks applied before a draft is built.

use dvita_types::Account;
use std::collections::HashSet;

use crate::error::TransactionError;
use crate::signer::{Signer, WitnessScope};

/// Maximum number of signers a transaction may carry.
pub const MAX_SIGNERS: usize = 16;

/// Check that `signers` is non-empty, bounded, duplicate-free, starts with `sender`
/// and that every custom-contract scope names at least one contract.
pub fn validate_signers(signers: &[Signer], sender: &Account) -> Result<(), TransactionError> {
    let first = signers.first().ok_or(TransactionError::NoSigners)?;
    if signers.len() > MAX_SIGNERS {
        return Err(TransactionError::TooManySigners {
            count: signers.len(),
            max: MAX_SIGNERS,
        });
    }
    if first.account != *sender {
        return Err(TransactionError::SenderNotFirst {
            expected: sender.to_string(),
            found: first.account.to_string(),
        });
    }
    let mut seen = HashSet::with_capacity(signers.len());
    for signer in signers {
        if !seen.insert(signer.account) {
            return Err(TransactionError::DuplicateSigner(signer.account.to_string()));
        }
        if signer.scopes.contains(WitnessScope::CUSTOM_CONTRACTS)
            && signer.allowed_contracts.is_empty()
        {
            return Err(TransactionError::EmptyAllowList(signer.account.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acct(b: u8) -> Account {
        Account::new([b; 20])
    }

    fn signer(b: u8) -> Signer {
        Signer::restricted(acct(b), &[acct(200)])
    }

    #[test]
    fn valid_list_passes() {
        assert!(validate_signers(&[signer(1), signer(2)], &acct(1)).is_ok());
    }

    #[test]
    fn empty_list_rejected() {
        assert!(matches!(validate_signers(&[], &acct(1)), Err(TransactionError::NoSigners)));
    }

    #[test]
    fn sender_must_lead() {
        let err = validate_signers(&[signer(2), signer(1)], &acct(1)).unwrap_err();
        assert!(matches!(err, TransactionError::SenderNotFirst { .. }));
    }

    #[test]
    fn duplicates_rejected() {
        let err = validate_signers(&[signer(1), signer(2), signer(2)], &acct(1)).unwrap_err();
        assert!(matches!(err, TransactionError::DuplicateSigner(_)));
    }

    #[test]
    fn too_many_rejected() {
        let signers: Vec<Signer> = (1..=17).map(signer).collect();
        let err = validate_signers(&signers, &acct(1)).unwrap_err();
        assert!(matches!(err, TransactionError::TooManySigners { count: 17, .. }));
    }

    #[test]
    fn empty_allow_list_rejected() {
        let bad = Signer::restricted(acct(1), &[]);
        let err = validate_signers(&[bad], &acct(1)).unwrap_err();
        assert!(matches!(err, TransactionError::EmptyAllowList(_)));
    }
}
