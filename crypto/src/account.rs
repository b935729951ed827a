//! Account derivation from public keys.
//!
//! An account is the Blake2b-160 hash of the key's verification script:
//! `PUSHDATA1 32 <pubkey> SYSCALL System.Crypto.CheckSig`.

use dvita_types::{Account, PublicKey};

use crate::hash::{blake2b_160, interop_id};

const PUSHDATA1: u8 = 0x0C;
const SYSCALL: u8 = 0x41;

/// The script a witness runs to prove ownership of `public_key`.
pub fn verification_script(public_key: &PublicKey) -> Vec<u8> {
    let mut script = Vec::with_capacity(2 + 32 + 1 + 4);
    script.push(PUSHDATA1);
    script.push(32);
    script.extend_from_slice(public_key.as_bytes());
    script.push(SYSCALL);
    script.extend_from_slice(&interop_id("System.Crypto.CheckSig"));
    script
}

pub fn account_from_public_key(public_key: &PublicKey) -> Account {
    Account::new(blake2b_160(&verification_script(public_key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::witness::WitnessKey;

    #[test]
    fn verification_script_layout() {
        let key = WitnessKey::from_seed(&[1u8; 32]);
        let script = verification_script(key.public_key());
        assert_eq!(script.len(), 39);
        assert_eq!(&script[..2], &[PUSHDATA1, 32]);
        assert_eq!(&script[2..34], key.public_key().as_bytes());
        assert_eq!(script[34], SYSCALL);
    }

    #[test]
    fn distinct_keys_give_distinct_accounts() {
        let a = account_from_public_key(WitnessKey::from_seed(&[1u8; 32]).public_key());
        let b = account_from_public_key(WitnessKey::from_seed(&[2u8; 32]).public_key());
        assert_ne!(a, b);
        assert!(!a.is_zero());
    }
}
