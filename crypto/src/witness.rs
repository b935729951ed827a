//! Witness keys for the local signer.
//!
//! A [`WitnessKey`] is an unlocked Ed25519 key together with the account its
//! verification script hashes to. It produces the two halves of a witness: the
//! invocation script (`PUSHDATA1 64 <signature>`) and the verification script.

use dvita_types::{Account, PrivateKey, PublicKey, Signature};
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;

use crate::account::{account_from_public_key, verification_script};

const PUSHDATA1: u8 = 0x0C;
const SIGNATURE_LEN: u8 = 64;

/// An unlocked signing key. The secret is wiped when the key is dropped.
pub struct WitnessKey {
    signing: SigningKey,
    public: PublicKey,
    account: Account,
}

impl WitnessKey {
    pub fn generate() -> Self {
        Self::from_signing(SigningKey::generate(&mut OsRng))
    }

    /// Deterministic key, used by tests and by imported raw secrets.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self::from_signing(SigningKey::from_bytes(seed))
    }

    pub fn from_secret(secret: &PrivateKey) -> Self {
        Self::from_seed(&secret.0)
    }

    fn from_signing(signing: SigningKey) -> Self {
        let public = PublicKey(signing.verifying_key().to_bytes());
        let account = account_from_public_key(&public);
        Self {
            signing,
            public,
            account,
        }
    }

    pub fn account(&self) -> Account {
        self.account
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// Copy of the secret bytes, for encryption into a wallet file.
    pub fn secret(&self) -> PrivateKey {
        PrivateKey(self.signing.to_bytes())
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.signing.sign(message).to_bytes())
    }

    /// `PUSHDATA1 64 <signature over message>`.
    pub fn invocation_script(&self, message: &[u8]) -> Vec<u8> {
        let signature = self.sign(message);
        let mut script = Vec::with_capacity(2 + usize::from(SIGNATURE_LEN));
        script.push(PUSHDATA1);
        script.push(SIGNATURE_LEN);
        script.extend_from_slice(signature.as_bytes());
        script
    }

    pub fn verification_script(&self) -> Vec<u8> {
        verification_script(&self.public)
    }
}

/// The signature carried by an invocation script, if it has the expected shape.
pub fn signature_in(invocation: &[u8]) -> Option<Signature> {
    match invocation {
        [PUSHDATA1, SIGNATURE_LEN, rest @ ..] => rest.try_into().ok().map(Signature),
        _ => None,
    }
}

/// Check a witness signature. Malformed keys never verify.
pub fn verify(public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
    let Ok(key) = VerifyingKey::from_bytes(&public_key.0) else {
        return false;
    };
    key.verify(message, &ed25519_dalek::Signature::from_bytes(&signature.0))
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_fixes_the_account() {
        let a = WitnessKey::from_seed(&[42u8; 32]);
        let b = WitnessKey::from_seed(&[42u8; 32]);
        assert_eq!(a.account(), b.account());
        assert_ne!(a.account(), WitnessKey::from_seed(&[43u8; 32]).account());
        assert_eq!(a.account(), account_from_public_key(a.public_key()));
    }

    #[test]
    fn secret_restores_the_same_key() {
        let key = WitnessKey::generate();
        let restored = WitnessKey::from_secret(&key.secret());
        assert_eq!(restored.public_key(), key.public_key());
    }

    #[test]
    fn invocation_script_carries_a_valid_signature() {
        let key = WitnessKey::from_seed(&[1u8; 32]);
        let message = b"magic||hash";
        let invocation = key.invocation_script(message);
        assert_eq!(invocation.len(), 66);

        let signature = signature_in(&invocation).unwrap();
        assert!(verify(key.public_key(), message, &signature));
        assert!(!verify(key.public_key(), b"other", &signature));
    }

    #[test]
    fn foreign_or_malformed_keys_do_not_verify() {
        let key = WitnessKey::generate();
        let signature = key.sign(b"tx");
        assert!(!verify(WitnessKey::generate().public_key(), b"tx", &signature));
        assert!(!verify(&PublicKey([0xFF; 32]), b"tx", &signature));
    }

    #[test]
    fn malformed_invocation_has_no_signature() {
        assert!(signature_in(&[]).is_none());
        assert!(signature_in(&[PUSHDATA1, 32, 0, 0]).is_none());
        assert!(signature_in(&[PUSHDATA1, SIGNATURE_LEN, 1, 2, 3]).is_none());
    }
}
