//! Local signing wallet.
//!
//! A development signer behind [`SigningService`]: Ed25519 witnesses over the
//! bincode draft hash. It does not produce the dVITA node's native witnesses.

use std::collections::BTreeMap;

use dvita_crypto::WitnessKey;
use dvita_transactions::{SignedTransaction, TransactionDraft, Witness};
use dvita_types::{Account, PrivateKey, PublicKey, Signature};
use tracing::debug;

use crate::error::WalletError;
use crate::services::SigningService;

/// Local Ed25519 witness keys indexed by the account they control.
#[derive(Default)]
pub struct Wallet {
    keys: BTreeMap<Account, WitnessKey>,
    default_account: Option<Account>,
}

impl Wallet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A wallet holding one freshly generated key.
    pub fn create() -> Self {
        let mut wallet = Self::new();
        wallet.insert(WitnessKey::generate());
        wallet
    }

    /// A wallet holding the key derived from `seed` (deterministic).
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let mut wallet = Self::new();
        wallet.insert(WitnessKey::from_seed(seed));
        wallet
    }

    pub fn from_private_key(private_key_bytes: &[u8]) -> Result<Self, WalletError> {
        let bytes: [u8; 32] = private_key_bytes.try_into().map_err(|_| {
            WalletError::Key(format!(
                "private key must be 32 bytes, got {}",
                private_key_bytes.len()
            ))
        })?;
        let mut wallet = Self::new();
        wallet.insert(WitnessKey::from_secret(&PrivateKey(bytes)));
        Ok(wallet)
    }

    /// Add a key. The first key added becomes the default account.
    pub fn insert(&mut self, key: WitnessKey) -> Account {
        let account = key.account();
        self.keys.insert(account, key);
        self.default_account.get_or_insert(account);
        account
    }

    pub fn set_default(&mut self, account: Account) -> Result<(), WalletError> {
        if !self.keys.contains_key(&account) {
            return Err(WalletError::Key(format!("{account} is not in the wallet")));
        }
        self.default_account = Some(account);
        Ok(())
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.keys.keys()
    }

    pub fn contains(&self, account: &Account) -> bool {
        self.keys.contains_key(account)
    }

    pub fn public_key(&self, account: &Account) -> Option<&PublicKey> {
        self.keys.get(account).map(WitnessKey::public_key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn key(&self, account: &Account) -> Result<&WitnessKey, WalletError> {
        self.keys
            .get(account)
            .ok_or_else(|| WalletError::Signing(format!("no key for signer {account}")))
    }

    /// Sign raw bytes with the key controlling `account`.
    pub fn sign_with(&self, account: &Account, message: &[u8]) -> Result<Signature, WalletError> {
        Ok(self.key(account)?.sign(message))
    }
}

impl SigningService for Wallet {
    fn default_account(&self) -> Option<Account> {
        self.default_account
    }

    fn sign(&self, draft: TransactionDraft, magic: u32) -> Result<SignedTransaction, WalletError> {
        let message = draft.signing_message(magic)?;
        let witnesses = draft
            .signers
            .iter()
            .map(|signer| {
                let key = self.key(&signer.account)?;
                Ok(Witness {
                    invocation: key.invocation_script(&message),
                    verification: key.verification_script(),
                })
            })
            .collect::<Result<Vec<_>, WalletError>>()?;
        debug!(signers = witnesses.len(), "draft signed");
        Ok(draft.attach_witnesses(witnesses)?)
    }
}
