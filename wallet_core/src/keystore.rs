//! Argon2id encrypted wallet file.
//!
//! Each account's 32-byte Ed25519 secret key is encrypted separately:
//! 1. Argon2id derives a 32-byte encryption key from the password + random salt
//! 2. AES-256-GCM encrypts the secret key with a random nonce
//! 3. The file is JSON and carries every parameter needed for decryption

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;
use zeroize::Zeroizing;

use dvita_crypto::WitnessKey;
use dvita_types::{Account, PrivateKey};

use crate::error::WalletError;
use crate::wallet::Wallet;

pub const WALLET_FILE_VERSION: u32 = 1;

/// Argon2id parameters: 64 MB memory, 3 iterations, 1 lane of parallelism.
const ARGON2_MEMORY_KIB: u32 = 65536;
const ARGON2_ITERATIONS: u32 = 3;
const ARGON2_PARALLELISM: u32 = 1;
const ARGON2_OUTPUT_LEN: usize = 32;

const SALT_LEN: usize = 32;
/// AES-GCM nonce length in bytes (96 bits).
const NONCE_LEN: usize = 12;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WalletFile {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_account: Option<String>,
    #[serde(default)]
    pub accounts: Vec<AccountEntry>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccountEntry {
    /// `0x`-prefixed account id, checked against the decrypted key.
    pub account: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub crypto: KeystoreCrypto,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeystoreCrypto {
    pub cipher: String,
    pub kdf: String,
    pub kdf_params: KdfParams,
    /// Hex-encoded salt.
    pub salt: String,
    /// Hex-encoded nonce.
    pub nonce: String,
    /// Hex-encoded ciphertext.
    pub ciphertext: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    pub memory: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory: ARGON2_MEMORY_KIB,
            iterations: ARGON2_ITERATIONS,
            parallelism: ARGON2_PARALLELISM,
        }
    }
}

impl Default for WalletFile {
    fn default() -> Self {
        Self {
            version: WALLET_FILE_VERSION,
            default_account: None,
            accounts: Vec::new(),
        }
    }
}

impl WalletFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encrypt `key` under `password` and add it. The first account added becomes
    /// the default.
    pub fn add_account(
        &mut self,
        key: &WitnessKey,
        password: &str,
        label: Option<String>,
        kdf: KdfParams,
    ) -> Result<Account, WalletError> {
        let account = key.account();
        let id = account.to_string();
        if self.accounts.iter().any(|a| a.account == id) {
            return Err(WalletError::Key(format!("{account} is already in the wallet file")));
        }
        let crypto = encrypt_secret(&key.secret().0, password, kdf)?;
        self.accounts.push(AccountEntry {
            account: id.clone(),
            label,
            crypto,
        });
        self.default_account.get_or_insert(id);
        Ok(account)
    }

    /// Decrypt every account into a signing wallet.
    ///
    /// Fails on a wrong password, or if a stored account id does not match its key.
    pub fn unlock(&self, password: &str) -> Result<Wallet, WalletError> {
        if self.version != WALLET_FILE_VERSION {
            return Err(WalletError::Key(format!(
                "unsupported wallet file version: {}",
                self.version
            )));
        }
        let mut wallet = Wallet::new();
        for entry in &self.accounts {
            let secret = decrypt_secret(&entry.crypto, password)?;
            let account = wallet.insert(WitnessKey::from_secret(&PrivateKey(*secret)));
            if account.to_string() != entry.account {
                return Err(WalletError::Key(format!(
                    "wallet file entry {} does not match its key ({account})",
                    entry.account
                )));
            }
        }
        if let Some(default) = &self.default_account {
            let account: Account = default
                .parse()
                .map_err(|e| WalletError::Key(format!("invalid default account: {e}")))?;
            wallet.set_default(account)?;
        }
        info!(accounts = wallet.len(), "wallet unlocked");
        Ok(wallet)
    }

    pub fn save(&self, path: &Path) -> Result<(), WalletError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| WalletError::Other(format!("JSON serialization failed: {e}")))?;
        std::fs::write(path, json)
            .map_err(|e| WalletError::Other(format!("failed to write wallet file: {e}")))
    }

    pub fn load(path: &Path) -> Result<Self, WalletError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| WalletError::Other(format!("failed to read wallet file: {e}")))?;
        serde_json::from_str(&json)
            .map_err(|e| WalletError::Other(format!("invalid wallet file JSON: {e}")))
    }
}

/// Encrypt a 32-byte Ed25519 secret key with Argon2id + AES-256-GCM.
pub fn encrypt_secret(
    secret_key: &[u8; 32],
    password: &str,
    kdf: KdfParams,
) -> Result<KeystoreCrypto, WalletError> {
    let mut rng = rand::thread_rng();

    let mut salt = [0u8; SALT_LEN];
    rng.fill_bytes(&mut salt);

    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut nonce_bytes);

    let derived_key = derive_key(password, &salt, kdf)?;
    let cipher = Aes256Gcm::new_from_slice(&derived_key[..])
        .map_err(|e| WalletError::Key(format!("AES key init failed: {e}")))?;

    let nonce = Nonce::from_slice(&nonce_bytes);
    let ciphertext = cipher
        .encrypt(nonce, secret_key.as_ref())
        .map_err(|e| WalletError::Key(format!("encryption failed: {e}")))?;

    Ok(KeystoreCrypto {
        cipher: "aes-256-gcm".to_string(),
        kdf: "argon2id".to_string(),
        kdf_params: kdf,
        salt: hex::encode(salt),
        nonce: hex::encode(nonce_bytes),
        ciphertext: hex::encode(ciphertext),
    })
}

/// Decrypt a secret key using the parameters stored alongside it.
pub fn decrypt_secret(
    crypto: &KeystoreCrypto,
    password: &str,
) -> Result<Zeroizing<[u8; 32]>, WalletError> {
    let salt = hex::decode(&crypto.salt)
        .map_err(|e| WalletError::Key(format!("invalid salt hex: {e}")))?;
    let nonce_bytes = hex::decode(&crypto.nonce)
        .map_err(|e| WalletError::Key(format!("invalid nonce hex: {e}")))?;
    let ciphertext = hex::decode(&crypto.ciphertext)
        .map_err(|e| WalletError::Key(format!("invalid ciphertext hex: {e}")))?;

    if nonce_bytes.len() != NONCE_LEN {
        return Err(WalletError::Key(format!(
            "invalid nonce length: expected {NONCE_LEN}, got {}",
            nonce_bytes.len()
        )));
    }

    let derived_key = derive_key(password, &salt, crypto.kdf_params)?;
    let cipher = Aes256Gcm::new_from_slice(&derived_key[..])
        .map_err(|e| WalletError::Key(format!("AES key init failed: {e}")))?;

    let nonce = Nonce::from_slice(&nonce_bytes);
    let plaintext = Zeroizing::new(cipher.decrypt(nonce, ciphertext.as_ref()).map_err(|_| {
        WalletError::Key("decryption failed: wrong password or corrupted data".to_string())
    })?);

    let key: [u8; 32] = plaintext.as_slice().try_into().map_err(|_| {
        WalletError::Key(format!(
            "decrypted key has wrong length: expected 32, got {}",
            plaintext.len()
        ))
    })?;
    Ok(Zeroizing::new(key))
}

fn derive_key(password: &str, salt: &[u8], kdf: KdfParams) -> Result<Zeroizing<[u8; 32]>, WalletError> {
    let params = Params::new(kdf.memory, kdf.iterations, kdf.parallelism, Some(ARGON2_OUTPUT_LEN))
        .map_err(|e| WalletError::Key(format!("Argon2 params error: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut output = Zeroizing::new([0u8; 32]);
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut output[..])
        .map_err(|e| WalletError::Key(format!("Argon2 hashing failed: {e}")))?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::SigningService;

    /// Cheap parameters so the suite stays fast.
    const TEST_KDF: KdfParams = KdfParams {
        memory: 1024,
        iterations: 1,
        parallelism: 1,
    };

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let secret_key = [42u8; 32];
        let crypto = encrypt_secret(&secret_key, "test-password-123", TEST_KDF).unwrap();
        let decrypted = decrypt_secret(&crypto, "test-password-123").unwrap();
        assert_eq!(*decrypted, secret_key);
    }

    #[test]
    fn wrong_password_fails() {
        let crypto = encrypt_secret(&[42u8; 32], "correct-password", TEST_KDF).unwrap();
        assert!(decrypt_secret(&crypto, "wrong-password").is_err());
    }

    #[test]
    fn crypto_fields() {
        let crypto = encrypt_secret(&[0u8; 32], "pass", KdfParams::default()).unwrap();
        assert_eq!(crypto.cipher, "aes-256-gcm");
        assert_eq!(crypto.kdf, "argon2id");
        assert_eq!(crypto.kdf_params.memory, 65536);
        assert_eq!(crypto.kdf_params.iterations, 3);
        assert_eq!(crypto.kdf_params.parallelism, 1);
    }

    #[test]
    fn same_key_encrypts_differently() {
        let a = encrypt_secret(&[7u8; 32], "password", TEST_KDF).unwrap();
        let b = encrypt_secret(&[7u8; 32], "password", TEST_KDF).unwrap();
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn wallet_file_unlocks_all_accounts() {
        let mut file = WalletFile::new();
        let first = file
            .add_account(&WitnessKey::from_seed(&[1u8; 32]), "pw", Some("main".into()), TEST_KDF)
            .unwrap();
        let second = file
            .add_account(&WitnessKey::from_seed(&[2u8; 32]), "pw", None, TEST_KDF)
            .unwrap();

        let wallet = file.unlock("pw").unwrap();
        assert_eq!(wallet.len(), 2);
        assert!(wallet.contains(&first));
        assert!(wallet.contains(&second));
        assert_eq!(wallet.default_account(), Some(first));
    }

    #[test]
    fn duplicate_account_rejected() {
        let mut file = WalletFile::new();
        let key = WitnessKey::from_seed(&[1u8; 32]);
        file.add_account(&key, "pw", None, TEST_KDF).unwrap();
        assert!(file.add_account(&key, "pw", None, TEST_KDF).is_err());
    }

    #[test]
    fn tampered_account_id_rejected() {
        let mut file = WalletFile::new();
        file.add_account(&WitnessKey::from_seed(&[1u8; 32]), "pw", None, TEST_KDF)
            .unwrap();
        file.accounts[0].account = Account::new([9u8; 20]).to_string();
        assert!(file.unlock("pw").is_err());
    }

    #[test]
    fn unsupported_version_rejected() {
        let mut file = WalletFile::new();
        file.version = 99;
        assert!(file.unlock("pw").is_err());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallet.json");

        let mut file = WalletFile::new();
        let account = file
            .add_account(&WitnessKey::from_seed(&[99u8; 32]), "file-test", None, TEST_KDF)
            .unwrap();
        file.save(&path).unwrap();

        let json = std::fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"kdf\": \"argon2id\""));

        let wallet = WalletFile::load(&path).unwrap().unlock("file-test").unwrap();
        assert_eq!(wallet.default_account(), Some(account));
    }

    #[test]
    fn load_nonexistent_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(WalletFile::load(&dir.path().join("missing.json")).is_err());
    }
}
