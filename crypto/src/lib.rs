//! Cryptographic primitives for the dVITA client.
//!
//! - **Ed25519** witness keys for the local signer
//! - **Blake2b** for transaction hashes and account derivation
//! - **SHA-256** for VM interop identifiers

pub mod account;
pub mod hash;
pub mod witness;

pub use account::{account_from_public_key, verification_script};
pub use hash::{blake2b_160, blake2b_256, interop_id, sha256};
pub use witness::{signature_in, verify, WitnessKey};
