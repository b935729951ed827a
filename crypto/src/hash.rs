//! Hash functions.

use blake2::digest::consts::{U20, U32};
use blake2::{Blake2b, Digest};
use sha2::Sha256;

type Blake2b256 = Blake2b<U32>;
type Blake2b160 = Blake2b<U20>;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    Blake2b256::digest(data).into()
}

/// Compute a 160-bit Blake2b hash, the width of a ledger account.
pub fn blake2b_160(data: &[u8]) -> [u8; 20] {
    Blake2b160::digest(data).into()
}

pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Identifier of a VM interop service: the first 4 bytes of SHA-256 of its name.
pub fn interop_id(name: &str) -> [u8; 4] {
    let digest = sha256(name.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blake2b_deterministic() {
        assert_eq!(blake2b_256(b"hello dvita"), blake2b_256(b"hello dvita"));
        assert_ne!(blake2b_256(b"hello"), blake2b_256(b"world"));
    }

    #[test]
    fn blake2b_160_differs_from_truncated_256() {
        let short = blake2b_160(b"data");
        let long = blake2b_256(b"data");
        assert_ne!(&short[..], &long[..20]);
    }

    #[test]
    fn contract_call_interop_id() {
        assert_eq!(interop_id("System.Contract.Call"), [0x62, 0x7d, 0x5b, 0x52]);
    }
}
