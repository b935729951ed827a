//! Transaction drafts and signed transactions.
//!
//! A draft is mutated in two passes (provisional fee ceiling, then the real fees)
//! and only becomes a [`SignedTransaction`] once one witness per signer is attached.

use dvita_types::{Account, TxHash};
use serde::{Deserialize, Serialize};

use crate::error::TransactionError;
use crate::script::Script;
use crate::signer::Signer;

pub const TRANSACTION_VERSION: u8 = 0;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionAttribute {
    HighPriority,
}

/// Proof that a signer approved the transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness {
    /// Pushes the signature.
    pub invocation: Vec<u8>,
    /// Checks the signature against the signer's key.
    pub verification: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub version: u8,
    pub nonce: u32,
    /// Fee paid for script execution.
    pub system_fee: u64,
    /// Fee paid for size and witness verification.
    pub network_fee: u64,
    pub valid_until_block: u32,
    pub signers: Vec<Signer>,
    pub attributes: Vec<TransactionAttribute>,
    pub script: Script,
}

/// Borrowed view of the fields covered by the hash.
#[derive(Serialize)]
struct Unsigned<'a> {
    version: u8,
    nonce: u32,
    system_fee: u64,
    network_fee: u64,
    valid_until_block: u32,
    signers: &'a [Signer],
    attributes: &'a [TransactionAttribute],
    script: &'a Script,
}

impl TransactionDraft {
    pub fn new(script: Script, signers: Vec<Signer>) -> Self {
        Self {
            version: TRANSACTION_VERSION,
            nonce: 0,
            system_fee: 0,
            network_fee: 0,
            valid_until_block: 0,
            signers,
            attributes: Vec::new(),
            script,
        }
    }

    /// The fee payer: always the first signer.
    pub fn sender(&self) -> Option<&Account> {
        self.signers.first().map(|s| &s.account)
    }

    pub fn total_fee(&self) -> u64 {
        self.system_fee.saturating_add(self.network_fee)
    }

    pub fn unsigned_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        let view = Unsigned {
            version: self.version,
            nonce: self.nonce,
            system_fee: self.system_fee,
            network_fee: self.network_fee,
            valid_until_block: self.valid_until_block,
            signers: &self.signers,
            attributes: &self.attributes,
            script: &self.script,
        };
        Ok(bincode::serialize(&view)?)
    }

    pub fn hash(&self) -> Result<TxHash, TransactionError> {
        Ok(TxHash::new(dvita_crypto::blake2b_256(&self.unsigned_bytes()?)))
    }

    /// Bytes each signer signs: network magic (little-endian) followed by the hash.
    pub fn signing_message(&self, magic: u32) -> Result<Vec<u8>, TransactionError> {
        let mut message = Vec::with_capacity(4 + 32);
        message.extend_from_slice(&magic.to_le_bytes());
        message.extend_from_slice(self.hash()?.as_bytes());
        Ok(message)
    }

    /// Seal the draft with one witness per signer, in signer order.
    pub fn attach_witnesses(
        self,
        witnesses: Vec<Witness>,
    ) -> Result<SignedTransaction, TransactionError> {
        if witnesses.len() != self.signers.len() {
            return Err(TransactionError::WitnessCount {
                expected: self.signers.len(),
                got: witnesses.len(),
            });
        }
        Ok(SignedTransaction {
            draft: self,
            witnesses,
        })
    }
}

/// A fully witnessed transaction, ready to relay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    draft: TransactionDraft,
    witnesses: Vec<Witness>,
}

impl SignedTransaction {
    pub fn draft(&self) -> &TransactionDraft {
        &self.draft
    }

    pub fn witnesses(&self) -> &[Witness] {
        &self.witnesses
    }

    /// Witnesses are not covered by the hash.
    pub fn hash(&self) -> Result<TxHash, TransactionError> {
        self.draft.hash()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
