//! Transaction construction primitives.
//!
//! - **Script**: opaque VM bytecode emitted by [`ScriptBuilder`]
//! - **Signer**: an account plus the witness scope that limits where its signature counts
//! - **TransactionDraft**: script, signers and fees, mutated until signed
//! - **SignedTransaction**: a draft with one witness per signer, ready to relay

pub mod decode;
pub mod draft;
pub mod error;
pub mod script;
pub mod signer;
pub mod validation;

pub use decode::{decode_calls, DecodedCall};
pub use draft::{SignedTransaction, TransactionAttribute, TransactionDraft, Witness};
pub use error::TransactionError;
pub use script::{dynamic_call, CallFlags, Script, ScriptBuilder};
pub use signer::{Signer, WitnessScope};
pub use validation::{validate_signers, MAX_SIGNERS};
