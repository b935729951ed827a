//! Fundamental types for the dVITA client.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! ledger accounts, scaled token amounts, contract call arguments, VM stack values,
//! invocation outcomes, keys and network settings.

pub mod account;
pub mod amount;
pub mod contract;
pub mod error;
pub mod hash;
pub mod keys;
pub mod network;

pub use account::Account;
pub use amount::TokenAmount;
pub use contract::{ContractArg, InvocationOutcome, StackValue, VmState};
pub use error::TypesError;
pub use hash::TxHash;
pub use keys::{PrivateKey, PublicKey, Signature};
pub use network::NetworkSettings;
