//! Error type shared by the parsing and scaling helpers in this crate.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("invalid account: {0}")]
    InvalidAccount(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("amount {amount} cannot be expressed with {decimals} decimals")]
    PrecisionLoss { amount: String, decimals: u8 },

    #[error("amount {0} overflows the ledger integer range")]
    Overflow(String),

    #[error("unsupported decimal count: {0}")]
    UnsupportedDecimals(u8),
}
