use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("transaction has no signers")]
    NoSigners,

    #[error("too many signers: {count} (max {max})")]
    TooManySigners { count: usize, max: usize },

    #[error("duplicate signer {0}")]
    DuplicateSigner(String),

    #[error("sender {expected} must be the first signer, found {found}")]
    SenderNotFirst { expected: String, found: String },

    #[error("signer {0} restricts to custom contracts but lists none")]
    EmptyAllowList(String),

    #[error("expected {expected} witnesses, got {got}")]
    WitnessCount { expected: usize, got: usize },

    #[error("script data too large: {0} bytes")]
    DataTooLarge(usize),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for TransactionError {
    fn from(e: bincode::Error) -> Self {
        TransactionError::Serialization(e.to_string())
    }
}
