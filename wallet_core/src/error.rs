use dvita_transactions::TransactionError;
use dvita_types::TypesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("unsupported identifier: {0}")]
    ClassificationMismatch(String),

    #[error("could not resolve {identifier}: {reason}")]
    ResolutionFailure { identifier: String, reason: String },

    #[error("invalid account: {0}")]
    InvalidAccount(String),

    #[error("amount conversion failed: {0}")]
    ScaleConversion(String),

    #[error("asset metadata unavailable for {contract}: {reason}")]
    AssetMetadata { contract: String, reason: String },

    #[error("invocation of {operation} faulted: {reason}")]
    InvocationFault { operation: String, reason: String },

    #[error("transaction building error: {0}")]
    DraftBuild(String),

    #[error("signing error: {0}")]
    Signing(String),

    #[error("relay failed: {0}")]
    Relay(String),

    #[error("node RPC error: {0}")]
    Node(String),

    #[error("node request timed out: {0}")]
    Timeout(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("key error: {0}")]
    Key(String),

    #[error("{0}")]
    Other(String),
}

impl From<TransactionError> for WalletError {
    fn from(e: TransactionError) -> Self {
        WalletError::DraftBuild(e.to_string())
    }
}

impl From<TypesError> for WalletError {
    fn from(e: TypesError) -> Self {
        match e {
            TypesError::InvalidAccount(msg) => WalletError::InvalidAccount(msg),
            other => WalletError::ScaleConversion(other.to_string()),
        }
    }
}
