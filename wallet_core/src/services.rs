//! Capabilities the core consumes from the outside world.
//!
//! The node (invocation, relay, snapshot queries), the wallet (signing) and the
//! operator (confirmation) are injected as trait objects, so the resolver and the
//! transaction pipeline run unchanged against the JSON-RPC client or against the
//! deterministic fakes in `dvita-nullables`.

use async_trait::async_trait;
use dvita_transactions::{Script, SignedTransaction, Signer, TransactionDraft};
use dvita_types::{Account, ContractArg, InvocationOutcome, TxHash};

use crate::config::ClientConfig;
use crate::error::WalletError;

/// Read-only script execution against the node's current snapshot.
///
/// Implementations must never persist state. State-changing calls go through the
/// transaction pipeline instead.
#[async_trait]
pub trait InvocationService: Send + Sync {
    async fn invoke_script(
        &self,
        script: &Script,
        signers: &[Signer],
        gas_limit: u64,
    ) -> Result<InvocationOutcome, WalletError>;
}

/// Submission of signed transactions to the network.
#[async_trait]
pub trait RelayService: Send + Sync {
    async fn relay(&self, tx: &SignedTransaction) -> Result<TxHash, WalletError>;
}

/// Point-in-time queries against ledger state.
#[async_trait]
pub trait NodeSnapshot: Send + Sync {
    async fn block_height(&self) -> Result<u32, WalletError>;

    /// Network fee the node requires for `draft` once it is witnessed.
    async fn calculate_network_fee(&self, draft: &TransactionDraft) -> Result<u64, WalletError>;

    /// Manifest name of a deployed contract, or `None` if it does not exist.
    async fn contract_name(&self, contract: &Account) -> Result<Option<String>, WalletError>;
}

/// Everything the core needs from a node.
pub trait LedgerNode: InvocationService + RelayService + NodeSnapshot {}

impl<T: InvocationService + RelayService + NodeSnapshot> LedgerNode for T {}

/// Produces witnesses for a draft.
pub trait SigningService: Send + Sync {
    /// Account used as sender when the operator does not name one.
    fn default_account(&self) -> Option<Account>;

    /// Witness every signer of `draft`. Fails if any signer's key is unavailable.
    fn sign(&self, draft: TransactionDraft, magic: u32) -> Result<SignedTransaction, WalletError>;
}

/// Asks the operator a question and returns the raw answer line.
pub trait Prompt: Send + Sync {
    fn read_line(&self, message: &str) -> Result<String, WalletError>;

    /// Like [`Prompt::read_line`], but the answer is a secret and must not be echoed.
    fn read_password(&self, message: &str) -> Result<String, WalletError>;
}

/// A single contract operation with typed arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractCall {
    pub contract: Account,
    pub method: String,
    pub args: Vec<ContractArg>,
    /// The operation returns nothing, so a null test-invocation result is success.
    pub void_result: bool,
}

impl ContractCall {
    pub fn new(contract: Account, method: &str, args: Vec<ContractArg>) -> Self {
        Self {
            contract,
            method: method.to_string(),
            args,
            void_result: false,
        }
    }

    /// Mark the operation as returning nothing.
    pub fn returning_void(mut self) -> Self {
        self.void_result = true;
        self
    }

    pub fn to_script(&self) -> Result<Script, WalletError> {
        Ok(dvita_transactions::dynamic_call(
            &self.contract,
            &self.method,
            &self.args,
        )?)
    }

    /// `contract.method` for logs and error messages.
    pub fn label(&self) -> String {
        format!("{}.{}", self.contract, self.method)
    }
}

/// Everything an operation needs, borrowed for the duration of one command.
#[derive(Clone, Copy)]
pub struct ClientContext<'a> {
    pub node: &'a dyn LedgerNode,
    pub signer: &'a dyn SigningService,
    pub prompt: &'a dyn Prompt,
    pub config: &'a ClientConfig,
}

/// Run `call` read-only with no signers, failing on a fault terminal state.
pub async fn invoke_read_only(
    node: &dyn LedgerNode,
    call: &ContractCall,
    gas_limit: u64,
) -> Result<InvocationOutcome, WalletError> {
    let script = call.to_script()?;
    let outcome = node.invoke_script(&script, &[], gas_limit).await?;
    if outcome.is_fault() {
        return Err(WalletError::InvocationFault {
            operation: call.label(),
            reason: outcome
                .exception
                .unwrap_or_else(|| "no exception reported".to_string()),
        });
    }
    Ok(outcome)
}
