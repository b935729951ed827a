//! Nullable node: scripted invocation results and recorded relays.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use dvita_transactions::{decode_calls, Script, SignedTransaction, Signer, TransactionDraft};
use dvita_types::{Account, InvocationOutcome, StackValue, TxHash, VmState};
use dvita_wallet_core::{InvocationService, NodeSnapshot, RelayService, WalletError};

/// Gas charged per contract call when nothing else is configured (0.01 GAS).
pub const DEFAULT_GAS_PER_CALL: u64 = 1_000_000;
/// Network fee returned when nothing else is configured (0.001 GAS).
pub const DEFAULT_NETWORK_FEE: u64 = 100_000;

#[derive(Clone, Debug)]
enum Scripted {
    Value(StackValue),
    Fault(String),
}

/// One `invoke_script` call as the node saw it.
#[derive(Clone, Debug)]
pub struct RecordedInvocation {
    pub script: Script,
    pub signers: Vec<Signer>,
    pub gas_limit: u64,
    /// `(contract, method)` for every call in the script.
    pub calls: Vec<(Account, String)>,
}

struct State {
    responses: HashMap<(Account, String), Scripted>,
    contract_names: HashMap<Account, String>,
    invocations: Vec<RecordedInvocation>,
    relayed: Vec<SignedTransaction>,
    height: u32,
    network_fee: u64,
    gas_per_call: u64,
    relay_error: Option<String>,
    unreachable: bool,
    timing_out: bool,
}

/// An in-memory node that answers contract calls from a table.
///
/// Scripts are decoded back into `(contract, method)` pairs. Each pair returns the
/// value or fault registered for it; unknown pairs fault. Nothing is ever persisted
/// by an invocation, and relayed transactions are only recorded.
pub struct NullNode {
    state: Mutex<State>,
}

impl NullNode {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                responses: HashMap::new(),
                contract_names: HashMap::new(),
                invocations: Vec::new(),
                relayed: Vec::new(),
                height: 1000,
                network_fee: DEFAULT_NETWORK_FEE,
                gas_per_call: DEFAULT_GAS_PER_CALL,
                relay_error: None,
                unreachable: false,
                timing_out: false,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Return `value` whenever `contract.method` is called.
    pub fn respond(&self, contract: Account, method: &str, value: StackValue) -> &Self {
        self.state()
            .responses
            .insert((contract, method.to_string()), Scripted::Value(value));
        self
    }

    /// Fault with `exception` whenever `contract.method` is called.
    pub fn fault(&self, contract: Account, method: &str, exception: &str) -> &Self {
        self.state()
            .responses
            .insert((contract, method.to_string()), Scripted::Fault(exception.to_string()));
        self
    }

    /// Deploy a token: manifest name plus `symbol` and `decimals`.
    pub fn token(&self, contract: Account, name: &str, symbol: &str, decimals: u8) -> &Self {
        self.set_contract_name(contract, name);
        self.respond(contract, "symbol", StackValue::ByteString(symbol.as_bytes().to_vec()));
        self.respond(contract, "decimals", StackValue::Integer(i128::from(decimals)))
    }

    pub fn set_contract_name(&self, contract: Account, name: &str) -> &Self {
        self.state().contract_names.insert(contract, name.to_string());
        self
    }

    pub fn set_height(&self, height: u32) -> &Self {
        self.state().height = height;
        self
    }

    pub fn set_network_fee(&self, fee: u64) -> &Self {
        self.state().network_fee = fee;
        self
    }

    pub fn set_gas_per_call(&self, gas: u64) -> &Self {
        self.state().gas_per_call = gas;
        self
    }

    /// Reject every relay with `reason`.
    pub fn fail_relays(&self, reason: &str) -> &Self {
        self.state().relay_error = Some(reason.to_string());
        self
    }

    /// Fail every request as if the node could not be reached.
    pub fn set_unreachable(&self, unreachable: bool) -> &Self {
        self.state().unreachable = unreachable;
        self
    }

    /// Fail every request as if the node stopped answering within the timeout.
    pub fn set_timing_out(&self, timing_out: bool) -> &Self {
        self.state().timing_out = timing_out;
        self
    }

    pub fn invocations(&self) -> Vec<RecordedInvocation> {
        self.state().invocations.clone()
    }

    /// Number of invocations that called `method` on any contract.
    pub fn calls_to(&self, method: &str) -> usize {
        self.state()
            .invocations
            .iter()
            .filter(|inv| inv.calls.iter().any(|(_, m)| m == method))
            .count()
    }

    pub fn relayed(&self) -> Vec<SignedTransaction> {
        self.state().relayed.clone()
    }

    fn check_reachable(&self) -> Result<(), WalletError> {
        let state = self.state();
        if state.unreachable {
            return Err(WalletError::Node("connection refused".to_string()));
        }
        if state.timing_out {
            return Err(WalletError::Timeout("node did not answer in time".to_string()));
        }
        Ok(())
    }
}

impl Default for NullNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InvocationService for NullNode {
    async fn invoke_script(
        &self,
        script: &Script,
        signers: &[Signer],
        gas_limit: u64,
    ) -> Result<InvocationOutcome, WalletError> {
        self.check_reachable()?;
        let decoded = decode_calls(script).map_err(|e| WalletError::Node(e.to_string()))?;

        let mut state = self.state();
        state.invocations.push(RecordedInvocation {
            script: script.clone(),
            signers: signers.to_vec(),
            gas_limit,
            calls: decoded
                .iter()
                .map(|c| (c.contract, c.method.clone()))
                .collect(),
        });

        let mut outcome = InvocationOutcome::halt(0, Vec::new());
        for call in &decoded {
            outcome.gas_consumed += state.gas_per_call;
            match state.responses.get(&(call.contract, call.method.clone())) {
                Some(Scripted::Value(value)) => outcome.stack.push(value.clone()),
                Some(Scripted::Fault(exception)) => {
                    outcome.state = VmState::Fault;
                    outcome.exception = Some(exception.clone());
                    break;
                }
                None => {
                    outcome.state = VmState::Fault;
                    outcome.exception =
                        Some(format!("method {} not found on {}", call.method, call.contract));
                    break;
                }
            }
        }
        if outcome.gas_consumed > gas_limit && !outcome.is_fault() {
            outcome.state = VmState::Fault;
            outcome.exception = Some("gas limit exceeded".to_string());
        }
        Ok(outcome)
    }
}

#[async_trait]
impl RelayService for NullNode {
    async fn relay(&self, tx: &SignedTransaction) -> Result<TxHash, WalletError> {
        self.check_reachable()?;
        let mut state = self.state();
        if let Some(reason) = &state.relay_error {
            return Err(WalletError::Relay(reason.clone()));
        }
        let hash = tx.hash().map_err(|e| WalletError::Relay(e.to_string()))?;
        state.relayed.push(tx.clone());
        debug!(%hash, "null node recorded relay");
        Ok(hash)
    }
}

#[async_trait]
impl NodeSnapshot for NullNode {
    async fn block_height(&self) -> Result<u32, WalletError> {
        self.check_reachable()?;
        Ok(self.state().height)
    }

    async fn calculate_network_fee(&self, _draft: &TransactionDraft) -> Result<u64, WalletError> {
        self.check_reachable()?;
        Ok(self.state().network_fee)
    }

    async fn contract_name(&self, contract: &Account) -> Result<Option<String>, WalletError> {
        self.check_reachable()?;
        Ok(self.state().contract_names.get(contract).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dvita_transactions::{dynamic_call, ScriptBuilder};

    fn acct(b: u8) -> Account {
        Account::new([b; 20])
    }

    #[tokio::test]
    async fn scripted_values_in_call_order() {
        let node = NullNode::new();
        node.token(acct(1), "Token", "TKN", 2);

        let mut sb = ScriptBuilder::new();
        sb.emit_dynamic_call(&acct(1), "decimals", &[]).unwrap();
        sb.emit_dynamic_call(&acct(1), "symbol", &[]).unwrap();
        let outcome = node.invoke_script(&sb.build(), &[], u64::MAX).await.unwrap();

        assert_eq!(outcome.state, VmState::Halt);
        assert_eq!(outcome.gas_consumed, 2 * DEFAULT_GAS_PER_CALL);
        assert_eq!(
            outcome.stack,
            vec![
                StackValue::Integer(2),
                StackValue::ByteString(b"TKN".to_vec())
            ]
        );
        assert_eq!(node.calls_to("symbol"), 1);
    }

    #[tokio::test]
    async fn unknown_method_faults() {
        let node = NullNode::new();
        let script = dynamic_call(&acct(1), "resolve", &[]).unwrap();
        let outcome = node.invoke_script(&script, &[], u64::MAX).await.unwrap();
        assert!(outcome.is_fault());
    }

    #[tokio::test]
    async fn gas_limit_enforced() {
        let node = NullNode::new();
        node.respond(acct(1), "symbol", StackValue::Null);
        let script = dynamic_call(&acct(1), "symbol", &[]).unwrap();
        let outcome = node
            .invoke_script(&script, &[], DEFAULT_GAS_PER_CALL - 1)
            .await
            .unwrap();
        assert!(outcome.is_fault());
    }

    #[tokio::test]
    async fn unreachable_node_errors() {
        let node = NullNode::new();
        node.set_unreachable(true);
        assert!(node.block_height().await.is_err());
        assert!(node.contract_name(&acct(1)).await.is_err());
    }

    #[tokio::test]
    async fn timing_out_node_reports_timeout() {
        let node = NullNode::new();
        node.set_timing_out(true);
        assert!(matches!(node.block_height().await, Err(WalletError::Timeout(_))));
    }
}
