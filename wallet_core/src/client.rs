//! JSON-RPC 2.0 client for a dVITA node.
//!
//! Read-only invocation and snapshot queries use the node's public RPC methods.
//! Relay and network-fee calls send the local signer's draft encoding unchanged.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, trace};

use dvita_transactions::{Script, SignedTransaction, Signer, TransactionDraft, WitnessScope};
use dvita_types::{Account, InvocationOutcome, StackValue, TxHash, VmState};

use crate::config::ClientConfig;
use crate::error::WalletError;
use crate::services::{InvocationService, NodeSnapshot, RelayService};

/// Error code the node returns for an unknown contract.
const UNKNOWN_CONTRACT: i64 = -100;

/// HTTP client for a node's JSON-RPC endpoint.
///
/// Every request is bounded by the configured timeouts. A timeout surfaces as
/// [`WalletError::Timeout`] so the operator can reissue the command.
pub struct NodeClient {
    http: reqwest::Client,
    node_url: String,
    next_id: AtomicU64,
}

impl NodeClient {
    pub fn new(config: &ClientConfig) -> Result<Self, WalletError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| WalletError::Node(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            node_url: config.node_url.clone(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn node_url(&self) -> &str {
        &self.node_url
    }

    async fn rpc_call(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, RpcFailure> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": id,
        });
        trace!(method, id, "rpc request");

        let response = self
            .http
            .post(&self.node_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RpcFailure::Transport(transport_error(method, e)))?;

        if !response.status().is_success() {
            return Err(RpcFailure::Transport(WalletError::Node(format!(
                "{method}: node returned HTTP {}",
                response.status()
            ))));
        }

        let reply: RpcReply = response
            .json()
            .await
            .map_err(|e| RpcFailure::Transport(transport_error(method, e)))?;

        if let Some(error) = reply.error {
            return Err(RpcFailure::Node(error));
        }
        reply.result.ok_or_else(|| {
            RpcFailure::Transport(WalletError::Node(format!("{method}: reply has no result")))
        })
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, WalletError> {
        let result = self.rpc_call(method, params).await.map_err(|e| e.into_error(method))?;
        serde_json::from_value(result)
            .map_err(|e| WalletError::Node(format!("invalid {method} response: {e}")))
    }
}

fn transport_error(method: &str, e: reqwest::Error) -> WalletError {
    if e.is_timeout() {
        WalletError::Timeout(format!("{method}: {e}"))
    } else {
        WalletError::Node(format!("{method}: request failed: {e}"))
    }
}

enum RpcFailure {
    Transport(WalletError),
    Node(RpcError),
}

impl RpcFailure {
    fn into_error(self, method: &str) -> WalletError {
        match self {
            Self::Transport(e) => e,
            Self::Node(e) => WalletError::Node(format!("{method}: {} ({})", e.message, e.code)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RpcReply {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

// ── Wire shapes ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct InvokeResult {
    state: String,
    gasconsumed: String,
    #[serde(default)]
    exception: Option<String>,
    #[serde(default)]
    stack: Vec<RpcStackItem>,
}

#[derive(Debug, Deserialize)]
struct RpcStackItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    value: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct NetworkFeeResult {
    networkfee: String,
}

#[derive(Debug, Deserialize)]
struct RelayResult {
    hash: String,
}

#[derive(Debug, Deserialize)]
struct ContractState {
    manifest: ContractManifest,
}

#[derive(Debug, Deserialize)]
struct ContractManifest {
    name: String,
}

fn scope_names(scopes: WitnessScope) -> String {
    const NAMES: [(WitnessScope, &str); 3] = [
        (WitnessScope::CALLED_BY_ENTRY, "CalledByEntry"),
        (WitnessScope::CUSTOM_CONTRACTS, "CustomContracts"),
        (WitnessScope::GLOBAL, "Global"),
    ];
    let names: Vec<&str> = NAMES
        .iter()
        .filter(|(flag, _)| scopes.contains(*flag))
        .map(|(_, name)| *name)
        .collect();
    if names.is_empty() {
        "None".to_string()
    } else {
        names.join(",")
    }
}

fn signers_json(signers: &[Signer]) -> serde_json::Value {
    signers
        .iter()
        .map(|s| {
            serde_json::json!({
                "account": s.account.to_string(),
                "scopes": scope_names(s.scopes),
                "allowedcontracts": s.allowed_contracts.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
            })
        })
        .collect()
}

fn parse_stack_item(item: &RpcStackItem) -> Result<StackValue, WalletError> {
    let invalid = || WalletError::Node(format!("invalid {} stack item: {}", item.kind, item.value));
    match item.kind.as_str() {
        "Any" => Ok(StackValue::Null),
        "Boolean" => item.value.as_bool().map(StackValue::Boolean).ok_or_else(invalid),
        "Integer" => item
            .value
            .as_str()
            .and_then(|v| v.parse::<i128>().ok())
            .map(StackValue::Integer)
            .ok_or_else(invalid),
        "ByteString" | "Buffer" => item
            .value
            .as_str()
            .and_then(|v| BASE64.decode(v).ok())
            .map(StackValue::ByteString)
            .ok_or_else(invalid),
        "Array" | "Struct" => {
            let items: Vec<RpcStackItem> =
                serde_json::from_value(item.value.clone()).map_err(|_| invalid())?;
            items
                .iter()
                .map(parse_stack_item)
                .collect::<Result<Vec<_>, _>>()
                .map(StackValue::Array)
        }
        other => Err(WalletError::Node(format!("unsupported stack item type {other}"))),
    }
}

fn parse_invoke_result(result: InvokeResult, gas_limit: u64) -> Result<InvocationOutcome, WalletError> {
    let gas_consumed: u64 = result
        .gasconsumed
        .parse()
        .map_err(|e| WalletError::Node(format!("invalid gasconsumed {:?}: {e}", result.gasconsumed)))?;
    let mut state = match result.state.as_str() {
        "HALT" => VmState::Halt,
        _ => VmState::Fault,
    };
    let mut exception = result.exception;
    if gas_consumed > gas_limit {
        state = VmState::Fault;
        exception.get_or_insert_with(|| format!("gas limit exceeded: {gas_consumed} > {gas_limit}"));
    }
    let stack = result
        .stack
        .iter()
        .map(parse_stack_item)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(InvocationOutcome {
        state,
        gas_consumed,
        stack,
        exception,
    })
}

// ── Node capabilities ───────────────────────────────────────────────────

#[async_trait]
impl InvocationService for NodeClient {
    async fn invoke_script(
        &self,
        script: &Script,
        signers: &[Signer],
        gas_limit: u64,
    ) -> Result<InvocationOutcome, WalletError> {
        let params = serde_json::json!([BASE64.encode(script.as_bytes()), signers_json(signers)]);
        let result: InvokeResult = self.call("invokescript", params).await?;
        let outcome = parse_invoke_result(result, gas_limit)?;
        debug!(state = ?outcome.state, gas = outcome.gas_consumed, "script invoked");
        Ok(outcome)
    }
}

/// Submits the local signer's bincode encoding as-is. Only nodes that accept that
/// encoding will take it; a stock dVITA node expects its own transaction format.
#[async_trait]
impl RelayService for NodeClient {
    async fn relay(&self, tx: &SignedTransaction) -> Result<TxHash, WalletError> {
        let bytes = tx.to_bytes()?;
        let hash = tx.hash()?;
        let params = serde_json::json!([BASE64.encode(bytes)]);
        let reply: RelayResult = self
            .rpc_call("sendrawtransaction", params)
            .await
            .map_err(|e| match e {
                RpcFailure::Transport(e) => e,
                RpcFailure::Node(e) => WalletError::Relay(format!("{} ({})", e.message, e.code)),
            })
            .and_then(|v| {
                serde_json::from_value(v)
                    .map_err(|e| WalletError::Node(format!("invalid sendrawtransaction response: {e}")))
            })?;
        debug!(local = %hash, node = %reply.hash, "transaction accepted");
        Ok(hash)
    }
}

#[async_trait]
impl NodeSnapshot for NodeClient {
    async fn block_height(&self) -> Result<u32, WalletError> {
        let count: u32 = self.call("getblockcount", serde_json::json!([])).await?;
        Ok(count.saturating_sub(1))
    }

    async fn calculate_network_fee(&self, draft: &TransactionDraft) -> Result<u64, WalletError> {
        let params = serde_json::json!([BASE64.encode(draft.unsigned_bytes()?)]);
        let reply: NetworkFeeResult = self.call("calculatenetworkfee", params).await?;
        reply
            .networkfee
            .parse()
            .map_err(|e| WalletError::Node(format!("invalid networkfee {:?}: {e}", reply.networkfee)))
    }

    async fn contract_name(&self, contract: &Account) -> Result<Option<String>, WalletError> {
        let params = serde_json::json!([contract.to_string()]);
        match self.rpc_call("getcontractstate", params).await {
            Ok(value) => {
                let state: ContractState = serde_json::from_value(value)
                    .map_err(|e| WalletError::Node(format!("invalid getcontractstate response: {e}")))?;
                Ok(Some(state.manifest.name))
            }
            Err(RpcFailure::Node(e)) if e.code == UNKNOWN_CONTRACT => Ok(None),
            Err(e) => Err(e.into_error("getcontractstate")),
        }
    }
}
