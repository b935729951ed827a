//! Fee-estimating transaction pipeline.
//!
//! ```text
//! ScriptBuilt ─estimate→ FeeEstimated ─build_draft→ Drafted ─confirm→ Confirmed ─relay→ TxHash
//!                                                              └──→ Declined
//! ```
//!
//! Each stage is its own type and each transition consumes the previous stage, so a
//! draft cannot be built before the test invocation succeeds and nothing can be
//! relayed without an explicit confirmation. Any error aborts the pipeline; nothing
//! is retried.

use dvita_transactions::{validate_signers, Script, Signer, TransactionDraft};
use dvita_types::{Account, ContractArg, StackValue, TokenAmount, TxHash};
use std::fmt;
use tracing::{debug, info, warn};

use crate::asset::ledger_integer;
use crate::config::{ClientConfig, GAS_DECIMALS};
use crate::error::WalletError;
use crate::services::{
    invoke_read_only, ClientContext, ContractCall, LedgerNode, Prompt, SigningService,
};

pub const CONFIRM_PROMPT: &str = "Relay tx (no|yes)";

/// Pipeline stages, used for logging where an abort happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    ScriptBuilt,
    FeeEstimated,
    Drafted,
    Confirmed,
    Relayed,
}

/// How a pipeline run ended without error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineOutcome {
    Relayed(TxHash),
    /// The operator did not confirm. Nothing was signed or relayed.
    Declined,
}

/// `yes` or `y`, case-insensitive, surrounding whitespace ignored.
pub fn is_affirmative(input: &str) -> bool {
    let answer = input.trim().to_lowercase();
    answer == "yes" || answer == "y"
}

// ── Stages ─────────────────────────────────────────────────────────────

pub struct ScriptBuilt {
    call: ContractCall,
    script: Script,
    signers: Vec<Signer>,
    fee_ceiling: u64,
}

impl ScriptBuilt {
    pub fn new(call: ContractCall, signers: Vec<Signer>, fee_ceiling: u64) -> Result<Self, WalletError> {
        let script = call.to_script()?;
        debug!(call = %call.label(), bytes = script.len(), "script built");
        Ok(Self {
            call,
            script,
            signers,
            fee_ceiling,
        })
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    /// Test-invoke the script under the provisional ceiling to learn its real cost.
    ///
    /// A fault, an explicit `false`, or a missing result from an operation that
    /// should return one stops the pipeline.
    pub async fn estimate(self, node: &dyn LedgerNode) -> Result<FeeEstimated, WalletError> {
        let outcome = node
            .invoke_script(&self.script, &self.signers, self.fee_ceiling)
            .await?;
        let rejected = |reason: String| WalletError::InvocationFault {
            operation: self.call.label(),
            reason,
        };
        if outcome.is_fault() {
            return Err(rejected(
                outcome
                    .exception
                    .clone()
                    .unwrap_or_else(|| "no exception reported".to_string()),
            ));
        }
        match outcome.result() {
            Some(StackValue::Boolean(false)) => {
                return Err(rejected("operation returned false".to_string()));
            }
            None | Some(StackValue::Null) if !self.call.void_result => {
                return Err(rejected("operation returned no result".to_string()));
            }
            _ => {}
        }
        debug!(call = %self.call.label(), gas = outcome.gas_consumed, "fee estimated");
        Ok(FeeEstimated {
            script: self.script,
            signers: self.signers,
            system_fee: outcome.gas_consumed,
        })
    }
}

/// The node enforces the ceiling during the test invocation, so `system_fee` never
/// exceeds it.
pub struct FeeEstimated {
    script: Script,
    signers: Vec<Signer>,
    system_fee: u64,
}

impl FeeEstimated {
    pub fn system_fee(&self) -> u64 {
        self.system_fee
    }

    /// Build the real draft with the discovered system fee and the node's network fee.
    ///
    /// Fails on an invalid signer set or a sender whose fee balance cannot cover the
    /// total.
    pub async fn build_draft(
        self,
        node: &dyn LedgerNode,
        config: &ClientConfig,
    ) -> Result<Drafted, WalletError> {
        let sender = self
            .signers
            .first()
            .map(|s| s.account)
            .ok_or_else(|| WalletError::DraftBuild("transaction has no signers".to_string()))?;
        validate_signers(&self.signers, &sender)?;

        let height = node.block_height().await?;
        let mut draft = TransactionDraft::new(self.script, self.signers);
        draft.nonce = rand::random();
        draft.system_fee = self.system_fee;
        draft.valid_until_block =
            height.saturating_add(config.network.max_valid_until_block_increment);
        draft.network_fee = node.calculate_network_fee(&draft).await?;

        let balance = fee_balance(node, config, &sender).await?;
        let total = u128::from(draft.total_fee());
        if total > balance {
            return Err(WalletError::DraftBuild(format!(
                "insufficient GAS: need {}, have {}",
                TokenAmount::from_raw(total, GAS_DECIMALS),
                TokenAmount::from_raw(balance, GAS_DECIMALS)
            )));
        }
        Ok(Drafted { draft })
    }
}

pub struct Drafted {
    draft: TransactionDraft,
}

impl Drafted {
    pub fn draft(&self) -> &TransactionDraft {
        &self.draft
    }

    pub fn fee_summary(&self) -> FeeSummary {
        FeeSummary {
            system_fee: self.draft.system_fee,
            network_fee: self.draft.network_fee,
        }
    }

    /// Show the fees and ask the operator. Only `yes`/`y` confirms; an unreadable
    /// answer counts as a decline.
    pub fn confirm(self, prompt: &dyn Prompt) -> Confirmation {
        let question = format!("{}\n{CONFIRM_PROMPT}", self.fee_summary());
        match prompt.read_line(&question) {
            Ok(answer) if is_affirmative(&answer) => Confirmation::Confirmed(Confirmed {
                draft: self.draft,
            }),
            Ok(_) => Confirmation::Declined,
            Err(e) => {
                warn!(error = %e, "could not read confirmation, treating as decline");
                Confirmation::Declined
            }
        }
    }
}

pub enum Confirmation {
    Confirmed(Confirmed),
    Declined,
}

pub struct Confirmed {
    draft: TransactionDraft,
}

impl Confirmed {
    /// Sign and submit. A relay failure is reported, never retried.
    pub async fn relay(
        self,
        signer: &dyn SigningService,
        node: &dyn LedgerNode,
        magic: u32,
    ) -> Result<TxHash, WalletError> {
        let signed = signer.sign(self.draft, magic)?;
        node.relay(&signed).await
    }
}

/// Fees shown to the operator before confirmation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeSummary {
    pub system_fee: u64,
    pub network_fee: u64,
}

impl FeeSummary {
    pub fn total(&self) -> u64 {
        self.system_fee.saturating_add(self.network_fee)
    }
}

impl fmt::Display for FeeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Network fee: {}\tTotal fee: {} GAS",
            gas(self.network_fee),
            gas(self.total())
        )
    }
}

fn gas(datoshi: u64) -> TokenAmount {
    TokenAmount::from_raw(u128::from(datoshi), GAS_DECIMALS)
}

async fn fee_balance(
    node: &dyn LedgerNode,
    config: &ClientConfig,
    sender: &Account,
) -> Result<u128, WalletError> {
    let call = ContractCall::new(
        config.contracts.gas_token,
        "balanceOf",
        vec![ContractArg::Hash160(*sender)],
    );
    let outcome = invoke_read_only(node, &call, config.test_mode_gas)
        .await
        .map_err(|e| WalletError::DraftBuild(format!("cannot read fee balance: {e}")))?;
    let value = outcome
        .result()
        .ok_or_else(|| WalletError::DraftBuild("fee balance query returned nothing".to_string()))?;
    ledger_integer(value, "fee balance")
}

// ── Driver ─────────────────────────────────────────────────────────────

fn aborted(stage: Stage, call: &str, error: WalletError) -> WalletError {
    warn!(stage = ?stage, call = %call, error = %error, "pipeline aborted");
    error
}

/// Run `call` through every stage: estimate, draft, confirm, sign, relay.
pub async fn execute(
    ctx: &ClientContext<'_>,
    call: ContractCall,
    signers: Vec<Signer>,
    fee_ceiling: u64,
) -> Result<PipelineOutcome, WalletError> {
    let label = call.label();
    let built = ScriptBuilt::new(call, signers, fee_ceiling)
        .map_err(|e| aborted(Stage::ScriptBuilt, &label, e))?;
    let estimated = built
        .estimate(ctx.node)
        .await
        .map_err(|e| aborted(Stage::FeeEstimated, &label, e))?;
    let drafted = estimated
        .build_draft(ctx.node, ctx.config)
        .await
        .map_err(|e| aborted(Stage::Drafted, &label, e))?;

    let summary = drafted.fee_summary();
    info!(call = %label, system_fee = summary.system_fee, network_fee = summary.network_fee, "draft ready");

    match drafted.confirm(ctx.prompt) {
        Confirmation::Declined => {
            info!(call = %label, "relay declined by operator");
            Ok(PipelineOutcome::Declined)
        }
        Confirmation::Confirmed(confirmed) => {
            let hash = confirmed
                .relay(ctx.signer, ctx.node, ctx.config.network.magic)
                .await
                .map_err(|e| aborted(Stage::Confirmed, &label, e))?;
            info!(call = %label, stage = ?Stage::Relayed, tx = %hash, "transaction relayed");
            Ok(PipelineOutcome::Relayed(hash))
        }
    }
}
