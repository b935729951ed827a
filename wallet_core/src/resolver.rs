//! Name resolution and registration against the naming service.

use dvita_types::{Account, ContractArg, StackValue};
use tracing::{debug, info, warn};

use crate::classifier::{is_domain_name, IdentifierClass, RESOLUTION_ORDER};
use crate::config::ClientConfig;
use crate::error::WalletError;
use crate::pipeline::{self, PipelineOutcome};
use crate::services::{ClientContext, ContractCall, LedgerNode};
use crate::signers::build_signer_set;

/// Where a balance or transfer for an identifier goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    Account(Account),
    /// Held by the social-handle proxy ledger; there is no account for it.
    SocialHandle(String),
}

/// Look `name` up through the naming service's `resolve`.
///
/// Read-only, bounded by `test_mode_gas`. Every failure, including an unreachable
/// node, is reported as [`WalletError::ResolutionFailure`]. A timeout is passed
/// through unchanged so the operator can retry.
pub async fn resolve_by_name(
    node: &dyn LedgerNode,
    config: &ClientConfig,
    name: &str,
) -> Result<Account, WalletError> {
    let failure = |reason: String| {
        warn!(name = %name, reason = %reason, "resolution failed");
        WalletError::ResolutionFailure {
            identifier: name.to_string(),
            reason,
        }
    };

    let call = ContractCall::new(
        config.contracts.naming_service,
        "resolve",
        vec![ContractArg::from(name)],
    );
    let script = call.to_script().map_err(|e| failure(e.to_string()))?;
    let outcome = match node.invoke_script(&script, &[], config.test_mode_gas).await {
        Ok(outcome) => outcome,
        Err(e @ WalletError::Timeout(_)) => {
            warn!(name = %name, error = %e, "resolution timed out");
            return Err(e);
        }
        Err(e) => return Err(failure(e.to_string())),
    };

    if outcome.is_fault() {
        return Err(failure(format!(
            "resolve faulted: {}",
            outcome.exception.as_deref().unwrap_or("no exception reported")
        )));
    }
    let account = match outcome.result() {
        None | Some(StackValue::Null) => return Err(failure("name is not registered".to_string())),
        Some(value) => value
            .as_bytes()
            .ok_or_else(|| failure(format!("unexpected result {value:?}")))
            .and_then(|bytes| Account::from_slice(bytes).map_err(|e| failure(e.to_string())))?,
    };
    debug!(name = %name, account = %account, "name resolved");
    Ok(account)
}

/// Walk [`RESOLUTION_ORDER`] for `identifier`.
///
/// A domain name that is not registered falls through to the next class. If it
/// then fails the raw-address parse as well, the resolution failure is reported
/// rather than the parse error. Timeouts stop the walk. Raw input must parse as an
/// account and must not be the zero account.
pub async fn resolve_target(
    node: &dyn LedgerNode,
    config: &ClientConfig,
    identifier: &str,
) -> Result<Target, WalletError> {
    let mut unresolved = None;
    for class in RESOLUTION_ORDER {
        if !class.matches(identifier) {
            continue;
        }
        match class {
            IdentifierClass::DomainName => match resolve_by_name(node, config, identifier).await {
                Ok(account) => return Ok(Target::Account(account)),
                Err(e @ WalletError::Timeout(_)) => return Err(e),
                Err(e) => unresolved = Some(e),
            },
            IdentifierClass::SocialHandle => {
                return Ok(Target::SocialHandle(identifier.to_string()));
            }
            IdentifierClass::RawAddress => {
                let account = match Account::parse(identifier.trim(), config.network.address_version) {
                    Ok(account) => account,
                    Err(e) => return Err(unresolved.unwrap_or_else(|| e.into())),
                };
                if account.is_zero() {
                    return Err(WalletError::InvalidAccount(
                        "the zero account is not a valid target".to_string(),
                    ));
                }
                return Ok(Target::Account(account));
            }
        }
    }
    Err(WalletError::ClassificationMismatch(identifier.to_string()))
}

/// Like [`resolve_target`], but a social handle is an error since no account exists
/// for it.
pub async fn resolve_account(
    node: &dyn LedgerNode,
    config: &ClientConfig,
    identifier: &str,
) -> Result<Account, WalletError> {
    match resolve_target(node, config, identifier).await? {
        Target::Account(account) => Ok(account),
        Target::SocialHandle(handle) => Err(WalletError::ResolutionFailure {
            identifier: handle,
            reason: "social handles have no account".to_string(),
        }),
    }
}

/// Register and unregister only accept names the naming service can hold.
pub fn ensure_domain_name(name: &str) -> Result<(), WalletError> {
    if is_domain_name(name) {
        Ok(())
    } else {
        Err(WalletError::ClassificationMismatch(format!(
            "{name}: expected an e-mail style name or a name ending with {}",
            crate::classifier::DOMAIN_SUFFIX
        )))
    }
}

/// Bind `name` to `account`, signed and paid for by `signer`.
///
/// Returns `true` only when the transaction was relayed. Errors are logged, never
/// propagated.
pub async fn register_by_name(
    ctx: &ClientContext<'_>,
    name: &str,
    account: Account,
    signer: Account,
) -> bool {
    info!(name = %name, account = %account, "registering name");
    let call = ContractCall::new(
        ctx.config.contracts.naming_service,
        "register",
        vec![ContractArg::from(name), ContractArg::Hash160(account)],
    )
    .returning_void();
    submit(ctx, call, signer, name).await
}

/// Remove the binding for `name`, signed and paid for by `signer`.
pub async fn unregister_by_name(ctx: &ClientContext<'_>, name: &str, signer: Account) -> bool {
    info!(name = %name, "unregistering name");
    let call = ContractCall::new(
        ctx.config.contracts.naming_service,
        "unregister",
        vec![ContractArg::from(name)],
    )
    .returning_void();
    submit(ctx, call, signer, name).await
}

async fn submit(ctx: &ClientContext<'_>, call: ContractCall, signer: Account, name: &str) -> bool {
    let contracts = &ctx.config.contracts;
    let signers = build_signer_set(signer, &[], &[contracts.naming_service, contracts.gas_token]);
    match pipeline::execute(ctx, call, signers, ctx.config.test_mode_gas).await {
        Ok(PipelineOutcome::Relayed(hash)) => {
            info!(name = %name, tx = %hash, "naming transaction relayed");
            true
        }
        Ok(PipelineOutcome::Declined) => false,
        Err(e) => {
            warn!(name = %name, error = %e, "naming transaction failed");
            false
        }
    }
}
