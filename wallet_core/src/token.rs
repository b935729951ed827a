//! Fungible-token commands: balances, transfers and metadata.

use dvita_types::{Account, ContractArg, TokenAmount};
use std::fmt;
use tracing::info;

use crate::asset::{describe, ledger_integer, AssetDescriptor};
use crate::config::ClientConfig;
use crate::error::WalletError;
use crate::pipeline::{self, PipelineOutcome};
use crate::resolver::{resolve_target, Target};
use crate::services::{invoke_read_only, ClientContext, ContractCall, LedgerNode};
use crate::signers::build_signer_set;

/// A balance ready for display as `"{name} balance: {amount}"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenBalance {
    pub asset: AssetDescriptor,
    pub target: Target,
    pub amount: TokenAmount,
}

impl fmt::Display for TokenBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} balance: {}", self.asset.display_name, self.amount)
    }
}

/// Balance of `identifier` in `token`.
///
/// Accounts are queried on the token itself. Social handles are queried on the
/// proxy ledger with `(handle, token)`.
pub async fn balance_of(
    node: &dyn LedgerNode,
    config: &ClientConfig,
    token: &Account,
    identifier: &str,
) -> Result<TokenBalance, WalletError> {
    let target = resolve_target(node, config, identifier).await?;
    let asset = describe(node, token, config.test_mode_gas).await?;

    let call = match &target {
        Target::Account(account) => {
            ContractCall::new(*token, "balanceOf", vec![ContractArg::Hash160(*account)])
        }
        Target::SocialHandle(handle) => ContractCall::new(
            config.contracts.social_ledger,
            "balanceOf",
            vec![
                ContractArg::ByteArray(handle.as_bytes().to_vec()),
                ContractArg::Hash160(*token),
            ],
        ),
    };
    let outcome = invoke_read_only(node, &call, config.test_mode_gas).await?;
    let value = outcome.result().ok_or_else(|| WalletError::InvocationFault {
        operation: call.label(),
        reason: "no result".to_string(),
    })?;
    let amount = asset.amount(ledger_integer(value, "balance")?);
    Ok(TokenBalance {
        asset,
        target,
        amount,
    })
}

/// Inputs of a transfer as the operator typed them.
#[derive(Clone, Debug)]
pub struct TransferRequest {
    pub token: Account,
    /// Domain name, social handle or raw address.
    pub to: String,
    /// Human amount, scaled by the token's decimals.
    pub amount: String,
    /// Sender; defaults to the wallet's default account.
    pub from: Option<Account>,
    pub data: Option<String>,
    pub cosigners: Vec<Account>,
}

/// Move tokens through the fee-estimating pipeline.
pub async fn transfer(
    ctx: &ClientContext<'_>,
    request: TransferRequest,
) -> Result<PipelineOutcome, WalletError> {
    let config = ctx.config;
    let from = match request.from {
        Some(from) => from,
        None => ctx
            .signer
            .default_account()
            .ok_or_else(|| WalletError::Key("no sender given and the wallet has no default account".to_string()))?,
    };
    let asset = describe(ctx.node, &request.token, config.test_mode_gas).await?;
    let amount = asset.scale(&request.amount)?;
    if amount.is_zero() {
        return Err(WalletError::ScaleConversion("amount must be positive".to_string()));
    }
    let raw = i128::try_from(amount.raw())
        .map_err(|_| WalletError::ScaleConversion(format!("{amount} is too large")))?;

    let target = resolve_target(ctx.node, config, &request.to).await?;
    let call = match &target {
        Target::Account(to) => ContractCall::new(
            request.token,
            "transfer",
            vec![
                ContractArg::Hash160(from),
                ContractArg::Hash160(*to),
                ContractArg::Integer(raw),
                ContractArg::from(request.data),
            ],
        ),
        Target::SocialHandle(handle) => ContractCall::new(
            config.contracts.social_ledger,
            "transferFromAddressToHandle",
            vec![
                ContractArg::Hash160(from),
                ContractArg::ByteArray(handle.as_bytes().to_vec()),
                ContractArg::Hash160(request.token),
                ContractArg::Integer(raw),
            ],
        ),
    };
    info!(token = %asset.symbol, amount = %amount, to = %request.to, "transfer requested");

    let signers = build_signer_set(
        from,
        &request.cosigners,
        &[request.token, config.contracts.gas_token],
    );
    pipeline::execute(ctx, call, signers, config.transfer_max_gas).await
}

/// Contract manifest name.
pub async fn name(node: &dyn LedgerNode, token: &Account) -> Result<String, WalletError> {
    node.contract_name(token)
        .await?
        .ok_or_else(|| WalletError::AssetMetadata {
            contract: token.to_string(),
            reason: "contract does not exist".to_string(),
        })
}

pub async fn decimals(
    node: &dyn LedgerNode,
    config: &ClientConfig,
    token: &Account,
) -> Result<u8, WalletError> {
    Ok(describe(node, token, config.test_mode_gas).await?.decimals)
}

/// Total supply, scaled by the token's decimals.
pub async fn total_supply(
    node: &dyn LedgerNode,
    config: &ClientConfig,
    token: &Account,
) -> Result<TokenAmount, WalletError> {
    let asset = describe(node, token, config.test_mode_gas).await?;
    let call = ContractCall::new(*token, "totalSupply", Vec::new());
    let outcome = invoke_read_only(node, &call, config.test_mode_gas).await?;
    let value = outcome.result().ok_or_else(|| WalletError::InvocationFault {
        operation: call.label(),
        reason: "no result".to_string(),
    })?;
    Ok(asset.amount(ledger_integer(value, "total supply")?))
}
