//! Asset descriptor lookup.
//!
//! Decimals are read from the token on every command and never assumed, since
//! amount scaling depends on them.

use dvita_transactions::ScriptBuilder;
use dvita_types::{Account, StackValue, TokenAmount};
use tracing::debug;

use crate::error::WalletError;
use crate::services::LedgerNode;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetDescriptor {
    pub contract: Account,
    pub decimals: u8,
    pub symbol: String,
    /// Contract manifest name.
    pub display_name: String,
}

impl AssetDescriptor {
    /// Scale a human amount into ledger units.
    pub fn scale(&self, amount: &str) -> Result<TokenAmount, WalletError> {
        Ok(TokenAmount::parse(amount, self.decimals)?)
    }

    /// Wrap a ledger-unit value for display.
    pub fn amount(&self, raw: u128) -> TokenAmount {
        TokenAmount::from_raw(raw, self.decimals)
    }
}

/// Read `decimals` and `symbol` in one read-only invocation, plus the manifest name.
pub async fn describe(
    node: &dyn LedgerNode,
    contract: &Account,
    gas_limit: u64,
) -> Result<AssetDescriptor, WalletError> {
    let metadata_error = |reason: String| WalletError::AssetMetadata {
        contract: contract.to_string(),
        reason,
    };

    let display_name = node
        .contract_name(contract)
        .await?
        .ok_or_else(|| metadata_error("contract does not exist".to_string()))?;

    let mut sb = ScriptBuilder::new();
    sb.emit_dynamic_call(contract, "decimals", &[])?;
    sb.emit_dynamic_call(contract, "symbol", &[])?;
    let outcome = node.invoke_script(&sb.build(), &[], gas_limit).await?;

    if outcome.is_fault() {
        return Err(metadata_error(format!(
            "metadata query faulted: {}",
            outcome.exception.as_deref().unwrap_or("no exception reported")
        )));
    }
    let [decimals_item, symbol_item] = outcome.stack.as_slice() else {
        return Err(metadata_error(format!(
            "expected 2 results, got {}",
            outcome.stack.len()
        )));
    };

    let decimals = decimals_item
        .as_integer()
        .and_then(|d| u8::try_from(d).ok())
        .filter(|d| *d <= TokenAmount::MAX_DECIMALS)
        .ok_or_else(|| metadata_error(format!("invalid decimals {decimals_item:?}")))?;
    let symbol = symbol_item
        .as_string()
        .ok_or_else(|| metadata_error(format!("invalid symbol {symbol_item:?}")))?;

    debug!(contract = %contract, decimals, symbol = %symbol, "asset described");
    Ok(AssetDescriptor {
        contract: *contract,
        decimals,
        symbol,
        display_name,
    })
}

/// Interpret a stack value as a non-negative ledger integer.
pub(crate) fn ledger_integer(value: &StackValue, what: &str) -> Result<u128, WalletError> {
    value
        .as_integer()
        .and_then(|v| u128::try_from(v).ok())
        .ok_or_else(|| WalletError::Node(format!("{what}: expected a non-negative integer, got {value:?}")))
}
