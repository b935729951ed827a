//! Command execution against a node, a wallet and an operator.

use anyhow::{bail, Context};
use std::sync::Arc;

use dvita_crypto::WitnessKey;
use dvita_types::Account;
use dvita_wallet_core::{
    ensure_domain_name, register_by_name, resolve_by_name, token, unregister_by_name, ClientConfig,
    ClientContext, KdfParams, LedgerNode, PipelineOutcome, Prompt, SigningService,
    TransferRequest, Wallet, WalletFile,
};

use crate::commands::Command;

/// Read before prompting for the wallet password.
pub const PASSWORD_ENV: &str = "DVITA_WALLET_PASSWORD";

/// State shared by every command of one process (or one shell).
///
/// The wallet is unlocked on first use and kept for later commands.
pub struct Session {
    config: ClientConfig,
    node: Arc<dyn LedgerNode>,
    prompt: Arc<dyn Prompt>,
    wallet: Option<Wallet>,
}

impl Session {
    pub fn new(config: ClientConfig, node: Arc<dyn LedgerNode>, prompt: Arc<dyn Prompt>) -> Self {
        Self {
            config,
            node,
            prompt,
            wallet: None,
        }
    }

    /// Use an already unlocked wallet instead of the configured file.
    pub fn with_wallet(mut self, wallet: Wallet) -> Self {
        self.wallet = Some(wallet);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn prompt(&self) -> &dyn Prompt {
        self.prompt.as_ref()
    }

    fn account(&self, text: &str) -> anyhow::Result<Account> {
        Account::parse(text, self.config.network.address_version)
            .with_context(|| format!("invalid account {text:?}"))
    }

    /// The environment wins. Otherwise the password is read without echo, twice
    /// when `confirm` is set.
    fn password(&self, confirm: bool) -> anyhow::Result<String> {
        if let Ok(password) = std::env::var(PASSWORD_ENV) {
            return Ok(password);
        }
        let password = self.prompt.read_password("Wallet password")?;
        if confirm && self.prompt.read_password("Confirm wallet password")? != password {
            bail!("passwords do not match");
        }
        Ok(password)
    }

    fn ensure_wallet(&mut self) -> anyhow::Result<()> {
        if self.wallet.is_some() {
            return Ok(());
        }
        let path = self
            .config
            .wallet_path
            .clone()
            .context("no wallet configured (use --wallet or wallet_path)")?;
        let file = WalletFile::load(&path)?;
        let wallet = file.unlock(&self.password(false)?)?;
        self.wallet = Some(wallet);
        Ok(())
    }

    /// Sender for a signed command: the named account or the wallet default.
    fn signer_account(&self, wallet: &Wallet, named: Option<&str>) -> anyhow::Result<Account> {
        match named {
            Some(text) => self.account(text),
            None => wallet
                .default_account()
                .context("the wallet has no default account"),
        }
    }

    fn address(&self, account: &Account) -> String {
        account.to_address(self.config.network.address_version)
    }

    /// Run one command and return what should be printed.
    pub async fn run(&mut self, command: Command) -> anyhow::Result<String> {
        let node = self.node.as_ref();
        match command {
            Command::Resolve { name } => {
                ensure_domain_name(&name)?;
                let account = resolve_by_name(node, &self.config, &name).await?;
                Ok(format!("{} ({account})", self.address(&account)))
            }
            Command::BalanceOf { token, identifier } => {
                let token = self.account(&token)?;
                let balance = token::balance_of(node, &self.config, &token, &identifier).await?;
                Ok(balance.to_string())
            }
            Command::Name { token } => {
                let token = self.account(&token)?;
                Ok(format!("Result: {}", token::name(node, &token).await?))
            }
            Command::Decimals { token } => {
                let token = self.account(&token)?;
                Ok(format!("Result: {}", token::decimals(node, &self.config, &token).await?))
            }
            Command::TotalSupply { token } => {
                let token = self.account(&token)?;
                let supply = token::total_supply(node, &self.config, &token).await?;
                Ok(format!("Result: {supply}"))
            }
            Command::Register {
                name,
                account,
                signer,
            } => {
                ensure_domain_name(&name)?;
                let account = self.account(&account)?;
                self.ensure_wallet()?;
                let (ctx, wallet) = self.context()?;
                let signer = self.signer_account(wallet, signer.as_deref())?;
                if !register_by_name(&ctx, &name, account, signer).await {
                    bail!("failed to register {name}");
                }
                Ok(format!("Registered {name} -> {}", self.address(&account)))
            }
            Command::Unregister { name, signer } => {
                ensure_domain_name(&name)?;
                self.ensure_wallet()?;
                let (ctx, wallet) = self.context()?;
                let signer = self.signer_account(wallet, signer.as_deref())?;
                if !unregister_by_name(&ctx, &name, signer).await {
                    bail!("failed to unregister {name}");
                }
                Ok(format!("Unregistered {name}"))
            }
            Command::Transfer {
                token,
                to,
                amount,
                from,
                data,
                signers,
            } => {
                let token = self.account(&token)?;
                let from = from.as_deref().map(|f| self.account(f)).transpose()?;
                let cosigners = signers
                    .iter()
                    .map(|s| self.account(s))
                    .collect::<anyhow::Result<Vec<_>>>()?;
                self.ensure_wallet()?;
                let (ctx, _) = self.context()?;
                let request = TransferRequest {
                    token,
                    to,
                    amount,
                    from,
                    data,
                    cosigners,
                };
                match token::transfer(&ctx, request).await? {
                    PipelineOutcome::Relayed(hash) => Ok(format!("Relayed transaction {hash}")),
                    PipelineOutcome::Declined => Ok("Transaction not relayed".to_string()),
                }
            }
            Command::CreateWallet { label } => self.create_wallet(label),
            Command::Shell => bail!("the shell is already running"),
        }
    }

    fn context(&self) -> anyhow::Result<(ClientContext<'_>, &Wallet)> {
        let wallet = self.wallet.as_ref().context("wallet is not unlocked")?;
        let ctx = ClientContext {
            node: self.node.as_ref(),
            signer: wallet,
            prompt: self.prompt.as_ref(),
            config: &self.config,
        };
        Ok((ctx, wallet))
    }

    fn create_wallet(&mut self, label: Option<String>) -> anyhow::Result<String> {
        let path = self
            .config
            .wallet_path
            .clone()
            .context("no wallet path configured (use --wallet or wallet_path)")?;
        let mut file = if path.exists() {
            WalletFile::load(&path)?
        } else {
            WalletFile::new()
        };
        let password = self.password(file.accounts.is_empty())?;
        if !file.accounts.is_empty() {
            // Prove the password before adding a key encrypted under it.
            file.unlock(&password)?;
        }
        let account = file.add_account(&WitnessKey::generate(), &password, label, KdfParams::default())?;
        file.save(&path)?;
        self.wallet = None;
        Ok(format!("Created account {} ({account})", self.address(&account)))
    }
}
