//! Wallet core library for dVITA.
//!
//! Provides everything an operator client needs:
//! - Identifier classification (domain names, social handles, raw addresses)
//! - Name resolution, registration and unregistration through the naming service
//! - Asset descriptor lookup (decimals, symbol, manifest name)
//! - Least-privilege signer sets
//! - The fee-estimating, confirm-before-relay transaction pipeline
//! - Token balances and transfers, including the social-handle proxy ledger
//! - Encrypted wallet files and a JSON-RPC node client

pub mod asset;
pub mod classifier;
pub mod client;
pub mod config;
pub mod error;
pub mod keystore;
pub mod pipeline;
pub mod resolver;
pub mod services;
pub mod signers;
pub mod token;
pub mod wallet;

pub use asset::{describe, AssetDescriptor};
pub use classifier::{classify, is_domain_name, is_social_handle, IdentifierClass, RESOLUTION_ORDER};
pub use client::NodeClient;
pub use config::{ClientConfig, ContractIds, GAS_DECIMALS, GAS_FACTOR};
pub use error::WalletError;
pub use keystore::{KdfParams, WalletFile};
pub use pipeline::{execute, is_affirmative, FeeSummary, PipelineOutcome, Stage};
pub use resolver::{
    ensure_domain_name, register_by_name, resolve_account, resolve_by_name, resolve_target,
    unregister_by_name, Target,
};
pub use services::{
    ClientContext, ContractCall, InvocationService, LedgerNode, NodeSnapshot, Prompt,
    RelayService, SigningService,
};
pub use signers::build_signer_set;
pub use token::{TokenBalance, TransferRequest};
pub use wallet::Wallet;
