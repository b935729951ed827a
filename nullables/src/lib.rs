//! Nullable infrastructure for deterministic testing.
//!
//! The node and the operator are abstracted behind the wallet core's capability
//! traits. This crate provides test-friendly implementations that:
//! - Return scripted values
//! - Record what was asked of them
//! - Never touch the network or stdin
//!
//! Usage: pass them where the JSON-RPC client and the terminal prompt would go.

pub mod node;
pub mod prompt;

pub use node::{NullNode, RecordedInvocation, DEFAULT_GAS_PER_CALL, DEFAULT_NETWORK_FEE};
pub use prompt::NullPrompt;
