//! dVITA operator client.
//!
//! The binary parses [`Cli`], builds a [`Session`] around a JSON-RPC node client
//! and the terminal prompt, and runs one command or the interactive shell.

pub mod commands;
pub mod prompt;
pub mod session;
pub mod shell;

pub use commands::{Cli, Command, ShellLine};
pub use prompt::StdinPrompt;
pub use session::{Session, PASSWORD_ENV};
pub use shell::{run_shell, SHELL_PROMPT};
