//! dVITA operator client entry point.

use clap::Parser;
use std::sync::Arc;

use dvita_cli::{run_shell, Cli, Command, Session, StdinPrompt};
use dvita_utils::{init_logging, LogFormat};
use dvita_wallet_core::NodeClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.client_config()?;

    let format: LogFormat = config.log_format.parse()?;
    init_logging(format, &config.log_level)?;

    let node = NodeClient::new(&config)?;
    tracing::info!(node = %node.node_url(), "dvita client starting");
    let mut session = Session::new(config, Arc::new(node), Arc::new(StdinPrompt));

    match cli.command {
        Command::Shell => run_shell(&mut session, &mut std::io::stdout()).await,
        command => {
            let output = session.run(command).await?;
            println!("{output}");
            Ok(())
        }
    }
}
