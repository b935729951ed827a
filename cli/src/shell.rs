//! Line-oriented shell reusing the command dispatcher.

use clap::Parser;
use std::io::Write;
use tracing::debug;

use crate::commands::{Command, ShellLine};
use crate::session::Session;

pub const SHELL_PROMPT: &str = "dvita>";

/// Read commands until `exit`, `quit` or end of input.
///
/// A failing command prints its error and the shell keeps going.
pub async fn run_shell(session: &mut Session, out: &mut dyn Write) -> anyhow::Result<()> {
    loop {
        let Ok(line) = session.prompt().read_line(SHELL_PROMPT) else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit") {
            break;
        }

        let command = match ShellLine::try_parse_from(line.split_whitespace()) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                write!(out, "{e}")?;
                continue;
            }
        };
        if command == Command::Shell {
            writeln!(out, "already in the shell")?;
            continue;
        }
        debug!(?command, "shell command");
        match session.run(command).await {
            Ok(output) => writeln!(out, "{output}")?,
            Err(e) => writeln!(out, "error: {e:#}")?,
        }
    }
    Ok(())
}
