//! Terminal prompt.

use std::io::{BufRead, Write};

use dvita_wallet_core::{Prompt, WalletError};

/// Reads answers from stdin, and passwords from the terminal with echo off.
///
/// The message is printed as `message: `, or `message ` when it already ends
/// with `>`. End of input is an error, which confirmation treats as a decline.
pub struct StdinPrompt;

pub fn render(message: &str) -> String {
    if message.ends_with('>') {
        format!("{message} ")
    } else {
        format!("{message}: ")
    }
}

impl Prompt for StdinPrompt {
    fn read_line(&self, message: &str) -> Result<String, WalletError> {
        let mut stdout = std::io::stdout();
        stdout
            .write_all(render(message).as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(|e| WalletError::Other(format!("cannot write prompt: {e}")))?;

        let mut line = String::new();
        let read = std::io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| WalletError::Other(format!("cannot read input: {e}")))?;
        if read == 0 {
            return Err(WalletError::Other("end of input".to_string()));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn read_password(&self, message: &str) -> Result<String, WalletError> {
        rpassword::prompt_password(render(message))
            .map_err(|e| WalletError::Other(format!("cannot read password: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_appends_separator() {
        assert_eq!(render("Relay tx (no|yes)"), "Relay tx (no|yes): ");
        assert_eq!(render("dvita>"), "dvita> ");
    }
}
