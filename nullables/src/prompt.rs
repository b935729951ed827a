//! Nullable prompt: scripted operator answers.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use dvita_wallet_core::{Prompt, WalletError};

#[derive(Default)]
struct State {
    answers: VecDeque<String>,
    asked: Vec<String>,
    secrets_asked: Vec<String>,
}

/// Answers prompts from a queue and records every question.
///
/// Line and password reads share the queue. An empty queue behaves like a closed
/// stdin: the read fails.
#[derive(Default)]
pub struct NullPrompt {
    state: Mutex<State>,
}

impl NullPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// A prompt that answers `answer` once.
    pub fn answering(answer: &str) -> Self {
        let prompt = Self::new();
        prompt.push_answer(answer);
        prompt
    }

    pub fn push_answer(&self, answer: &str) {
        self.state().answers.push_back(answer.to_string());
    }

    /// Every message shown so far, in order.
    pub fn asked(&self) -> Vec<String> {
        self.state().asked.clone()
    }

    /// Messages of password reads only, in order.
    pub fn secrets_asked(&self) -> Vec<String> {
        self.state().secrets_asked.clone()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Prompt for NullPrompt {
    fn read_line(&self, message: &str) -> Result<String, WalletError> {
        let mut state = self.state();
        state.asked.push(message.to_string());
        state
            .answers
            .pop_front()
            .ok_or_else(|| WalletError::Other("end of input".to_string()))
    }

    fn read_password(&self, message: &str) -> Result<String, WalletError> {
        let mut state = self.state();
        state.secrets_asked.push(message.to_string());
        state
            .answers
            .pop_front()
            .ok_or_else(|| WalletError::Other("end of input".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_in_order_then_fails() {
        let prompt = NullPrompt::answering("yes");
        prompt.push_answer("no");
        assert_eq!(prompt.read_line("first").unwrap(), "yes");
        assert_eq!(prompt.read_line("second").unwrap(), "no");
        assert!(prompt.read_line("third").is_err());
        assert_eq!(prompt.asked(), vec!["first", "second", "third"]);
    }

    #[test]
    fn passwords_come_from_the_same_queue() {
        let prompt = NullPrompt::answering("hunter2");
        prompt.push_answer("yes");
        assert_eq!(prompt.read_password("Wallet password").unwrap(), "hunter2");
        assert_eq!(prompt.read_line("Relay tx").unwrap(), "yes");
        assert_eq!(prompt.secrets_asked(), vec!["Wallet password"]);
        assert_eq!(prompt.asked(), vec!["Relay tx"]);
        assert!(prompt.read_password("again").is_err());
    }
}
