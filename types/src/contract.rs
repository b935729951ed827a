//! Contract call arguments, VM stack values and invocation outcomes.

use serde::{Deserialize, Serialize};

use crate::account::Account;

/// A typed argument passed to a contract operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractArg {
    /// The null value.
    Any,
    Boolean(bool),
    Integer(i128),
    Hash160(Account),
    ByteArray(Vec<u8>),
    String(String),
}

impl From<Account> for ContractArg {
    fn from(account: Account) -> Self {
        Self::Hash160(account)
    }
}

impl From<&str> for ContractArg {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<Option<String>> for ContractArg {
    fn from(s: Option<String>) -> Self {
        s.map_or(Self::Any, Self::String)
    }
}

/// Terminal state of a VM execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VmState {
    /// Ran to completion.
    Halt,
    /// Aborted (exception, out of gas, assertion).
    Fault,
}

/// A value left on the VM result stack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackValue {
    Null,
    Boolean(bool),
    Integer(i128),
    ByteString(Vec<u8>),
    Array(Vec<StackValue>),
}

impl StackValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Integer view of a primitive value. Byte strings are read as
    /// little-endian two's complement, which is how the VM converts them.
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::Boolean(b) => Some(i128::from(*b)),
            Self::ByteString(bytes) if bytes.is_empty() => Some(0),
            Self::ByteString(bytes) if bytes.len() <= 16 => {
                let fill = if bytes[bytes.len() - 1] & 0x80 != 0 { 0xFF } else { 0x00 };
                let mut buf = [fill; 16];
                buf[..bytes.len()].copy_from_slice(bytes);
                Some(i128::from_le_bytes(buf))
            }
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::ByteString(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// UTF-8 view of a byte string.
    pub fn as_string(&self) -> Option<String> {
        self.as_bytes()
            .and_then(|b| String::from_utf8(b.to_vec()).ok())
    }
}

/// Result of executing a script against the node's current snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationOutcome {
    pub state: VmState,
    /// Gas consumed, in the fee token's smallest unit.
    pub gas_consumed: u64,
    /// Result stack, bottom first.
    pub stack: Vec<StackValue>,
    /// Fault reason reported by the node, if any.
    pub exception: Option<String>,
}

impl InvocationOutcome {
    pub fn halt(gas_consumed: u64, stack: Vec<StackValue>) -> Self {
        Self {
            state: VmState::Halt,
            gas_consumed,
            stack,
            exception: None,
        }
    }

    pub fn fault(exception: impl Into<String>) -> Self {
        Self {
            state: VmState::Fault,
            gas_consumed: 0,
            stack: Vec::new(),
            exception: Some(exception.into()),
        }
    }

    pub fn is_fault(&self) -> bool {
        self.state == VmState::Fault
    }

    /// Top of the result stack, or `None` on fault or empty stack.
    pub fn result(&self) -> Option<&StackValue> {
        if self.is_fault() {
            return None;
        }
        self.stack.last()
    }

    /// Halted with a non-null result.
    pub fn success(&self) -> bool {
        self.result().is_some_and(|v| !v.is_null())
    }
}
