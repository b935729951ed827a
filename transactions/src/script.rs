//! Invocation script emission.
//!
//! Scripts are VM bytecode. The client only ever emits dynamic contract calls:
//! arguments are pushed in reverse and packed into an array, followed by the call
//! flags, the method name and the contract id, then `SYSCALL System.Contract.Call`.

use dvita_types::{Account, ContractArg};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TransactionError;

mod opcode {
    pub const PUSHINT8: u8 = 0x00;
    pub const PUSHT: u8 = 0x08;
    pub const PUSHF: u8 = 0x09;
    pub const PUSHNULL: u8 = 0x0B;
    pub const PUSHDATA1: u8 = 0x0C;
    pub const PUSHDATA2: u8 = 0x0D;
    pub const PUSHDATA4: u8 = 0x0E;
    pub const PUSHM1: u8 = 0x0F;
    pub const PUSH0: u8 = 0x10;
    pub const SYSCALL: u8 = 0x41;
    pub const PACK: u8 = 0xC0;
    pub const NEWARRAY0: u8 = 0xC2;
}

/// Permissions granted to the callee of a contract call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallFlags(u8);

impl CallFlags {
    pub const NONE: Self = Self(0x00);
    pub const READ_STATES: Self = Self(0x01);
    pub const WRITE_STATES: Self = Self(0x02);
    pub const ALLOW_CALL: Self = Self(0x04);
    pub const ALLOW_NOTIFY: Self = Self(0x08);
    pub const ALL: Self = Self(0x0F);

    pub fn bits(&self) -> u8 {
        self.0
    }
}

/// Opaque VM bytecode.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Script(Vec<u8>);

impl Script {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({} bytes)", self.0.len())
    }
}

/// Incrementally emits a script.
#[derive(Debug, Default)]
pub struct ScriptBuilder {
    buf: Vec<u8>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, op: u8) -> &mut Self {
        self.buf.push(op);
        self
    }

    /// Push an integer using the shortest encoding.
    pub fn emit_push_int(&mut self, value: i128) -> &mut Self {
        if (-1..=16).contains(&value) {
            let op = if value == -1 {
                opcode::PUSHM1
            } else {
                opcode::PUSH0 + value as u8
            };
            return self.emit(op);
        }
        // PUSHINT8..PUSHINT128 take 1, 2, 4, 8 and 16 bytes.
        let (op_offset, width) = [(0u8, 1usize), (1, 2), (2, 4), (3, 8), (4, 16)]
            .into_iter()
            .find(|&(_, width)| fits_signed(value, width))
            .unwrap_or((4, 16));
        self.buf.push(opcode::PUSHINT8 + op_offset);
        self.buf.extend_from_slice(&value.to_le_bytes()[..width]);
        self
    }

    pub fn emit_push_bool(&mut self, value: bool) -> &mut Self {
        self.emit(if value { opcode::PUSHT } else { opcode::PUSHF })
    }

    pub fn emit_push_bytes(&mut self, data: &[u8]) -> Result<&mut Self, TransactionError> {
        let len = data.len();
        if len <= u8::MAX as usize {
            self.buf.push(opcode::PUSHDATA1);
            self.buf.push(len as u8);
        } else if len <= u16::MAX as usize {
            self.buf.push(opcode::PUSHDATA2);
            self.buf.extend_from_slice(&(len as u16).to_le_bytes());
        } else if len <= u32::MAX as usize {
            self.buf.push(opcode::PUSHDATA4);
            self.buf.extend_from_slice(&(len as u32).to_le_bytes());
        } else {
            return Err(TransactionError::DataTooLarge(len));
        }
        self.buf.extend_from_slice(data);
        Ok(self)
    }

    pub fn emit_push_arg(&mut self, arg: &ContractArg) -> Result<&mut Self, TransactionError> {
        match arg {
            ContractArg::Any => Ok(self.emit(opcode::PUSHNULL)),
            ContractArg::Boolean(b) => Ok(self.emit_push_bool(*b)),
            ContractArg::Integer(v) => Ok(self.emit_push_int(*v)),
            ContractArg::Hash160(account) => self.emit_push_bytes(account.as_bytes()),
            ContractArg::ByteArray(bytes) => self.emit_push_bytes(bytes),
            ContractArg::String(s) => self.emit_push_bytes(s.as_bytes()),
        }
    }

    pub fn emit_syscall(&mut self, name: &str) -> &mut Self {
        self.buf.push(opcode::SYSCALL);
        self.buf.extend_from_slice(&dvita_crypto::interop_id(name));
        self
    }

    /// Emit a call of `method` on `contract` with full call flags.
    pub fn emit_dynamic_call(
        &mut self,
        contract: &Account,
        method: &str,
        args: &[ContractArg],
    ) -> Result<&mut Self, TransactionError> {
        if args.is_empty() {
            self.emit(opcode::NEWARRAY0);
        } else {
            for arg in args.iter().rev() {
                self.emit_push_arg(arg)?;
            }
            self.emit_push_int(args.len() as i128);
            self.emit(opcode::PACK);
        }
        self.emit_push_int(i128::from(CallFlags::ALL.bits()));
        self.emit_push_bytes(method.as_bytes())?;
        self.emit_push_bytes(contract.as_bytes())?;
        Ok(self.emit_syscall("System.Contract.Call"))
    }

    pub fn build(self) -> Script {
        Script(self.buf)
    }
}

fn fits_signed(value: i128, width: usize) -> bool {
    if width >= 16 {
        return true;
    }
    let bits = (width * 8) as u32;
    let min = -(1i128 << (bits - 1));
    let max = (1i128 << (bits - 1)) - 1;
    (min..=max).contains(&value)
}

/// Convenience for the common single-call script.
pub fn dynamic_call(
    contract: &Account,
    method: &str,
    args: &[ContractArg],
) -> Result<Script, TransactionError> {
    let mut builder = ScriptBuilder::new();
    builder.emit_dynamic_call(contract, method, args)?;
    Ok(builder.build())
}
