//! Decoding of scripts emitted by [`ScriptBuilder`](crate::ScriptBuilder).
//!
//! Only the instruction subset the builder produces is understood: pushes,
//! `PACK`, `NEWARRAY0` and `SYSCALL System.Contract.Call`. Anything else is an error.

use dvita_types::{Account, ContractArg};

use crate::error::TransactionError;
use crate::script::Script;

/// One contract call recovered from a script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedCall {
    pub contract: Account,
    pub method: String,
    /// Arguments as raw pushes. Hash160 and strings both come back as byte arrays.
    pub args: Vec<ContractArg>,
}

#[derive(Debug)]
enum Item {
    Arg(ContractArg),
    Array(Vec<ContractArg>),
}

pub fn decode_calls(script: &Script) -> Result<Vec<DecodedCall>, TransactionError> {
    let bytes = script.as_bytes();
    let contract_call = dvita_crypto::interop_id("System.Contract.Call");
    let malformed = |reason: &str| TransactionError::Serialization(format!("script: {reason}"));

    let mut stack: Vec<Item> = Vec::new();
    let mut calls = Vec::new();
    let mut pc = 0usize;

    while pc < bytes.len() {
        let op = bytes[pc];
        pc += 1;
        match op {
            0x00..=0x04 => {
                let width = 1usize << op;
                let raw = take(bytes, &mut pc, width)?;
                let fill = if raw[width - 1] & 0x80 != 0 { 0xFF } else { 0x00 };
                let mut buf = [fill; 16];
                buf[..width].copy_from_slice(raw);
                stack.push(Item::Arg(ContractArg::Integer(i128::from_le_bytes(buf))));
            }
            0x08 => stack.push(Item::Arg(ContractArg::Boolean(true))),
            0x09 => stack.push(Item::Arg(ContractArg::Boolean(false))),
            0x0B => stack.push(Item::Arg(ContractArg::Any)),
            0x0C..=0x0E => {
                let prefix = 1usize << (op - 0x0C);
                let len_bytes = take(bytes, &mut pc, prefix)?;
                let mut len_buf = [0u8; 4];
                len_buf[..prefix].copy_from_slice(len_bytes);
                let len = u32::from_le_bytes(len_buf) as usize;
                let data = take(bytes, &mut pc, len)?.to_vec();
                stack.push(Item::Arg(ContractArg::ByteArray(data)));
            }
            0x0F..=0x20 => {
                stack.push(Item::Arg(ContractArg::Integer(i128::from(op) - 0x10)));
            }
            0xC2 => stack.push(Item::Array(Vec::new())),
            0xC0 => {
                let count = match stack.pop() {
                    Some(Item::Arg(ContractArg::Integer(n))) if n >= 0 => n as usize,
                    _ => return Err(malformed("PACK without a count")),
                };
                if count > stack.len() {
                    return Err(malformed("PACK count exceeds stack"));
                }
                let mut items = Vec::with_capacity(count);
                for _ in 0..count {
                    match stack.pop() {
                        Some(Item::Arg(arg)) => items.push(arg),
                        _ => return Err(malformed("nested arrays are not supported")),
                    }
                }
                stack.push(Item::Array(items));
            }
            0x41 => {
                if take(bytes, &mut pc, 4)? != &contract_call[..] {
                    return Err(malformed("unsupported syscall"));
                }
                let contract = match stack.pop() {
                    Some(Item::Arg(ContractArg::ByteArray(b))) => Account::from_slice(&b)
                        .map_err(|e| TransactionError::Serialization(e.to_string()))?,
                    _ => return Err(malformed("missing contract id")),
                };
                let method = match stack.pop() {
                    Some(Item::Arg(ContractArg::ByteArray(b))) => String::from_utf8(b)
                        .map_err(|_| malformed("method name is not UTF-8"))?,
                    _ => return Err(malformed("missing method name")),
                };
                match stack.pop() {
                    Some(Item::Arg(ContractArg::Integer(_))) => {}
                    _ => return Err(malformed("missing call flags")),
                }
                let args = match stack.pop() {
                    Some(Item::Array(args)) => args,
                    _ => return Err(malformed("missing argument array")),
                };
                calls.push(DecodedCall {
                    contract,
                    method,
                    args,
                });
            }
            other => return Err(malformed(&format!("unsupported opcode 0x{other:02x}"))),
        }
    }
    Ok(calls)
}

fn take<'a>(bytes: &'a [u8], pc: &mut usize, n: usize) -> Result<&'a [u8], TransactionError> {
    let end = pc
        .checked_add(n)
        .filter(|&e| e <= bytes.len())
        .ok_or_else(|| TransactionError::Serialization("script: truncated instruction".into()))?;
    let slice = &bytes[*pc..end];
    *pc = end;
    Ok(slice)
}
