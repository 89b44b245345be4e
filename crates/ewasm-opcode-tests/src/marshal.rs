//! Byte marshaling between test words and linear memory
//!
//! Test files write values most significant byte first. Linear memory holds
//! them in the opposite order, so every write and every read reverses.

use crate::error::{TestError, TestResult};
use ewasm_kernel::ModuleInstance;
use ewasm_primitives::hex::decode_hex;

/// Decode `hex` and left-pad it with zeros to `len` bytes
pub fn to_word(hex: &str, len: usize) -> TestResult<Vec<u8>> {
    let bytes = decode_hex(hex)?;
    if bytes.len() > len {
        return Err(TestError::ValueTooLarge {
            actual: bytes.len(),
            max: len,
        });
    }
    let mut word = vec![0u8; len - bytes.len()];
    word.extend_from_slice(&bytes);
    Ok(word)
}

/// Decode `hex` exactly, without padding
pub fn to_bytes(hex: &str) -> TestResult<Vec<u8>> {
    Ok(decode_hex(hex)?)
}

/// Reverse `bytes` into linear memory order
pub fn to_memory_order(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().rev().copied().collect()
}

/// Write `bytes` at `offset` in linear memory order
pub fn write_word(
    instance: &mut dyn ModuleInstance,
    offset: usize,
    bytes: &[u8],
) -> TestResult<()> {
    instance.write_memory(offset, &to_memory_order(bytes))?;
    Ok(())
}

/// Read `len` bytes at `offset` back into test order
pub fn read_word(instance: &dyn ModuleInstance, offset: usize, len: usize) -> TestResult<Vec<u8>> {
    let mut bytes = instance.read_memory(offset, len)?;
    bytes.reverse();
    Ok(bytes)
}
