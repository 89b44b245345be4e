//! Ethereum environment interface exposed to modules
//!
//! Two import modules are provided: `ethereum`, the contract-facing host
//! API, and `debug`, which only logs.

use crate::context::{BlockHeader, FakeBlockchain};
use crate::effects::{Effect, EffectSender};
use crate::error::{KernelError, KernelResult};
use anyhow::{anyhow, bail};
use bytes::Bytes;
use ewasm_primitives::{hex::encode_hex, Address};
use wasmtime::{Caller, Engine, Extern, Linker, Memory};

/// Import module of the contract-facing host API
pub const ETHEREUM_MODULE: &str = "ethereum";

/// Import module of the debug helpers
pub const DEBUG_MODULE: &str = "debug";

/// Per-store data visible to host functions
pub struct HostState {
    /// Address of the executing account
    pub address: Address,
    /// Sender of the message
    pub caller: Address,
    /// Call data of the message
    pub call_data: Bytes,
    /// Header of the current block
    pub block: BlockHeader,
    /// Chain history, if the state provides one
    pub blockchain: Option<FakeBlockchain>,
    /// Deferred effect queue
    pub effects: EffectSender,
}

fn memory(caller: &mut Caller<'_, HostState>) -> anyhow::Result<Memory> {
    caller
        .get_export("memory")
        .and_then(Extern::into_memory)
        .ok_or_else(|| anyhow!("module does not export memory"))
}

fn checked_range(
    caller: &mut Caller<'_, HostState>,
    offset: i32,
    len: usize,
) -> anyhow::Result<(Memory, usize)> {
    let memory = memory(caller)?;
    let start = offset as u32 as usize;
    let size = memory.data_size(&*caller);
    if start.saturating_add(len) > size {
        bail!("{} bytes at {} exceed memory size {}", len, start, size);
    }
    Ok((memory, start))
}

fn write(caller: &mut Caller<'_, HostState>, offset: i32, bytes: &[u8]) -> anyhow::Result<()> {
    let (memory, start) = checked_range(caller, offset, bytes.len())?;
    memory.write(&mut *caller, start, bytes)?;
    Ok(())
}

fn read(caller: &mut Caller<'_, HostState>, offset: i32, len: i32) -> anyhow::Result<Vec<u8>> {
    let len = len as u32 as usize;
    let (memory, start) = checked_range(caller, offset, len)?;
    let mut buf = vec![0u8; len];
    memory.read(&*caller, start, &mut buf)?;
    Ok(buf)
}

/// Build a linker with both import modules registered
pub fn linker(engine: &Engine) -> KernelResult<Linker<HostState>> {
    let mut linker = Linker::new(engine);
    register_ethereum(&mut linker).map_err(|e| KernelError::Link(format!("{:#}", e)))?;
    register_debug(&mut linker).map_err(|e| KernelError::Link(format!("{:#}", e)))?;
    Ok(linker)
}

fn register_ethereum(linker: &mut Linker<HostState>) -> anyhow::Result<()> {
    linker.func_wrap(
        ETHEREUM_MODULE,
        "useGas",
        |caller: Caller<'_, HostState>, amount: i64| -> anyhow::Result<()> {
            if amount < 0 {
                bail!("useGas called with negative amount {}", amount);
            }
            caller.data().effects.push(Effect::UseGas(amount as u64))
        },
    )?;

    linker.func_wrap(
        ETHEREUM_MODULE,
        "getAddress",
        |mut caller: Caller<'_, HostState>, result_offset: i32| -> anyhow::Result<()> {
            let address = caller.data().address;
            write(&mut caller, result_offset, address.as_bytes())
        },
    )?;

    linker.func_wrap(
        ETHEREUM_MODULE,
        "getCaller",
        |mut caller: Caller<'_, HostState>, result_offset: i32| -> anyhow::Result<()> {
            let sender = caller.data().caller;
            write(&mut caller, result_offset, sender.as_bytes())
        },
    )?;

    linker.func_wrap(
        ETHEREUM_MODULE,
        "getBlockCoinbase",
        |mut caller: Caller<'_, HostState>, result_offset: i32| -> anyhow::Result<()> {
            let coinbase = caller.data().block.coinbase;
            write(&mut caller, result_offset, coinbase.as_bytes())
        },
    )?;

    linker.func_wrap(
        ETHEREUM_MODULE,
        "getCallDataSize",
        |caller: Caller<'_, HostState>| -> i32 { caller.data().call_data.len() as i32 },
    )?;

    linker.func_wrap(
        ETHEREUM_MODULE,
        "callDataCopy",
        |mut caller: Caller<'_, HostState>,
         result_offset: i32,
         data_offset: i32,
         length: i32|
         -> anyhow::Result<()> {
            let data = caller.data().call_data.clone();
            let length = length as u32 as usize;
            let start = (data_offset as u32 as usize).min(data.len());
            let end = start.saturating_add(length).min(data.len());
            // bytes past the end of call data read as zero
            let mut chunk = vec![0u8; length];
            chunk[..end - start].copy_from_slice(&data[start..end]);
            write(&mut caller, result_offset, &chunk)
        },
    )?;

    linker.func_wrap(
        ETHEREUM_MODULE,
        "getBlockNumber",
        |caller: Caller<'_, HostState>| -> i64 { caller.data().block.number as i64 },
    )?;

    linker.func_wrap(
        ETHEREUM_MODULE,
        "getBlockHash",
        |mut caller: Caller<'_, HostState>,
         number: i64,
         result_offset: i32|
         -> anyhow::Result<i32> {
            let hash = caller
                .data()
                .blockchain
                .as_ref()
                .map(|chain| chain.block_hash(number as u64));
            match hash {
                Some(hash) => {
                    write(&mut caller, result_offset, &hash)?;
                    Ok(0)
                }
                None => Ok(1),
            }
        },
    )?;

    linker.func_wrap(
        ETHEREUM_MODULE,
        "return",
        |mut caller: Caller<'_, HostState>, data_offset: i32, length: i32| -> anyhow::Result<()> {
            let payload = read(&mut caller, data_offset, length)?;
            caller.data().effects.push(Effect::Return(payload))
        },
    )?;

    linker.func_wrap(
        ETHEREUM_MODULE,
        "revert",
        |mut caller: Caller<'_, HostState>, data_offset: i32, length: i32| -> anyhow::Result<()> {
            let payload = read(&mut caller, data_offset, length)?;
            caller.data().effects.push(Effect::Revert(payload))
        },
    )?;

    Ok(())
}

fn register_debug(linker: &mut Linker<HostState>) -> anyhow::Result<()> {
    linker.func_wrap(DEBUG_MODULE, "print", |value: i32| {
        tracing::debug!(target: "ewasm::debug", value, "print");
    })?;

    linker.func_wrap(
        DEBUG_MODULE,
        "printMem",
        |mut caller: Caller<'_, HostState>, offset: i32, length: i32| -> anyhow::Result<()> {
            let bytes = read(&mut caller, offset, length)?;
            let bytes = encode_hex(&bytes);
            tracing::debug!(target: "ewasm::debug", offset, %bytes, "printMem");
            Ok(())
        },
    )?;

    Ok(())
}
