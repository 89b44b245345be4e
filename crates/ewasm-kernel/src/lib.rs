//! # ewasm-kernel
//!
//! Host VM for contract code compiled to WebAssembly.
//!
//! This crate provides:
//! - Code handlers that validate and compile wasm binaries
//! - The `ethereum` and `debug` import modules
//! - A [`Kernel`] bound to one account, with deferred gas and return data
//! - The [`HostVm`]/[`VmFactory`] seams used by test harnesses

#![warn(missing_docs)]
#![warn(clippy::all)]

mod code_handler;
mod context;
mod eei;
mod effects;
mod error;
mod instance;
mod kernel;
mod traits;

pub use code_handler::{CodeHandler, WasmCodeHandler, WASM_MAGIC};
pub use context::{
    Block, BlockHeader, FakeBlockchain, Message, ACCOUNTS_PATH, BLOCKCHAIN_PATH, BLOCK_PATH,
};
pub use eei::{HostState, DEBUG_MODULE, ETHEREUM_MODULE};
pub use effects::{Effect, EffectQueue, EffectSender};
pub use error::{KernelError, KernelResult};
pub use instance::WasmInstance;
pub use kernel::{Kernel, KernelFactory, Responses};
pub use traits::{HostVm, KernelConfig, ModuleInstance, VmFactory};
