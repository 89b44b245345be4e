//! Host VM interfaces
//!
//! The harness only talks to a VM through these traits, so tests can swap in
//! a scripted VM without compiling any wasm.

use crate::context::Message;
use crate::error::KernelResult;
use async_trait::async_trait;
use ewasm_primitives::{Address, Gas};
use ewasm_state::Vertex;

/// Live, directly addressable module instance
pub trait ModuleInstance: Send {
    /// Whether the module exports a function called `name`
    fn has_export(&mut self, name: &str) -> bool;

    /// Call exported function `name`
    ///
    /// Arguments are converted to the export's declared `i32`/`i64` parameter
    /// types. Returns the first result, if the function has one.
    fn call(&mut self, name: &str, params: &[i64]) -> KernelResult<Option<i64>>;

    /// Copy `bytes` into linear memory at `offset`
    fn write_memory(&mut self, offset: usize, bytes: &[u8]) -> KernelResult<()>;

    /// Read `len` bytes of linear memory starting at `offset`
    fn read_memory(&self, offset: usize, len: usize) -> KernelResult<Vec<u8>>;
}

/// A VM bound to one contract account
#[async_trait]
pub trait HostVm: Send {
    /// Instantiate the code and dispatch `message` to it
    async fn receive(&mut self, message: Message) -> KernelResult<()>;

    /// Module instance created by the last `receive`
    fn instance(&mut self) -> KernelResult<&mut dyn ModuleInstance>;

    /// Resolve once every deferred effect of the dispatch has been applied
    async fn on_done(&mut self) -> KernelResult<()>;

    /// Staged return payload
    fn return_value(&self) -> Option<&[u8]>;

    /// Gas remaining from the message budget
    fn gas_left(&self) -> Gas;
}

/// Everything a VM needs before it can receive a message
#[derive(Debug, Clone)]
pub struct KernelConfig {
    /// Contract code
    pub code: Vec<u8>,
    /// State root holding `block`, `blockchain` and `accounts/<address>`
    pub state: Vertex,
    /// Executing account
    pub account: Address,
}

/// Builds VMs for the harness
pub trait VmFactory: Send + Sync {
    /// Create a VM for `config.code` running as `config.account` inside `config.state`
    fn create(&self, config: KernelConfig) -> KernelResult<Box<dyn HostVm>>;
}
