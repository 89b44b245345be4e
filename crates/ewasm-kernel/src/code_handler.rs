//! Code handlers select how a piece of contract code is run

use crate::error::{KernelError, KernelResult};
use wasmtime::{Engine, Module};

/// Magic header every wasm binary starts with
pub const WASM_MAGIC: [u8; 4] = *b"\0asm";

/// Turns contract code into a runnable module
pub trait CodeHandler: Send + Sync {
    /// Short name of the code kind this handler accepts
    fn kind(&self) -> &'static str;

    /// Compile `code`, rejecting anything this handler does not understand
    fn init(&self, code: &[u8]) -> KernelResult<Module>;
}

/// Handler for wasm binaries
#[derive(Clone, Default)]
pub struct WasmCodeHandler {
    engine: Engine,
}

impl WasmCodeHandler {
    /// Create a handler with a default engine
    pub fn new() -> Self {
        Self::default()
    }
}

impl CodeHandler for WasmCodeHandler {
    fn kind(&self) -> &'static str {
        "wasm"
    }

    fn init(&self, code: &[u8]) -> KernelResult<Module> {
        if !code.starts_with(&WASM_MAGIC) {
            return Err(KernelError::UnsupportedCode);
        }
        Module::from_binary(&self.engine, code)
            .map_err(|e| KernelError::Compile(format!("{:#}", e)))
    }
}
