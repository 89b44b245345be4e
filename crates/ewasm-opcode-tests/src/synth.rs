//! Module synthesis around a single opcode

use crate::error::TestResult;
use ewasm_compiler::{OpcodeCompiler, Toolchain};
use std::collections::BTreeSet;

/// Exported setter for the shared stack pointer global
pub const SET_SP: &str =
    r#"(func $setSP (export "setSP") (param i32) (global.set $sp (local.get 0)))"#;

/// Gas metering import every synthesized module carries
pub const USE_GAS_IMPORT: &str = r#"(import "ethereum" "useGas" (func $useGas (param i64)))"#;

/// Builds a linkable binary exporting one opcode
pub struct ModuleSynthesizer<C, T> {
    compiler: C,
    toolchain: T,
}

impl<C: OpcodeCompiler, T: Toolchain> ModuleSynthesizer<C, T> {
    /// Create a synthesizer
    pub fn new(compiler: C, toolchain: T) -> Self {
        Self { compiler, toolchain }
    }

    /// Module text exporting `op`, `setSP` and `memory`
    pub fn module_text(&self, op: &str) -> TestResult<String> {
        let names = BTreeSet::from([op.to_string()]);
        let (mut funcs, mut imports) = self.compiler.resolve_functions(&names)?;
        funcs.push(SET_SP.to_string());
        imports.push(USE_GAS_IMPORT.to_string());
        Ok(self.compiler.build_module(&funcs, &imports, &[op.to_string()])?)
    }

    /// Compile the module for `op`
    pub async fn synthesize(&self, op: &str) -> TestResult<Vec<u8>> {
        let text = self.module_text(op)?;
        let binary = self.toolchain.compile(&text).await?;
        tracing::debug!(op, bytes = binary.len(), "module synthesized");
        Ok(binary)
    }
}
