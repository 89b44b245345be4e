//! Compiler and toolchain interfaces

use crate::error::{CompileError, CompilerResult};
use async_trait::async_trait;
use std::collections::BTreeSet;

/// Resolves opcode implementations and assembles them into module text
pub trait OpcodeCompiler: Send + Sync {
    /// Function bodies and import declarations needed by `names`
    ///
    /// Dependencies are included transitively. Both lists are free of
    /// duplicates and come back in a deterministic order.
    fn resolve_functions(
        &self,
        names: &BTreeSet<String>,
    ) -> CompilerResult<(Vec<String>, Vec<String>)>;

    /// Assemble a module exporting `exports`
    fn build_module(
        &self,
        funcs: &[String],
        imports: &[String],
        exports: &[String],
    ) -> CompilerResult<String>;
}

/// Compiles module text to a binary
#[async_trait]
pub trait Toolchain: Send + Sync {
    /// Compile `text` into a wasm binary
    async fn compile(&self, text: &str) -> Result<Vec<u8>, CompileError>;
}
