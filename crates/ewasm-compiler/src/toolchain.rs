//! Text format toolchain

use crate::error::CompileError;
use crate::traits::Toolchain;
use async_trait::async_trait;

/// [`Toolchain`] backed by the `wat` crate
///
/// Parsing runs on tokio's blocking pool so large modules do not stall the
/// runtime thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct WatToolchain;

impl WatToolchain {
    /// Create a toolchain
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Toolchain for WatToolchain {
    async fn compile(&self, text: &str) -> Result<Vec<u8>, CompileError> {
        let text = text.to_owned();
        let binary = tokio::task::spawn_blocking(move || wat::parse_str(&text))
            .await
            .map_err(|e| CompileError(format!("compile task failed: {}", e)))?
            .map_err(|e| CompileError(e.to_string()))?;
        tracing::debug!(bytes = binary.len(), "module compiled");
        Ok(binary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_compile_valid() {
        let binary = WatToolchain::new().compile("(module (memory 1))").await.unwrap();
        assert!(binary.starts_with(b"\0asm"));
    }

    #[tokio::test]
    async fn test_compile_invalid() {
        let err = WatToolchain::new().compile("(modul").await.unwrap_err();
        assert!(err.to_string().starts_with("wat compile error"));
    }
}
