//! Error types for opcode tests

use ewasm_compiler::{CompileError, CompilerError};
use ewasm_kernel::KernelError;
use ewasm_primitives::PrimitiveError;
use ewasm_state::StateError;
use std::path::PathBuf;
use thiserror::Error;

/// Test error type
#[derive(Error, Debug)]
pub enum TestError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Hex decoding error
    #[error("Hex error: {0}")]
    Hex(String),

    /// Test directory does not exist
    #[error("Test directory not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Module or context could not be set up
    #[error("Setup failed: {0}")]
    Compile(String),

    /// Module trapped or the VM rejected a step
    #[error("WASM exception: {0}")]
    Execution(String),

    /// Hex value does not fit its slot
    #[error("Value too large: {actual} bytes, at most {max} allowed")]
    ValueTooLarge {
        /// Decoded length
        actual: usize,
        /// Slot size
        max: usize,
    },
}

impl From<PrimitiveError> for TestError {
    fn from(e: PrimitiveError) -> Self {
        TestError::Hex(e.to_string())
    }
}

impl From<CompilerError> for TestError {
    fn from(e: CompilerError) -> Self {
        TestError::Compile(e.to_string())
    }
}

impl From<CompileError> for TestError {
    fn from(e: CompileError) -> Self {
        TestError::Compile(e.to_string())
    }
}

impl From<StateError> for TestError {
    fn from(e: StateError) -> Self {
        TestError::Compile(format!("state: {}", e))
    }
}

impl From<KernelError> for TestError {
    fn from(e: KernelError) -> Self {
        TestError::Execution(e.to_string())
    }
}

/// Test result type
pub type TestResult<T> = Result<T, TestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_message() {
        let err: TestError = KernelError::Trap("unreachable".into()).into();
        assert_eq!(err.to_string(), "WASM exception: trap: unreachable");
    }

    #[test]
    fn test_compile_conversions() {
        let err: TestError = CompilerError::UnknownFunction("FOO".into()).into();
        assert!(matches!(err, TestError::Compile(ref m) if m.contains("FOO")));

        let err: TestError = CompileError("bad token".into()).into();
        assert!(matches!(err, TestError::Compile(_)));
    }

    #[test]
    fn test_hex_conversion() {
        let err: TestError = PrimitiveError::InvalidHex("zz".into()).into();
        assert!(matches!(err, TestError::Hex(_)));
    }
}
