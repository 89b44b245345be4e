//! Compiler error types

use thiserror::Error;

/// Errors from resolving and assembling opcode modules
#[derive(Debug, Error)]
pub enum CompilerError {
    /// Function is not in the library
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// Function names an import the manifest does not declare
    #[error("function {function} uses undeclared import {import}")]
    UnknownImport {
        /// Function name
        function: String,
        /// Import name
        import: String,
    },

    /// Manifest lists a function without a body file
    #[error("missing body for {name}: {path}")]
    MissingBody {
        /// Function name
        name: String,
        /// Expected file
        path: String,
    },

    /// Module would export nothing
    #[error("module has no exports")]
    NoExports,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Manifest parsing error
    #[error("manifest error: {0}")]
    Json(#[from] serde_json::Error),

    /// Text to binary compilation failed
    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// Text to binary compilation failure
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("wat compile error: {0}")]
pub struct CompileError(pub String);

/// Result type for compiler operations
pub type CompilerResult<T> = Result<T, CompilerError>;
