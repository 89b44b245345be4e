//! Kernel error types

use ewasm_primitives::Gas;
use ewasm_state::StateError;
use thiserror::Error;

/// Kernel errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// Code is not something a registered handler can run
    #[error("unsupported code: missing wasm magic header")]
    UnsupportedCode,

    /// Binary failed to compile
    #[error("compile error: {0}")]
    Compile(String),

    /// Host functions could not be registered
    #[error("link error: {0}")]
    Link(String),

    /// Instantiation failed
    #[error("instantiation failed: {0}")]
    Instantiate(String),

    /// Module trapped
    #[error("trap: {0}")]
    Trap(String),

    /// Export is missing
    #[error("missing export: {0}")]
    MissingExport(String),

    /// Wrong number of call arguments
    #[error("export {export} expects {expected} params, got {actual}")]
    ParamCount {
        /// Export name
        export: String,
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        actual: usize,
    },

    /// Parameter type the harness cannot pass
    #[error("export {export} has unsupported param type {ty}")]
    UnsupportedParam {
        /// Export name
        export: String,
        /// Rendered wasm type
        ty: String,
    },

    /// Argument does not fit the declared parameter type
    #[error("export {export} takes an i32, {value} is out of range")]
    ParamOutOfRange {
        /// Export name
        export: String,
        /// Supplied argument
        value: i64,
    },

    /// Access outside linear memory
    #[error("memory access out of bounds: {len} bytes at {offset} (size {size})")]
    MemoryOutOfBounds {
        /// Start offset
        offset: usize,
        /// Access length
        len: usize,
        /// Memory size in bytes
        size: usize,
    },

    /// No message has been received yet
    #[error("no module instance: receive a message first")]
    NotInstantiated,

    /// Gas charges exceeded the budget
    #[error("out of gas: requested {requested}, {left} left")]
    OutOfGas {
        /// Amount charged
        requested: Gas,
        /// Amount remaining before the charge
        left: Gas,
    },

    /// State error
    #[error("state error: {0}")]
    State(#[from] StateError),
}

/// Result type for kernel operations
pub type KernelResult<T> = Result<T, KernelError>;
