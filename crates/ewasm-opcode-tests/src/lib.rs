//! # ewasm-opcode-tests
//!
//! Conformance harness for EVM opcodes transcompiled to WebAssembly.
//!
//! This crate provides:
//! - JSON parsing for opcode test definitions
//! - Module synthesis around a single opcode implementation
//! - An execution driver priming and running the module in a host VM
//! - Stack, memory, return value and gas assertions
//! - Suite discovery, statistics and reporting
//!
//! ## Test Format
//!
//! Each file under the test directory is a JSON array of cases:
//!
//! ```json
//! [{
//!   "op": "ADD",
//!   "description": "1 + 2",
//!   "environment": {},
//!   "in": { "stack": ["0x01", "0x02"] },
//!   "out": { "stack": ["0x03"], "gasUsed": 3 }
//! }]
//! ```
//!
//! Stack word `i` lives at linear memory address `i * 32` in reversed byte
//! order. Memory offsets are relative to [`EVM_MEMORY_OFFSET`].

#![warn(missing_docs)]
#![warn(clippy::all)]

mod assertions;
mod config;
mod context;
mod driver;
mod error;
#[cfg(test)]
mod fakes;
mod loader;
pub mod marshal;
mod runner;
mod synth;
mod types;

pub use assertions::{AssertionEngine, Failure, Field, Observation};
pub use config::{HarnessConfig, DEFAULT_GAS_BUDGET, EVM_MEMORY_OFFSET};
pub use context::{ContextBuilder, ExecutionContext};
pub use driver::{initial_stack_pointer, Execution, ExecutionDriver, PreparedInput};
pub use error::{TestError, TestResult};
pub use loader::SuiteLoader;
pub use runner::{FileResults, TestRunner, TestStats};
pub use synth::{ModuleSynthesizer, SET_SP, USE_GAS_IMPORT};
pub use types::*;
