//! # ewasm-compiler
//!
//! Turns opcode names into linkable wasm modules.
//!
//! This crate provides:
//! - [`OpcodeCompiler`], resolving opcode bodies and assembling module text
//! - [`OpcodeLibrary`], a compiler backed by a directory of `.wast` bodies
//! - [`Toolchain`] and [`WatToolchain`], text to binary compilation

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod library;
mod module;
mod toolchain;
mod traits;

pub use error::{CompileError, CompilerError, CompilerResult};
pub use library::{FunctionEntry, Manifest, OpcodeLibrary, MANIFEST_FILE};
pub use module::{build_module, DEFAULT_MEMORY_PAGES};
pub use toolchain::WatToolchain;
pub use traits::{OpcodeCompiler, Toolchain};
