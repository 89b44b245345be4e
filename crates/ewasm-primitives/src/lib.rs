//! # ewasm-primitives
//!
//! Primitive types shared by the ewasm opcode harness and its collaborators.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod error;
mod hash;
pub mod hex;

pub use address::Address;
pub use error::PrimitiveError;
pub use hash::{keccak256, H256};

/// Gas type
pub type Gas = u64;

/// Size of an EVM stack word in bytes
pub const WORD_SIZE: usize = 32;
