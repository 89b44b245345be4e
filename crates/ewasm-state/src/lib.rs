//! # ewasm-state
//!
//! Path-addressed state tree consumed by the ewasm kernel.
//!
//! This crate provides:
//! - The [`StateStore`] trait (`set`/`get` by path)
//! - [`Vertex`], an owned in-memory tree with content hashing

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod traits;
mod vertex;

pub use error::{StateError, StateResult};
pub use traits::{display_path, StateStore};
pub use vertex::Vertex;
