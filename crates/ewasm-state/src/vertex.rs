//! In-memory state tree

use crate::error::{StateError, StateResult};
use crate::traits::{display_path, StateStore};
use bytes::Bytes;
use ewasm_primitives::{keccak256, H256};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;

/// A node of the state tree
///
/// Each vertex owns an optional value and its named children outright, so a
/// cloned tree never shares mutable storage with the original.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Vertex {
    value: Option<Bytes>,
    edges: BTreeMap<String, Vertex>,
}

impl Vertex {
    /// Create an empty vertex
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a leaf holding `value`
    pub fn with_value(value: impl Into<Bytes>) -> Self {
        Self {
            value: Some(value.into()),
            edges: BTreeMap::new(),
        }
    }

    /// Create a leaf holding the JSON encoding of `value`
    pub fn with_json<T: Serialize>(value: &T) -> StateResult<Self> {
        let encoded = serde_json::to_vec(value).map_err(|e| StateError::InvalidValue {
            path: String::new(),
            reason: e.to_string(),
        })?;
        Ok(Self::with_value(encoded))
    }

    /// Stored value, if any
    pub fn value(&self) -> Option<&Bytes> {
        self.value.as_ref()
    }

    /// Replace the stored value
    pub fn set_value(&mut self, value: impl Into<Bytes>) {
        self.value = Some(value.into());
    }

    /// Decode the stored value as JSON
    ///
    /// Returns `Ok(None)` for a vertex without a value.
    pub fn decode_json<T: DeserializeOwned>(&self) -> StateResult<Option<T>> {
        match &self.value {
            None => Ok(None),
            Some(raw) => serde_json::from_slice(raw)
                .map(Some)
                .map_err(|e| StateError::InvalidValue {
                    path: String::new(),
                    reason: e.to_string(),
                }),
        }
    }

    /// Direct child named `name`
    pub fn edge(&self, name: &str) -> Option<&Vertex> {
        self.edges.get(name)
    }

    /// Iterate direct children in name order
    pub fn edges(&self) -> impl Iterator<Item = (&str, &Vertex)> {
        self.edges.iter().map(|(name, child)| (name.as_str(), child))
    }

    /// True when the vertex has neither a value nor children
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.edges.is_empty()
    }

    /// Content hash over the value and all child hashes
    pub fn hash(&self) -> H256 {
        let mut buf = Vec::new();
        match &self.value {
            Some(value) => {
                buf.push(1);
                buf.extend_from_slice(&(value.len() as u64).to_be_bytes());
                buf.extend_from_slice(value);
            }
            None => buf.push(0),
        }
        for (name, child) in &self.edges {
            buf.extend_from_slice(&(name.len() as u64).to_be_bytes());
            buf.extend_from_slice(name.as_bytes());
            buf.extend_from_slice(&child.hash());
        }
        keccak256(&buf)
    }
}

impl StateStore for Vertex {
    fn set(&mut self, path: &[&str], node: Vertex) -> StateResult<()> {
        let (last, parents) = path.split_last().ok_or(StateError::EmptyPath)?;
        let mut cursor = self;
        for segment in parents {
            cursor = cursor.edges.entry((*segment).to_string()).or_default();
        }
        cursor.edges.insert((*last).to_string(), node);
        Ok(())
    }

    fn get(&self, path: &[&str]) -> StateResult<&Vertex> {
        let mut cursor = self;
        for segment in path {
            cursor = cursor
                .edges
                .get(*segment)
                .ok_or_else(|| StateError::NotFound(display_path(path)))?;
        }
        Ok(cursor)
    }

    fn get_mut(&mut self, path: &[&str]) -> StateResult<&mut Vertex> {
        let mut cursor = self;
        for segment in path {
            cursor = cursor
                .edges
                .get_mut(*segment)
                .ok_or_else(|| StateError::NotFound(display_path(path)))?;
        }
        Ok(cursor)
    }
}
