//! Type definitions for opcode test JSON files

use ewasm_primitives::{hex::decode_hex, Address};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Hex-encoded bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HexBytes(pub Vec<u8>);

impl<'de> Deserialize<'de> for HexBytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        decode_hex(&s).map(HexBytes).map_err(serde::de::Error::custom)
    }
}

/// Test file structure: cases in declaration order
pub type OpcodeTestFile = Vec<OpcodeTestCase>;

/// Single opcode test case
#[derive(Debug, Clone, Deserialize)]
pub struct OpcodeTestCase {
    /// Opcode under test, also the name of the module export
    pub op: String,
    /// Human readable label
    #[serde(default)]
    pub description: String,
    /// Message and block environment
    #[serde(default)]
    pub environment: TestEnvironment,
    /// Machine state before the opcode runs
    #[serde(rename = "in", default)]
    pub input: TestInput,
    /// Extra arguments for the opcode export
    #[serde(default)]
    pub params: Vec<i64>,
    /// Expected machine state after the opcode runs
    #[serde(default)]
    pub out: TestOutput,
}

impl OpcodeTestCase {
    /// `op` and description, for log lines
    pub fn label(&self) -> String {
        if self.description.is_empty() {
            self.op.clone()
        } else {
            format!("{} ({})", self.op, self.description)
        }
    }
}

/// Test environment; every field is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestEnvironment {
    /// Message sender
    pub caller: Option<Address>,
    /// Call data
    pub call_data: Option<HexBytes>,
    /// Block coinbase
    pub coinbase: Option<Address>,
    /// Executing contract address
    pub address: Option<Address>,
}

/// Input machine state
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TestInput {
    /// Stack words, bottom first
    pub stack: Vec<String>,
    /// Memory words by offset
    pub memory: BTreeMap<u32, String>,
}

/// Expected machine state
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestOutput {
    /// Stack words, bottom first
    pub stack: Vec<String>,
    /// Memory words by offset
    pub memory: BTreeMap<u32, String>,
    /// Return payload
    #[serde(rename = "return")]
    pub return_value: Option<String>,
    /// Gas consumed by the opcode
    pub gas_used: Option<u64>,
}
