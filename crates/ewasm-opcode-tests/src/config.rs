//! Harness configuration

use ewasm_primitives::Gas;
use std::path::{Path, PathBuf};

/// Where the legacy EVM memory region starts in linear memory
pub const EVM_MEMORY_OFFSET: u32 = 33832;

/// Gas budget of every test message
pub const DEFAULT_GAS_BUDGET: Gas = 1_000_000;

/// Harness configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Directory holding the test definition files
    pub test_dir: PathBuf,
    /// Run only this file name from `test_dir`
    pub file_filter: Option<String>,
    /// Linear memory address of EVM memory offset zero
    pub memory_offset: u32,
    /// Gas budget of every test message
    pub gas_budget: Gas,
}

impl HarnessConfig {
    /// Test definitions shipped with this crate
    pub fn default_test_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("opcode")
    }

    /// Set the test directory
    pub fn with_test_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.test_dir = dir.into();
        self
    }

    /// Restrict the run to one file
    pub fn with_file_filter(mut self, file: Option<String>) -> Self {
        self.file_filter = file;
        self
    }

}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            test_dir: Self::default_test_dir(),
            file_filter: None,
            memory_offset: EVM_MEMORY_OFFSET,
            gas_budget: DEFAULT_GAS_BUDGET,
        }
    }
}
